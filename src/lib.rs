//! # Audit Diff
//!
//! Path-keyed structural differences between two instances of the same
//! data shape, for auditing and change tracking of domain objects.
//!
//! A diff is a flat map from a location such as `order.lines.idx2.price` to
//! the original value found there. Locations are only present where the two
//! instances disagree.
//!
//! ## Modules
//!
//! - [`value`] - Dynamic representation of host values and the [`ToValue`] conversion trait
//! - [`schema`] - Type descriptors deciding which values are composites and which fields compare
//! - [`fieldpath`] - Paths identifying locations inside a compared structure
//! - [`resolver`] - Registry of transforms applied to field values before comparison
//! - [`access`] - Reading field values through accessors or storage
//! - [`diff`] - The differ and leaf expansion
//!
//! ## Example
//!
//! ```
//! use audit_diff::{Differ, FieldDef, Object, Schema, TypeDef, Value};
//!
//! let schema = Schema::with_types(vec![TypeDef::new("User")
//!     .diffable()
//!     .field(FieldDef::diff("name"))
//!     .field(FieldDef::diff("role").resolver("role"))]);
//! let differ = Differ::new(schema);
//! differ.register_resolver("role", |v: &Value| match v.as_int() {
//!     Some(1) => Value::from("admin"),
//!     _ => Value::from("member"),
//! });
//!
//! let before: Value = Object::new("User").with_field("name", "ann").with_field("role", 1i64).into();
//! let after: Value = Object::new("User").with_field("name", "ann").with_field("role", 2i64).into();
//!
//! let changes = differ.diff("user", &before, &after).unwrap();
//! assert_eq!(changes.get("user.role"), Some("admin"));
//! assert_eq!(changes.len(), 1);
//! ```

pub mod access;
pub mod diff;
pub mod fieldpath;
pub mod resolver;
pub mod schema;
pub mod value;

pub use access::{read_field, AccessError};
pub use diff::{DiffError, DiffOptions, DiffResult, Differ, DifferBuilder, MismatchPolicy};
pub use fieldpath::{Path, PathElement};
pub use resolver::{Resolver, ResolverRegistry};
pub use schema::{FieldDef, Kind, Schema, TypeDef, Visibility};
pub use value::{Map, Object, ToValue, Value};
