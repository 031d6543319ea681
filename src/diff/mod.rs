//! Diff module - Path-keyed differences between two values.
//!
//! [`Differ::diff`] reports the locations where two values disagree, and
//! [`Differ::resolve_leaf_paths`] lists every leaf of a single value in the
//! same notation.

mod differ;
mod error;
mod resolve;
mod result;


pub use differ::*;
pub use error::*;
pub use result::*;
