//! Value module - In-memory representation of the host object graph.
//!
//! Host types convert into [`Value`] through [`ToValue`]; documents load
//! through [`from_json`] and [`from_yaml`].

mod convert;
mod value;

pub use convert::*;
pub use value::*;
