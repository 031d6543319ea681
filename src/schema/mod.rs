//! Schema module - Field selection for composite host types.
//!
//! A [`Schema`] is a declarative table of [`TypeDef`]s built when the host
//! types are defined. The differ asks it how to classify each value and which
//! fields of a composite participate in comparison.

mod elements;
mod kind;

pub use elements::*;
pub use kind::*;
