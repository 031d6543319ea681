//! Field path module - Locations inside a compared structure.
//!
//! Paths are built one element per recursion step and rendered as the
//! dot-joined keys of a diff result.

mod path;

pub use path::*;
