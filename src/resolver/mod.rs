//! Resolver module - Caller-supplied value transforms keyed by name.

mod registry;

pub use registry::*;
