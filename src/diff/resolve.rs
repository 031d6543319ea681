//! Leaf expansion of a single value.

use super::differ::{read_or_skip, Differ};
use super::error::DiffError;
use super::result::DiffResult;
use crate::fieldpath::Path;
use crate::schema::Kind;
use crate::value::{ToValue, Value};

impl Differ {
    /// Lists every leaf under `value` with its string form, using the same
    /// path notation as [`Differ::diff`].
    ///
    /// Composite fields pass through their resolvers before being expanded.
    /// An absent value yields a single empty entry at `tag`; empty
    /// collections yield nothing. No length marker is emitted for sequences.
    pub fn resolve_leaf_paths(&self, tag: &str, value: &Value) -> Result<DiffResult, DiffError> {
        let mut result = DiffResult::new();
        self.resolve_at(&Path::root(tag), value, 0, &mut result)?;
        Ok(result)
    }

    /// Converts a host value and lists its leaves.
    pub fn resolve_value<T: ToValue + ?Sized>(
        &self,
        tag: &str,
        value: &T,
    ) -> Result<DiffResult, DiffError> {
        self.resolve_leaf_paths(tag, &value.to_value())
    }

    pub(super) fn resolve_at(
        &self,
        path: &Path,
        value: &Value,
        depth: usize,
        out: &mut DiffResult,
    ) -> Result<(), DiffError> {
        self.check_depth(path, depth)?;

        match (self.schema().classify(value), value) {
            (None, _) => out.insert(path, ""),
            (Some(Kind::Composite), Value::Object(object)) => {
                log::trace!("resolving {} at {:?}", object.type_name(), path.to_string());
                for field in self.schema().comparable_fields(object.type_name()).iter() {
                    let Some(field_value) = read_or_skip(field, object) else {
                        continue;
                    };
                    let field_value = match self.resolver_for(field) {
                        Some(resolve) => resolve(&field_value),
                        None => field_value,
                    };
                    self.resolve_at(&path.field(&field.name), &field_value, depth + 1, out)?;
                }
            }
            (Some(Kind::Sequence), Value::List(items)) => {
                for (i, item) in items.iter().enumerate() {
                    self.resolve_at(&path.index(i + 1), item, depth + 1, out)?;
                }
            }
            (Some(Kind::KeyedCollection), Value::Map(map)) => {
                for (key, item) in map.iter() {
                    self.resolve_at(&path.key(key), item, depth + 1, out)?;
                }
            }
            (Some(_), scalar) => out.insert(path, scalar.to_string()),
        }
        Ok(())
    }
}
