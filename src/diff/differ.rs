//! The differ.

use serde::{Deserialize, Serialize};

use super::error::DiffError;
use super::result::DiffResult;
use crate::access::read_field;
use crate::fieldpath::Path;
use crate::resolver::{Resolver, ResolverRegistry};
use crate::schema::{FieldDef, Kind, Schema};
use crate::value::{Object, ToValue, Value};

/// Default limit on how deep a diff descends.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// MismatchPolicy decides what happens when both sides are present but have
/// different runtime types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MismatchPolicy {
    /// Fail the diff with [`DiffError::TypeMismatch`].
    #[default]
    Abort,
    /// Log a warning and walk both sides using the original's kind.
    Warn,
}

/// DiffOptions configures a [`Differ`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiffOptions {
    pub on_type_mismatch: MismatchPolicy,
    /// Deepest nesting level a diff may reach before failing.
    pub max_depth: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        DiffOptions {
            on_type_mismatch: MismatchPolicy::Abort,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Differ computes path-keyed differences between two values.
///
/// Each differ owns its schema and its resolver registry; resolvers
/// registered on one differ are invisible to others.
#[derive(Debug, Default)]
pub struct Differ {
    schema: Schema,
    resolvers: ResolverRegistry,
    options: DiffOptions,
}

/// DifferBuilder is a builder for creating a Differ.
#[derive(Default)]
pub struct DifferBuilder {
    schema: Schema,
    resolvers: ResolverRegistry,
    options: DiffOptions,
}

impl DifferBuilder {
    /// Creates a new DifferBuilder.
    pub fn new() -> Self {
        DifferBuilder::default()
    }

    /// Sets the schema.
    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    /// Sets all options at once.
    pub fn options(mut self, options: DiffOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the type mismatch policy.
    pub fn on_type_mismatch(mut self, policy: MismatchPolicy) -> Self {
        self.options.on_type_mismatch = policy;
        self
    }

    /// Sets the depth limit.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.options.max_depth = max_depth;
        self
    }

    /// Registers a resolver.
    pub fn resolver<F>(self, key: impl Into<String>, resolver: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.resolvers.register(key, resolver);
        self
    }

    /// Builds the Differ.
    pub fn build(self) -> Differ {
        Differ {
            schema: self.schema,
            resolvers: self.resolvers,
            options: self.options,
        }
    }
}

impl Differ {
    /// Creates a differ with default options and no resolvers.
    pub fn new(schema: Schema) -> Self {
        Differ {
            schema,
            ..Default::default()
        }
    }

    /// Creates a new DifferBuilder.
    pub fn builder() -> DifferBuilder {
        DifferBuilder::new()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    pub fn resolvers(&self) -> &ResolverRegistry {
        &self.resolvers
    }

    /// Registers a resolver, returning the one it replaced.
    pub fn register_resolver<F>(&self, key: impl Into<String>, resolver: F) -> Option<Resolver>
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.resolvers.register(key, resolver)
    }

    /// Removes a resolver. Unknown keys are ignored.
    pub fn unregister_resolver(&self, key: &str) {
        self.resolvers.unregister(key);
    }

    /// Calculates the differences between `original` and `current`.
    ///
    /// Every key of the result is a path rooted at `tag` where the two
    /// values disagree, mapped to the original value's string form. A value
    /// that appears is recorded as an empty string at its path; a value that
    /// disappears is expanded into all of its leaves, as
    /// [`Differ::resolve_leaf_paths`] would.
    ///
    /// Keys present only in a current keyed collection are not visited.
    pub fn diff(&self, tag: &str, original: &Value, current: &Value) -> Result<DiffResult, DiffError> {
        let mut result = DiffResult::new();
        self.diff_at(&Path::root(tag), original, current, 0, &mut result)?;
        Ok(result)
    }

    /// Converts two host values and diffs them.
    pub fn diff_values<T: ToValue + ?Sized>(
        &self,
        tag: &str,
        original: &T,
        current: &T,
    ) -> Result<DiffResult, DiffError> {
        self.diff(tag, &original.to_value(), &current.to_value())
    }

    fn diff_at(
        &self,
        path: &Path,
        original: &Value,
        current: &Value,
        depth: usize,
        out: &mut DiffResult,
    ) -> Result<(), DiffError> {
        self.check_depth(path, depth)?;

        match (original, current) {
            (Value::Null, Value::Null) => Ok(()),
            (Value::Null, _) => {
                out.insert(path, "");
                Ok(())
            }
            (_, Value::Null) => self.resolve_at(path, original, depth, out),
            _ => self.diff_present(path, original, current, depth, out),
        }
    }

    fn diff_present(
        &self,
        path: &Path,
        original: &Value,
        current: &Value,
        depth: usize,
        out: &mut DiffResult,
    ) -> Result<(), DiffError> {
        if !original.same_type(current) {
            let err = DiffError::type_mismatch(
                path.to_string(),
                original.type_name(),
                current.type_name(),
            );
            match self.options.on_type_mismatch {
                MismatchPolicy::Abort => return Err(err),
                MismatchPolicy::Warn => log::warn!("{}; continuing with the original's kind", err),
            }
        }

        let kind = self.schema.classify(original).unwrap_or(Kind::Scalar);
        log::trace!("diffing {} at {:?} as {:?}", original.type_name(), path.to_string(), kind);

        match (kind, original, current) {
            (Kind::Composite, Value::Object(o), Value::Object(c)) => {
                self.diff_fields(path, o, c, depth, out)
            }
            (Kind::Sequence, Value::List(o), Value::List(c)) => {
                for (i, (o_item, c_item)) in o.iter().zip(c).enumerate() {
                    self.diff_at(&path.index(i + 1), o_item, c_item, depth + 1, out)?;
                }
                if o.len() != c.len() {
                    out.insert(&path.count(), o.len().max(c.len()).to_string());
                }
                Ok(())
            }
            (Kind::KeyedCollection, Value::Map(o), Value::Map(c)) => {
                let absent = Value::Null;
                for (key, o_item) in o.iter() {
                    let c_item = c.get(key).unwrap_or(&absent);
                    self.diff_at(&path.key(key), o_item, c_item, depth + 1, out)?;
                }
                Ok(())
            }
            _ => {
                if original != current {
                    out.insert(path, original.to_string());
                }
                Ok(())
            }
        }
    }

    fn diff_fields(
        &self,
        path: &Path,
        original: &Object,
        current: &Object,
        depth: usize,
        out: &mut DiffResult,
    ) -> Result<(), DiffError> {
        for field in self.schema.comparable_fields(original.type_name()).iter() {
            let Some(o_value) = read_or_skip(field, original) else {
                continue;
            };
            let Some(c_value) = read_or_skip(field, current) else {
                continue;
            };

            let (o_value, c_value) = match self.resolver_for(field) {
                Some(resolve) => (resolve(&o_value), resolve(&c_value)),
                None => (o_value, c_value),
            };

            self.diff_at(&path.field(&field.name), &o_value, &c_value, depth + 1, out)?;
        }
        Ok(())
    }

    pub(super) fn resolver_for(&self, field: &FieldDef) -> Option<Resolver> {
        let key = field.resolver_key()?;
        let resolver = self.resolvers.lookup(key);
        if resolver.is_some() {
            log::debug!("resolving field {} with resolver {:?}", field.name, key);
        }
        resolver
    }

    pub(super) fn check_depth(&self, path: &Path, depth: usize) -> Result<(), DiffError> {
        if depth > self.options.max_depth {
            return Err(DiffError::depth_exceeded(path.to_string(), self.options.max_depth));
        }
        Ok(())
    }
}

/// Reads a field, logging and returning `None` when it cannot be read.
pub(super) fn read_or_skip(field: &FieldDef, object: &Object) -> Option<Value> {
    match read_field(field, object) {
        Ok(value) => Some(value),
        Err(e) => {
            log::error!("error accessing field {:?}, skipping: {}", field.name, e);
            None
        }
    }
}
