//! Value classification.

use super::elements::Schema;
use crate::value::Value;

/// Kind selects how the differ walks a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// An object of a diffable type, decomposed field by field.
    Composite,
    /// An ordered sequence, walked by position.
    Sequence,
    /// A keyed collection, walked by key.
    KeyedCollection,
    /// Anything else, compared by equality.
    Scalar,
}

impl Schema {
    /// Classifies a value. Returns `None` for an absent value.
    ///
    /// Objects whose type is not diffable are scalars.
    pub fn classify(&self, value: &Value) -> Option<Kind> {
        match value {
            Value::Null => None,
            Value::List(_) => Some(Kind::Sequence),
            Value::Map(_) => Some(Kind::KeyedCollection),
            Value::Object(o) if self.is_composite(o.type_name()) => Some(Kind::Composite),
            _ => Some(Kind::Scalar),
        }
    }
}
