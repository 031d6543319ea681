//! Field value access.
//!
//! A field is read through an accessor when the object exposes one, and from
//! its stored value otherwise.

use thiserror::Error;

use crate::schema::{FieldDef, Visibility};
use crate::value::{Object, Value};

/// Prefix of the accessor convention for boolean fields.
pub const BOOLEAN_ACCESSOR_PREFIX: &str = "is_";

/// Prefix of the general accessor convention.
pub const ACCESSOR_PREFIX: &str = "get_";

/// AccessError reports a field that could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("{type_name}.{field}: {reason}")]
    FieldAccess {
        type_name: String,
        field: String,
        reason: String,
    },

    #[error("{type_name}.{accessor}(): {message}")]
    AccessorInvocation {
        type_name: String,
        accessor: String,
        message: String,
    },
}

/// Reads `field` from `object`.
///
/// Tried in order: the `is_<name>` accessor when the field is declared
/// boolean, the `get_<name>` accessor, then the stored value. Private storage
/// without an accessor cannot be read. A public field with nothing stored
/// reads as [`Value::Null`].
pub fn read_field(field: &FieldDef, object: &Object) -> Result<Value, AccessError> {
    if field.boolean {
        let name = format!("{}{}", BOOLEAN_ACCESSOR_PREFIX, field.name);
        if let Some(value) = invoke(object, &name)? {
            return Ok(value);
        }
        log::trace!(
            "{} has no {} accessor, trying {}{}",
            object.type_name(),
            name,
            ACCESSOR_PREFIX,
            field.name
        );
    }

    let name = format!("{}{}", ACCESSOR_PREFIX, field.name);
    if let Some(value) = invoke(object, &name)? {
        return Ok(value);
    }

    match field.visibility {
        Visibility::Public => Ok(object.field(&field.name).cloned().unwrap_or_default()),
        Visibility::Private => Err(AccessError::FieldAccess {
            type_name: object.type_name().to_string(),
            field: field.name.clone(),
            reason: "field is private and has no accessor".to_string(),
        }),
    }
}

fn invoke(object: &Object, name: &str) -> Result<Option<Value>, AccessError> {
    let Some(accessor) = object.accessor(name) else {
        return Ok(None);
    };
    accessor(object)
        .map(Some)
        .map_err(|message| AccessError::AccessorInvocation {
            type_name: object.type_name().to_string(),
            accessor: name.to_string(),
            message,
        })
}
