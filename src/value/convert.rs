//! Conversions from host types and documents into [`Value`].

use std::collections::{BTreeMap, HashMap};

use super::value::{Map, Object, Value};

/// Reserved document key naming the host type of a mapping.
pub const TYPE_KEY: &str = "$type";

/// ToValue converts a host value into the dynamic representation the differ
/// walks.
///
/// Host types that should be decomposed field by field build an [`Object`]:
///
/// ```
/// use audit_diff::value::{Object, ToValue, Value};
///
/// struct Account {
///     id: i64,
///     owner: String,
/// }
///
/// impl ToValue for Account {
///     fn to_value(&self) -> Value {
///         Object::new("Account")
///             .with_field("id", self.id)
///             .with_field("owner", self.owner.as_str())
///             .into()
///     }
/// }
/// ```
pub trait ToValue {
    fn to_value(&self) -> Value;
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! int_conversions {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(i: $t) -> Self {
                    Value::Int(i64::from(i))
                }
            }

            impl ToValue for $t {
                fn to_value(&self) -> Value {
                    Value::Int(i64::from(*self))
                }
            }
        )*
    };
}

int_conversions!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        i64::try_from(u).map_or(Value::UInt(u), Value::Int)
    }
}

impl From<usize> for Value {
    fn from(u: usize) -> Self {
        // usize is at most 64 bits wide on every supported target.
        Value::from(u as u64)
    }
}

impl ToValue for u64 {
    fn to_value(&self) -> Value {
        Value::from(*self)
    }
}

impl ToValue for usize {
    fn to_value(&self) -> Value {
        Value::from(*self)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Float(f64::from(x))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Map(m)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, ToValue::to_value)
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<K: ToString, V: ToValue> ToValue for BTreeMap<K, V> {
    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.to_string(), v.to_value()))
                .collect(),
        )
    }
}

impl<K: ToString, V: ToValue, S> ToValue for HashMap<K, V, S> {
    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.to_string(), v.to_value()))
                .collect(),
        )
    }
}

impl From<serde_json::Value> for Value {
    fn from(raw: serde_json::Value) -> Self {
        match raw {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Value::Int(i),
                (None, Some(u)) => Value::UInt(u),
                (None, None) => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(mut entries) => match entries.remove(TYPE_KEY) {
                Some(serde_json::Value::String(type_name)) => {
                    let mut object = Object::new(type_name);
                    for (name, v) in entries {
                        object.set_field(name, Value::from(v));
                    }
                    Value::Object(object)
                }
                other => {
                    // A non-string type marker is kept as ordinary data.
                    if let Some(marker) = other {
                        entries.insert(TYPE_KEY.to_string(), marker);
                    }
                    Value::Map(
                        entries
                            .into_iter()
                            .map(|(k, v)| (k, Value::from(v)))
                            .collect(),
                    )
                }
            },
        }
    }
}

/// Parse a value from JSON.
///
/// Objects carrying a `"$type"` string become [`Object`]s of that type.
pub fn from_json(json: &str) -> Result<Value, serde_json::Error> {
    let raw: serde_json::Value = serde_json::from_str(json)?;
    Ok(Value::from(raw))
}

/// Parse a value from YAML.
///
/// Mappings carrying a `$type` string become [`Object`]s of that type.
pub fn from_yaml(yaml: &str) -> Result<Value, serde_yaml::Error> {
    let raw: serde_json::Value = serde_yaml::from_str(yaml)?;
    Ok(Value::from(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_value_collections() {
        let v = vec![1i32, 2, 3].to_value();
        assert_eq!(
            v,
            Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );

        let mut m = HashMap::new();
        m.insert(10u32, "ten".to_string());
        let v = m.to_value();
        assert_eq!(v.as_map().and_then(|m| m.get("10")), Some(&Value::from("ten")));

        let none: Option<i64> = None;
        assert!(none.to_value().is_null());
        assert_eq!(Some(3i64).to_value(), Value::Int(3));
    }

    #[test]
    fn test_unsigned_integers_stay_exact() {
        let max = from_json("18446744073709551615").unwrap();
        let below = from_json("18446744073709551614").unwrap();
        assert_eq!(max, Value::UInt(u64::MAX));
        assert_eq!(below, Value::UInt(u64::MAX - 1));
        assert_ne!(max, below);

        let v = from_yaml("id: 9223372036854775808\n").unwrap();
        assert_eq!(
            v.as_map().and_then(|m| m.get("id")),
            Some(&Value::UInt(1 << 63))
        );

        assert_eq!(from_json("42").unwrap(), Value::Int(42));
    }

    #[test]
    fn test_unsigned_host_values() {
        assert_eq!(7u64.to_value(), Value::Int(7));
        assert_eq!(u64::MAX.to_value(), Value::UInt(u64::MAX));
        assert_eq!(
            vec![1usize, 2].to_value(),
            Value::List(vec![Value::Int(1), Value::Int(2)])
        );
        assert_eq!(Value::from(3usize), Value::Int(3));
    }

    #[test]
    fn test_from_json_typed_object() {
        let v = from_json(r#"{"$type": "User", "name": "ann", "age": 30}"#).unwrap();
        let o = v.as_object().expect("object");
        assert_eq!(o.type_name(), "User");
        assert_eq!(o.field("name"), Some(&Value::from("ann")));
        assert_eq!(o.field("age"), Some(&Value::Int(30)));
        assert!(o.field(TYPE_KEY).is_none());
    }

    #[test]
    fn test_from_yaml_plain_map() {
        let v = from_yaml("a: 1\nb: [x, y]\nc: 1.5\n").unwrap();
        let m = v.as_map().expect("map");
        assert_eq!(m.get("a"), Some(&Value::Int(1)));
        assert_eq!(m.get("c"), Some(&Value::Float(1.5)));
        assert_eq!(
            m.get("b"),
            Some(&Value::List(vec![Value::from("x"), Value::from("y")]))
        );
    }

    #[test]
    fn test_non_string_type_marker_is_data() {
        let v = from_json(r#"{"$type": 5}"#).unwrap();
        assert_eq!(v.as_map().and_then(|m| m.get(TYPE_KEY)), Some(&Value::Int(5)));
    }
}
