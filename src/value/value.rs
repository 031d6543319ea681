//! Core value types.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Accessor is a zero-argument read method exposed by an object.
///
/// Accessors may fail; the error message is reported by the field reader.
pub type Accessor = Arc<dyn Fn(&Object) -> Result<Value, String> + Send + Sync>;

/// Value represents any value a host object graph can hold.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// An absent value (a missing reference).
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    /// An unsigned integer above `i64::MAX`; smaller ones are stored as `Int`.
    UInt(u64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(Map),
    Object(Object),
}

/// Map is a keyed collection. Keys are stored in their string form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Map {
    pub entries: BTreeMap<String, Value>,
}

/// Object is an instance of a named host type.
///
/// `fields` holds the directly readable storage; `accessors` holds named
/// read methods such as `get_name` or `is_active`.
#[derive(Clone)]
pub struct Object {
    type_name: String,
    fields: BTreeMap<String, Value>,
    accessors: BTreeMap<String, Accessor>,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Returns the runtime type name of this value.
    ///
    /// Objects report their host type name; everything else reports the
    /// name of its variant.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) | Value::UInt(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Object(o) => o.type_name(),
        }
    }

    /// Returns true if both values have the same runtime type.
    ///
    /// Variants are compared first, so an object never matches a primitive
    /// whatever its type name. Signed and unsigned integers are one type.
    pub fn same_type(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Object(a), Value::Object(b)) => a.type_name() == b.type_name(),
            (Value::Int(_) | Value::UInt(_), Value::Int(_) | Value::UInt(_)) => true,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            // Bitwise, so NaN equals itself and 0.0 differs from -0.0.
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::UInt(u) => write!(f, "{}", u),
            // Debug keeps the fractional part, so 5.0 does not print as 5.
            Value::Float(x) => write!(f, "{:?}", x),
            Value::String(s) => f.write_str(s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(m) => write!(f, "{}", m),
            Value::Object(o) => write!(f, "{}", o),
        }
    }
}

impl Map {
    pub fn new() -> Self {
        Map {
            entries: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Inserts an entry, storing the key in its string form.
    pub fn set(&mut self, key: impl ToString, value: impl Into<Value>) {
        self.entries.insert(key.to_string(), value.into());
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn delete(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", k, v)?;
        }
        write!(f, "}}")
    }
}

impl FromIterator<(String, Value)> for Map {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Map {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Object {
    /// Creates an empty instance of the named type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Object {
            type_name: type_name.into(),
            fields: BTreeMap::new(),
            accessors: BTreeMap::new(),
        }
    }

    /// Builder-style variant of [`Object::set_field`].
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_field(name, value);
        self
    }

    /// Builder-style variant of [`Object::set_accessor`].
    pub fn with_accessor<F>(mut self, name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&Object) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.set_accessor(name, accessor);
        self
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn set_accessor<F>(&mut self, name: impl Into<String>, accessor: F)
    where
        F: Fn(&Object) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.accessors.insert(name.into(), Arc::new(accessor));
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the stored value of a field, bypassing accessors.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn accessor(&self, name: &str) -> Option<&Accessor> {
        self.accessors.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.fields == other.fields
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .field("accessors", &self.accessors.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.type_name)?;
        for (i, (k, v)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", k, v)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type_names() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::Bool(true).type_name(), "bool");
        assert_eq!(Value::Int(42).type_name(), "int");
        assert_eq!(Value::Float(1.5).type_name(), "float");
        assert_eq!(Value::String("x".into()).type_name(), "string");
        assert_eq!(Value::List(vec![]).type_name(), "list");
        assert_eq!(Value::Map(Map::new()).type_name(), "map");
        assert_eq!(Value::Object(Object::new("Account")).type_name(), "Account");
    }

    #[test]
    fn test_value_equality() {
        assert_eq!(Value::Null, Value::Null);
        assert_ne!(Value::Bool(true), Value::Bool(false));
        assert_eq!(Value::Int(42), Value::Int(42));
        assert_ne!(Value::Int(1), Value::Float(1.0));
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_ne!(Value::Float(0.0), Value::Float(-0.0));
        assert_ne!(Value::UInt(u64::MAX), Value::UInt(u64::MAX - 1));
        assert_eq!(Value::String("hello".into()), Value::String("hello".into()));
    }

    #[test]
    fn test_same_type() {
        assert!(Value::Int(1).same_type(&Value::Int(2)));
        assert!(Value::Int(1).same_type(&Value::UInt(u64::MAX)));
        assert!(!Value::Int(1).same_type(&Value::Float(1.0)));
        assert!(!Value::Int(1).same_type(&Object::new("int").into()));
        assert!(!Value::from("s").same_type(&Object::new("string").into()));
        assert!(Value::from(Object::new("User")).same_type(&Object::new("User").into()));
        assert!(!Value::from(Object::new("User")).same_type(&Object::new("Admin").into()));
    }

    #[test]
    fn test_object_equality_ignores_accessors() {
        let a = Object::new("User").with_field("id", 1i64);
        let b = Object::new("User")
            .with_field("id", 1i64)
            .with_accessor("get_id", |_| Ok(Value::Int(1)));
        assert_eq!(a, b);

        let c = Object::new("Admin").with_field("id", 1i64);
        assert_ne!(a, c);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Int(5).to_string(), "5");
        assert_eq!(Value::Float(5.0).to_string(), "5.0");
        assert_eq!(Value::Float(-0.0).to_string(), "-0.0");
        assert_eq!(Value::UInt(u64::MAX).to_string(), "18446744073709551615");
        assert_eq!(Value::String("hi".into()).to_string(), "hi");
        assert_eq!(
            Value::List(vec![Value::Int(1), Value::Int(2)]).to_string(),
            "[1, 2]"
        );

        let mut m = Map::new();
        m.set("b", 2i64);
        m.set("a", 1i64);
        assert_eq!(Value::Map(m).to_string(), "{a=1, b=2}");

        let o = Object::new("Point").with_field("x", 1i64).with_field("y", 2i64);
        assert_eq!(Value::Object(o).to_string(), "Point{x=1, y=2}");
    }

    #[test]
    fn test_map_operations() {
        let mut map = Map::new();
        assert!(map.is_empty());

        map.set(7, "seven");
        assert!(map.has("7"));
        assert_eq!(map.get("7"), Some(&Value::String("seven".into())));

        map.delete("7");
        assert!(!map.has("7"));
    }
}
