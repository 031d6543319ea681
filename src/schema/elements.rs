//! Type descriptors and field selection.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

/// Schema is the table of host type descriptors consulted during a diff.
///
/// Types are indexed in a map before the first search and comparable field
/// lists are memoised per type, so this type should be considered immutable
/// once it is handed to a differ.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<TypeDef>,

    #[serde(skip)]
    type_map: OnceCell<HashMap<String, TypeDef>>,

    #[serde(skip)]
    resolved_fields: Mutex<HashMap<String, Arc<[FieldDef]>>>,
}

impl Clone for Schema {
    fn clone(&self) -> Self {
        Schema::with_types(self.types.clone())
    }
}

/// TypeDef describes one host type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    /// Every type must have a unique name.
    pub name: String,

    /// Name of the parent type whose marker and fields are inherited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Marks the type as decomposed field by field.
    #[serde(default)]
    pub diffable: bool,

    /// Fields declared directly on this type.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDef>,
}

/// Visibility of a field's storage, checked when no accessor is found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// FieldDef describes one declared field of a host type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,

    /// Participation marker. Fields without it never appear in a diff.
    #[serde(default)]
    pub diff: bool,

    /// Key of the resolver applied to the raw value before comparison.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolver: Option<String>,

    /// Declared boolean; enables the `is_<name>` accessor convention.
    #[serde(default)]
    pub boolean: bool,

    #[serde(default)]
    pub visibility: Visibility,
}

impl TypeDef {
    /// Creates an unmarked type with no fields.
    pub fn new(name: impl Into<String>) -> Self {
        TypeDef {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Marks the type as composite.
    pub fn diffable(mut self) -> Self {
        self.diffable = true;
        self
    }

    /// Sets the parent type.
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    /// Declares a field.
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }
}

impl FieldDef {
    /// Declares a field without the participation marker.
    pub fn new(name: impl Into<String>) -> Self {
        FieldDef {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Declares a field carrying the participation marker.
    pub fn diff(name: impl Into<String>) -> Self {
        FieldDef {
            name: name.into(),
            diff: true,
            ..Default::default()
        }
    }

    /// Attaches a resolver key.
    pub fn resolver(mut self, key: impl Into<String>) -> Self {
        self.resolver = Some(key.into());
        self
    }

    /// Declares the field as boolean.
    pub fn boolean(mut self) -> Self {
        self.boolean = true;
        self
    }

    /// Declares the field storage private.
    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    /// Returns the resolver key, if any.
    pub fn resolver_key(&self) -> Option<&str> {
        self.resolver.as_deref()
    }
}

impl Schema {
    /// Creates a new empty schema.
    pub fn new() -> Self {
        Schema::default()
    }

    /// Creates a schema with the given type definitions.
    pub fn with_types(types: Vec<TypeDef>) -> Self {
        Schema {
            types,
            type_map: OnceCell::new(),
            resolved_fields: Mutex::new(HashMap::new()),
        }
    }

    /// Parses a schema from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Schema, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Returns the definition registered under `name`, if any.
    pub fn find_named_type(&self, name: &str) -> Option<&TypeDef> {
        let map = self.type_map.get_or_init(|| {
            self.types
                .iter()
                .map(|t| (t.name.clone(), t.clone()))
                .collect()
        });
        map.get(name)
    }

    /// Walks a type and its ancestors, subtype first.
    ///
    /// The walk ends at the first unknown or already visited ancestor.
    fn lineage(&self, name: &str) -> Vec<&TypeDef> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut next = Some(name);
        while let Some(current) = next {
            if !seen.insert(current) {
                log::warn!("inheritance cycle through type {}", current);
                break;
            }
            let Some(def) = self.find_named_type(current) else {
                break;
            };
            chain.push(def);
            next = def.extends.as_deref();
        }
        chain
    }

    /// Returns true if the type, or any of its ancestors, is marked diffable.
    pub fn is_composite(&self, type_name: &str) -> bool {
        self.lineage(type_name).iter().any(|t| t.diffable)
    }

    /// Returns the fields of a type that participate in comparison.
    ///
    /// Inherited fields are included. A field redeclared by a subtype shadows
    /// the ancestor's declaration. The order is stable: subtype fields first,
    /// in declaration order, then each ancestor's in turn.
    pub fn comparable_fields(&self, type_name: &str) -> Arc<[FieldDef]> {
        {
            let cache = self
                .resolved_fields
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(fields) = cache.get(type_name) {
                return Arc::clone(fields);
            }
        }

        let mut declared = HashSet::new();
        let mut fields = Vec::new();
        for def in self.lineage(type_name) {
            for field in &def.fields {
                if !declared.insert(field.name.as_str()) {
                    continue;
                }
                if field.diff {
                    fields.push(field.clone());
                }
            }
        }
        let fields: Arc<[FieldDef]> = fields.into();

        let mut cache = self
            .resolved_fields
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        cache.insert(type_name.to_string(), Arc::clone(&fields));
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(fields: &[FieldDef]) -> Vec<&str> {
        fields.iter().map(|f| f.name.as_str()).collect()
    }

    fn sample() -> Schema {
        Schema::with_types(vec![
            TypeDef::new("Base")
                .diffable()
                .field(FieldDef::diff("foo"))
                .field(FieldDef::new("internal")),
            TypeDef::new("Account")
                .extends("Base")
                .field(FieldDef::diff("a").resolver("profile_id").private())
                .field(FieldDef::diff("b"))
                .field(FieldDef::new("id")),
            TypeDef::new("Plain").field(FieldDef::diff("x")),
        ])
    }

    #[test]
    fn test_marker_is_inherited() {
        let schema = sample();
        assert!(schema.is_composite("Base"));
        assert!(schema.is_composite("Account"));
        assert!(!schema.is_composite("Plain"));
        assert!(!schema.is_composite("Unknown"));
    }

    #[test]
    fn test_comparable_fields_walk_ancestors() {
        let schema = sample();
        let fields = schema.comparable_fields("Account");
        assert_eq!(names(&fields), vec!["a", "b", "foo"]);
        assert_eq!(fields[0].resolver_key(), Some("profile_id"));
        assert_eq!(fields[0].visibility, Visibility::Private);
        assert_eq!(fields[1].resolver_key(), None);
    }

    #[test]
    fn test_comparable_fields_are_memoised() {
        let schema = sample();
        let first = schema.comparable_fields("Account");
        let second = schema.comparable_fields("Account");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_subtype_shadows_ancestor_field() {
        let schema = Schema::with_types(vec![
            TypeDef::new("Parent").diffable().field(FieldDef::diff("name")),
            TypeDef::new("Child")
                .extends("Parent")
                .field(FieldDef::new("name")),
        ]);
        assert!(schema.comparable_fields("Child").is_empty());
        assert_eq!(names(&schema.comparable_fields("Parent")), vec!["name"]);
    }

    #[test]
    fn test_inheritance_cycle_terminates() {
        let schema = Schema::with_types(vec![
            TypeDef::new("A").extends("B").field(FieldDef::diff("a")),
            TypeDef::new("B").extends("A").diffable().field(FieldDef::diff("b")),
        ]);
        assert!(schema.is_composite("A"));
        assert_eq!(names(&schema.comparable_fields("A")), vec!["a", "b"]);
    }

    #[test]
    fn test_schema_from_yaml() {
        let yaml = r#"types:
- name: Base
  diffable: true
  fields:
  - name: foo
    diff: true
- name: Account
  extends: Base
  fields:
  - name: a
    diff: true
    resolver: profile_id
    visibility: private
  - name: active
    diff: true
    boolean: true
"#;
        let schema = Schema::from_yaml(yaml).unwrap();
        assert!(schema.is_composite("Account"));
        let fields = schema.comparable_fields("Account");
        assert_eq!(names(&fields), vec!["a", "active", "foo"]);
        assert!(fields[1].boolean);
        assert_eq!(fields[0].visibility, Visibility::Private);
    }
}
