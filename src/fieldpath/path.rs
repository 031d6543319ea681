//! Path element and path types.

use std::fmt;

/// Segment rendered for the sequence length marker.
pub const COUNT_SEGMENT: &str = "count";

/// Prefix rendered in front of a 1-based sequence position.
pub const INDEX_PREFIX: &str = "idx";

/// PathElement represents one level of path navigation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathElement {
    /// Field name of a composite object.
    FieldName(String),
    /// 1-based position inside a sequence, rendered `idx<N>`.
    Index(usize),
    /// Stringified key of a keyed collection.
    Key(String),
    /// Sequence length marker, emitted when two sequences differ in length.
    Count,
}

impl PathElement {
    /// Creates a new field name path element.
    pub fn field_name(name: impl Into<String>) -> Self {
        PathElement::FieldName(name.into())
    }

    /// Creates a new 1-based index path element.
    pub fn index(position: usize) -> Self {
        PathElement::Index(position)
    }

    /// Creates a new key path element.
    pub fn key(key: impl Into<String>) -> Self {
        PathElement::Key(key.into())
    }
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathElement::FieldName(name) => f.write_str(name),
            PathElement::Index(i) => write!(f, "{}{}", INDEX_PREFIX, i),
            PathElement::Key(key) => f.write_str(key),
            PathElement::Count => f.write_str(COUNT_SEGMENT),
        }
    }
}

/// Path identifies a location inside a compared structure.
///
/// A path starts at a caller-chosen root tag and is extended one element per
/// recursion step. It renders as the dot-joined sequence of its segments; an
/// empty root contributes no segment, so `Path::root("")` extended with
/// field `a` renders as `a`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    root: String,
    elements: Vec<PathElement>,
}

impl Path {
    /// Creates a path rooted at the given tag.
    pub fn root(tag: impl Into<String>) -> Self {
        Path {
            root: tag.into(),
            elements: Vec::new(),
        }
    }

    /// Creates a new path with the given element appended.
    pub fn with(&self, element: PathElement) -> Self {
        let mut new_path = self.clone();
        new_path.elements.push(element);
        new_path
    }

    /// Shorthand for appending a field name.
    pub fn field(&self, name: &str) -> Self {
        self.with(PathElement::field_name(name))
    }

    /// Shorthand for appending a 1-based index.
    pub fn index(&self, position: usize) -> Self {
        self.with(PathElement::index(position))
    }

    /// Shorthand for appending a collection key.
    pub fn key(&self, key: &str) -> Self {
        self.with(PathElement::key(key))
    }

    /// Shorthand for appending the length marker.
    pub fn count(&self) -> Self {
        self.with(PathElement::Count)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = self.root.is_empty();
        if !first {
            f.write_str(&self.root)?;
        }
        for element in &self.elements {
            if !first {
                f.write_str(".")?;
            }
            first = false;
            write!(f, "{}", element)?;
        }
        Ok(())
    }
}
