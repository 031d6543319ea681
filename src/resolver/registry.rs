//! Registry of value resolvers.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::value::Value;

/// Resolver transforms a field's raw value before it is compared or
/// recorded, for example to turn a stored id into a readable label.
pub type Resolver = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// ResolverRegistry maps resolver keys to resolvers.
///
/// Lookups take a shared lock and may run concurrently; registration takes
/// the exclusive lock.
#[derive(Default)]
pub struct ResolverRegistry {
    resolvers: RwLock<HashMap<String, Resolver>>,
}

impl ResolverRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        ResolverRegistry::default()
    }

    /// Registers `resolver` under `key`, returning the one it replaced.
    pub fn register<F>(&self, key: impl Into<String>, resolver: F) -> Option<Resolver>
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.register_arc(key, Arc::new(resolver))
    }

    /// Registers an already shared resolver.
    pub fn register_arc(&self, key: impl Into<String>, resolver: Resolver) -> Option<Resolver> {
        let mut resolvers = self.resolvers.write().unwrap_or_else(PoisonError::into_inner);
        resolvers.insert(key.into(), resolver)
    }

    /// Removes the resolver under `key`. Unknown keys are ignored.
    pub fn unregister(&self, key: &str) {
        let mut resolvers = self.resolvers.write().unwrap_or_else(PoisonError::into_inner);
        resolvers.remove(key);
    }

    /// Returns the resolver registered under `key`.
    pub fn lookup(&self, key: &str) -> Option<Resolver> {
        let resolvers = self.resolvers.read().unwrap_or_else(PoisonError::into_inner);
        resolvers.get(key).cloned()
    }

    /// Returns true if a resolver is registered under `key`.
    pub fn contains(&self, key: &str) -> bool {
        let resolvers = self.resolvers.read().unwrap_or_else(PoisonError::into_inner);
        resolvers.contains_key(key)
    }

    /// Returns the number of registered resolvers.
    pub fn len(&self) -> usize {
        self.resolvers.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let resolvers = self.resolvers.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<&String> = resolvers.keys().collect();
        keys.sort();
        f.debug_struct("ResolverRegistry").field("keys", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_register_returns_previous() {
        let registry = ResolverRegistry::new();
        assert!(registry.register("upper", |v: &Value| v.clone()).is_none());

        let previous = registry.register("upper", |v: &Value| {
            Value::String(v.to_string().to_uppercase())
        });
        let previous = previous.expect("replaced resolver");
        assert_eq!(previous(&Value::from("a")), Value::from("a"));

        let current = registry.lookup("upper").expect("registered");
        assert_eq!(current(&Value::from("a")), Value::from("A"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister() {
        let registry = ResolverRegistry::new();
        registry.register("k", |v: &Value| v.clone());
        assert!(registry.contains("k"));

        registry.unregister("k");
        assert!(!registry.contains("k"));
        assert!(registry.lookup("k").is_none());

        // Absent keys are a no-op.
        registry.unregister("missing");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_concurrent_lookups() {
        let registry = Arc::new(ResolverRegistry::new());
        registry.register("double", |v: &Value| match v {
            Value::Int(i) => Value::Int(i * 2),
            other => other.clone(),
        });

        let handles: Vec<_> = (0..4i64)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    let resolver = registry.lookup("double").unwrap();
                    resolver(&Value::Int(i))
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), Value::Int(i as i64 * 2));
        }
    }
}
