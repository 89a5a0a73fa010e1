//! Provider registry for dynamic provider resolution.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::provider::{UploadProvider, DEFAULT_SIZE_LIMIT};
use mediastow_common::{Error, Result};

/// Factory function type for creating providers.
pub type ProviderFactory = Box<dyn Fn(Value) -> Result<Arc<dyn UploadProvider>> + Send + Sync>;

/// Registry for upload provider factories.
///
/// Allows dynamic registration and resolution of upload providers
/// by name and configuration.
pub struct ProviderRegistry {
    factories: HashMap<String, ProviderFactory>,
}

impl ProviderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a provider factory.
    ///
    /// # Preconditions
    /// - `name` must be unique within the registry
    ///
    /// # Postconditions
    /// - Factory is registered and can be resolved by name
    ///
    /// # Errors
    /// - Returns error if name is already registered
    pub fn register(&mut self, name: impl Into<String>, factory: ProviderFactory) -> Result<()> {
        let name = name.into();
        if self.factories.contains_key(&name) {
            return Err(Error::AlreadyExists(format!(
                "Provider '{}' is already registered",
                name
            )));
        }
        self.factories.insert(name, factory);
        Ok(())
    }

    /// Resolve a provider by name and configuration.
    ///
    /// # Preconditions
    /// - Provider must be registered
    /// - Configuration must be valid for the provider
    ///
    /// # Postconditions
    /// - Returns an instance of the provider
    ///
    /// # Errors
    /// - Provider not found
    /// - Configuration invalid
    pub fn resolve(&self, name: &str, config: Value) -> Result<Arc<dyn UploadProvider>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| Error::NotFound(format!("Provider '{}' is not registered", name)))?;
        factory(config)
    }

    /// Get list of registered provider names.
    pub fn providers(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    /// Check if a provider is registered.
    pub fn has_provider(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a registry with default providers.
pub fn create_default_registry() -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();

    // Register memory provider (for testing)
    registry
        .register(
            "memory",
            Box::new(|config| {
                let size_limit = match config.get("size_limit") {
                    Some(v) => v.as_u64().ok_or_else(|| {
                        Error::InvalidInput(format!(
                            "Invalid memory provider config: size_limit must be a positive integer, got {}",
                            v
                        ))
                    })?,
                    None => DEFAULT_SIZE_LIMIT,
                };
                Ok(Arc::new(crate::memory::MemoryProvider::with_size_limit(
                    size_limit,
                )))
            }),
        )
        .expect("Failed to register memory provider");

    // Register local filesystem provider
    registry
        .register(
            "local",
            Box::new(crate::local::create_local_provider),
        )
        .expect("Failed to register local provider");

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryProvider;
    use crate::provider::UPLOADS_DIR;
    use tempfile::TempDir;

    #[test]
    fn test_register_and_resolve() {
        let mut registry = ProviderRegistry::new();

        registry
            .register("test", Box::new(|_| Ok(Arc::new(MemoryProvider::new()))))
            .unwrap();

        let provider = registry.resolve("test", Value::Null).unwrap();
        assert_eq!(provider.name(), "memory");
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = ProviderRegistry::new();

        registry
            .register("test", Box::new(|_| Ok(Arc::new(MemoryProvider::new()))))
            .unwrap();

        let result = registry.register("test", Box::new(|_| Ok(Arc::new(MemoryProvider::new()))));
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_unknown_fails() {
        let registry = ProviderRegistry::new();
        let result = registry.resolve("unknown", Value::Null);
        assert!(result.is_err());
    }

    #[test]
    fn test_providers_list() {
        let registry = create_default_registry();

        let providers = registry.providers();
        assert!(providers.contains(&"local".to_string()));
        assert!(providers.contains(&"memory".to_string()));
        assert!(registry.has_provider("local"));
        assert!(!registry.has_provider("s3"));
    }

    #[test]
    fn test_memory_factory_rejects_malformed_size_limit() {
        let registry = create_default_registry();

        let result = registry.resolve("memory", serde_json::json!({ "size_limit": "50" }));
        assert!(matches!(result, Err(Error::InvalidInput(_))));

        // Absent is fine and falls back to the default ceiling.
        let provider = registry.resolve("memory", Value::Null).unwrap();
        assert_eq!(provider.name(), "memory");
    }

    #[test]
    fn test_default_registry_resolves_local() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join(UPLOADS_DIR)).unwrap();
        let registry = create_default_registry();

        let provider = registry
            .resolve(
                "local",
                serde_json::json!({ "public_root": temp.path(), "size_limit": 42 }),
            )
            .unwrap();
        assert_eq!(provider.name(), "local");

        // A bad config surfaces the factory's error.
        let result = registry.resolve("local", Value::Null);
        assert!(result.is_err());
    }
}
