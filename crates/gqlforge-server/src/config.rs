//! Configuration resolution.
//!
//! The module accepts four configuration shapes, modeled as a tagged
//! variant: a literal options value, an async factory function with
//! injected dependencies, a reference to an existing options-factory
//! provider, or a provider class registered and instantiated on the spot.
//! One resolution function matches on the tag and always normalizes the
//! result through option defaulting before bootstrap sees it.
//!
//! Resolution completes before any schema assembly begins; a failing
//! factory therefore rejects bootstrap before type loading starts.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use tracing::debug;

use crate::context::merge_defaults;
use crate::error::BootstrapError;
use crate::options::ModuleOptions;

/// Boxed error for user-supplied factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A dependency-injected provider instance.
pub type Provider = Arc<dyn Any + Send + Sync>;

/// An async options factory function receiving its injected dependencies.
pub type OptionsFactoryFn = Arc<
    dyn Fn(Vec<Provider>) -> BoxFuture<'static, Result<ModuleOptions, BoxError>> + Send + Sync,
>;

/// A provider that can produce the module options.
#[async_trait]
pub trait OptionsFactory: Send + Sync {
    async fn create_gql_options(&self) -> Result<ModuleOptions, BoxError>;
}

/// The four mutually exclusive configuration shapes.
pub enum ModuleConfig {
    /// Use the given options directly.
    Literal(ModuleOptions),
    /// Invoke an async factory with providers resolved from the container
    /// by token.
    Factory {
        factory: OptionsFactoryFn,
        inject: Vec<String>,
    },
    /// Call `create_gql_options` on an already-registered provider.
    UseExisting(String),
    /// Construct the provider, register it under the token, then use it.
    UseClass {
        token: String,
        ctor: fn() -> Arc<dyn OptionsFactory>,
    },
}

impl ModuleConfig {
    /// Convenience constructor for a factory without injected dependencies.
    pub fn factory<F, Fut>(factory: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<ModuleOptions, BoxError>> + Send + 'static,
    {
        Self::Factory {
            factory: Arc::new(move |_providers| Box::pin(factory())),
            inject: Vec::new(),
        }
    }
}

/// The narrow provider-registration contract the resolver needs from a
/// dependency-injection container.
pub trait ProviderContainer: Send + Sync {
    /// Resolves an injectable provider by token.
    fn provider(&self, token: &str) -> Option<Provider>;

    /// Resolves a registered options factory by token.
    fn options_factory(&self, token: &str) -> Option<Arc<dyn OptionsFactory>>;

    /// Registers an options factory under a token.
    fn register_options_factory(&self, token: &str, factory: Arc<dyn OptionsFactory>);
}

/// In-memory [`ProviderContainer`].
#[derive(Default)]
pub struct InMemoryContainer {
    providers: RwLock<HashMap<String, Provider>>,
    factories: RwLock<HashMap<String, Arc<dyn OptionsFactory>>>,
}

impl InMemoryContainer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_provider(&self, token: &str, provider: Provider) {
        self.providers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.to_string(), provider);
    }
}

impl ProviderContainer for InMemoryContainer {
    fn provider(&self, token: &str) -> Option<Provider> {
        self.providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
    }

    fn options_factory(&self, token: &str) -> Option<Arc<dyn OptionsFactory>> {
        self.factories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
    }

    fn register_options_factory(&self, token: &str, factory: Arc<dyn OptionsFactory>) {
        self.factories
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.to_string(), factory);
    }
}

/// Resolves the final module options from any configuration shape.
///
/// Whatever the shape, the result is passed through option defaulting, so
/// bootstrap always receives a normalized options value with a canonical
/// context factory.
///
/// # Errors
///
/// Returns `UnknownProvider` for unresolvable tokens and `OptionsFactory`
/// when a user factory fails. Both are fatal configuration errors.
pub async fn resolve_module_options(
    config: ModuleConfig,
    container: &dyn ProviderContainer,
) -> Result<ModuleOptions, BootstrapError> {
    let options = match config {
        ModuleConfig::Literal(options) => options,
        ModuleConfig::Factory { factory, inject } => {
            let mut providers = Vec::with_capacity(inject.len());
            for token in &inject {
                let provider = container
                    .provider(token)
                    .ok_or_else(|| BootstrapError::UnknownProvider(token.clone()))?;
                providers.push(provider);
            }
            debug!(injected = inject.len(), "invoking options factory");
            factory(providers)
                .await
                .map_err(|e| BootstrapError::OptionsFactory(e.to_string()))?
        }
        ModuleConfig::UseExisting(token) => {
            let factory = container
                .options_factory(&token)
                .ok_or_else(|| BootstrapError::UnknownProvider(token.clone()))?;
            factory
                .create_gql_options()
                .await
                .map_err(|e| BootstrapError::OptionsFactory(e.to_string()))?
        }
        ModuleConfig::UseClass { token, ctor } => {
            let factory = ctor();
            container.register_options_factory(&token, factory.clone());
            factory
                .create_gql_options()
                .await
                .map_err(|e| BootstrapError::OptionsFactory(e.to_string()))?
        }
    };
    Ok(merge_defaults(options))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticOptionsFactory {
        path: &'static str,
    }

    #[async_trait]
    impl OptionsFactory for StaticOptionsFactory {
        async fn create_gql_options(&self) -> Result<ModuleOptions, BoxError> {
            Ok(ModuleOptions {
                path: Some(self.path.to_string()),
                ..Default::default()
            })
        }
    }

    #[tokio::test]
    async fn test_literal_options_are_defaulted() {
        let container = InMemoryContainer::new();
        let options =
            resolve_module_options(ModuleConfig::Literal(ModuleOptions::default()), &container)
                .await
                .unwrap();
        assert_eq!(options.path.as_deref(), Some("/graphql"));
        assert!(options.context.is_some());
    }

    #[tokio::test]
    async fn test_factory_with_injected_providers() {
        let container = InMemoryContainer::new();
        container.register_provider("PATH_CONFIG", Arc::new("/api/graphql".to_string()));

        let config = ModuleConfig::Factory {
            factory: Arc::new(|providers| {
                Box::pin(async move {
                    let path = providers[0]
                        .downcast_ref::<String>()
                        .cloned()
                        .unwrap_or_default();
                    Ok(ModuleOptions {
                        path: Some(path),
                        ..Default::default()
                    })
                })
            }),
            inject: vec!["PATH_CONFIG".to_string()],
        };

        let options = resolve_module_options(config, &container).await.unwrap();
        assert_eq!(options.path.as_deref(), Some("/api/graphql"));
    }

    #[tokio::test]
    async fn test_factory_with_unknown_injection_token() {
        let container = InMemoryContainer::new();
        let config = ModuleConfig::Factory {
            factory: Arc::new(|_| Box::pin(async { Ok(ModuleOptions::default()) })),
            inject: vec!["MISSING".to_string()],
        };

        let err = resolve_module_options(config, &container).await.unwrap_err();
        assert!(matches!(err, BootstrapError::UnknownProvider(token) if token == "MISSING"));
    }

    #[tokio::test]
    async fn test_factory_rejection_propagates() {
        let container = InMemoryContainer::new();
        let config = ModuleConfig::factory(|| async { Err("boom".into()) });

        let err = resolve_module_options(config, &container).await.unwrap_err();
        assert!(matches!(err, BootstrapError::OptionsFactory(msg) if msg == "boom"));
    }

    #[tokio::test]
    async fn test_use_existing_resolves_registered_factory() {
        let container = InMemoryContainer::new();
        container.register_options_factory(
            "GQL_OPTIONS",
            Arc::new(StaticOptionsFactory { path: "/existing" }),
        );

        let options =
            resolve_module_options(ModuleConfig::UseExisting("GQL_OPTIONS".to_string()), &container)
                .await
                .unwrap();
        assert_eq!(options.path.as_deref(), Some("/existing"));
    }

    #[tokio::test]
    async fn test_use_existing_unknown_token() {
        let container = InMemoryContainer::new();
        let err = resolve_module_options(
            ModuleConfig::UseExisting("NOWHERE".to_string()),
            &container,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, BootstrapError::UnknownProvider(_)));
    }

    #[tokio::test]
    async fn test_use_class_registers_and_resolves() {
        fn make_factory() -> Arc<dyn OptionsFactory> {
            Arc::new(StaticOptionsFactory { path: "/from-class" })
        }

        let container = InMemoryContainer::new();
        let options = resolve_module_options(
            ModuleConfig::UseClass {
                token: "GQL_OPTIONS".to_string(),
                ctor: make_factory,
            },
            &container,
        )
        .await
        .unwrap();

        assert_eq!(options.path.as_deref(), Some("/from-class"));
        // The instance is now registered and reachable via UseExisting.
        assert!(container.options_factory("GQL_OPTIONS").is_some());
    }
}
