//! Bootstrap orchestration.
//!
//! [`GqlModule`] runs the schema-assembly pipeline exactly once per
//! instance: load SDL fragments from the configured paths, merge them with
//! directly supplied definitions, build (or adopt) the schema, optionally
//! emit the typed-definitions artifact, and register the result with the
//! serving layer. Without an HTTP adapter the module is a safe no-op, which
//! keeps it embeddable in non-serving contexts such as offline subgraph
//! composition.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use gqlforge_schema::{
    DefinitionsGenerator, ProviderSource, ScalarRegistry, SchemaBuilder, SchemaHost,
    TypeDefsLoader, merge_type_defs,
};

use crate::adapter::{HttpAdapter, SUPPORTED_PLATFORM, ServeOptions};
use crate::config::{ModuleConfig, ProviderContainer, resolve_module_options};
use crate::context::{DEFAULT_PATH, merge_defaults};
use crate::error::BootstrapError;
use crate::options::ModuleOptions;

/// Bootstrap progress. States are never re-entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    Idle,
    LoadingTypes,
    MergingOptions,
    EmittingDefinitionsFile,
    BuildingSchema,
    Registered,
}

/// The graphql module: resolved options plus the bootstrap pipeline.
pub struct GqlModule {
    id: String,
    options: ModuleOptions,
    providers: Arc<dyn ProviderSource>,
    adapter: Option<Arc<dyn HttpAdapter>>,
    loader: TypeDefsLoader,
    host: Arc<SchemaHost>,
    state: BootstrapState,
}

impl std::fmt::Debug for GqlModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GqlModule")
            .field("id", &self.id)
            .field("options", &self.options)
            .field("adapter", &self.adapter.is_some())
            .field("state", &self.state)
            .finish()
    }
}

impl GqlModule {
    /// Creates a module from literal options, applying the standard
    /// defaults.
    #[must_use]
    pub fn for_root(options: ModuleOptions, providers: Arc<dyn ProviderSource>) -> Self {
        Self::from_resolved(merge_defaults(options), providers)
    }

    /// Creates a module from any asynchronous configuration shape.
    ///
    /// Resolution completes before this function returns, so a failing
    /// options factory rejects module creation before any type loading.
    ///
    /// # Errors
    ///
    /// Propagates configuration-resolution failures.
    pub async fn for_root_async(
        config: ModuleConfig,
        container: &dyn ProviderContainer,
        providers: Arc<dyn ProviderSource>,
    ) -> Result<Self, BootstrapError> {
        let options = resolve_module_options(config, container).await?;
        Ok(Self::from_resolved(options, providers))
    }

    fn from_resolved(options: ModuleOptions, providers: Arc<dyn ProviderSource>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            options,
            providers,
            adapter: None,
            loader: TypeDefsLoader::new(),
            host: Arc::new(SchemaHost::new()),
            state: BootstrapState::Idle,
        }
    }

    /// Attaches the serving-layer adapter.
    #[must_use]
    pub fn with_adapter(mut self, adapter: Arc<dyn HttpAdapter>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// Unique id of this module instance.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn state(&self) -> BootstrapState {
        self.state
    }

    /// The slot the assembled schema is published to.
    #[must_use]
    pub fn schema_host(&self) -> Arc<SchemaHost> {
        Arc::clone(&self.host)
    }

    #[must_use]
    pub fn options(&self) -> &ModuleOptions {
        &self.options
    }

    /// Runs the bootstrap pipeline.
    ///
    /// Without an adapter this is a no-op and the module stays idle. A
    /// second call on an initialized module is an error; hosts re-trigger
    /// by constructing a fresh module.
    ///
    /// # Errors
    ///
    /// Fails fast on unsupported platforms, schema-assembly errors, and
    /// artifact-emission failures. There is no partial success: either the
    /// schema is built, persisted where configured, and registered, or
    /// bootstrap fails entirely.
    pub async fn init(&mut self) -> Result<(), BootstrapError> {
        if self.state != BootstrapState::Idle {
            return Err(BootstrapError::AlreadyInitialized);
        }
        let Some(adapter) = self.adapter.clone() else {
            debug!(module_id = %self.id, "no http adapter configured; skipping schema bootstrap");
            return Ok(());
        };

        self.transition(BootstrapState::LoadingTypes);
        let loaded = self
            .loader
            .merge_types_by_paths(self.options.type_paths.as_deref())
            .await?;
        let type_defs = merge_type_defs(loaded, self.options.type_defs.as_ref());

        self.transition(BootstrapState::MergingOptions);
        let schema = match &self.options.schema {
            // An explicitly supplied schema wins over every other source.
            Some(schema) => Arc::clone(schema),
            None => {
                let scalars = Arc::new(ScalarRegistry::collect(self.providers.as_ref()));
                let builder = SchemaBuilder::new(scalars);
                let mut build_options =
                    self.options.build_schema_options.clone().unwrap_or_default();
                build_options.type_defs = type_defs;
                if let Some(schema_directives) = &self.options.schema_directives {
                    build_options.schema_directives = schema_directives.clone();
                }
                let resolvers = self.providers.resolver_classes();
                let types = self.providers.type_specs();
                if self.options.federation {
                    builder
                        .build_federated(
                            &self.options.auto_schema_file,
                            build_options,
                            &resolvers,
                            &types,
                        )
                        .await?
                } else {
                    builder
                        .build(
                            &self.options.auto_schema_file,
                            build_options,
                            &resolvers,
                            &types,
                        )
                        .await?
                }
            }
        };

        if self.options.definitions.is_some() {
            self.transition(BootstrapState::EmittingDefinitionsFile);
            let definitions = self.options.definitions.as_ref().unwrap();
            DefinitionsGenerator::new()
                .generate(&schema.sdl(), definitions)
                .await?;
        }

        self.transition(BootstrapState::BuildingSchema);
        self.host.publish(Arc::clone(&schema));

        let platform = adapter.platform().to_string();
        if platform != SUPPORTED_PLATFORM {
            return Err(BootstrapError::UnsupportedPlatform(platform));
        }

        let serve_options = ServeOptions {
            path: self
                .options
                .path
                .clone()
                .unwrap_or_else(|| DEFAULT_PATH.to_string()),
            graphiql: self.options.graphiql.unwrap_or(true),
            jit: self.options.jit.unwrap_or(1),
            schema: Arc::clone(&self.host),
            context: self.options.context_factory(),
        };
        adapter.register(serve_options)?;

        self.transition(BootstrapState::Registered);
        info!(module_id = %self.id, "graphql schema registered");
        Ok(())
    }

    fn transition(&mut self, next: BootstrapState) {
        debug!(module_id = %self.id, from = ?self.state, to = ?next, "bootstrap transition");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::AxumAdapter;
    use async_graphql::Value;
    use async_graphql::dynamic::{FieldFuture, TypeRef};
    use gqlforge_schema::{ProviderRegistry, ResolverClass, ResolverKind, ResolverMethodSpec};

    fn ping_providers() -> Arc<ProviderRegistry> {
        let mut providers = ProviderRegistry::new();
        providers.register_resolver(
            ResolverClass::new("PingResolver")
                .kind(ResolverKind::Query)
                .method(ResolverMethodSpec::new(
                    "ping",
                    TypeRef::named_nn(TypeRef::STRING),
                    |_| FieldFuture::new(async { Ok(Some(Value::String("pong".into()))) }),
                )),
        );
        Arc::new(providers)
    }

    struct WrongPlatformAdapter;

    impl HttpAdapter for WrongPlatformAdapter {
        fn platform(&self) -> &str {
            "hyper"
        }

        fn register(&self, _options: ServeOptions) -> Result<(), BootstrapError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_init_without_adapter_is_a_noop() {
        let mut module = GqlModule::for_root(ModuleOptions::default(), ping_providers());
        module.init().await.unwrap();
        assert_eq!(module.state(), BootstrapState::Idle);
        assert!(module.schema_host().get().is_none());
    }

    #[tokio::test]
    async fn test_init_registers_schema() {
        let adapter = Arc::new(AxumAdapter::new());
        let mut module = GqlModule::for_root(ModuleOptions::default(), ping_providers())
            .with_adapter(adapter);

        module.init().await.unwrap();
        assert_eq!(module.state(), BootstrapState::Registered);

        let schema = module.schema_host().get().unwrap();
        assert!(schema.sdl().contains("ping: String!"));
    }

    #[tokio::test]
    async fn test_unsupported_platform_is_fatal() {
        let mut module = GqlModule::for_root(ModuleOptions::default(), ping_providers())
            .with_adapter(Arc::new(WrongPlatformAdapter));

        let err = module.init().await.unwrap_err();
        assert!(matches!(err, BootstrapError::UnsupportedPlatform(name) if name == "hyper"));
    }

    #[tokio::test]
    async fn test_double_init_is_rejected() {
        let adapter = Arc::new(AxumAdapter::new());
        let mut module = GqlModule::for_root(ModuleOptions::default(), ping_providers())
            .with_adapter(adapter);

        module.init().await.unwrap();
        let err = module.init().await.unwrap_err();
        assert!(matches!(err, BootstrapError::AlreadyInitialized));
    }

    #[tokio::test]
    async fn test_explicit_schema_wins_over_other_sources() {
        // Build a schema through one module, then hand it to another as the
        // explicit source alongside conflicting typeDefs.
        let adapter = Arc::new(AxumAdapter::new());
        let mut first = GqlModule::for_root(ModuleOptions::default(), ping_providers())
            .with_adapter(adapter);
        first.init().await.unwrap();
        let prebuilt = first.schema_host().get().unwrap();

        let mut second = GqlModule::for_root(
            ModuleOptions {
                schema: Some(Arc::clone(&prebuilt)),
                type_defs: Some("type Query { other: String }".into()),
                ..Default::default()
            },
            Arc::new(ProviderRegistry::new()),
        )
        .with_adapter(Arc::new(AxumAdapter::new()));

        second.init().await.unwrap();
        let served = second.schema_host().get().unwrap();
        assert!(served.sdl().contains("ping: String!"));
        assert!(!served.sdl().contains("other"));
    }

    #[tokio::test]
    async fn test_federation_mode_adds_specified_directives() {
        let mut module = GqlModule::for_root(
            ModuleOptions {
                federation: true,
                ..Default::default()
            },
            ping_providers(),
        )
        .with_adapter(Arc::new(AxumAdapter::new()));

        module.init().await.unwrap();
        let schema = module.schema_host().get().unwrap();
        let names: Vec<&str> = schema.directives().iter().map(|d| d.name.as_str()).collect();
        assert!(names.contains(&"skip"));
        assert!(names.contains(&"include"));
        assert!(names.contains(&"deprecated"));
    }

    #[tokio::test]
    async fn test_for_root_async_resolves_factory_config() {
        let container = crate::config::InMemoryContainer::new();
        let config = ModuleConfig::factory(|| async {
            Ok(ModuleOptions {
                path: Some("/async/graphql".to_string()),
                ..Default::default()
            })
        });

        let module = GqlModule::for_root_async(config, &container, ping_providers())
            .await
            .unwrap();
        assert_eq!(module.options().path.as_deref(), Some("/async/graphql"));
        assert_eq!(module.state(), BootstrapState::Idle);
    }

    #[tokio::test]
    async fn test_for_root_async_rejects_before_any_loading() {
        let container = crate::config::InMemoryContainer::new();
        let config = ModuleConfig::factory(|| async { Err("config backend down".into()) });

        let err = GqlModule::for_root_async(config, &container, ping_providers())
            .await
            .unwrap_err();
        assert!(matches!(err, BootstrapError::OptionsFactory(msg) if msg == "config backend down"));
    }

    #[tokio::test]
    async fn test_definitions_artifact_is_emitted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("definitions.rs");

        let mut module = GqlModule::for_root(
            ModuleOptions {
                definitions: Some(gqlforge_schema::DefinitionsOptions::new(&path)),
                ..Default::default()
            },
            ping_providers(),
        )
        .with_adapter(Arc::new(AxumAdapter::new()));

        module.init().await.unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.starts_with(gqlforge_schema::DEFINITIONS_FILE_HEADER));
    }
}
