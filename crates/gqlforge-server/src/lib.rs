//! # gqlforge-server
//!
//! Serving layer for gqlforge. This crate resolves the module
//! configuration (literal options, async factories, or provider classes),
//! normalizes the context configuration into one canonical async factory,
//! runs the bootstrap pipeline that assembles the schema, and registers the
//! result with an axum router.
//!
//! ## Modules
//!
//! - [`config`] - Configuration shapes and resolution
//! - [`context`] - Option defaulting and context normalization
//! - [`options`] - The root options aggregate
//! - [`module`] - Bootstrap orchestration
//! - [`adapter`] - Serving-layer adapter seam and the axum implementation
//! - [`handler`] - Axum HTTP handlers
//! - [`error`] - Error types

pub mod adapter;
pub mod config;
pub mod context;
pub mod error;
pub mod handler;
pub mod module;
pub mod options;

pub use adapter::{AxumAdapter, HttpAdapter, SUPPORTED_PLATFORM, ServeOptions};
pub use config::{
    BoxError, InMemoryContainer, ModuleConfig, OptionsFactory, OptionsFactoryFn, Provider,
    ProviderContainer, resolve_module_options,
};
pub use context::{
    ContextConfig, ContextFn, DEFAULT_PATH, assign_req_property, merge_defaults,
    normalize_context,
};
pub use error::BootstrapError;
pub use handler::{
    GraphQLQueryParams, GraphQLRequest, GraphQLState, RequestContext, graphql_handler,
    graphql_handler_get,
};
pub use module::{BootstrapState, GqlModule};
pub use options::{Enhancer, ModuleOptions};

/// Result type for bootstrap operations.
pub type Result<T> = std::result::Result<T, BootstrapError>;
