//! Error types for bootstrap and configuration.

use gqlforge_schema::SchemaError;

/// Errors raised while resolving configuration or bootstrapping the module.
///
/// Configuration errors are fatal and never retried: an unsupported serving
/// platform or an unknown provider token means the application is wired
/// incorrectly and must fail loudly at startup.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// The serving-layer adapter is not the supported platform.
    #[error("no support for the current HTTP adapter: {0}")]
    UnsupportedPlatform(String),

    /// `init` was called on an already-initialized module.
    #[error("graphql module has already been initialized")]
    AlreadyInitialized,

    /// A provider token could not be resolved by the container.
    #[error("unknown provider token: {0}")]
    UnknownProvider(String),

    /// A user-supplied options factory failed.
    #[error("options factory failed: {0}")]
    OptionsFactory(String),

    /// The HTTP adapter could not accept the registration.
    #[error("http adapter registration failed: {0}")]
    Adapter(String),

    /// Schema assembly failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
