//! Serving-layer adapter seam.
//!
//! The orchestrator talks to the HTTP layer through [`HttpAdapter`]:
//! a platform identifier plus one registration call. Exactly one platform
//! is supported at a time; a mismatching adapter is a fatal configuration
//! error, raised before registration is attempted.

use std::sync::{Arc, Mutex, PoisonError};

use axum::Router;
use axum::routing::post;
use tracing::debug;

use gqlforge_schema::SchemaHost;

use crate::context::ContextFn;
use crate::error::BootstrapError;
use crate::handler::{GraphQLState, graphql_handler, graphql_handler_get};

/// The one supported serving-layer platform identifier.
pub const SUPPORTED_PLATFORM: &str = "axum";

/// Everything the serving layer needs to serve the assembled schema.
#[derive(Clone)]
pub struct ServeOptions {
    /// Path to mount the endpoint at.
    pub path: String,

    /// Whether the GraphiQL page is enabled.
    pub graphiql: bool,

    /// Query JIT threshold passed through to the execution engine.
    pub jit: i64,

    /// The schema slot published by bootstrap.
    pub schema: Arc<SchemaHost>,

    /// Canonical context factory.
    pub context: ContextFn,
}

/// Serving-layer adapter: platform identity plus schema registration.
pub trait HttpAdapter: Send + Sync {
    /// The platform identifier, compared against [`SUPPORTED_PLATFORM`].
    fn platform(&self) -> &str;

    /// Registers the schema with the underlying server handle.
    ///
    /// # Errors
    ///
    /// Returns an error when the server handle can no longer accept
    /// registrations.
    fn register(&self, options: ServeOptions) -> Result<(), BootstrapError>;
}

/// [`HttpAdapter`] backed by an axum [`Router`].
///
/// Routes are mounted on an inner router which is handed back through
/// [`AxumAdapter::into_router`] once bootstrap has finished.
pub struct AxumAdapter {
    router: Mutex<Option<Router>>,
}

impl AxumAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self::with_router(Router::new())
    }

    /// Wraps an existing router; registered routes are merged into it.
    #[must_use]
    pub fn with_router(router: Router) -> Self {
        Self {
            router: Mutex::new(Some(router)),
        }
    }

    /// Takes the assembled router out of the adapter.
    #[must_use]
    pub fn into_router(self) -> Router {
        self.router
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .unwrap_or_default()
    }
}

impl Default for AxumAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpAdapter for AxumAdapter {
    fn platform(&self) -> &str {
        SUPPORTED_PLATFORM
    }

    fn register(&self, options: ServeOptions) -> Result<(), BootstrapError> {
        let state = GraphQLState {
            schema: options.schema,
            context: options.context,
            graphiql: options.graphiql,
            path: options.path.clone(),
            jit: options.jit,
        };

        let routes = Router::new()
            .route(&options.path, post(graphql_handler).get(graphql_handler_get))
            .with_state(state);

        let mut guard = self.router.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(router) = guard.take() else {
            return Err(BootstrapError::Adapter(
                "router has already been taken".to_string(),
            ));
        };
        *guard = Some(router.merge(routes));

        debug!(path = %options.path, graphiql = options.graphiql, jit = options.jit, "graphql routes registered");
        Ok(())
    }
}
