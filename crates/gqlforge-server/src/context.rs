//! Option defaulting and context normalization.
//!
//! `merge_defaults` folds the immutable default options into a
//! user-supplied [`ModuleOptions`] value (explicit options win) and
//! normalizes the `context` option into one canonical asynchronous shape:
//! a factory from the request/reply pair to a context value that always
//! carries the originating request at `req`.
//!
//! Merging always produces a new value; neither the defaults nor the
//! user's input are mutated.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use crate::options::ModuleOptions;

/// Default path the schema is served at.
pub const DEFAULT_PATH: &str = "/graphql";

/// The canonical asynchronous context factory: `(request, reply) ->
/// context`.
pub type ContextFn = Arc<dyn Fn(Value, Value) -> BoxFuture<'static, Value> + Send + Sync>;

/// User-supplied context configuration.
#[derive(Clone)]
pub enum ContextConfig {
    /// A literal context object. The same value is shared across calls;
    /// callers must not rely on per-request isolation.
    Object(Value),
    /// A function of the request/reply pair.
    Factory(ContextFn),
}

impl ContextConfig {
    pub fn object(value: Value) -> Self {
        Self::Object(value)
    }

    pub fn factory<F, Fut>(factory: F) -> Self
    where
        F: Fn(Value, Value) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Value> + Send + 'static,
    {
        Self::Factory(Arc::new(move |request, reply| {
            Box::pin(factory(request, reply))
        }))
    }
}

/// The immutable configuration defaults, constructed fresh per merge.
fn default_options() -> ModuleOptions {
    ModuleOptions {
        path: Some(DEFAULT_PATH.to_string()),
        field_resolver_enhancers: Some(Vec::new()),
        ..ModuleOptions::default()
    }
}

/// Merges the standard defaults into `options` and normalizes the context
/// configuration. Explicit options win over defaults.
#[must_use]
pub fn merge_defaults(options: ModuleOptions) -> ModuleOptions {
    merge_with_defaults(options, default_options())
}

/// Shallow-merges `defaults` then `options` into a new value.
#[must_use]
pub fn merge_with_defaults(options: ModuleOptions, defaults: ModuleOptions) -> ModuleOptions {
    let ModuleOptions {
        path,
        schema,
        type_defs,
        type_paths,
        auto_schema_file,
        definitions,
        build_schema_options,
        schema_directives,
        context,
        field_resolver_enhancers,
        federation,
        graphiql,
        jit,
    } = options;

    ModuleOptions {
        path: path.or(defaults.path),
        schema: schema.or(defaults.schema),
        type_defs: type_defs.or(defaults.type_defs),
        type_paths: type_paths.or(defaults.type_paths),
        auto_schema_file,
        definitions: definitions.or(defaults.definitions),
        build_schema_options: build_schema_options.or(defaults.build_schema_options),
        schema_directives: schema_directives.or(defaults.schema_directives),
        context: Some(ContextConfig::Factory(normalize_context(context))),
        field_resolver_enhancers: field_resolver_enhancers.or(defaults.field_resolver_enhancers),
        federation: federation || defaults.federation,
        graphiql: graphiql.or(defaults.graphiql),
        jit: jit.or(defaults.jit),
    }
}

/// Normalizes any context configuration into the canonical factory shape.
///
/// - Absent configuration produces `{ "req": request }`.
/// - A function is wrapped so its result passes through
///   [`assign_req_property`].
/// - A literal object is shared across calls: every call passes the shared
///   value through [`assign_req_property`], so the first request wires
///   `req` and later calls observe the already-wired object unchanged.
#[must_use]
pub fn normalize_context(config: Option<ContextConfig>) -> ContextFn {
    match config {
        None => Arc::new(|request, _reply| {
            Box::pin(async move { assign_req_property(None, &request) })
        }),
        Some(ContextConfig::Factory(factory)) => Arc::new(move |request, reply| {
            let factory = factory.clone();
            Box::pin(async move {
                let ctx = factory(request.clone(), reply).await;
                assign_req_property(Some(ctx), &request)
            })
        }),
        Some(ContextConfig::Object(value)) => {
            let shared = Arc::new(Mutex::new(value));
            Arc::new(move |request, _reply| {
                let shared = shared.clone();
                Box::pin(async move {
                    let mut guard = shared.lock().await;
                    let wired = assign_req_property(Some(guard.clone()), &request);
                    *guard = wired.clone();
                    wired
                })
            })
        }
    }
}

/// Attaches the originating request to a context value.
///
/// Absent contexts become `{ "req": request }`. Non-object contexts pass
/// through untouched (a request cannot be attached to them). A context
/// whose `req` is already an object is returned unchanged, without checking
/// that it is the current request; this keeps repeated wiring idempotent
/// and deliberately lets reused context objects pass through.
#[must_use]
pub fn assign_req_property(ctx: Option<Value>, req: &Value) -> Value {
    let Some(ctx) = ctx else {
        return json!({ "req": req });
    };
    if ctx.is_null() {
        return json!({ "req": req });
    }
    match ctx {
        Value::Object(mut map) => {
            if map.get("req").is_some_and(Value::is_object) {
                return Value::Object(map);
            }
            map.insert("req".to_string(), req.clone());
            Value::Object(map)
        }
        other => other,
    }
}
