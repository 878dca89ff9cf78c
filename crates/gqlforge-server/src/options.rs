//! Module options.
//!
//! [`ModuleOptions`] is the root configuration aggregate for the module.
//! Exactly one schema source is expected to be authoritative: an explicit
//! pre-built schema wins outright; otherwise SDL fragments from
//! `type_paths` and `type_defs` are merged with the code-first resolver
//! classes during bootstrap.

use std::sync::Arc;

use gqlforge_schema::{
    AssembledSchema, AutoSchemaFile, BuildSchemaOptions, DefinitionsOptions, DirectiveDefinition,
    TypeDefs,
};
use indexmap::IndexMap;

use crate::context::{ContextConfig, ContextFn, normalize_context};

/// Cross-cutting wrappers applied around field resolvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enhancer {
    Guards,
    Interceptors,
    Filters,
}

/// Configuration for the graphql module.
#[derive(Clone, Default)]
pub struct ModuleOptions {
    /// HTTP path the schema is served at. Defaults to `/graphql`.
    pub path: Option<String>,

    /// A pre-built schema. When set, all other schema sources are ignored.
    pub schema: Option<Arc<AssembledSchema>>,

    /// Directly supplied SDL fragments.
    pub type_defs: Option<TypeDefs>,

    /// Glob-style file patterns to load SDL fragments from.
    pub type_paths: Option<Vec<String>>,

    /// Whether (and where) to write the built schema as SDL.
    pub auto_schema_file: AutoSchemaFile,

    /// When set, a typed-definitions artifact is generated from the
    /// printed SDL during bootstrap.
    pub definitions: Option<DefinitionsOptions>,

    /// Base options handed to the schema factory.
    pub build_schema_options: Option<BuildSchemaOptions>,

    /// Named schema directives, merged after `build_schema_options`'
    /// ordered directives.
    pub schema_directives: Option<IndexMap<String, DirectiveDefinition>>,

    /// Context configuration; normalized into an async factory by
    /// defaulting.
    pub context: Option<ContextConfig>,

    /// Enhancers applied around field resolvers. Defaults to none.
    pub field_resolver_enhancers: Option<Vec<Enhancer>>,

    /// Builds the schema in federation mode (specified directives
    /// prepended, resolver-coverage checks relaxed).
    pub federation: bool,

    /// Whether the GraphiQL page is served. Defaults to enabled.
    pub graphiql: Option<bool>,

    /// Query JIT threshold passed through to the serving layer.
    pub jit: Option<i64>,
}

impl std::fmt::Debug for ModuleOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleOptions")
            .field("path", &self.path)
            .field("schema", &self.schema.is_some())
            .field("type_defs", &self.type_defs.is_some())
            .field("type_paths", &self.type_paths)
            .field("definitions", &self.definitions.is_some())
            .field("build_schema_options", &self.build_schema_options.is_some())
            .field("schema_directives", &self.schema_directives.is_some())
            .field("context", &self.context.is_some())
            .field("field_resolver_enhancers", &self.field_resolver_enhancers)
            .field("federation", &self.federation)
            .field("graphiql", &self.graphiql)
            .field("jit", &self.jit)
            .finish()
    }
}

impl ModuleOptions {
    /// Returns the canonical async context factory for these options.
    ///
    /// The result always attaches the originating request at `req` unless
    /// the user's context function returned a non-object value.
    #[must_use]
    pub fn context_factory(&self) -> ContextFn {
        normalize_context(self.context.clone())
    }
}
