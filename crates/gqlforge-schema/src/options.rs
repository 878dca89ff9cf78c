//! Schema build options.

use indexmap::IndexMap;

use crate::directives::DirectiveDefinition;
use crate::scalars::ScalarDefinition;

/// Options for one schema build.
///
/// Constructed fresh per build call and never mutated after being handed to
/// the factory. The scalars map is injected by the builder from the scalar
/// registry; `type_defs` holds the merged SDL fragments in their final
/// order (path-loaded first, then directly supplied).
#[derive(Clone)]
pub struct BuildSchemaOptions {
    /// Name-to-implementation mapping for custom scalars.
    pub scalars_map: IndexMap<String, ScalarDefinition>,

    /// Named schema directives, applied after `directives`.
    pub schema_directives: IndexMap<String, DirectiveDefinition>,

    /// Ordered directive definitions. Federated builds prepend the
    /// specified standard set here.
    pub directives: Vec<DirectiveDefinition>,

    /// Skips the resolver-coverage checks. Required for federated schemas
    /// whose fields may be resolved by external reference resolvers.
    pub skip_check: bool,

    /// Merged SDL fragments folded into the build.
    pub type_defs: Vec<String>,

    /// Maximum query depth allowed, when set.
    pub max_depth: Option<usize>,

    /// Maximum query complexity allowed, when set.
    pub max_complexity: Option<usize>,

    /// Whether introspection queries are enabled.
    pub introspection_enabled: bool,
}

impl Default for BuildSchemaOptions {
    fn default() -> Self {
        Self {
            scalars_map: IndexMap::new(),
            schema_directives: IndexMap::new(),
            directives: Vec::new(),
            skip_check: false,
            type_defs: Vec::new(),
            max_depth: None,
            max_complexity: None,
            introspection_enabled: true,
        }
    }
}
