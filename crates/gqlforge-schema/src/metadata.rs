//! Resolver metadata registry and extraction.
//!
//! Metadata is kept in an explicit registration table: a mapping from
//! `(class name, method name)` to the metadata record attached when the
//! resolver class was registered. Extraction is an ordinary map read plus a
//! class-level fallback for the resolver kind.

use std::collections::HashMap;
use std::fmt;

use crate::provider::ResolverClass;

/// The kind of operation a resolver method contributes to the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolverKind {
    Query,
    Mutation,
    Subscription,
}

impl ResolverKind {
    /// Returns the root operation type name for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "Query",
            Self::Mutation => "Mutation",
            Self::Subscription => "Subscription",
        }
    }
}

impl fmt::Display for ResolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized descriptor for one resolver method.
///
/// Produced by [`extract`]; `None` from the extractor means the method did
/// not satisfy the requested filter and is simply skipped by the caller, not
/// an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverMetadata {
    /// Resolver kind, falling back to the owning class when the method
    /// itself carries none. `None` when neither declares a kind.
    pub kind: Option<ResolverKind>,
    /// The method's own name.
    pub method_name: String,
    /// The exposed field/operation name (override or method name).
    pub name: String,
    /// Whether the method resolves a field on an object type rather than a
    /// root operation.
    pub field_resolver: bool,
}

/// Metadata attached to a single resolver method at registration time.
#[derive(Debug, Clone, Default)]
pub struct MethodMetadata {
    pub kind: Option<ResolverKind>,
    pub name_override: Option<String>,
    pub field_resolver: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MethodKey {
    class: String,
    method: String,
}

/// Registration table for resolver metadata.
///
/// Populated by [`MetadataRegistry::register_class`] during bootstrap; all
/// lookups afterwards are plain map reads.
#[derive(Debug, Default)]
pub struct MetadataRegistry {
    class_kinds: HashMap<String, ResolverKind>,
    methods: HashMap<MethodKey, MethodMetadata>,
}

impl MetadataRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the metadata carried by a resolver class and its methods.
    pub fn register_class(&mut self, class: &ResolverClass) {
        if let Some(kind) = class.class_kind() {
            self.class_kinds.insert(class.name().to_string(), kind);
        }
        for method in class.methods() {
            self.methods.insert(
                MethodKey {
                    class: class.name().to_string(),
                    method: method.method_name.clone(),
                },
                MethodMetadata {
                    kind: method.kind,
                    name_override: method.name_override.clone(),
                    field_resolver: method.field_resolver,
                },
            );
        }
    }

    /// Returns the class-level resolver kind, if one was registered.
    #[must_use]
    pub fn class_kind(&self, class: &str) -> Option<ResolverKind> {
        self.class_kinds.get(class).copied()
    }

    /// Returns the metadata record for one method, if registered.
    #[must_use]
    pub fn method(&self, class: &str, method: &str) -> Option<&MethodMetadata> {
        self.methods.get(&MethodKey {
            class: class.to_string(),
            method: method.to_string(),
        })
    }
}

/// Extracts the normalized metadata for one method of a resolver class.
///
/// The filter predicate receives `(kind, is_reference_resolver,
/// is_field_resolver)`; returning `true` excludes the method from this
/// extraction pass and the function yields `None`. Reference resolvers are
/// supplied externally in federated setups, so the flag is always `false`
/// here.
///
/// The exposed name defaults to the method name when no override was
/// registered. This is a pure function of the registry contents.
pub fn extract(
    class: &ResolverClass,
    registry: &MetadataRegistry,
    method_name: &str,
    filter: impl Fn(Option<ResolverKind>, bool, bool) -> bool,
) -> Option<ResolverMetadata> {
    let method = registry
        .method(class.name(), method_name)
        .cloned()
        .unwrap_or_default();

    let kind = method.kind.or_else(|| registry.class_kind(class.name()));

    if filter(kind, false, method.field_resolver) {
        return None;
    }

    let name = method
        .name_override
        .unwrap_or_else(|| method_name.to_string());

    Some(ResolverMetadata {
        kind,
        method_name: method_name.to_string(),
        name,
        field_resolver: method.field_resolver,
    })
}
