//! Resolver classes and the provider seam.
//!
//! A [`ResolverClass`] is the explicit registration-time equivalent of a
//! discovered resolver: a named method table where every method carries its
//! metadata (kind, exposed-name override, field-resolver flag) together with
//! the handler that computes the value. Classes are handed to the schema
//! factory through the [`ProviderSource`] trait so the core never depends on
//! a concrete container implementation.

use std::sync::Arc;

use async_graphql::dynamic::{FieldFuture, ResolverContext, TypeRef};
use async_graphql::Value;

use crate::metadata::ResolverKind;
use crate::scalars::ScalarDefinition;
use crate::types::TypeSpec;

/// A resolver function for one method, in the engine's native shape.
pub type ResolverHandler =
    Arc<dyn for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync>;

/// Declaration of one argument accepted by a resolver method or field.
#[derive(Clone)]
pub struct ArgumentSpec {
    pub name: String,
    pub type_ref: TypeRef,
    pub description: Option<String>,
    pub default_value: Option<Value>,
}

impl ArgumentSpec {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            description: None,
            default_value: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }
}

/// Declaration of one resolver method: metadata plus handler.
///
/// A handler that resolves to an interface type must return a
/// `FieldValue` tagged with the concrete type
/// (`FieldValue::value(..).with_type(..)`); only default property resolvers
/// are wrapped automatically by the factory.
#[derive(Clone)]
pub struct ResolverMethodSpec {
    pub method_name: String,
    pub kind: Option<ResolverKind>,
    pub name_override: Option<String>,
    pub field_resolver: bool,
    /// Object type a field resolver attaches to. Required when
    /// `field_resolver` is set; ignored otherwise.
    pub parent_type: Option<String>,
    pub return_type: TypeRef,
    pub args: Vec<ArgumentSpec>,
    pub description: Option<String>,
    pub handler: ResolverHandler,
}

impl ResolverMethodSpec {
    pub fn new(
        method_name: impl Into<String>,
        return_type: TypeRef,
        handler: impl for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync + 'static,
    ) -> Self {
        Self {
            method_name: method_name.into(),
            kind: None,
            name_override: None,
            field_resolver: false,
            parent_type: None,
            return_type,
            args: Vec::new(),
            description: None,
            handler: Arc::new(handler),
        }
    }

    /// Sets the resolver kind for this method, overriding the class kind.
    #[must_use]
    pub fn kind(mut self, kind: ResolverKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Overrides the exposed field/operation name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name_override = Some(name.into());
        self
    }

    /// Marks this method as a field resolver on the given object type.
    #[must_use]
    pub fn field_resolver(mut self, parent_type: impl Into<String>) -> Self {
        self.field_resolver = true;
        self.parent_type = Some(parent_type.into());
        self
    }

    #[must_use]
    pub fn argument(mut self, arg: ArgumentSpec) -> Self {
        self.args.push(arg);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A named resolver class: class-level metadata plus its method table.
#[derive(Clone)]
pub struct ResolverClass {
    name: String,
    kind: Option<ResolverKind>,
    methods: Vec<ResolverMethodSpec>,
}

impl ResolverClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            methods: Vec::new(),
        }
    }

    /// Sets the class-level resolver kind, applied to methods that carry
    /// none of their own.
    #[must_use]
    pub fn kind(mut self, kind: ResolverKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn method(mut self, method: ResolverMethodSpec) -> Self {
        self.methods.push(method);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn class_kind(&self) -> Option<ResolverKind> {
        self.kind
    }

    #[must_use]
    pub fn methods(&self) -> &[ResolverMethodSpec] {
        &self.methods
    }
}

/// Source of instantiated providers, as seen by the assembly core.
///
/// Implementations return the resolver classes, custom scalar
/// implementations, and code-first type declarations that were registered
/// with the application. The original tag-based lookup became one typed
/// accessor per provider category.
pub trait ProviderSource: Send + Sync {
    fn resolver_classes(&self) -> Vec<Arc<ResolverClass>>;
    fn scalar_definitions(&self) -> Vec<ScalarDefinition>;
    fn type_specs(&self) -> Vec<TypeSpec>;
}

/// In-memory [`ProviderSource`] populated by explicit registration calls.
#[derive(Default)]
pub struct ProviderRegistry {
    resolvers: Vec<Arc<ResolverClass>>,
    scalars: Vec<ScalarDefinition>,
    types: Vec<TypeSpec>,
}

impl ProviderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_resolver(&mut self, class: ResolverClass) -> &mut Self {
        self.resolvers.push(Arc::new(class));
        self
    }

    pub fn register_scalar(&mut self, scalar: ScalarDefinition) -> &mut Self {
        self.scalars.push(scalar);
        self
    }

    pub fn register_type(&mut self, spec: TypeSpec) -> &mut Self {
        self.types.push(spec);
        self
    }
}

impl ProviderSource for ProviderRegistry {
    fn resolver_classes(&self) -> Vec<Arc<ResolverClass>> {
        self.resolvers.clone()
    }

    fn scalar_definitions(&self) -> Vec<ScalarDefinition> {
        self.scalars.clone()
    }

    fn type_specs(&self) -> Vec<TypeSpec> {
        self.types.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_spec_builders() {
        let spec = ResolverMethodSpec::new("recipe", TypeRef::named("Recipe"), |_| {
            FieldFuture::new(async { Ok(None::<Value>) })
        })
        .kind(ResolverKind::Query)
        .name("getRecipe")
        .argument(ArgumentSpec::new("id", TypeRef::named_nn(TypeRef::ID)))
        .description("Fetch one recipe");

        assert_eq!(spec.method_name, "recipe");
        assert_eq!(spec.kind, Some(ResolverKind::Query));
        assert_eq!(spec.name_override.as_deref(), Some("getRecipe"));
        assert_eq!(spec.args.len(), 1);
        assert!(!spec.field_resolver);
    }

    #[test]
    fn test_registry_returns_registered_providers() {
        let mut registry = ProviderRegistry::new();
        registry
            .register_resolver(ResolverClass::new("A"))
            .register_resolver(ResolverClass::new("B"))
            .register_scalar(ScalarDefinition::new("DateTime"));

        assert_eq!(registry.resolver_classes().len(), 2);
        assert_eq!(registry.scalar_definitions().len(), 1);
        assert!(registry.type_specs().is_empty());
    }
}
