//! Code-first type declarations.
//!
//! These specs describe object, interface, and enum types declared in
//! application code rather than in SDL. The factory folds them into the same
//! type table as SDL-declared types, so both sources end up in one schema.

use std::sync::Arc;

use async_graphql::dynamic::TypeRef;
use async_graphql::Value;

use crate::provider::ArgumentSpec;

/// Callback resolving the concrete object type for an interface value.
///
/// Receives the resolved value and returns the name of the implementing
/// object type, or `None` when the value cannot be classified.
pub type TypeResolverFn = Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// A code-first type declaration.
#[derive(Clone)]
pub enum TypeSpec {
    Object(ObjectSpec),
    Interface(InterfaceSpec),
    Enum(EnumSpec),
}

impl TypeSpec {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Object(spec) => &spec.name,
            Self::Interface(spec) => &spec.name,
            Self::Enum(spec) => &spec.name,
        }
    }
}

/// One field of an object or interface type.
///
/// Fields without an explicitly registered field resolver are resolved by
/// property lookup on the parent value.
#[derive(Clone)]
pub struct FieldSpec {
    pub name: String,
    pub type_ref: TypeRef,
    pub description: Option<String>,
    pub args: Vec<ArgumentSpec>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            description: None,
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn argument(mut self, arg: ArgumentSpec) -> Self {
        self.args.push(arg);
        self
    }
}

/// A code-first object type.
#[derive(Clone)]
pub struct ObjectSpec {
    pub name: String,
    pub description: Option<String>,
    pub implements: Vec<String>,
    pub fields: Vec<FieldSpec>,
}

impl ObjectSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            implements: Vec::new(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.implements.push(interface.into());
        self
    }

    #[must_use]
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }
}

/// A code-first interface type.
///
/// An interface implemented by more than one object type must carry a
/// `resolve_type` callback; with a single implementor the concrete type is
/// chosen statically.
#[derive(Clone)]
pub struct InterfaceSpec {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<FieldSpec>,
    pub resolve_type: Option<TypeResolverFn>,
}

impl InterfaceSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
            resolve_type: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn resolve_type(
        mut self,
        resolver: impl Fn(&Value) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.resolve_type = Some(Arc::new(resolver));
        self
    }
}

/// A code-first enum type.
#[derive(Clone)]
pub struct EnumSpec {
    pub name: String,
    pub description: Option<String>,
    pub values: Vec<String>,
}

impl EnumSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            values: Vec::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.values.push(value.into());
        self
    }
}
