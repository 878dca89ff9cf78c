//! Directive definitions.
//!
//! The engine's dynamic schema API has no first-class custom directive
//! registration, so directives are carried in their own registry and
//! rendered into the printed SDL alongside the engine output. Federated
//! builds prepend the standard specified set so the emitted schema is
//! self-describing for composition tooling.

use std::fmt::Write as _;

use async_graphql::dynamic::TypeRef;

use crate::provider::ArgumentSpec;

/// The locations a directive may be applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveLocation {
    Query,
    Mutation,
    Subscription,
    Field,
    FragmentDefinition,
    FragmentSpread,
    InlineFragment,
    VariableDefinition,
    Schema,
    Scalar,
    Object,
    FieldDefinition,
    ArgumentDefinition,
    Interface,
    Union,
    Enum,
    EnumValue,
    InputObject,
    InputFieldDefinition,
}

impl DirectiveLocation {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "QUERY",
            Self::Mutation => "MUTATION",
            Self::Subscription => "SUBSCRIPTION",
            Self::Field => "FIELD",
            Self::FragmentDefinition => "FRAGMENT_DEFINITION",
            Self::FragmentSpread => "FRAGMENT_SPREAD",
            Self::InlineFragment => "INLINE_FRAGMENT",
            Self::VariableDefinition => "VARIABLE_DEFINITION",
            Self::Schema => "SCHEMA",
            Self::Scalar => "SCALAR",
            Self::Object => "OBJECT",
            Self::FieldDefinition => "FIELD_DEFINITION",
            Self::ArgumentDefinition => "ARGUMENT_DEFINITION",
            Self::Interface => "INTERFACE",
            Self::Union => "UNION",
            Self::Enum => "ENUM",
            Self::EnumValue => "ENUM_VALUE",
            Self::InputObject => "INPUT_OBJECT",
            Self::InputFieldDefinition => "INPUT_FIELD_DEFINITION",
        }
    }
}

/// Definition of one schema directive.
#[derive(Clone)]
pub struct DirectiveDefinition {
    pub name: String,
    pub description: Option<String>,
    pub args: Vec<ArgumentSpec>,
    pub locations: Vec<DirectiveLocation>,
    pub repeatable: bool,
}

impl DirectiveDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            args: Vec::new(),
            locations: Vec::new(),
            repeatable: false,
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

    #[must_use]
    pub fn location(mut self, location: DirectiveLocation) -> Self {
        self.locations.push(location);
        self
    }

    #[must_use]
    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    /// Renders the definition as SDL, e.g.
    /// `directive @skip(if: Boolean!) on FIELD | FRAGMENT_SPREAD`.
    #[must_use]
    pub fn to_sdl(&self) -> String {
        let mut out = String::new();
        if let Some(description) = &self.description {
            let _ = writeln!(out, "\"\"\"\n{description}\n\"\"\"");
        }
        let _ = write!(out, "directive @{}", self.name);
        if !self.args.is_empty() {
            out.push('(');
            for (index, arg) in self.args.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                let _ = write!(out, "{}: {}", arg.name, arg.type_ref);
                if let Some(default) = &arg.default_value {
                    let _ = write!(out, " = {default}");
                }
            }
            out.push(')');
        }
        if self.repeatable {
            out.push_str(" repeatable");
        }
        let locations: Vec<&str> = self.locations.iter().map(DirectiveLocation::as_str).collect();
        let _ = write!(out, " on {}", locations.join(" | "));
        out
    }
}

/// The standard specified directive set: `@skip`, `@include`, and
/// `@deprecated`.
#[must_use]
pub fn specified_directives() -> Vec<DirectiveDefinition> {
    vec![
        DirectiveDefinition::new("skip")
            .description("Directs the executor to skip this field or fragment when the `if` argument is true.")
            .argument(ArgumentSpec::new("if", TypeRef::named_nn(TypeRef::BOOLEAN)))
            .location(DirectiveLocation::Field)
            .location(DirectiveLocation::FragmentSpread)
            .location(DirectiveLocation::InlineFragment),
        DirectiveDefinition::new("include")
            .description("Directs the executor to include this field or fragment only when the `if` argument is true.")
            .argument(ArgumentSpec::new("if", TypeRef::named_nn(TypeRef::BOOLEAN)))
            .location(DirectiveLocation::Field)
            .location(DirectiveLocation::FragmentSpread)
            .location(DirectiveLocation::InlineFragment),
        DirectiveDefinition::new("deprecated")
            .description("Marks an element of a GraphQL schema as no longer supported.")
            .argument(
                ArgumentSpec::new("reason", TypeRef::named(TypeRef::STRING))
                    .default_value(async_graphql::Value::String("No longer supported".into())),
            )
            .location(DirectiveLocation::FieldDefinition)
            .location(DirectiveLocation::ArgumentDefinition)
            .location(DirectiveLocation::InputFieldDefinition)
            .location(DirectiveLocation::EnumValue),
    ]
}
