//! SDL fragment parsing.
//!
//! Textual type definitions are parsed into an intermediate table that the
//! factory merges with code-first declarations. Fragments arrive already
//! ordered (path-loaded first, then directly supplied); `extend type`
//! appends fields to a previously seen object, while any other duplicate
//! type name is collected as a validation failure rather than failing fast,
//! so the caller can report every problem at once.

use async_graphql::dynamic::TypeRef;
use async_graphql_parser::parse_schema;
use async_graphql_parser::types::{
    BaseType, DirectiveLocation as AstDirectiveLocation, ServiceDocument, Type, TypeKind,
    TypeSystemDefinition,
};
use async_graphql_value::ConstValue;
use indexmap::IndexMap;

use crate::directives::{DirectiveDefinition, DirectiveLocation};
use crate::error::SchemaError;
use crate::provider::ArgumentSpec;

#[derive(Clone)]
pub(crate) struct SdlField {
    pub name: String,
    pub description: Option<String>,
    pub type_ref: TypeRef,
    pub args: Vec<ArgumentSpec>,
}

#[derive(Clone)]
pub(crate) struct SdlScalar {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Clone)]
pub(crate) struct SdlObject {
    pub description: Option<String>,
    pub implements: Vec<String>,
    pub fields: Vec<SdlField>,
}

#[derive(Clone)]
pub(crate) struct SdlInterface {
    pub description: Option<String>,
    pub fields: Vec<SdlField>,
}

#[derive(Clone)]
pub(crate) struct SdlUnion {
    pub name: String,
    pub description: Option<String>,
    pub members: Vec<String>,
}

#[derive(Clone)]
pub(crate) struct SdlEnum {
    pub name: String,
    pub description: Option<String>,
    pub values: Vec<String>,
}

#[derive(Clone)]
pub(crate) struct SdlInputField {
    pub name: String,
    pub description: Option<String>,
    pub type_ref: TypeRef,
    pub default_value: Option<ConstValue>,
}

#[derive(Clone)]
pub(crate) struct SdlInput {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<SdlInputField>,
}

/// Everything gathered from the SDL fragments of one build.
#[derive(Default)]
pub(crate) struct SdlTable {
    pub query_root: Option<String>,
    pub mutation_root: Option<String>,
    pub subscription_root: Option<String>,
    pub scalars: Vec<SdlScalar>,
    pub objects: IndexMap<String, SdlObject>,
    pub interfaces: IndexMap<String, SdlInterface>,
    pub unions: Vec<SdlUnion>,
    pub enums: Vec<SdlEnum>,
    pub inputs: Vec<SdlInput>,
    pub directives: Vec<DirectiveDefinition>,
    /// Semantic problems (duplicate names, bad extensions); syntax errors
    /// abort parsing instead.
    pub failures: Vec<String>,
}

impl std::fmt::Debug for SdlTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdlTable")
            .field("query_root", &self.query_root)
            .field("mutation_root", &self.mutation_root)
            .field("subscription_root", &self.subscription_root)
            .field("scalars", &self.scalars.len())
            .field("objects", &self.objects.len())
            .field("interfaces", &self.interfaces.len())
            .field("unions", &self.unions.len())
            .field("enums", &self.enums.len())
            .field("inputs", &self.inputs.len())
            .field("directives", &self.directives.len())
            .field("failures", &self.failures)
            .finish()
    }
}

impl SdlTable {
    fn known(&self, name: &str) -> bool {
        self.objects.contains_key(name)
            || self.interfaces.contains_key(name)
            || self.scalars.iter().any(|s| s.name == name)
            || self.unions.iter().any(|u| u.name == name)
            || self.enums.iter().any(|e| e.name == name)
            || self.inputs.iter().any(|i| i.name == name)
    }
}

/// Parses all fragments into one table.
///
/// # Errors
///
/// Returns `SchemaError::Parse` when a fragment is not syntactically valid
/// SDL. Semantic problems are collected in the table's `failures` instead.
pub(crate) fn parse_fragments(fragments: &[String]) -> Result<SdlTable, SchemaError> {
    let mut table = SdlTable::default();
    for (index, fragment) in fragments.iter().enumerate() {
        if fragment.trim().is_empty() {
            continue;
        }
        let document = parse_schema(fragment)
            .map_err(|e| SchemaError::Parse(format!("fragment {index}: {e}")))?;
        fold_document(&mut table, document);
    }
    Ok(table)
}

fn fold_document(table: &mut SdlTable, document: ServiceDocument) {
    for definition in document.definitions {
        match definition {
            TypeSystemDefinition::Schema(schema) => {
                let schema = schema.node;
                if let Some(query) = schema.query {
                    table.query_root = Some(query.node.to_string());
                }
                if let Some(mutation) = schema.mutation {
                    table.mutation_root = Some(mutation.node.to_string());
                }
                if let Some(subscription) = schema.subscription {
                    table.subscription_root = Some(subscription.node.to_string());
                }
            }
            TypeSystemDefinition::Directive(directive) => {
                let directive = directive.node;
                let mut definition = DirectiveDefinition::new(directive.name.node.to_string());
                if let Some(description) = directive.description {
                    definition = definition.description(description.node);
                }
                for argument in directive.arguments {
                    definition = definition.argument(argument_from_input_value(&argument.node));
                }
                if directive.is_repeatable {
                    definition = definition.repeatable();
                }
                for location in directive.locations {
                    definition = definition.location(location_from_ast(location.node));
                }
                table.directives.push(definition);
            }
            TypeSystemDefinition::Type(ty) => fold_type(table, ty.node),
        }
    }
}

fn fold_type(table: &mut SdlTable, definition: async_graphql_parser::types::TypeDefinition) {
    let name = definition.name.node.to_string();
    let description = definition.description.map(|d| d.node);

    if definition.extend {
        // Only object extension is supported; fields are appended.
        match definition.kind {
            TypeKind::Object(object) => {
                if let Some(existing) = table.objects.get_mut(&name) {
                    existing
                        .implements
                        .extend(object.implements.iter().map(|i| i.node.to_string()));
                    existing
                        .fields
                        .extend(object.fields.iter().map(|f| field_from_ast(&f.node)));
                } else {
                    table
                        .failures
                        .push(format!("cannot extend unknown type '{name}'"));
                }
            }
            _ => table
                .failures
                .push(format!("unsupported extension of type '{name}'")),
        }
        return;
    }

    if table.known(&name) {
        table.failures.push(format!("duplicate type name '{name}'"));
        return;
    }

    match definition.kind {
        TypeKind::Scalar => table.scalars.push(SdlScalar { name, description }),
        TypeKind::Object(object) => {
            let object = SdlObject {
                description,
                implements: object.implements.iter().map(|i| i.node.to_string()).collect(),
                fields: object.fields.iter().map(|f| field_from_ast(&f.node)).collect(),
            };
            table.objects.insert(name, object);
        }
        TypeKind::Interface(interface) => {
            let interface = SdlInterface {
                description,
                fields: interface
                    .fields
                    .iter()
                    .map(|f| field_from_ast(&f.node))
                    .collect(),
            };
            table.interfaces.insert(name, interface);
        }
        TypeKind::Union(union) => table.unions.push(SdlUnion {
            name,
            description,
            members: union.members.iter().map(|m| m.node.to_string()).collect(),
        }),
        TypeKind::Enum(en) => table.enums.push(SdlEnum {
            name,
            description,
            values: en.values.iter().map(|v| v.node.value.node.to_string()).collect(),
        }),
        TypeKind::InputObject(input) => table.inputs.push(SdlInput {
            name,
            description,
            fields: input
                .fields
                .iter()
                .map(|f| input_field_from_ast(&f.node))
                .collect(),
        }),
    }
}

fn field_from_ast(field: &async_graphql_parser::types::FieldDefinition) -> SdlField {
    SdlField {
        name: field.name.node.to_string(),
        description: field.description.as_ref().map(|d| d.node.clone()),
        type_ref: type_ref_from_ast(&field.ty.node),
        args: field
            .arguments
            .iter()
            .map(|a| argument_from_input_value(&a.node))
            .collect(),
    }
}

fn input_field_from_ast(
    field: &async_graphql_parser::types::InputValueDefinition,
) -> SdlInputField {
    SdlInputField {
        name: field.name.node.to_string(),
        description: field.description.as_ref().map(|d| d.node.clone()),
        type_ref: type_ref_from_ast(&field.ty.node),
        default_value: field.default_value.as_ref().map(|v| v.node.clone()),
    }
}

fn argument_from_input_value(
    value: &async_graphql_parser::types::InputValueDefinition,
) -> ArgumentSpec {
    let mut arg = ArgumentSpec::new(value.name.node.to_string(), type_ref_from_ast(&value.ty.node));
    if let Some(description) = &value.description {
        arg = arg.description(description.node.clone());
    }
    if let Some(default) = &value.default_value {
        arg = arg.default_value(default.node.clone());
    }
    arg
}

/// Converts a parsed type reference into the engine's representation.
pub(crate) fn type_ref_from_ast(ty: &Type) -> TypeRef {
    let base = match &ty.base {
        BaseType::Named(name) => TypeRef::Named(name.to_string().into()),
        BaseType::List(inner) => TypeRef::List(Box::new(type_ref_from_ast(inner))),
    };
    if ty.nullable {
        base
    } else {
        TypeRef::NonNull(Box::new(base))
    }
}

/// Returns the named type at the bottom of a (possibly wrapped) reference.
pub(crate) fn base_type_name(ty: &TypeRef) -> &str {
    match ty {
        TypeRef::Named(name) => name.as_ref(),
        TypeRef::NonNull(inner) | TypeRef::List(inner) => base_type_name(inner),
    }
}

fn location_from_ast(location: AstDirectiveLocation) -> DirectiveLocation {
    match location {
        AstDirectiveLocation::Query => DirectiveLocation::Query,
        AstDirectiveLocation::Mutation => DirectiveLocation::Mutation,
        AstDirectiveLocation::Subscription => DirectiveLocation::Subscription,
        AstDirectiveLocation::Field => DirectiveLocation::Field,
        AstDirectiveLocation::FragmentDefinition => DirectiveLocation::FragmentDefinition,
        AstDirectiveLocation::FragmentSpread => DirectiveLocation::FragmentSpread,
        AstDirectiveLocation::InlineFragment => DirectiveLocation::InlineFragment,
        AstDirectiveLocation::VariableDefinition => DirectiveLocation::VariableDefinition,
        AstDirectiveLocation::Schema => DirectiveLocation::Schema,
        AstDirectiveLocation::Scalar => DirectiveLocation::Scalar,
        AstDirectiveLocation::Object => DirectiveLocation::Object,
        AstDirectiveLocation::FieldDefinition => DirectiveLocation::FieldDefinition,
        AstDirectiveLocation::ArgumentDefinition => DirectiveLocation::ArgumentDefinition,
        AstDirectiveLocation::Interface => DirectiveLocation::Interface,
        AstDirectiveLocation::Union => DirectiveLocation::Union,
        AstDirectiveLocation::Enum => DirectiveLocation::Enum,
        AstDirectiveLocation::EnumValue => DirectiveLocation::EnumValue,
        AstDirectiveLocation::InputObject => DirectiveLocation::InputObject,
        AstDirectiveLocation::InputFieldDefinition => DirectiveLocation::InputFieldDefinition,
    }
}
