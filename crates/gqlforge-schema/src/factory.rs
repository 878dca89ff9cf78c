//! Schema factory.
//!
//! The factory merges three sources of type information into one validated
//! schema: parsed SDL fragments, code-first type specs, and the operations
//! extracted from registered resolver classes. Operation fields declared in
//! SDL gain the matching extracted handler by exposed name; code-first
//! operations missing from SDL are appended with their declared types; all
//! remaining object fields resolve by property lookup on the parent value.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_graphql::dynamic::{
    DynamicRequest, Enum, EnumItem, Field, FieldFuture, FieldValue, InputObject, InputValue,
    Interface, InterfaceField, Object, Scalar, Schema, TypeRef, Union,
};
use async_graphql::{Response, Value};
use indexmap::IndexMap;
use serde_json::json;
use tracing::debug;

use crate::directives::DirectiveDefinition;
use crate::error::SchemaError;
use crate::metadata::{MetadataRegistry, ResolverKind, ResolverMetadata, extract};
use crate::options::BuildSchemaOptions;
use crate::provider::{ArgumentSpec, ResolverClass, ResolverHandler, ResolverMethodSpec};
use crate::sdl::{self, SdlEnum, SdlField, base_type_name};
use crate::types::{FieldSpec, TypeResolverFn, TypeSpec};

/// A validated, servable schema together with its directive definitions.
#[derive(Clone)]
pub struct AssembledSchema {
    executable: Schema,
    directives: Vec<DirectiveDefinition>,
}

impl std::fmt::Debug for AssembledSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssembledSchema")
            .field("directives", &self.directives.len())
            .finish_non_exhaustive()
    }
}

impl AssembledSchema {
    /// The engine schema used for execution.
    #[must_use]
    pub fn executable(&self) -> &Schema {
        &self.executable
    }

    /// The directive definitions registered for this schema, in order.
    #[must_use]
    pub fn directives(&self) -> &[DirectiveDefinition] {
        &self.directives
    }

    /// Prints the schema as SDL, appending directive definitions the engine
    /// output does not already contain.
    #[must_use]
    pub fn sdl(&self) -> String {
        let mut out = self.executable.sdl();
        for directive in &self.directives {
            if out.contains(&format!("directive @{}", directive.name)) {
                continue;
            }
            if !out.ends_with('\n') {
                out.push('\n');
            }
            out.push('\n');
            out.push_str(&directive.to_sdl());
            out.push('\n');
        }
        out
    }

    /// Executes a request against the schema.
    pub async fn execute(&self, request: impl Into<DynamicRequest>) -> Response {
        self.executable.execute(request).await
    }
}

/// How values of an interface type are narrowed to a concrete object type.
#[derive(Clone)]
struct InterfaceResolution {
    resolve_type: Option<TypeResolverFn>,
    sole_implementor: Option<String>,
}

impl InterfaceResolution {
    fn concrete_for(&self, value: &Value) -> Option<String> {
        match &self.resolve_type {
            Some(resolver) => resolver(value),
            None => self.sole_implementor.clone(),
        }
    }
}

#[derive(Clone)]
struct PendingField {
    type_ref: TypeRef,
    description: Option<String>,
    args: Vec<ArgumentSpec>,
    handler: Option<ResolverHandler>,
}

#[derive(Clone, Default)]
struct PendingObject {
    description: Option<String>,
    implements: Vec<String>,
    fields: IndexMap<String, PendingField>,
}

struct PendingInterface {
    description: Option<String>,
    fields: Vec<SdlField>,
    resolve_type: Option<TypeResolverFn>,
}

/// Builds validated schemas from resolver classes, code-first specs, and
/// SDL fragments.
#[derive(Debug, Default)]
pub struct SchemaFactory;

impl SchemaFactory {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Creates a schema from the given sources.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Parse` for malformed SDL,
    /// `SchemaError::Validation` (with a structured details list) when the
    /// merged sources are inconsistent, and `SchemaError::Compile` when the
    /// engine rejects the final schema.
    pub async fn create(
        &self,
        resolvers: &[Arc<ResolverClass>],
        types: &[TypeSpec],
        options: &BuildSchemaOptions,
    ) -> Result<AssembledSchema, SchemaError> {
        debug!(
            resolver_classes = resolvers.len(),
            type_specs = types.len(),
            fragments = options.type_defs.len(),
            "starting schema build"
        );

        let table = sdl::parse_fragments(&options.type_defs)?;
        let mut failures = table.failures.clone();

        let mut registry = MetadataRegistry::new();
        for class in resolvers {
            registry.register_class(class);
        }

        let extracted = extract_operations(resolvers, &registry);

        // Fold SDL types and code-first specs into one pending table.
        let mut names: HashSet<String> = HashSet::new();
        names.extend(table.objects.keys().cloned());
        names.extend(table.interfaces.keys().cloned());
        names.extend(table.scalars.iter().map(|s| s.name.clone()));
        names.extend(table.unions.iter().map(|u| u.name.clone()));
        names.extend(table.enums.iter().map(|e| e.name.clone()));
        names.extend(table.inputs.iter().map(|i| i.name.clone()));

        let mut objects: IndexMap<String, PendingObject> = table
            .objects
            .iter()
            .map(|(name, object)| {
                (
                    name.clone(),
                    PendingObject {
                        description: object.description.clone(),
                        implements: object.implements.clone(),
                        fields: object
                            .fields
                            .iter()
                            .map(|field| {
                                (
                                    field.name.clone(),
                                    PendingField {
                                        type_ref: field.type_ref.clone(),
                                        description: field.description.clone(),
                                        args: field.args.clone(),
                                        handler: None,
                                    },
                                )
                            })
                            .collect(),
                    },
                )
            })
            .collect();

        let mut interfaces: IndexMap<String, PendingInterface> = table
            .interfaces
            .iter()
            .map(|(name, interface)| {
                (
                    name.clone(),
                    PendingInterface {
                        description: interface.description.clone(),
                        fields: interface.fields.clone(),
                        resolve_type: None,
                    },
                )
            })
            .collect();

        let mut enums = table.enums.clone();

        for spec in types {
            if !names.insert(spec.name().to_string()) {
                failures.push(format!("duplicate type name '{}'", spec.name()));
                continue;
            }
            match spec {
                TypeSpec::Object(object) => {
                    objects.insert(
                        object.name.clone(),
                        PendingObject {
                            description: object.description.clone(),
                            implements: object.implements.clone(),
                            fields: object
                                .fields
                                .iter()
                                .map(|field| (field.name.clone(), pending_from_field_spec(field)))
                                .collect(),
                        },
                    );
                }
                TypeSpec::Interface(interface) => {
                    interfaces.insert(
                        interface.name.clone(),
                        PendingInterface {
                            description: interface.description.clone(),
                            fields: interface.fields.iter().map(sdl_field_from_spec).collect(),
                            resolve_type: interface.resolve_type.clone(),
                        },
                    );
                }
                TypeSpec::Enum(en) => enums.push(SdlEnum {
                    name: en.name.clone(),
                    description: en.description.clone(),
                    values: en.values.clone(),
                }),
            }
        }

        // Attach extracted operations to the root types.
        let query_root = table.query_root.clone().unwrap_or_else(|| "Query".to_string());
        let mutation_root = table
            .mutation_root
            .clone()
            .unwrap_or_else(|| "Mutation".to_string());

        for (meta, spec) in &extracted.queries {
            attach_operation(&mut objects, &query_root, meta, spec, &mut failures);
        }
        for (meta, spec) in &extracted.mutations {
            attach_operation(&mut objects, &mutation_root, meta, spec, &mut failures);
        }
        if !extracted.subscriptions.is_empty() && !options.skip_check {
            let names: Vec<&str> = extracted
                .subscriptions
                .iter()
                .map(|meta| meta.name.as_str())
                .collect();
            failures.push(format!(
                "subscription resolvers are not supported: {}",
                names.join(", ")
            ));
        }

        for (meta, spec) in &extracted.field_resolvers {
            let Some(parent) = spec.parent_type.clone() else {
                failures.push(format!(
                    "field resolver '{}' does not declare a parent type",
                    meta.method_name
                ));
                continue;
            };
            match objects.get_mut(&parent) {
                Some(object) => match object.fields.get_mut(&meta.name) {
                    Some(field) => field.handler = Some(spec.handler.clone()),
                    None => {
                        object.fields.insert(
                            meta.name.clone(),
                            PendingField {
                                type_ref: spec.return_type.clone(),
                                description: spec.description.clone(),
                                args: spec.args.clone(),
                                handler: Some(spec.handler.clone()),
                            },
                        );
                    }
                },
                None => failures.push(format!(
                    "field resolver '{}' targets unknown type '{parent}'",
                    meta.method_name
                )),
            }
        }

        if !options.skip_check {
            for root in [&query_root, &mutation_root] {
                if let Some(object) = objects.get(root.as_str()) {
                    for (name, field) in &object.fields {
                        if field.handler.is_none() {
                            failures
                                .push(format!("no resolver defined for operation '{root}.{name}'"));
                        }
                    }
                }
            }
            let has_query = objects
                .get(&query_root)
                .is_some_and(|object| !object.fields.is_empty());
            if !has_query {
                failures.push("schema must define at least one query operation".to_string());
            }
        }

        // Interface resolution strategy is required regardless of
        // skip_check: values of an interface type must narrow to exactly
        // one object type at runtime.
        let mut interface_resolution: HashMap<String, InterfaceResolution> = HashMap::new();
        for (name, interface) in &interfaces {
            let implementors: Vec<String> = objects
                .iter()
                .filter(|(_, object)| object.implements.contains(name))
                .map(|(object_name, _)| object_name.clone())
                .collect();
            if implementors.len() > 1 && interface.resolve_type.is_none() {
                failures.push(format!(
                    "interface '{name}' has {} implementors and no type resolver",
                    implementors.len()
                ));
            }
            let sole_implementor = if implementors.len() == 1 {
                Some(implementors[0].clone())
            } else {
                None
            };
            interface_resolution.insert(
                name.clone(),
                InterfaceResolution {
                    resolve_type: interface.resolve_type.clone(),
                    sole_implementor,
                },
            );
        }

        if !failures.is_empty() {
            return Err(SchemaError::validation(
                format!("schema validation failed with {} error(s)", failures.len()),
                json!(failures),
            ));
        }

        // Directive registry: first definition of a name wins.
        let mut directive_defs: Vec<DirectiveDefinition> = Vec::new();
        for directive in options
            .directives
            .iter()
            .cloned()
            .chain(options.schema_directives.values().cloned())
            .chain(table.directives.iter().cloned())
        {
            if !directive_defs.iter().any(|d| d.name == directive.name) {
                directive_defs.push(directive);
            }
        }

        // Without the coverage checks a build may arrive here with no query
        // fields at all; the engine still requires a query root.
        let query_entry = objects.entry(query_root.clone()).or_default();
        if query_entry.fields.is_empty() {
            query_entry.fields.insert(
                "_placeholder".to_string(),
                PendingField {
                    type_ref: TypeRef::named(TypeRef::STRING),
                    description: None,
                    args: Vec::new(),
                    handler: Some(Arc::new(|_| {
                        FieldFuture::new(async { Ok(None::<Value>) })
                    })),
                },
            );
        }
        if objects
            .get(&mutation_root)
            .is_some_and(|object| object.fields.is_empty())
        {
            objects.shift_remove(&mutation_root);
        }
        let has_mutation = objects.contains_key(&mutation_root) && mutation_root != query_root;

        let mut builder = Schema::build(
            query_root.as_str(),
            has_mutation.then(|| mutation_root.clone()).as_deref(),
            None::<&str>,
        );

        let mut registered_scalars: HashSet<String> = HashSet::new();
        for (name, def) in &options.scalars_map {
            let mut scalar = Scalar::new(name.clone());
            if let Some(description) = &def.description {
                scalar = scalar.description(description.clone());
            }
            if let Some(url) = &def.specified_by_url {
                scalar = scalar.specified_by_url(url.clone());
            }
            if let Some(validator) = def.validator.clone() {
                scalar = scalar.validator(move |value| validator(value));
            }
            builder = builder.register(scalar);
            registered_scalars.insert(name.clone());
        }
        for decl in &table.scalars {
            if registered_scalars.contains(&decl.name) {
                continue;
            }
            let mut scalar = Scalar::new(decl.name.clone());
            if let Some(description) = &decl.description {
                scalar = scalar.description(description.clone());
            }
            builder = builder.register(scalar);
        }

        for en in &enums {
            let mut definition = Enum::new(en.name.clone());
            if let Some(description) = &en.description {
                definition = definition.description(description.clone());
            }
            for value in &en.values {
                definition = definition.item(EnumItem::new(value.clone()));
            }
            builder = builder.register(definition);
        }

        for union in &table.unions {
            let mut definition = Union::new(union.name.clone());
            if let Some(description) = &union.description {
                definition = definition.description(description.clone());
            }
            for member in &union.members {
                definition = definition.possible_type(member.clone());
            }
            builder = builder.register(definition);
        }

        for input in &table.inputs {
            let mut definition = InputObject::new(input.name.clone());
            if let Some(description) = &input.description {
                definition = definition.description(description.clone());
            }
            for field in &input.fields {
                let mut value = InputValue::new(field.name.clone(), field.type_ref.clone());
                if let Some(description) = &field.description {
                    value = value.description(description.clone());
                }
                if let Some(default) = &field.default_value {
                    value = value.default_value(default.clone());
                }
                definition = definition.field(value);
            }
            builder = builder.register(definition);
        }

        for (name, interface) in &interfaces {
            let mut definition = Interface::new(name.clone());
            if let Some(description) = &interface.description {
                definition = definition.description(description.clone());
            }
            for field in &interface.fields {
                let mut interface_field =
                    InterfaceField::new(field.name.clone(), field.type_ref.clone());
                if let Some(description) = &field.description {
                    interface_field = interface_field.description(description.clone());
                }
                for arg in &field.args {
                    interface_field = interface_field.argument(input_value_from_arg(arg));
                }
                definition = definition.field(interface_field);
            }
            builder = builder.register(definition);
        }

        for (name, pending) in objects {
            let mut object = Object::new(name);
            if let Some(description) = pending.description {
                object = object.description(description);
            }
            for interface in &pending.implements {
                object = object.implement(interface.clone());
            }
            for (field_name, field) in pending.fields {
                let PendingField {
                    type_ref,
                    description,
                    args,
                    handler,
                } = field;
                let resolver = match handler {
                    Some(handler) => handler,
                    None => default_property_resolver(
                        field_name.clone(),
                        interface_resolution.get(base_type_name(&type_ref)).cloned(),
                    ),
                };
                let mut definition =
                    Field::new(field_name, type_ref, move |ctx| resolver(ctx));
                if let Some(description) = description {
                    definition = definition.description(description);
                }
                for arg in &args {
                    definition = definition.argument(input_value_from_arg(arg));
                }
                object = object.field(definition);
            }
            builder = builder.register(object);
        }

        if let Some(depth) = options.max_depth {
            builder = builder.limit_depth(depth);
        }
        if let Some(complexity) = options.max_complexity {
            builder = builder.limit_complexity(complexity);
        }
        if !options.introspection_enabled {
            builder = builder.disable_introspection();
        }

        let schema = builder
            .finish()
            .map_err(|e| SchemaError::Compile(e.to_string()))?;

        debug!("schema build complete");
        Ok(AssembledSchema {
            executable: schema,
            directives: directive_defs,
        })
    }
}

#[derive(Default)]
struct ExtractedOperations {
    queries: Vec<(ResolverMetadata, ResolverMethodSpec)>,
    mutations: Vec<(ResolverMetadata, ResolverMethodSpec)>,
    subscriptions: Vec<ResolverMetadata>,
    field_resolvers: Vec<(ResolverMetadata, ResolverMethodSpec)>,
}

/// Runs one extraction pass per operation kind over every method.
///
/// Methods carrying no kind metadata and no field-resolver flag are skipped
/// entirely, matching the filter contract: exclusion is an absent result,
/// not an error.
fn extract_operations(
    resolvers: &[Arc<ResolverClass>],
    registry: &MetadataRegistry,
) -> ExtractedOperations {
    let mut extracted = ExtractedOperations::default();
    for class in resolvers {
        for spec in class.methods() {
            if let Some(meta) = extract(class, registry, &spec.method_name, |kind, _, field| {
                field || kind != Some(ResolverKind::Query)
            }) {
                extracted.queries.push((meta, spec.clone()));
            } else if let Some(meta) =
                extract(class, registry, &spec.method_name, |kind, _, field| {
                    field || kind != Some(ResolverKind::Mutation)
                })
            {
                extracted.mutations.push((meta, spec.clone()));
            } else if let Some(meta) =
                extract(class, registry, &spec.method_name, |kind, _, field| {
                    field || kind != Some(ResolverKind::Subscription)
                })
            {
                extracted.subscriptions.push(meta);
            } else if let Some(meta) =
                extract(class, registry, &spec.method_name, |_, _, field| !field)
            {
                extracted.field_resolvers.push((meta, spec.clone()));
            }
        }
    }
    extracted
}

fn attach_operation(
    objects: &mut IndexMap<String, PendingObject>,
    root: &str,
    meta: &ResolverMetadata,
    spec: &ResolverMethodSpec,
    failures: &mut Vec<String>,
) {
    let object = objects.entry(root.to_string()).or_default();
    match object.fields.get_mut(&meta.name) {
        Some(field) => {
            if field.handler.is_some() {
                failures.push(format!(
                    "duplicate resolver for operation '{root}.{}'",
                    meta.name
                ));
            }
            field.handler = Some(spec.handler.clone());
        }
        None => {
            object.fields.insert(
                meta.name.clone(),
                PendingField {
                    type_ref: spec.return_type.clone(),
                    description: spec.description.clone(),
                    args: spec.args.clone(),
                    handler: Some(spec.handler.clone()),
                },
            );
        }
    }
}

fn pending_from_field_spec(field: &FieldSpec) -> PendingField {
    PendingField {
        type_ref: field.type_ref.clone(),
        description: field.description.clone(),
        args: field.args.clone(),
        handler: None,
    }
}

fn sdl_field_from_spec(field: &FieldSpec) -> SdlField {
    SdlField {
        name: field.name.clone(),
        description: field.description.clone(),
        type_ref: field.type_ref.clone(),
        args: field.args.clone(),
    }
}

fn input_value_from_arg(arg: &ArgumentSpec) -> InputValue {
    let mut value = InputValue::new(arg.name.clone(), arg.type_ref.clone());
    if let Some(description) = &arg.description {
        value = value.description(description.clone());
    }
    if let Some(default) = &arg.default_value {
        value = value.default_value(default.clone());
    }
    value
}

/// Resolves a field by property lookup on the parent value, narrowing
/// interface-typed values to their concrete object type.
fn default_property_resolver(
    field: String,
    interface: Option<InterfaceResolution>,
) -> ResolverHandler {
    Arc::new(move |ctx| {
        let field = field.clone();
        let interface = interface.clone();
        FieldFuture::new(async move {
            let Some(Value::Object(parent)) = ctx.parent_value.as_value() else {
                return Ok(None);
            };
            let Some(value) = parent.get(field.as_str()).cloned() else {
                return Ok(None);
            };
            if value == Value::Null {
                return Ok(None);
            }
            match interface {
                Some(resolution) => {
                    let concrete = resolution.concrete_for(&value).ok_or_else(|| {
                        async_graphql::Error::new(format!(
                            "unable to resolve concrete type for interface value in field '{field}'"
                        ))
                    })?;
                    Ok(Some(FieldValue::value(value).with_type(concrete)))
                }
                None => Ok(Some(FieldValue::value(value))),
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalars::ScalarDefinition;
    use crate::types::{EnumSpec, InterfaceSpec, ObjectSpec};
    use async_graphql::Request;

    fn recipes_resolver() -> Arc<ResolverClass> {
        Arc::new(
            ResolverClass::new("RecipesResolver")
                .kind(ResolverKind::Query)
                .method(ResolverMethodSpec::new(
                    "recipes",
                    TypeRef::named_nn_list_nn("Recipe"),
                    |_| {
                        FieldFuture::new(async {
                            let value = Value::from_json(json!([
                                {"id": "1", "title": "Pancakes"},
                                {"id": "2", "title": "Waffles"},
                            ]))
                            .unwrap();
                            Ok(Some(value))
                        })
                    },
                )),
        )
    }

    fn options_with_sdl(fragments: &[&str]) -> BuildSchemaOptions {
        BuildSchemaOptions {
            type_defs: fragments.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_merges_sdl_type_with_code_first_query() {
        let factory = SchemaFactory::new();
        let schema = factory
            .create(
                &[recipes_resolver()],
                &[],
                &options_with_sdl(&["type Recipe { id: ID! title: String! }"]),
            )
            .await
            .unwrap();

        let sdl = schema.sdl();
        assert!(sdl.contains("type Recipe"));
        assert!(sdl.contains("recipes: [Recipe!]!"));

        let response = schema
            .execute(Request::new("{ recipes { id title } }"))
            .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        let data = response.data.into_json().unwrap();
        assert_eq!(data["recipes"][1]["title"], "Waffles");
    }

    #[tokio::test]
    async fn test_sdl_declared_operation_gains_registered_handler() {
        let factory = SchemaFactory::new();
        let schema = factory
            .create(
                &[recipes_resolver()],
                &[],
                &options_with_sdl(&[r#"
                    type Recipe { id: ID! title: String! }
                    type Query { recipes: [Recipe!]! }
                "#]),
            )
            .await
            .unwrap();

        let response = schema.execute(Request::new("{ recipes { id } }")).await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
    }

    #[tokio::test]
    async fn test_missing_resolver_for_sdl_operation_fails_with_details() {
        let factory = SchemaFactory::new();
        let err = factory
            .create(
                &[],
                &[],
                &options_with_sdl(&[r#"
                    type Recipe { id: ID! }
                    type Query { recipes: [Recipe!]! }
                "#]),
            )
            .await
            .unwrap_err();

        let details = err.details().unwrap();
        let rendered = details.to_string();
        assert!(rendered.contains("no resolver defined for operation 'Query.recipes'"));
    }

    #[tokio::test]
    async fn test_skip_check_allows_missing_resolvers() {
        let factory = SchemaFactory::new();
        let options = BuildSchemaOptions {
            skip_check: true,
            ..options_with_sdl(&[r#"
                type Recipe { id: ID! }
                type Query { recipes: [Recipe!]! }
            "#])
        };
        assert!(factory.create(&[], &[], &options).await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_schema_requires_a_query() {
        let factory = SchemaFactory::new();
        let err = factory
            .create(&[], &[], &BuildSchemaOptions::default())
            .await
            .unwrap_err();
        assert!(
            err.details()
                .unwrap()
                .to_string()
                .contains("at least one query operation")
        );
    }

    #[tokio::test]
    async fn test_duplicate_type_across_sources_fails() {
        let factory = SchemaFactory::new();
        let err = factory
            .create(
                &[recipes_resolver()],
                &[TypeSpec::Object(ObjectSpec::new("Recipe").field(
                    FieldSpec::new("id", TypeRef::named_nn(TypeRef::ID)),
                ))],
                &options_with_sdl(&["type Recipe { id: ID! }"]),
            )
            .await
            .unwrap_err();

        assert!(
            err.details()
                .unwrap()
                .to_string()
                .contains("duplicate type name 'Recipe'")
        );
    }

    #[tokio::test]
    async fn test_interface_with_multiple_implementors_needs_resolver() {
        let factory = SchemaFactory::new();
        let fragments = r#"
            interface Node { id: ID! }
            type Recipe implements Node { id: ID! }
            type Direction implements Node { id: ID! }
        "#;

        let err = factory
            .create(&[recipes_resolver()], &[], &options_with_sdl(&[
                fragments,
                "type Recipe2 { id: ID! }",
            ]))
            .await
            .unwrap_err();
        assert!(
            err.details()
                .unwrap()
                .to_string()
                .contains("interface 'Node' has 2 implementors")
        );
    }

    #[tokio::test]
    async fn test_interface_values_narrow_through_type_resolver() {
        let node_resolver = Arc::new(
            ResolverClass::new("NodeResolver")
                .kind(ResolverKind::Query)
                .method(ResolverMethodSpec::new(
                    "node",
                    TypeRef::named_nn("Node"),
                    |_| {
                        FieldFuture::new(async {
                            let value =
                                Value::from_json(json!({"id": "1", "title": "Pancakes"})).unwrap();
                            Ok(Some(FieldValue::value(value).with_type("Recipe".to_string())))
                        })
                    },
                )),
        );

        let interface = InterfaceSpec::new("Node")
            .field(FieldSpec::new("id", TypeRef::named_nn(TypeRef::ID)))
            .resolve_type(|_| Some("Recipe".to_string()));

        let factory = SchemaFactory::new();
        let schema = factory
            .create(
                &[node_resolver],
                &[TypeSpec::Interface(interface)],
                &options_with_sdl(&[r#"
                    type Recipe implements Node { id: ID! title: String! }
                    type Direction implements Node { id: ID! }
                "#]),
            )
            .await
            .unwrap();

        let response = schema
            .execute(Request::new("{ node { __typename id } }"))
            .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        let data = response.data.into_json().unwrap();
        assert_eq!(data["node"]["__typename"], "Recipe");
    }

    #[tokio::test]
    async fn test_scalars_map_and_sdl_scalars_are_registered() {
        let factory = SchemaFactory::new();
        let mut options = options_with_sdl(&["scalar Upload", "type Query { ping: String }"]);
        options.skip_check = true;
        options
            .scalars_map
            .insert("DateTime".to_string(), ScalarDefinition::new("DateTime"));

        let schema = factory.create(&[], &[], &options).await.unwrap();
        let sdl = schema.sdl();
        assert!(sdl.contains("scalar DateTime"));
        assert!(sdl.contains("scalar Upload"));
    }

    #[tokio::test]
    async fn test_directive_registry_first_definition_wins() {
        let factory = SchemaFactory::new();
        let mut options = options_with_sdl(&[
            "directive @cacheControl(maxAge: Int) on FIELD_DEFINITION",
            "type Query { ping: String }",
        ]);
        options.skip_check = true;
        options.directives.push(
            DirectiveDefinition::new("cacheControl")
                .description("from options")
                .location(crate::directives::DirectiveLocation::Object),
        );

        let schema = factory.create(&[], &[], &options).await.unwrap();
        assert_eq!(schema.directives().len(), 1);
        assert_eq!(
            schema.directives()[0].description.as_deref(),
            Some("from options")
        );
        assert!(schema.sdl().contains("directive @cacheControl"));
    }

    #[tokio::test]
    async fn test_field_resolver_overrides_property_lookup() {
        let resolver = Arc::new(
            ResolverClass::new("RecipesResolver")
                .kind(ResolverKind::Query)
                .method(ResolverMethodSpec::new(
                    "recipe",
                    TypeRef::named_nn("Recipe"),
                    |_| {
                        FieldFuture::new(async {
                            let value =
                                Value::from_json(json!({"id": "1", "title": "pancakes"})).unwrap();
                            Ok(Some(value))
                        })
                    },
                ))
                .method(
                    ResolverMethodSpec::new(
                        "title",
                        TypeRef::named_nn(TypeRef::STRING),
                        |ctx| {
                            FieldFuture::new(async move {
                                let Some(Value::Object(parent)) = ctx.parent_value.as_value()
                                else {
                                    return Ok(None);
                                };
                                let raw = parent
                                    .get("title")
                                    .and_then(|v| match v {
                                        Value::String(s) => Some(s.clone()),
                                        _ => None,
                                    })
                                    .unwrap_or_default();
                                Ok(Some(Value::String(raw.to_uppercase())))
                            })
                        },
                    )
                    .field_resolver("Recipe"),
                ),
        );

        let factory = SchemaFactory::new();
        let schema = factory
            .create(
                &[resolver],
                &[],
                &options_with_sdl(&["type Recipe { id: ID! title: String! }"]),
            )
            .await
            .unwrap();

        let response = schema
            .execute(Request::new("{ recipe { id title } }"))
            .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        let data = response.data.into_json().unwrap();
        assert_eq!(data["recipe"]["title"], "PANCAKES");
        assert_eq!(data["recipe"]["id"], "1");
    }

    #[tokio::test]
    async fn test_enum_spec_registered() {
        let factory = SchemaFactory::new();
        let mut options = options_with_sdl(&["type Query { ping: String }"]);
        options.skip_check = true;

        let schema = factory
            .create(
                &[],
                &[TypeSpec::Enum(
                    EnumSpec::new("Status").value("DRAFT").value("PUBLISHED"),
                )],
                &options,
            )
            .await
            .unwrap();
        let sdl = schema.sdl();
        assert!(sdl.contains("enum Status"));
        assert!(sdl.contains("DRAFT"));
    }
}
