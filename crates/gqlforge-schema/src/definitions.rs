//! Typed-definitions artifact generation.
//!
//! From a printed SDL document this module generates a Rust source file
//! describing the schema's types: serde-derive structs (or accessor traits)
//! for object types, traits for interfaces, enums for enum types, and
//! aliases for scalars and unions. The artifact is written through the
//! file-system helper and begins with a fixed generated-file header.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::PathBuf;

use async_graphql_parser::parse_schema;
use async_graphql_parser::types::{BaseType, Type, TypeKind, TypeSystemDefinition};

use crate::error::SchemaError;
use crate::fs::FileSystemHelper;

/// Header prepended to every generated definitions file.
pub const DEFINITIONS_FILE_HEADER: &str = "\
// ------------------------------------------------------
// THIS FILE WAS AUTOMATICALLY GENERATED (DO NOT MODIFY)
// ------------------------------------------------------

";

/// How object types are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputAs {
    /// Owned structs with serde derives.
    #[default]
    Structs,
    /// Accessor traits.
    Traits,
}

/// Options for definitions generation.
#[derive(Debug, Clone)]
pub struct DefinitionsOptions {
    /// Output path for the generated Rust source file.
    pub path: PathBuf,
    /// Rendering style for object types.
    pub output_as: OutputAs,
}

impl DefinitionsOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            output_as: OutputAs::default(),
        }
    }

    #[must_use]
    pub fn output_as(mut self, output_as: OutputAs) -> Self {
        self.output_as = output_as;
        self
    }
}

/// Generates the typed-definitions artifact from printed SDL.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefinitionsGenerator {
    fs: FileSystemHelper,
}

impl DefinitionsGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders the definitions and writes them to the configured path.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Parse` when the SDL cannot be parsed and
    /// `SchemaError::Io` when the write fails.
    pub async fn generate(&self, sdl: &str, options: &DefinitionsOptions) -> Result<(), SchemaError> {
        let source = render_definitions(sdl, options.output_as)?;
        self.fs.write_utf8(&options.path, &source).await
    }
}

struct RenderContext {
    enums: HashSet<String>,
    data_types: HashSet<String>,
    root_types: HashSet<String>,
}

/// Renders the Rust definitions source for an SDL document.
///
/// # Errors
///
/// Returns `SchemaError::Parse` when the SDL is not valid.
pub fn render_definitions(sdl: &str, output_as: OutputAs) -> Result<String, SchemaError> {
    let document = parse_schema(sdl).map_err(|e| SchemaError::Parse(e.to_string()))?;

    let mut ctx = RenderContext {
        enums: HashSet::new(),
        data_types: HashSet::new(),
        root_types: ["Query", "Mutation", "Subscription"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    };

    // First pass: classify names so field types can be mapped.
    for definition in &document.definitions {
        match definition {
            TypeSystemDefinition::Schema(schema) => {
                let schema = &schema.node;
                for root in [&schema.query, &schema.mutation, &schema.subscription]
                    .into_iter()
                    .flatten()
                {
                    ctx.root_types.insert(root.node.to_string());
                }
            }
            TypeSystemDefinition::Type(ty) => {
                let name = ty.node.name.node.to_string();
                match &ty.node.kind {
                    TypeKind::Enum(_) => {
                        ctx.enums.insert(name);
                    }
                    TypeKind::Object(_) | TypeKind::InputObject(_) => {
                        ctx.data_types.insert(name);
                    }
                    // Interfaces, unions, and custom scalars surface as
                    // untyped JSON in the generated definitions.
                    _ => {}
                }
            }
            TypeSystemDefinition::Directive(_) => {}
        }
    }

    let mut out = String::from(DEFINITIONS_FILE_HEADER);

    for definition in &document.definitions {
        let TypeSystemDefinition::Type(ty) = definition else {
            continue;
        };
        let ty = &ty.node;
        let name = ty.name.node.to_string();
        if ctx.root_types.contains(&name) || name.starts_with("__") {
            continue;
        }
        let description = ty.description.as_ref().map(|d| d.node.clone());

        match &ty.kind {
            TypeKind::Scalar => {
                render_doc(&mut out, description.as_deref());
                let _ = writeln!(out, "pub type {name} = serde_json::Value;\n");
            }
            TypeKind::Object(object) => match output_as {
                OutputAs::Structs => {
                    render_doc(&mut out, description.as_deref());
                    let _ = writeln!(
                        out,
                        "#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]"
                    );
                    let _ = writeln!(out, "pub struct {name} {{");
                    for field in &object.fields {
                        render_struct_field(
                            &mut out,
                            &field.node.name.node,
                            &field.node.ty.node,
                            &ctx,
                        );
                    }
                    let _ = writeln!(out, "}}\n");
                }
                OutputAs::Traits => {
                    render_trait(&mut out, &name, description.as_deref(), &object.fields, &ctx);
                }
            },
            TypeKind::Interface(interface) => {
                render_trait(
                    &mut out,
                    &name,
                    description.as_deref(),
                    &interface.fields,
                    &ctx,
                );
            }
            TypeKind::Union(union) => {
                let members: Vec<String> =
                    union.members.iter().map(|m| m.node.to_string()).collect();
                render_doc(&mut out, description.as_deref());
                let _ = writeln!(out, "/// One of: {}.", members.join(", "));
                let _ = writeln!(out, "pub type {name} = serde_json::Value;\n");
            }
            TypeKind::Enum(en) => {
                render_doc(&mut out, description.as_deref());
                let _ = writeln!(
                    out,
                    "#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]"
                );
                let _ = writeln!(out, "pub enum {name} {{");
                for value in &en.values {
                    let raw = value.node.value.node.to_string();
                    let variant = pascal_case(&raw);
                    if variant != raw {
                        let _ = writeln!(out, "    #[serde(rename = \"{raw}\")]");
                    }
                    let _ = writeln!(out, "    {variant},");
                }
                let _ = writeln!(out, "}}\n");
            }
            TypeKind::InputObject(input) => {
                render_doc(&mut out, description.as_deref());
                let _ = writeln!(
                    out,
                    "#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]"
                );
                let _ = writeln!(out, "pub struct {name} {{");
                for field in &input.fields {
                    render_struct_field(&mut out, &field.node.name.node, &field.node.ty.node, &ctx);
                }
                let _ = writeln!(out, "}}\n");
            }
        }
    }

    Ok(out)
}

fn render_trait(
    out: &mut String,
    name: &str,
    description: Option<&str>,
    fields: &[async_graphql_parser::Positioned<async_graphql_parser::types::FieldDefinition>],
    ctx: &RenderContext,
) {
    render_doc(out, description);
    let _ = writeln!(out, "pub trait {name} {{");
    for field in fields {
        let method = escape_keyword(&snake_case(&field.node.name.node));
        let rust_ty = rust_type(&field.node.ty.node, ctx);
        let _ = writeln!(out, "    fn {method}(&self) -> {rust_ty};");
    }
    let _ = writeln!(out, "}}\n");
}

fn render_struct_field(out: &mut String, graphql_name: &str, ty: &Type, ctx: &RenderContext) {
    let rust_name = snake_case(graphql_name);
    if rust_name != graphql_name {
        let _ = writeln!(out, "    #[serde(rename = \"{graphql_name}\")]");
    }
    let rust_name = escape_keyword(&rust_name);
    let rust_ty = rust_type(ty, ctx);
    let _ = writeln!(out, "    pub {rust_name}: {rust_ty},");
}

fn render_doc(out: &mut String, description: Option<&str>) {
    if let Some(description) = description {
        for line in description.lines() {
            let _ = writeln!(out, "/// {line}");
        }
    }
}

fn rust_type(ty: &Type, ctx: &RenderContext) -> String {
    let inner = match &ty.base {
        BaseType::Named(name) => match name.as_str() {
            "Int" => "i32".to_string(),
            "Float" => "f64".to_string(),
            "Boolean" => "bool".to_string(),
            "String" | "ID" => "String".to_string(),
            other if ctx.enums.contains(other) || ctx.data_types.contains(other) => {
                other.to_string()
            }
            _ => "serde_json::Value".to_string(),
        },
        BaseType::List(inner) => format!("Vec<{}>", rust_type(inner, ctx)),
    };
    if ty.nullable {
        format!("Option<{inner}>")
    } else {
        inner
    }
}

fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let chars: Vec<char> = name.chars().collect();
    for (index, c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev_lower = index > 0 && (chars[index - 1].is_lowercase() || chars[index - 1].is_ascii_digit());
            let next_lower = chars.get(index + 1).is_some_and(|n| n.is_lowercase());
            if index > 0 && (prev_lower || (chars[index - 1].is_uppercase() && next_lower)) {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(*c);
        }
    }
    out
}

fn pascal_case(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect()
}

fn escape_keyword(name: &str) -> String {
    const KEYWORDS: &[&str] = &[
        "type", "ref", "use", "move", "fn", "impl", "mod", "match", "loop", "else", "if",
        "struct", "enum", "trait", "box", "async", "await", "in", "for", "where", "pub",
    ];
    if KEYWORDS.contains(&name) {
        format!("r#{name}")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECIPE_SDL: &str = r#"
        "a recipe"
        type Recipe {
            id: ID!
            title: String!
            description: String
            creationDate: DateTime!
            tags: [String!]!
            status: Status!
        }

        enum Status { DRAFT IN_PROGRESS PUBLISHED }

        scalar DateTime

        input RecipeFilter {
            type: String
            maxCount: Int
        }

        type Query { recipes: [Recipe!]! }
    "#;

    #[test]
    fn test_render_structs() {
        let source = render_definitions(RECIPE_SDL, OutputAs::Structs).unwrap();

        assert!(source.starts_with(DEFINITIONS_FILE_HEADER));
        assert!(source.contains("pub struct Recipe {"));
        assert!(source.contains("pub id: String,"));
        assert!(source.contains("pub description: Option<String>,"));
        assert!(source.contains("#[serde(rename = \"creationDate\")]"));
        assert!(source.contains("pub creation_date: serde_json::Value,"));
        assert!(source.contains("pub tags: Vec<String>,"));
        assert!(source.contains("pub status: Status,"));
        // Root operation types are not rendered.
        assert!(!source.contains("pub struct Query"));
    }

    #[test]
    fn test_render_enum_variants() {
        let source = render_definitions(RECIPE_SDL, OutputAs::Structs).unwrap();

        assert!(source.contains("pub enum Status {"));
        assert!(source.contains("#[serde(rename = \"DRAFT\")]"));
        assert!(source.contains("    Draft,"));
        assert!(source.contains("    InProgress,"));
    }

    #[test]
    fn test_render_input_with_keyword_field() {
        let source = render_definitions(RECIPE_SDL, OutputAs::Structs).unwrap();

        assert!(source.contains("pub struct RecipeFilter {"));
        assert!(source.contains("pub r#type: Option<String>,"));
        assert!(source.contains("pub max_count: Option<i32>,"));
    }

    #[test]
    fn test_render_traits() {
        let source = render_definitions(RECIPE_SDL, OutputAs::Traits).unwrap();

        assert!(source.contains("pub trait Recipe {"));
        assert!(source.contains("fn title(&self) -> String;"));
        assert!(source.contains("fn creation_date(&self) -> serde_json::Value;"));
        // Inputs stay structs even in trait mode.
        assert!(source.contains("pub struct RecipeFilter {"));
    }

    #[test]
    fn test_render_interface_as_trait() {
        let source = render_definitions(
            "interface Node { id: ID! }\ntype Query { ping: String }",
            OutputAs::Structs,
        )
        .unwrap();
        assert!(source.contains("pub trait Node {"));
        assert!(source.contains("fn id(&self) -> String;"));
    }

    #[test]
    fn test_scalar_alias() {
        let source = render_definitions(RECIPE_SDL, OutputAs::Structs).unwrap();
        assert!(source.contains("pub type DateTime = serde_json::Value;"));
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("creationDate"), "creation_date");
        assert_eq!(snake_case("URLValue"), "url_value");
        assert_eq!(snake_case("already_snake"), "already_snake");
        assert_eq!(snake_case("id"), "id");
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("IN_PROGRESS"), "InProgress");
        assert_eq!(pascal_case("DRAFT"), "Draft");
    }

    #[tokio::test]
    async fn test_generate_writes_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("generated/definitions.rs");

        DefinitionsGenerator::new()
            .generate(
                RECIPE_SDL,
                &DefinitionsOptions::new(&path).output_as(OutputAs::Structs),
            )
            .await
            .unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.starts_with(DEFINITIONS_FILE_HEADER));
        assert!(contents.contains("pub struct Recipe"));
    }
}
