//! Schema builder.
//!
//! Wraps the factory with the concerns around one build: injecting the
//! scalar registry's map, optionally serializing the result to an SDL file
//! with a generated-file header, and the federation-aware variant that
//! prepends the specified directive set and relaxes resolver-coverage
//! checks (federated fields may be resolved by external reference
//! resolvers).

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, error};

use crate::directives::specified_directives;
use crate::error::SchemaError;
use crate::factory::{AssembledSchema, SchemaFactory};
use crate::fs::FileSystemHelper;
use crate::options::BuildSchemaOptions;
use crate::provider::ResolverClass;
use crate::scalars::ScalarRegistry;
use crate::types::TypeSpec;

/// Header prepended to every generated SDL file.
pub const SDL_FILE_HEADER: &str = "\
# ------------------------------------------------------
# THIS FILE WAS AUTOMATICALLY GENERATED (DO NOT MODIFY)
# ------------------------------------------------------

";

/// Where, if anywhere, the built schema is written as SDL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AutoSchemaFile {
    /// No file is written.
    #[default]
    Disabled,
    /// Write `schema.gql` in the process working directory.
    Default,
    /// Write to the given path.
    Path(PathBuf),
}

impl AutoSchemaFile {
    /// Returns the path to write, or `None` when disabled.
    #[must_use]
    pub fn resolve_path(&self) -> Option<PathBuf> {
        match self {
            Self::Disabled => None,
            Self::Default => Some(PathBuf::from("schema.gql")),
            Self::Path(path) => Some(path.clone()),
        }
    }
}

/// Builds schemas from the discovered providers and optionally persists
/// them as SDL.
pub struct SchemaBuilder {
    scalars: Arc<ScalarRegistry>,
    factory: SchemaFactory,
    fs: FileSystemHelper,
}

impl SchemaBuilder {
    #[must_use]
    pub fn new(scalars: Arc<ScalarRegistry>) -> Self {
        Self {
            scalars,
            factory: SchemaFactory::new(),
            fs: FileSystemHelper::new(),
        }
    }

    /// Builds a schema.
    ///
    /// The scalar registry's map replaces whatever the caller put in
    /// `options.scalars_map`; everything else in the options is taken as
    /// given. When `auto_schema_file` is not disabled the printed SDL,
    /// prefixed with [`SDL_FILE_HEADER`], is written to the resolved path.
    /// The schema is returned regardless of whether a file was written.
    ///
    /// # Errors
    ///
    /// Propagates factory errors unmodified and file-write failures as
    /// `SchemaError::Io`.
    pub async fn build(
        &self,
        auto_schema_file: &AutoSchemaFile,
        mut options: BuildSchemaOptions,
        resolvers: &[Arc<ResolverClass>],
        types: &[TypeSpec],
    ) -> Result<Arc<AssembledSchema>, SchemaError> {
        options.scalars_map = self.scalars.scalars_map();
        self.build_schema(resolvers, types, auto_schema_file, options)
            .await
    }

    /// Builds a federated schema.
    ///
    /// Identical to [`SchemaBuilder::build`] except the specified directive
    /// set is prepended ahead of any user directives and the
    /// resolver-coverage checks are skipped. Scalar and directive semantics
    /// are otherwise unchanged.
    ///
    /// # Errors
    ///
    /// Same as [`SchemaBuilder::build`].
    pub async fn build_federated(
        &self,
        auto_schema_file: &AutoSchemaFile,
        mut options: BuildSchemaOptions,
        resolvers: &[Arc<ResolverClass>],
        types: &[TypeSpec],
    ) -> Result<Arc<AssembledSchema>, SchemaError> {
        options.scalars_map = self.scalars.scalars_map();
        let mut directives = specified_directives();
        directives.extend(options.directives);
        options.directives = directives;
        options.skip_check = true;
        self.build_schema(resolvers, types, auto_schema_file, options)
            .await
    }

    async fn build_schema(
        &self,
        resolvers: &[Arc<ResolverClass>],
        types: &[TypeSpec],
        auto_schema_file: &AutoSchemaFile,
        options: BuildSchemaOptions,
    ) -> Result<Arc<AssembledSchema>, SchemaError> {
        let schema = match self.factory.create(resolvers, types, &options).await {
            Ok(schema) => schema,
            Err(err) => {
                if let Some(details) = err.details() {
                    error!(details = %details, "schema build failed");
                }
                return Err(err);
            }
        };

        if let Some(path) = auto_schema_file.resolve_path() {
            let contents = format!("{SDL_FILE_HEADER}{}", schema.sdl());
            self.fs.write_utf8(&path, &contents).await?;
            debug!(path = %path.display(), "schema file written");
        }

        Ok(Arc::new(schema))
    }
}
