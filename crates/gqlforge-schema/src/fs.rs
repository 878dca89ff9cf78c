//! Scoped file-system access for schema artifacts.

use std::path::Path;

use crate::error::SchemaError;

/// Writes UTF-8 text files, creating parent directories as needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemHelper;

impl FileSystemHelper {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Writes `contents` to `path`, creating missing parent directories.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Io` when directory creation or the write
    /// fails; there is no partial-success mode.
    pub async fn write_utf8(&self, path: &Path, contents: &str) -> Result<(), SchemaError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await?;
        Ok(())
    }
}
