//! Lexicon file loader
//!
//! Reads a LIFT export into a [`LexicalDatabase`], failing fast with a
//! path-carrying error when the file is missing or not well-formed.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{xml, DomainError, LexicalDatabase};
use crate::infrastructure::traits::FileSystem;

/// Service for loading lexicon exports from disk.
pub struct LoaderService {
    fs: Arc<dyn FileSystem>,
}

impl LoaderService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Load one export. Entry, sense, field, and attribute order are
    /// preserved verbatim so serialized output stays diff-able.
    pub fn load(&self, path: &Path) -> ApplicationResult<LexicalDatabase> {
        debug!("load: {}", path.display());

        // Check existence first for a clear error message
        if !self.fs.exists(path) {
            return Err(DomainError::FileNotFound(path.to_path_buf()).into());
        }

        let content =
            self.fs
                .read_to_string(path)
                .map_err(|e| ApplicationError::OperationFailed {
                    context: format!("read {}", path.display()),
                    source: Box::new(e),
                })?;

        let doc = xml::parse(&content).map_err(|e| DomainError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        debug!(
            "load: {} parsed, root <{}>",
            path.display(),
            doc.root.name
        );
        Ok(LexicalDatabase::new(path.to_path_buf(), doc))
    }
}
