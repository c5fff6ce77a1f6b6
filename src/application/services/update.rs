//! Update pipeline orchestration
//!
//! One run loads the source database once and processes each target file
//! independently against it: load target, correlate ids, merge candidate
//! glosses, serialize to a new file. The source tree is shared read-only
//! across targets; nothing is written until a target is fully merged.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::services::{correlator, merger, LoaderService};
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::RunConfig;
use crate::domain::{xml, DomainError, LexicalDatabase};
use crate::infrastructure::traits::FileSystem;
use crate::util::path::updated_file_name;

/// Service running the load/correlate/merge/serialize pipeline.
pub struct UpdateService {
    fs: Arc<dyn FileSystem>,
    loader: LoaderService,
    config: RunConfig,
}

impl UpdateService {
    pub fn new(fs: Arc<dyn FileSystem>, config: RunConfig) -> Self {
        let loader = LoaderService::new(fs.clone());
        Self { fs, loader, config }
    }

    /// Load the source database for a run.
    pub fn load_source(&self, path: &Path) -> ApplicationResult<LexicalDatabase> {
        self.loader.load(path)
    }

    /// The language glosses are copied in: the configured one, or the
    /// source's headword language when none was configured.
    pub fn resolve_lang(&self, source: &LexicalDatabase) -> ApplicationResult<String> {
        if let Some(lang) = &self.config.lang {
            return Ok(lang.clone());
        }
        source
            .headword_lang()
            .map(ToOwned::to_owned)
            .ok_or_else(|| {
                DomainError::Schema {
                    path: source.path().to_path_buf(),
                    message: "no entry with a lexical-unit form to infer the language from"
                        .to_string(),
                }
                .into()
            })
    }

    /// Update one target file against the loaded source. Returns the path
    /// of the newly written file; the original target is left untouched.
    #[instrument(skip(self, source))]
    pub fn update_target(
        &self,
        source: &LexicalDatabase,
        lang: &str,
        target_path: &Path,
    ) -> ApplicationResult<PathBuf> {
        let mut target = self.loader.load(target_path)?;

        let ids = correlator::find_cross_reference_ids(&target, &self.config.target_xref_type);

        // Ids without any candidate text are left out of the map entirely,
        // so the merger never touches their senses.
        let mut candidates: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for id in &ids {
            print!(".");
            std::io::stdout().flush().ok();
            let texts = correlator::collect_candidate_text(
                source,
                id,
                &self.config.source_xref_type,
                lang,
                &self.config.copy_from,
            );
            if !texts.is_empty() {
                candidates.insert(id.clone(), texts);
            }
        }
        println!();
        debug!(
            "{}: {} of {} ids have candidates",
            target_path.display(),
            candidates.len(),
            ids.len()
        );

        let stamp = merger::current_stamp();
        merger::merge_candidates(
            &mut target,
            &self.config.target_xref_type,
            lang,
            &candidates,
            &stamp,
        );

        let bytes = xml::to_pretty_bytes(target.document()).map_err(|e| {
            ApplicationError::OperationFailed {
                context: format!("serialize {}", target_path.display()),
                source: Box::new(e),
            }
        })?;

        let outfile = updated_file_name(target_path, lang);
        self.fs
            .write_atomic(&outfile, &bytes)
            .map_err(|e| ApplicationError::OperationFailed {
                context: format!("write {}", outfile.display()),
                source: Box::new(e),
            })?;

        Ok(outfile)
    }

    /// Pretty-print one file's contents (single-file mode).
    pub fn show(&self, path: &Path) -> ApplicationResult<String> {
        let db = self.loader.load(path)?;
        let bytes = xml::to_pretty_bytes(db.document()).map_err(|e| {
            ApplicationError::OperationFailed {
                context: format!("serialize {}", path.display()),
                source: Box::new(e),
            }
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
