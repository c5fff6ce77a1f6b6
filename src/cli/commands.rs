use std::path::{Path, PathBuf};
use std::sync::Arc;

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::services::UpdateService;
use crate::cli::args::Cli;
use crate::cli::output;
use crate::cli::CliResult;
use crate::config::{RunConfig, Settings};
use crate::infrastructure::RealFileSystem;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load()?;
    let config = build_run_config(&settings, cli);
    debug!("run config: {:?}", config);

    match cli.files.as_slice() {
        // Completion generation only, handled in main
        [] => Ok(()),
        [single] => _show(single, config),
        [source, targets @ ..] => _update(source, targets, config),
    }
}

/// Resolve the run configuration: CLI flags win over settings.
fn build_run_config(settings: &Settings, cli: &Cli) -> RunConfig {
    let mut config = RunConfig::from_settings(settings);
    if cli.lang.is_some() {
        config.lang = cli.lang.clone();
    }
    if let Some(source_type) = &cli.source_type {
        config.source_xref_type = source_type.clone();
    }
    if let Some(target_type) = &cli.target_type {
        config.target_xref_type = target_type.clone();
    }
    if !cli.copy_from.is_empty() {
        config.copy_from = cli.copy_from.clone();
    }
    config
}

#[instrument(skip(config))]
fn _show(path: &Path, config: RunConfig) -> CliResult<()> {
    debug!("show: {}", path.display());
    let service = UpdateService::new(Arc::new(RealFileSystem), config);
    let pretty = service.show(path)?;
    print!("{}", pretty);
    Ok(())
}

#[instrument(skip(config))]
fn _update(source: &Path, targets: &[PathBuf], config: RunConfig) -> CliResult<()> {
    let service = UpdateService::new(Arc::new(RealFileSystem), config);
    let source_db = service.load_source(source)?;
    let lang = service.resolve_lang(&source_db)?;

    let file_list = targets.iter().map(|t| t.display().to_string()).join("\n");
    output::info(&format!(
        "Taking \"{}\" lexemes from \"{}\" to update glosses in:\n{}",
        lang,
        source.display(),
        file_list
    ));

    for target in targets {
        let written = service.update_target(&source_db, &lang, target)?;
        output::action("Saved", &written.display());
    }
    Ok(())
}
