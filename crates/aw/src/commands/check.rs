//! `atomwiki check` command implementation.

use std::path::PathBuf;

use aw_config::{CliSettings, Config};
use aw_site::GraphBuilder;
use aw_storage_fs::FsStorage;
use clap::Args;

use crate::error::CliError;
use crate::output::Output;
use crate::project::Project;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Markdown folder to check (overrides config).
    input: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover atomwiki.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl CheckArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.input,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let project = Project::from_config(config);

        output.info(&format!("Checking {}", project.source_dir.display()));

        let storage = FsStorage::new(project.source_dir);
        let (_, report) = GraphBuilder::new(&storage)
            .with_options(project.build)
            .build()?;
        output.report(&report);

        let unresolved = report.unresolved_links();
        if unresolved > 0 {
            return Err(CliError::UnresolvedLinks(unresolved));
        }

        output.success("No broken links found");
        Ok(())
    }
}
