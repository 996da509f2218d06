//! `atomwiki build` command implementation.

use std::path::PathBuf;

use aw_bundle::{assemble, write_artifact};
use aw_config::{CliSettings, Config, TocVisibility};
use aw_site::GraphBuilder;
use aw_storage_fs::FsStorage;
use clap::Args;

use crate::error::CliError;
use crate::output::Output;
use crate::project::Project;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Markdown folder to compile (overrides config).
    input: Option<PathBuf>,

    /// Output HTML file (overrides config).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover atomwiki.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Omit the table of contents panel.
    #[arg(long)]
    hide_toc: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.input,
            output_file: self.output,
            table_of_contents: self.hide_toc.then_some(TocVisibility::Hide),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let project = Project::from_config(config);

        output.info(&format!("Source: {}", project.source_dir.display()));
        output.info(&format!("Output: {}", project.output_file.display()));

        let storage = FsStorage::new(project.source_dir.clone());
        let (graph, report) = GraphBuilder::new(&storage)
            .with_options(project.build)
            .build()?;
        output.report(&report);

        let html = assemble(&graph, &project.assembler)?;
        write_artifact(&project.output_file, &html)?;

        output.success(&format!(
            "Wiki built successfully to {}",
            project.output_file.display()
        ));
        Ok(())
    }
}
