//! Atom Wiki CLI - compiles a folder of markdown files into one HTML page.
//!
//! Provides commands for:
//! - `build`: Write the single-page wiki
//! - `check`: Report broken links and skipped files without writing anything

mod commands;
mod error;
mod output;
mod project;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, CheckArgs};
use output::Output;

/// Atom Wiki - single-page wiki compiler.
#[derive(Parser)]
#[command(name = "atomwiki", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a markdown folder into one HTML file.
    Build(BuildArgs),
    /// Check a markdown folder for broken links.
    Check(CheckArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Build(args) => args.verbose,
        Commands::Check(args) => args.verbose,
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Check(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_build_flags() {
        let cli = Cli::try_parse_from([
            "atomwiki",
            "build",
            "notes",
            "-o",
            "out.html",
            "--hide-toc",
            "--verbose",
        ])
        .unwrap();

        let Commands::Build(args) = cli.command else {
            panic!("expected build command");
        };
        assert!(args.verbose);
    }

    #[test]
    fn test_check_rejects_output_flag() {
        assert!(Cli::try_parse_from(["atomwiki", "check", "-o", "out.html"]).is_err());
    }
}
