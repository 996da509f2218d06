//! CLI error types.

use aw_bundle::BundleError;
use aw_config::ConfigError;
use aw_site::BuildError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("{0}")]
    Bundle(#[from] BundleError),

    #[error("Found {0} unresolved link(s)")]
    UnresolvedLinks(usize),
}
