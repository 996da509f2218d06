/// Error returned by the assembler.
///
/// Failures writing the artifact are reported as
/// [`BuildError::Output`](aw_site::BuildError::Output) by
/// [`write_artifact`](crate::write_artifact).
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    /// The embedded data island could not be serialized.
    #[error("Cannot serialize wiki data: {0}")]
    Serialize(#[from] serde_json::Error),
}
