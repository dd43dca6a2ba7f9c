use thiserror::Error;

/// Hard failures when producing output files.
///
/// Everything recoverable (missing source data, degraded records, failed
/// sidecar writes) is reported through the document's message log instead.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize document JSON: {0}")]
    Json(#[from] serde_json::Error),
}
