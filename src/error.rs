//! Scan error taxonomy.
//!
//! Only engine-level failures are terminal for a scan attempt. An
//! extraction miss is an absent field in the record, never an error —
//! see `label::extract`.

use thiserror::Error;

/// Errors surfaced by the scan pipeline.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Precondition failure — raised before the engine is ever invoked.
    #[error("no image available — load or capture one first")]
    NoImage,

    /// A scan is already outstanding. Two recognitions would race against
    /// the shared session image, so the second request is rejected.
    #[error("a scan is already in progress")]
    ScanInProgress,

    /// The supplied bytes or data URL could not be decoded as an image.
    #[error("invalid image data: {0}")]
    InvalidImage(String),

    /// The OCR engine boundary failed; see [`OcrError`].
    #[error(transparent)]
    Ocr(#[from] OcrError),
}

/// Errors from the external OCR engine.
///
/// Acquisition and recognition are distinct kinds: a missing engine is a
/// setup problem the caller can fix, a failed recognition is a per-scan
/// problem answered with a manual re-scan.
#[derive(Debug, Error)]
pub enum OcrError {
    /// The engine could not be acquired (binary missing, spawn denied).
    #[error("OCR engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The engine was acquired but a recognition call failed or timed out.
    #[error("text recognition failed: {0}")]
    Recognition(String),
}
