//! OCR domain — the external text-recognition boundary.
//!
//! The engine is a collaborator, not part of this crate's logic: it takes
//! PNG bytes and returns plain text. Everything downstream only sees
//! `OcrOutput`. The shipped implementation drives the Tesseract CLI;
//! tests substitute a stub.

pub mod tesseract;

pub use tesseract::TesseractEngine;

use crate::error::OcrError;
use std::future::Future;

/// Result of one recognition call, with metadata for logging and the
/// scan report.
#[derive(Debug, Clone)]
pub struct OcrOutput {
    /// Recognized text. Possibly empty, never null.
    pub text: String,
    pub char_count: usize,
    pub latency_ms: u64,
}

impl OcrOutput {
    pub fn from_text(text: String, latency_ms: u64) -> Self {
        let char_count = text.chars().count();
        Self { text, char_count, latency_ms }
    }
}

/// Asynchronous recognition contract.
///
/// A handle is acquired once per session and reused across scans;
/// acquisition failure is reported separately (see
/// [`OcrError::EngineUnavailable`]).
pub trait OcrEngine: Send + Sync {
    fn recognize(
        &self,
        png_bytes: Vec<u8>,
    ) -> impl Future<Output = Result<OcrOutput, OcrError>> + Send;
}
