//! Tesseract CLI engine.
//!
//! The binary is located once at acquisition and the handle reused for
//! the whole session. Each recognition spawns
//! `tesseract stdin stdout -l <lang>` with the PNG piped through stdio —
//! no temp files — bounded by the configured timeout.

use crate::config::ScannerConfig;
use crate::error::OcrError;
use crate::ocr::{OcrEngine, OcrOutput};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;

#[derive(Debug)]
pub struct TesseractEngine {
    binary: PathBuf,
    lang: String,
    timeout: Duration,
}

impl TesseractEngine {
    /// Locate the tesseract binary and prepare a reusable engine handle.
    ///
    /// Failure here is `EngineUnavailable` — a setup problem, distinct
    /// from a failed recognition which is answered with a re-scan.
    pub fn acquire(config: &ScannerConfig) -> Result<Self, OcrError> {
        let candidate = config.tesseract_bin.as_deref().unwrap_or("tesseract");
        let binary = which::which(candidate).map_err(|e| {
            OcrError::EngineUnavailable(format!("'{}' not found: {}", candidate, e))
        })?;
        log::info!("[OCR] Engine acquired: {}", binary.display());
        Ok(Self {
            binary,
            lang: config.ocr_lang.clone(),
            timeout: Duration::from_secs(config.ocr_timeout_secs),
        })
    }
}

impl OcrEngine for TesseractEngine {
    async fn recognize(&self, png_bytes: Vec<u8>) -> Result<OcrOutput, OcrError> {
        let start = Instant::now();

        let mut cmd = tokio::process::Command::new(&self.binary);
        cmd.args(["stdin", "stdout", "-l"])
            .arg(&self.lang)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .map_err(|e| OcrError::Recognition(format!("failed to spawn engine: {}", e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| OcrError::Recognition("no stdin on engine process".to_string()))?;

        // Write the image, close stdin so the engine starts, collect output.
        // The child is killed on drop, so a timeout also reaps the process.
        let run = async {
            stdin
                .write_all(&png_bytes)
                .await
                .map_err(|e| OcrError::Recognition(format!("stdin write failed: {}", e)))?;
            drop(stdin);
            child
                .wait_with_output()
                .await
                .map_err(|e| OcrError::Recognition(format!("engine wait failed: {}", e)))
        };

        let output = tokio::time::timeout(self.timeout, run).await.map_err(|_| {
            OcrError::Recognition(format!(
                "engine timed out after {}s",
                self.timeout.as_secs()
            ))
        })??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Recognition(format!(
                "engine exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).to_string();
        let result = OcrOutput::from_text(text, start.elapsed().as_millis() as u64);
        log::info!(
            "[OCR] Extracted {} chars in {}ms",
            result.char_count,
            result.latency_ms
        );
        Ok(result)
    }
}
