//! Scan session state.
//!
//! One `ScanSession` per user session: it owns the acquired OCR engine,
//! the immutable allergy profile and BMI category, the last loaded image,
//! and the in-flight guard that keeps two recognitions from racing
//! against that image. Creation acquires the engine; dropping the session
//! releases it.

use crate::capture;
use crate::config::ScannerConfig;
use crate::error::ScanError;
use crate::label::{AllergyProfile, BmiCategory};
use crate::ocr::{OcrEngine, TesseractEngine};
use image::DynamicImage;
use std::sync::Mutex;

pub struct ScanSession<E: OcrEngine> {
    engine: E,
    config: ScannerConfig,
    profile: AllergyProfile,
    bmi: Option<BmiCategory>,
    /// Held between upload and scan so repeated scans reuse the image.
    image: Mutex<Option<DynamicImage>>,
    /// Taken for the duration of a scan; `try_lock` failure means a scan
    /// is already outstanding.
    scan_gate: tokio::sync::Mutex<()>,
}

impl ScanSession<TesseractEngine> {
    /// Open a session backed by the Tesseract CLI engine.
    ///
    /// Engine acquisition happens here, once; per-scan failures never
    /// re-acquire. `EngineUnavailable` means tesseract is not installed.
    pub fn open(
        config: ScannerConfig,
        profile: AllergyProfile,
        bmi: Option<BmiCategory>,
    ) -> Result<Self, ScanError> {
        let engine = TesseractEngine::acquire(&config)?;
        Ok(Self::with_engine(engine, config, profile, bmi))
    }
}

impl<E: OcrEngine> ScanSession<E> {
    /// Open a session with a caller-supplied engine (tests use a stub).
    pub fn with_engine(
        engine: E,
        config: ScannerConfig,
        profile: AllergyProfile,
        bmi: Option<BmiCategory>,
    ) -> Self {
        log::info!(
            "[SESSION] Opened — {} profile categories, bmi={:?}",
            profile.iter().count(),
            bmi
        );
        Self {
            engine,
            config,
            profile,
            bmi,
            image: Mutex::new(None),
            scan_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Load raw uploaded image bytes as the session's current image.
    pub fn load_image_bytes(&self, bytes: &[u8]) -> Result<(), ScanError> {
        let image = capture::decode_image_bytes(bytes)?;
        self.store(image);
        Ok(())
    }

    /// Load a `data:image/...;base64,` URL as the session's current image.
    pub fn load_data_url(&self, url: &str) -> Result<(), ScanError> {
        let image = capture::decode_data_url(url)?;
        self.store(image);
        Ok(())
    }

    fn store(&self, image: DynamicImage) {
        log::info!("[SESSION] Image loaded: {}x{}", image.width(), image.height());
        *self.image.lock().expect("image lock poisoned") = Some(image);
    }

    pub fn clear_image(&self) {
        *self.image.lock().expect("image lock poisoned") = None;
    }

    pub fn has_image(&self) -> bool {
        self.image.lock().expect("image lock poisoned").is_some()
    }

    pub fn profile(&self) -> &AllergyProfile {
        &self.profile
    }

    pub fn bmi(&self) -> Option<BmiCategory> {
        self.bmi
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    pub(crate) fn engine(&self) -> &E {
        &self.engine
    }

    /// Claim the scan gate or reject the request.
    pub(crate) fn begin_scan(&self) -> Result<tokio::sync::MutexGuard<'_, ()>, ScanError> {
        self.scan_gate.try_lock().map_err(|_| ScanError::ScanInProgress)
    }

    /// PNG bytes of the current image, or `NoImage` when nothing was
    /// loaded — checked before the engine is ever invoked.
    pub(crate) fn current_image_png(&self) -> Result<Vec<u8>, ScanError> {
        let guard = self.image.lock().expect("image lock poisoned");
        let image = guard.as_ref().ok_or(ScanError::NoImage)?;
        capture::to_png_bytes(image)
    }

    /// Explicit teardown boundary. The engine handle is released on drop;
    /// this exists so callers can end a session by name.
    pub fn close(self) {
        log::info!("[SESSION] Closed");
    }
}
