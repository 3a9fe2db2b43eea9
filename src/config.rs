//! Scanner configuration.
//!
//! Strategy knobs for the pipeline (extraction strategy, allergen mode,
//! classification scheme) plus OCR engine settings. Values are stored in
//! `~/.config/label-glass/config.json`; environment variables override
//! the file for the current process:
//!
//! - `SCAN_STRATEGY`     — "line-based" or "global-scan"
//! - `ALLERGEN_MODE`     — "keyword-pattern" or "substring"
//! - `CLASSIFY_SCHEME`   — "fixed-bands" or "bmi-relative"
//! - `OCR_TIMEOUT_SECS`  — per-recognition timeout
//! - `OCR_LANG`          — tesseract language code
//! - `TESSERACT_BIN`     — explicit engine binary path

use crate::label::{AllergenMode, ExtractStrategy, SchemeKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScannerConfig {
    pub extract_strategy: ExtractStrategy,
    pub allergen_mode: AllergenMode,
    pub classify_scheme: SchemeKind,
    pub ocr_timeout_secs: u64,
    pub ocr_lang: String,
    pub tesseract_bin: Option<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            extract_strategy: ExtractStrategy::default(),
            allergen_mode: AllergenMode::default(),
            classify_scheme: SchemeKind::default(),
            ocr_timeout_secs: 15,
            ocr_lang: "eng".to_string(),
            tesseract_bin: None,
        }
    }
}

/// Full path to the config file.
fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("label-glass")
        .join("config.json")
}

impl ScannerConfig {
    /// Load the stored config (default on missing/invalid file), then
    /// apply environment overrides.
    pub fn resolve() -> Self {
        let mut config = Self::load_from(&config_path());
        config.apply_env_overrides();
        config
    }

    fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Persist to the config file, creating the directory if needed.
    pub fn save(&self) -> Result<(), String> {
        self.save_to(&config_path())
    }

    fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .map_err(|e| format!("Failed to create config dir: {}", e))?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        std::fs::write(path, json).map_err(|e| format!("Failed to write config: {}", e))?;
        log::info!("[CONFIG] Saved {}", path.display());
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("SCAN_STRATEGY") {
            match v.to_lowercase().as_str() {
                "line" | "line-based" => self.extract_strategy = ExtractStrategy::LineBased,
                "global" | "global-scan" => self.extract_strategy = ExtractStrategy::GlobalScan,
                other => log::warn!("[CONFIG] Unknown SCAN_STRATEGY: {}", other),
            }
        }
        if let Ok(v) = std::env::var("ALLERGEN_MODE") {
            match v.to_lowercase().as_str() {
                "keyword" | "keyword-pattern" => self.allergen_mode = AllergenMode::KeywordPattern,
                "substring" => self.allergen_mode = AllergenMode::Substring,
                other => log::warn!("[CONFIG] Unknown ALLERGEN_MODE: {}", other),
            }
        }
        if let Ok(v) = std::env::var("CLASSIFY_SCHEME") {
            match v.to_lowercase().as_str() {
                "fixed" | "fixed-bands" => self.classify_scheme = SchemeKind::FixedBands,
                "bmi" | "bmi-relative" => self.classify_scheme = SchemeKind::BmiRelative,
                other => log::warn!("[CONFIG] Unknown CLASSIFY_SCHEME: {}", other),
            }
        }
        if let Ok(v) = std::env::var("OCR_TIMEOUT_SECS") {
            match v.parse::<u64>() {
                Ok(secs) if secs > 0 => self.ocr_timeout_secs = secs,
                _ => log::warn!("[CONFIG] Invalid OCR_TIMEOUT_SECS: {}", v),
            }
        }
        if let Ok(v) = std::env::var("OCR_LANG") {
            if !v.is_empty() {
                self.ocr_lang = v;
            }
        }
        if let Ok(v) = std::env::var("TESSERACT_BIN") {
            if !v.is_empty() {
                self.tesseract_bin = Some(v);
            }
        }
    }
}
