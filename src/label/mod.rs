//! Label-text interpretation domain — public API.
//!
//! This module owns everything between raw OCR text and render-ready
//! data: nutrient extraction, allergen matching, and tier classification.
//! All functions here are synchronous, deterministic, and never fail.

pub mod allergen;
pub mod classify;
pub mod extract;
mod rules;
pub mod types;

pub use allergen::{build_report, detect, AllergenMode};
pub use classify::{classify, energy_percent_ri, uk_label, Scheme, SchemeKind};
pub use extract::{extract, ExtractStrategy};
pub use types::{
    AllergenCategory, AllergenMatch, AllergenReport, AllergyProfile, BmiCategory, FullScan,
    IngredientScan, NutritionRecord, NutritionScan, Nutrient, OcrSummary, Tier, TierAssignment,
    UkColor, UkLabelEntry, UkRow,
};
