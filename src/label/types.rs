//! Label-domain types — nutrition records, allergen categories, tiers.
//!
//! Everything here serializes with camelCase keys; the rendering
//! collaborator consumes these structures as JSON verbatim.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The fixed set of nutrients the extractor knows how to detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nutrient {
    Calories,
    Fat,
    Sugar,
    Sodium,
}

impl Nutrient {
    /// Display name for result cards.
    pub fn display_name(self) -> &'static str {
        match self {
            Nutrient::Calories => "Calories",
            Nutrient::Fat => "Total Fat",
            Nutrient::Sugar => "Sugars",
            Nutrient::Sodium => "Sodium",
        }
    }

    /// Canonical unit the record stores this nutrient in.
    pub fn unit(self) -> &'static str {
        match self {
            Nutrient::Calories => "kcal",
            Nutrient::Fat | Nutrient::Sugar => "g",
            Nutrient::Sodium => "mg",
        }
    }
}

/// Structured nutrition facts for one scanned label.
///
/// Every field is independently optional — absence means "not detected",
/// never zero. Sodium is always canonical milligrams regardless of which
/// unit the label printed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionRecord {
    pub calories: Option<u32>,
    pub fat_g: Option<f64>,
    pub sugar_g: Option<f64>,
    pub sodium_mg: Option<f64>,
}

impl NutritionRecord {
    /// True when no field was detected at all — the designed fallback
    /// path where the renderer shows a "could not detect" message.
    pub fn is_empty(&self) -> bool {
        self.calories.is_none()
            && self.fat_g.is_none()
            && self.sugar_g.is_none()
            && self.sodium_mg.is_none()
    }

    /// Current value of a field as f64, if detected.
    pub fn value(&self, nutrient: Nutrient) -> Option<f64> {
        match nutrient {
            Nutrient::Calories => self.calories.map(f64::from),
            Nutrient::Fat => self.fat_g,
            Nutrient::Sugar => self.sugar_g,
            Nutrient::Sodium => self.sodium_mg,
        }
    }

    pub fn is_set(&self, nutrient: Nutrient) -> bool {
        self.value(nutrient).is_some()
    }

    /// Store an already-normalized, already-rounded value.
    ///
    /// First confident match wins: callers must check `is_set` first; the
    /// extraction driver never overwrites a populated field.
    pub(crate) fn set(&mut self, nutrient: Nutrient, value: f64) {
        match nutrient {
            Nutrient::Calories => self.calories = Some(value as u32),
            Nutrient::Fat => self.fat_g = Some(value),
            Nutrient::Sugar => self.sugar_g = Some(value),
            Nutrient::Sodium => self.sodium_mg = Some(value),
        }
    }
}

/// Allergen categories a user can declare in their profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllergenCategory {
    Lactose,
    Egg,
    Seafood,
    Nuts,
    Gluten,
    Soy,
}

impl AllergenCategory {
    pub const ALL: [AllergenCategory; 6] = [
        AllergenCategory::Lactose,
        AllergenCategory::Egg,
        AllergenCategory::Seafood,
        AllergenCategory::Nuts,
        AllergenCategory::Gluten,
        AllergenCategory::Soy,
    ];

    /// The category identifier as the profile form spells it.
    pub fn name(self) -> &'static str {
        match self {
            AllergenCategory::Lactose => "lactose",
            AllergenCategory::Egg => "egg",
            AllergenCategory::Seafood => "seafood",
            AllergenCategory::Nuts => "nuts",
            AllergenCategory::Gluten => "gluten",
            AllergenCategory::Soy => "soy",
        }
    }

    /// Parse a profile-form identifier. Unknown names are `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

/// The set of allergen categories a user declared before scanning.
/// Immutable for the duration of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllergyProfile(BTreeSet<AllergenCategory>);

impl AllergyProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, category: AllergenCategory) -> bool {
        self.0.contains(&category)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Categories in stable (declaration-vocabulary) order.
    pub fn iter(&self) -> impl Iterator<Item = AllergenCategory> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<AllergenCategory> for AllergyProfile {
    fn from_iter<I: IntoIterator<Item = AllergenCategory>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The subset of a profile whose patterns matched the scanned text, in
/// vocabulary order. Membership is boolean — no partial-match scoring.
pub type AllergenMatch = Vec<AllergenCategory>;

/// Allergen scan result ready for rendering: the matched subset of the
/// profile, an all-clear flag, and the warning banner line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllergenReport {
    pub matched: AllergenMatch,
    pub all_clear: bool,
    /// e.g. "Contains LACTOSE, SOY" — `None` when all clear.
    pub warning: Option<String>,
}

/// Traffic-light tier for one extracted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Safe,
    Caution,
    Avoid,
}

/// One field's tier, paired with the display value it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierAssignment {
    pub nutrient: Nutrient,
    pub value: f64,
    pub unit: &'static str,
    pub tier: Tier,
}

/// User BMI category, provided by an external collaborator. Selects the
/// BMI-relative threshold bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BmiCategory {
    Underweight,
    NormalWeight,
    Overweight,
    Obesity,
}

impl BmiCategory {
    /// Parse the collaborator's display string ("Normal weight" etc.).
    /// Unrecognized input is `None`; band lookup then falls back to
    /// `NormalWeight`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "underweight" => Some(BmiCategory::Underweight),
            "normal weight" | "normal" => Some(BmiCategory::NormalWeight),
            "overweight" => Some(BmiCategory::Overweight),
            "obesity" | "obese" => Some(BmiCategory::Obesity),
            _ => None,
        }
    }
}

/// UK front-of-pack rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UkRow {
    Energy,
    Sugars,
    Salt,
}

/// UK front-of-pack indicator color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UkColor {
    Green,
    Amber,
    Red,
}

/// One UK front-of-pack label row: rounded display value plus either a
/// percent-of-reference-intake (energy) or a traffic-light color
/// (sugars, salt).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UkLabelEntry {
    pub row: UkRow,
    pub value: f64,
    pub unit: &'static str,
    pub percent_reference_intake: Option<u8>,
    pub color: Option<UkColor>,
}

/// OCR call metadata carried alongside scan results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrSummary {
    pub char_count: usize,
    pub latency_ms: u64,
}

/// Nutrition scan result ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionScan {
    /// False when no field was detected — render the explicit
    /// "could not detect" fallback instead of blank cards.
    pub detected: bool,
    pub record: NutritionRecord,
    /// Per-field tiers; absent fields are skipped, never defaulted.
    pub tiers: Vec<TierAssignment>,
    pub uk_label: Vec<UkLabelEntry>,
    pub ocr: OcrSummary,
}

/// Ingredient scan result ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientScan {
    pub allergens: AllergenReport,
    pub ocr: OcrSummary,
}

/// Combined result of a single-recognition scan of both panels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullScan {
    pub nutrition: NutritionScan,
    pub allergens: AllergenReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_record_reports_empty() {
        let record = NutritionRecord::default();
        assert!(record.is_empty());
        assert!(!record.is_set(Nutrient::Calories));
    }

    #[test]
    fn record_set_and_value_round_trip() {
        let mut record = NutritionRecord::default();
        record.set(Nutrient::Calories, 250.0);
        record.set(Nutrient::Sodium, 300.0);
        assert_eq!(record.calories, Some(250));
        assert_eq!(record.value(Nutrient::Sodium), Some(300.0));
        assert!(!record.is_empty());
    }

    #[test]
    fn bmi_category_parses_display_strings() {
        assert_eq!(BmiCategory::parse("Normal weight"), Some(BmiCategory::NormalWeight));
        assert_eq!(BmiCategory::parse("OBESITY"), Some(BmiCategory::Obesity));
        assert_eq!(BmiCategory::parse("athletic"), None);
    }

    #[test]
    fn profile_preserves_vocabulary_order() {
        let profile: AllergyProfile =
            [AllergenCategory::Soy, AllergenCategory::Lactose].into_iter().collect();
        let order: Vec<_> = profile.iter().collect();
        assert_eq!(order, vec![AllergenCategory::Lactose, AllergenCategory::Soy]);
    }

    #[test]
    fn tier_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Tier::Avoid).unwrap(), "\"avoid\"");
    }
}
