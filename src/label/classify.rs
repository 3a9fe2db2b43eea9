//! Tier classification and front-of-pack presentation data.
//!
//! Two threshold schemes behind one interface: fixed absolute bands, and
//! bands selected by the user's BMI category. Absent fields are skipped —
//! they never default to a tier.

use crate::label::types::{
    BmiCategory, Nutrient, NutritionRecord, Tier, TierAssignment, UkColor, UkLabelEntry, UkRow,
};
use serde::{Deserialize, Serialize};

/// Which threshold scheme the classifier runs. Stored in configuration;
/// the BMI category itself comes from session state at classify time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemeKind {
    #[default]
    FixedBands,
    BmiRelative,
}

/// A resolved scheme, ready to classify one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scheme {
    /// One band per nutrient, independent of the user.
    FixedBands,
    /// Bands from the BMI table; `None` falls back to normal weight.
    BmiRelative { category: Option<BmiCategory> },
}

/// `[low, high]` band: value ≤ low is Safe, ≤ high is Caution, else Avoid.
#[derive(Debug, Clone, Copy)]
struct Band {
    low: f64,
    high: f64,
}

impl Band {
    fn tier_inclusive(self, value: f64) -> Tier {
        if value <= self.low {
            Tier::Safe
        } else if value <= self.high {
            Tier::Caution
        } else {
            Tier::Avoid
        }
    }

    /// Strict-`<` variant used by the fixed scheme: a value exactly on the
    /// low threshold lands in the less safe tier (150 kcal is Caution).
    fn tier_strict(self, value: f64) -> Tier {
        if value < self.low {
            Tier::Safe
        } else if value < self.high {
            Tier::Caution
        } else {
            Tier::Avoid
        }
    }
}

/// Per-BMI-category bands for energy (kcal), sugars (g), and salt (g).
struct BmiBands {
    energy: Band,
    sugars: Band,
    salt: Band,
}

fn fixed_band(nutrient: Nutrient) -> Band {
    match nutrient {
        Nutrient::Calories => Band { low: 150.0, high: 350.0 },
        Nutrient::Fat => Band { low: 5.0, high: 15.0 },
        Nutrient::Sugar => Band { low: 5.0, high: 12.0 },
        Nutrient::Sodium => Band { low: 140.0, high: 400.0 },
    }
}

fn bmi_bands(category: BmiCategory) -> BmiBands {
    match category {
        BmiCategory::Underweight => BmiBands {
            energy: Band { low: 150.0, high: 300.0 },
            sugars: Band { low: 8.0, high: 16.0 },
            salt: Band { low: 0.3, high: 0.6 },
        },
        BmiCategory::NormalWeight => BmiBands {
            energy: Band { low: 200.0, high: 400.0 },
            sugars: Band { low: 10.0, high: 20.0 },
            salt: Band { low: 0.3, high: 0.8 },
        },
        BmiCategory::Overweight => BmiBands {
            energy: Band { low: 150.0, high: 300.0 },
            sugars: Band { low: 6.0, high: 12.0 },
            salt: Band { low: 0.2, high: 0.6 },
        },
        BmiCategory::Obesity => BmiBands {
            energy: Band { low: 100.0, high: 200.0 },
            sugars: Band { low: 4.0, high: 10.0 },
            salt: Band { low: 0.1, high: 0.4 },
        },
    }
}

/// Classify every detected field of the record under the given scheme.
///
/// Under BMI-relative bands only energy, sugars, and salt have entries in
/// the table, so a detected fat value carries no tier there.
pub fn classify(record: &NutritionRecord, scheme: &Scheme) -> Vec<TierAssignment> {
    let mut tiers = Vec::new();

    for nutrient in [Nutrient::Calories, Nutrient::Fat, Nutrient::Sugar, Nutrient::Sodium] {
        let Some(value) = record.value(nutrient) else {
            continue;
        };
        let tier = match scheme {
            Scheme::FixedBands => Some(fixed_band(nutrient).tier_strict(value)),
            Scheme::BmiRelative { category } => {
                let bands = bmi_bands(category.unwrap_or(BmiCategory::NormalWeight));
                match nutrient {
                    Nutrient::Calories => Some(bands.energy.tier_inclusive(value)),
                    Nutrient::Sugar => Some(bands.sugars.tier_inclusive(value)),
                    // Salt bands are authored in grams; the record stores mg.
                    Nutrient::Sodium => Some(bands.salt.tier_inclusive(value / 1000.0)),
                    Nutrient::Fat => None,
                }
            }
        };
        if let Some(tier) = tier {
            tiers.push(TierAssignment {
                nutrient,
                value,
                unit: nutrient.unit(),
                tier,
            });
        }
    }

    log::debug!("[CLASSIFY] {} fields tiered under {:?}", tiers.len(), scheme);
    tiers
}

/// Energy percent-of-reference-intake indicator, for display only.
pub fn energy_percent_ri(kcal: u32) -> u8 {
    ((f64::from(kcal) / 20.0).round() as u64).min(100) as u8
}

/// UK front-of-pack rows for the detected fields: energy with its %RI,
/// sugars and salt with their traffic-light colors. Salt thresholds are
/// per 100g in grams (green ≤ 0.3, amber ≤ 1.5); sugars green ≤ 5,
/// amber ≤ 22.5.
pub fn uk_label(record: &NutritionRecord) -> Vec<UkLabelEntry> {
    let mut rows = Vec::new();

    if let Some(kcal) = record.calories {
        rows.push(UkLabelEntry {
            row: UkRow::Energy,
            value: f64::from(kcal),
            unit: "kcal",
            percent_reference_intake: Some(energy_percent_ri(kcal)),
            color: None,
        });
    }
    if let Some(sugars) = record.sugar_g {
        let color = if sugars <= 5.0 {
            UkColor::Green
        } else if sugars <= 22.5 {
            UkColor::Amber
        } else {
            UkColor::Red
        };
        rows.push(UkLabelEntry {
            row: UkRow::Sugars,
            value: sugars.round(),
            unit: "g",
            percent_reference_intake: None,
            color: Some(color),
        });
    }
    if let Some(sodium_mg) = record.sodium_mg {
        let salt_g = sodium_mg / 1000.0;
        let color = if salt_g <= 0.3 {
            UkColor::Green
        } else if salt_g <= 1.5 {
            UkColor::Amber
        } else {
            UkColor::Red
        };
        rows.push(UkLabelEntry {
            row: UkRow::Salt,
            value: (salt_g * 10.0).round() / 10.0,
            unit: "g",
            percent_reference_intake: None,
            color: Some(color),
        });
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(calories: Option<u32>, fat: Option<f64>, sugar: Option<f64>, sodium: Option<f64>) -> NutritionRecord {
        NutritionRecord { calories, fat_g: fat, sugar_g: sugar, sodium_mg: sodium }
    }

    fn tier_of(tiers: &[TierAssignment], nutrient: Nutrient) -> Option<Tier> {
        tiers.iter().find(|t| t.nutrient == nutrient).map(|t| t.tier)
    }

    #[test]
    fn fixed_bands_cover_all_three_tiers() {
        let r = record(Some(120), Some(20.0), Some(7.0), None);
        let tiers = classify(&r, &Scheme::FixedBands);
        assert_eq!(tier_of(&tiers, Nutrient::Calories), Some(Tier::Safe));
        assert_eq!(tier_of(&tiers, Nutrient::Fat), Some(Tier::Avoid));
        assert_eq!(tier_of(&tiers, Nutrient::Sugar), Some(Tier::Caution));
    }

    #[test]
    fn fixed_band_boundary_is_strict() {
        // 150 kcal is exactly the Safe threshold — Safe requires < 150.
        let tiers = classify(&record(Some(150), None, None, None), &Scheme::FixedBands);
        assert_eq!(tier_of(&tiers, Nutrient::Calories), Some(Tier::Caution));
    }

    #[test]
    fn absent_fields_are_skipped_not_defaulted() {
        let tiers = classify(&record(None, None, Some(3.0), None), &Scheme::FixedBands);
        assert_eq!(tiers.len(), 1);
        assert_eq!(tier_of(&tiers, Nutrient::Sugar), Some(Tier::Safe));
    }

    #[test]
    fn empty_record_classifies_to_nothing() {
        assert!(classify(&NutritionRecord::default(), &Scheme::FixedBands).is_empty());
        let scheme = Scheme::BmiRelative { category: Some(BmiCategory::Obesity) };
        assert!(classify(&NutritionRecord::default(), &scheme).is_empty());
    }

    #[test]
    fn bmi_bands_are_inclusive_at_the_low_edge() {
        // Under normal weight, 200 kcal sits exactly on low — Safe.
        let scheme = Scheme::BmiRelative { category: Some(BmiCategory::NormalWeight) };
        let tiers = classify(&record(Some(200), None, None, None), &scheme);
        assert_eq!(tier_of(&tiers, Nutrient::Calories), Some(Tier::Safe));
    }

    #[test]
    fn bmi_bands_tighten_for_obesity() {
        let r = record(Some(250), None, Some(9.0), Some(500.0));
        let normal = Scheme::BmiRelative { category: Some(BmiCategory::NormalWeight) };
        let obesity = Scheme::BmiRelative { category: Some(BmiCategory::Obesity) };
        assert_eq!(tier_of(&classify(&r, &normal), Nutrient::Calories), Some(Tier::Caution));
        assert_eq!(tier_of(&classify(&r, &obesity), Nutrient::Calories), Some(Tier::Avoid));
        // 9g sugar: within normal's Safe band, Caution for obesity.
        assert_eq!(tier_of(&classify(&r, &normal), Nutrient::Sugar), Some(Tier::Safe));
        assert_eq!(tier_of(&classify(&r, &obesity), Nutrient::Sugar), Some(Tier::Caution));
        // 500mg sodium = 0.5g salt: Caution for normal, Avoid for obesity.
        assert_eq!(tier_of(&classify(&r, &normal), Nutrient::Sodium), Some(Tier::Caution));
        assert_eq!(tier_of(&classify(&r, &obesity), Nutrient::Sodium), Some(Tier::Avoid));
    }

    #[test]
    fn missing_bmi_category_falls_back_to_normal_weight() {
        let r = record(Some(250), None, None, None);
        let fallback = classify(&r, &Scheme::BmiRelative { category: None });
        let normal = classify(&r, &Scheme::BmiRelative { category: Some(BmiCategory::NormalWeight) });
        assert_eq!(fallback, normal);
    }

    #[test]
    fn fat_has_no_bmi_band() {
        let scheme = Scheme::BmiRelative { category: Some(BmiCategory::NormalWeight) };
        let tiers = classify(&record(None, Some(30.0), None, None), &scheme);
        assert!(tiers.is_empty());
    }

    #[test]
    fn energy_percent_caps_at_100() {
        assert_eq!(energy_percent_ri(250), 13);
        assert_eq!(energy_percent_ri(2000), 100);
        assert_eq!(energy_percent_ri(4000), 100);
    }

    #[test]
    fn uk_label_colors_and_percent() {
        let r = record(Some(250), None, Some(9.5), Some(300.0));
        let rows = uk_label(&r);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].row, UkRow::Energy);
        assert_eq!(rows[0].percent_reference_intake, Some(13));
        assert_eq!(rows[1].color, Some(UkColor::Amber)); // 9.5g sugars
        assert_eq!(rows[2].color, Some(UkColor::Green)); // 0.3g salt
    }

    #[test]
    fn uk_label_skips_absent_fields() {
        let rows = uk_label(&record(None, Some(5.0), None, None));
        assert!(rows.is_empty());
    }
}
