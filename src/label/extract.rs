//! Nutrient extraction driver.
//!
//! Takes noisy multi-line OCR text and returns a `NutritionRecord`.
//! Never fails — an unparseable field is simply absent, which downstream
//! renders as "could not detect".
//!
//! Two strategies, selectable by configuration:
//! - line-based: split into lines, strip OCR noise per line, match label
//!   and value on the same line. More precise, less cross-field bleed.
//! - global-scan: one combined label-then-value regex per field over the
//!   whole text. Higher recall on labels where OCR merged the lines.

use crate::label::rules::{rules, FieldRule};
use crate::label::types::NutritionRecord;
use serde::{Deserialize, Serialize};

/// Extraction strategy. Line-based is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractStrategy {
    #[default]
    LineBased,
    GlobalScan,
}

/// Extract nutrition fields from raw OCR text.
pub fn extract(text: &str, strategy: ExtractStrategy) -> NutritionRecord {
    let lowered = text.to_lowercase();
    let mut record = NutritionRecord::default();

    for rule in rules() {
        let hit = match strategy {
            ExtractStrategy::LineBased => extract_line_based(rule, &lowered),
            ExtractStrategy::GlobalScan => extract_global(rule, &lowered),
        };
        if let Some(value) = hit {
            log::debug!(
                "[PARSE] {:?} = {} {} ({:?})",
                rule.nutrient,
                value,
                rule.nutrient.unit(),
                strategy
            );
            record.set(rule.nutrient, value);
        }
    }

    if record.is_empty() {
        log::info!("[PARSE] no nutrition fields detected in {} chars", text.len());
    }
    record
}

/// Scan lines in order; first line whose label matches (and is not
/// excluded) contributes its first unit-qualified token. An implausible
/// token makes the line a non-match and scanning continues.
fn extract_line_based(rule: &FieldRule, lowered: &str) -> Option<f64> {
    for line in lowered.lines() {
        let cleaned = strip_noise(line);
        if !rule.label.is_match(&cleaned) || rule.excluded(&cleaned) {
            continue;
        }
        let Some((raw, unit)) = rule.first_value(&cleaned) else {
            continue;
        };
        if let Some(value) = rule.accept(raw, unit) {
            return Some(value);
        }
    }
    None
}

/// One combined regex across the whole text. The exclusion still applies
/// to the line the label landed on, so "added sugars" cannot claim the
/// sugar total in this mode either.
fn extract_global(rule: &FieldRule, lowered: &str) -> Option<f64> {
    for caps in rule.global.captures_iter(lowered) {
        let label_at = caps.get(0).map(|m| m.start()).unwrap_or(0);
        if rule.excluded(line_containing(lowered, label_at)) {
            continue;
        }
        let Some((raw, unit)) = rule.value_from_global(&caps) else {
            continue;
        };
        if let Some(value) = rule.accept(raw, unit) {
            return Some(value);
        }
    }
    None
}

/// Drop characters outside {letters, digits, `.`, `%`, whitespace} —
/// stray punctuation from OCR misreads otherwise breaks value tokens.
fn strip_noise(line: &str) -> String {
    line.chars()
        .filter(|c| c.is_alphanumeric() || *c == '.' || *c == '%' || c.is_whitespace())
        .collect()
}

/// The full line containing byte offset `at`.
fn line_containing(text: &str, at: usize) -> &str {
    let start = text[..at].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let end = text[at..].find('\n').map(|i| at + i).unwrap_or(text.len());
    &text[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_all_four_fields() {
        let text = "Energy 250kcal\nTotal Fat 12g\nTotal Sugars 9.5g\nSodium 0.3g";
        let record = extract(text, ExtractStrategy::LineBased);
        assert_eq!(record.calories, Some(250));
        assert_eq!(record.fat_g, Some(12.0));
        assert_eq!(record.sugar_g, Some(9.5));
        assert_eq!(record.sodium_mg, Some(300.0));
    }

    #[test]
    fn no_keywords_yields_all_absent() {
        let record = extract("best before 2026\nbatch 41A", ExtractStrategy::LineBased);
        assert!(record.is_empty());
    }

    #[test]
    fn empty_text_terminates_with_empty_record() {
        assert!(extract("", ExtractStrategy::LineBased).is_empty());
        assert!(extract("", ExtractStrategy::GlobalScan).is_empty());
    }

    #[test]
    fn first_confident_match_wins() {
        let text = "Calories 200\nCalories 900";
        let record = extract(text, ExtractStrategy::LineBased);
        assert_eq!(record.calories, Some(200));
    }

    #[test]
    fn implausible_calorie_line_does_not_block_later_lines() {
        // 9000 fails the (10, 4000) bound; the next calorie line may still match.
        let text = "Energy 9000\nCalories 320";
        let record = extract(text, ExtractStrategy::LineBased);
        assert_eq!(record.calories, Some(320));
    }

    #[test]
    fn added_sugars_never_populates_the_total() {
        let text = "Added Sugars 10g\nTotal Sugars 8g";
        for strategy in [ExtractStrategy::LineBased, ExtractStrategy::GlobalScan] {
            let record = extract(text, strategy);
            assert_eq!(record.sugar_g, Some(8.0), "strategy {strategy:?}");
        }
    }

    #[test]
    fn sodium_milligrams_pass_through() {
        let record = extract("Sodium 500 mg", ExtractStrategy::LineBased);
        assert_eq!(record.sodium_mg, Some(500.0));
    }

    #[test]
    fn multiple_numbers_take_the_unit_qualified_token() {
        let record = extract("Sodium 5% DV 120 mg", ExtractStrategy::LineBased);
        assert_eq!(record.sodium_mg, Some(120.0));
    }

    #[test]
    fn ocr_punctuation_noise_is_stripped() {
        let record = extract("Total* Fat:; 5g!!", ExtractStrategy::LineBased);
        assert_eq!(record.fat_g, Some(5.0));
    }

    #[test]
    fn global_scan_survives_merged_lines() {
        // No newline between label and value — line-based still works here,
        // but this is the shape global-scan exists for.
        let text = "nutrition energy 250kcal sugars 9.5g salt 0.3g";
        let record = extract(text, ExtractStrategy::GlobalScan);
        assert_eq!(record.calories, Some(250));
        assert_eq!(record.sugar_g, Some(9.5));
        assert_eq!(record.sodium_mg, Some(300.0));
    }

    #[test]
    fn fat_requires_the_total_qualifier() {
        let record = extract("Saturated Fat 5g", ExtractStrategy::LineBased);
        assert_eq!(record.fat_g, None);
    }
}
