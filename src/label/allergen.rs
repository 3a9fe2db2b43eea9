//! Allergen matching against a user profile.
//!
//! Membership is boolean per category — any synonym hit flags the
//! category, no partial credit. Negation is not handled: "may contain
//! traces of nuts" and "peanut-free" both match. That is an accepted
//! limitation of keyword matching, not a bug to silently fix.

use crate::label::types::{AllergenCategory, AllergenMatch, AllergenReport, AllergyProfile};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Matching strategy. Keyword-pattern catches ingredient synonyms
/// ("whey" → lactose) and is the default; substring is the simplified
/// fallback that only finds the category name itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllergenMode {
    #[default]
    KeywordPattern,
    Substring,
}

/// Synonym pattern sources per category.
fn synonyms(category: AllergenCategory) -> &'static [&'static str] {
    match category {
        AllergenCategory::Lactose => &["milk", "lactose", "dairy", "whey", "casein"],
        AllergenCategory::Egg => &["egg", "albumin", "ovum"],
        AllergenCategory::Seafood => &["shrimp", "crab", "lobster", "fish", "shellfish"],
        AllergenCategory::Nuts => &["nut", "almond", "cashew", "walnut", "peanut"],
        AllergenCategory::Gluten => &["wheat", "barley", "rye", "gluten"],
        AllergenCategory::Soy => &["soy", "soya", "tofu"],
    }
}

fn compiled_synonyms(category: AllergenCategory) -> &'static [Regex] {
    static TABLES: OnceLock<Vec<Vec<Regex>>> = OnceLock::new();
    let tables = TABLES.get_or_init(|| {
        AllergenCategory::ALL
            .iter()
            .map(|c| {
                synonyms(*c)
                    .iter()
                    .map(|src| Regex::new(src).expect("valid synonym pattern"))
                    .collect()
            })
            .collect()
    });
    let idx = AllergenCategory::ALL
        .iter()
        .position(|c| c == &category)
        .expect("category in vocabulary");
    &tables[idx]
}

/// Detect which of the profile's categories appear in the text.
///
/// Returns the matched subset in vocabulary order. Never fails; an empty
/// profile or empty text yields an empty match.
pub fn detect(text: &str, profile: &AllergyProfile, mode: AllergenMode) -> AllergenMatch {
    let lowered = text.to_lowercase();
    let matched: AllergenMatch = profile
        .iter()
        .filter(|category| match mode {
            AllergenMode::KeywordPattern => compiled_synonyms(*category)
                .iter()
                .any(|re| re.is_match(&lowered)),
            AllergenMode::Substring => lowered.contains(category.name()),
        })
        .collect();

    if !matched.is_empty() {
        log::info!(
            "[ALLERGEN] matched {:?} out of {} profile categories",
            matched,
            profile.iter().count()
        );
    }
    matched
}

/// Assemble the render-ready report: all-clear flag plus the warning
/// banner line ("Contains LACTOSE, SOY").
pub fn build_report(matched: AllergenMatch) -> AllergenReport {
    let all_clear = matched.is_empty();
    let warning = if all_clear {
        None
    } else {
        let names: Vec<String> = matched.iter().map(|c| c.name().to_uppercase()).collect();
        Some(format!("Contains {}", names.join(", ")))
    };
    AllergenReport { matched, all_clear, warning }
}
