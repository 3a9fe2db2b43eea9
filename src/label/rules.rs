//! Declarative nutrient extraction rules.
//!
//! One ordered table of (label pattern, exclusion, value pattern,
//! normalization, plausibility, rounding) entries, processed uniformly by
//! the driver in `extract`. Adding a nutrient means adding a row here.

use crate::label::types::Nutrient;
use regex::Regex;
use std::sync::OnceLock;

/// Mass unit attached to an extracted numeric token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MassUnit {
    Milligrams,
    Grams,
}

/// Shape of the numeric token a rule extracts.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ValueKind {
    /// Bare 2–4 digit count, no unit (calories).
    BareCount,
    /// Number immediately qualified by a mass unit, `mg` or `g`.
    MassWithUnit,
}

/// One nutrient's extraction rule.
pub(crate) struct FieldRule {
    pub nutrient: Nutrient,
    /// Identifies lines (or text regions) that talk about this nutrient.
    pub label: Regex,
    /// A label hit is discarded when this also matches — keeps
    /// "added sugars" from populating the sugar total.
    pub exclude: Option<Regex>,
    pub value: ValueKind,
    /// Combined label-then-value pattern for the global-scan strategy.
    pub global: Regex,
    plausible: fn(f64) -> bool,
    normalize: fn(f64, Option<MassUnit>) -> f64,
    round: fn(f64) -> f64,
}

impl FieldRule {
    /// First numeric token on the line matching this rule's value pattern.
    ///
    /// The unit requirement is what ties the token to the field: on a line
    /// with several numbers, `sodium 5% 120 mg` extracts 120, not 5.
    pub fn first_value(&self, line: &str) -> Option<(f64, Option<MassUnit>)> {
        match self.value {
            ValueKind::BareCount => {
                let m = bare_value_re().find(line)?;
                m.as_str().parse::<f64>().ok().map(|v| (v, None))
            }
            ValueKind::MassWithUnit => {
                let caps = mass_value_re().captures(line)?;
                let raw = caps.get(1)?.as_str().parse::<f64>().ok()?;
                let unit = match caps.get(2)?.as_str() {
                    "mg" => MassUnit::Milligrams,
                    _ => MassUnit::Grams,
                };
                Some((raw, Some(unit)))
            }
        }
    }

    /// Parse the capture groups of a `global` pattern match.
    pub fn value_from_global(&self, caps: &regex::Captures<'_>) -> Option<(f64, Option<MassUnit>)> {
        match self.value {
            ValueKind::BareCount => {
                caps.get(1)?.as_str().parse::<f64>().ok().map(|v| (v, None))
            }
            ValueKind::MassWithUnit => {
                let raw = caps.get(1)?.as_str().parse::<f64>().ok()?;
                let unit = match caps.get(2)?.as_str() {
                    "mg" => MassUnit::Milligrams,
                    _ => MassUnit::Grams,
                };
                Some((raw, Some(unit)))
            }
        }
    }

    pub fn excluded(&self, context: &str) -> bool {
        self.exclude.as_ref().is_some_and(|re| re.is_match(context))
    }

    /// Normalize to the canonical unit, gate on plausibility, round.
    ///
    /// `None` means the token is treated as a non-match: the field stays
    /// unset and later lines may still populate it.
    pub fn accept(&self, raw: f64, unit: Option<MassUnit>) -> Option<f64> {
        let canonical = (self.normalize)(raw, unit);
        if !(self.plausible)(canonical) {
            return None;
        }
        Some((self.round)(canonical))
    }
}

// ── Value token patterns ────────────────────────────────────────────

const MASS_VALUE: &str = r"(\d+(?:\.\d+)?)\s*(mg|g)";
const BARE_VALUE: &str = r"\d{2,4}";

fn mass_value_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(MASS_VALUE).expect("valid mass value pattern"))
}

fn bare_value_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(BARE_VALUE).expect("valid bare value pattern"))
}

// ── Normalization / plausibility / rounding ─────────────────────────

fn identity(v: f64, _unit: Option<MassUnit>) -> f64 {
    v
}

/// Canonical grams: a label printing milligrams is scaled down.
fn to_grams(v: f64, unit: Option<MassUnit>) -> f64 {
    match unit {
        Some(MassUnit::Milligrams) => v / 1000.0,
        _ => v,
    }
}

/// Canonical milligrams: a label printing grams is scaled up.
fn to_milligrams(v: f64, unit: Option<MassUnit>) -> f64 {
    match unit {
        Some(MassUnit::Grams) => v * 1000.0,
        _ => v,
    }
}

/// Calorie misread guard: serving sizes and adjacent numbers routinely
/// land on calorie lines, so anything outside (10, 4000) is rejected.
fn plausible_calories(v: f64) -> bool {
    v > 10.0 && v < 4000.0
}

fn plausible_mass(v: f64) -> bool {
    v >= 0.0
}

fn round_integer(v: f64) -> f64 {
    v.round()
}

fn round_one_decimal(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

// ── The rule table ──────────────────────────────────────────────────

fn rule(
    nutrient: Nutrient,
    label: &str,
    exclude: Option<&str>,
    value: ValueKind,
    plausible: fn(f64) -> bool,
    normalize: fn(f64, Option<MassUnit>) -> f64,
    round: fn(f64) -> f64,
) -> FieldRule {
    let value_src = match value {
        ValueKind::BareCount => format!("({BARE_VALUE})"),
        ValueKind::MassWithUnit => MASS_VALUE.to_string(),
    };
    FieldRule {
        nutrient,
        label: Regex::new(label).expect("valid label pattern"),
        exclude: exclude.map(|e| Regex::new(e).expect("valid exclusion pattern")),
        value,
        global: Regex::new(&format!(r"(?:{label})[\s\S]*?{value_src}"))
            .expect("valid global pattern"),
        plausible,
        normalize,
        round,
    }
}

/// The ordered extraction table. Order matters only for log readability;
/// fields are extracted independently.
pub(crate) fn rules() -> &'static [FieldRule] {
    static RULES: OnceLock<Vec<FieldRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        vec![
            rule(
                Nutrient::Calories,
                r"calorie|energy|kcal",
                None,
                ValueKind::BareCount,
                plausible_calories,
                identity,
                round_integer,
            ),
            rule(
                Nutrient::Fat,
                r"total\s*fat",
                None,
                ValueKind::MassWithUnit,
                plausible_mass,
                to_grams,
                round_one_decimal,
            ),
            rule(
                Nutrient::Sugar,
                r"total sugars?|sugars?",
                Some("added"),
                ValueKind::MassWithUnit,
                plausible_mass,
                to_grams,
                round_one_decimal,
            ),
            rule(
                Nutrient::Sodium,
                r"sodium|salt|\bna\b",
                None,
                ValueKind::MassWithUnit,
                plausible_mass,
                to_milligrams,
                round_integer,
            ),
        ]
    })
}
