//! Core scan pipeline.
//!
//! Multi-step orchestration over a session:
//! - scan_nutrition:   image → OCR → extract → classify → NutritionScan
//! - scan_ingredients: image → OCR → allergen match → IngredientScan
//! - scan_full:        one recognition feeding both analyses
//!
//! Each scan claims the session's in-flight gate first; a request while
//! another scan is outstanding is rejected, never queued behind a racing
//! recognition. OCR failure aborts before any core function runs — the
//! caller surfaces a retry affordance.

use crate::error::ScanError;
use crate::label::{self, AllergenReport, FullScan, IngredientScan, NutritionScan, OcrSummary, Scheme, SchemeKind};
use crate::ocr::{OcrEngine, OcrOutput};
use crate::session::ScanSession;

/// Scan the current image for nutrition facts.
pub async fn scan_nutrition<E: OcrEngine>(
    session: &ScanSession<E>,
) -> Result<NutritionScan, ScanError> {
    let _gate = session.begin_scan()?;
    let ocr = recognize_current_image(session).await?;
    Ok(analyze_nutrition(session, &ocr))
}

/// Scan the current image for allergens against the session profile.
pub async fn scan_ingredients<E: OcrEngine>(
    session: &ScanSession<E>,
) -> Result<IngredientScan, ScanError> {
    let _gate = session.begin_scan()?;
    let ocr = recognize_current_image(session).await?;
    let allergens = analyze_allergens(session, &ocr);
    Ok(IngredientScan { allergens, ocr: summary(&ocr) })
}

/// Scan the current image once and run both analyses on the same text.
pub async fn scan_full<E: OcrEngine>(session: &ScanSession<E>) -> Result<FullScan, ScanError> {
    let _gate = session.begin_scan()?;
    let ocr = recognize_current_image(session).await?;
    Ok(FullScan {
        nutrition: analyze_nutrition(session, &ocr),
        allergens: analyze_allergens(session, &ocr),
    })
}

/// Stage 1+2: encode the held image and run it through the engine.
async fn recognize_current_image<E: OcrEngine>(
    session: &ScanSession<E>,
) -> Result<OcrOutput, ScanError> {
    let encode_start = std::time::Instant::now();
    let png_bytes = session.current_image_png()?;
    log::info!(
        "[PIPELINE] PNG encode: {}ms ({} bytes)",
        encode_start.elapsed().as_millis(),
        png_bytes.len()
    );

    let ocr = session.engine().recognize(png_bytes).await?;
    if ocr.char_count == 0 {
        log::warn!("[PIPELINE] OCR returned zero characters");
    }
    Ok(ocr)
}

/// Stage 3a: extract, classify, and assemble the nutrition report.
fn analyze_nutrition<E: OcrEngine>(session: &ScanSession<E>, ocr: &OcrOutput) -> NutritionScan {
    let config = session.config();
    let record = label::extract(&ocr.text, config.extract_strategy);
    let detected = !record.is_empty();

    let scheme = match config.classify_scheme {
        SchemeKind::FixedBands => Scheme::FixedBands,
        SchemeKind::BmiRelative => Scheme::BmiRelative { category: session.bmi() },
    };
    let tiers = label::classify(&record, &scheme);
    let uk_label = label::uk_label(&record);

    log::info!(
        "[PIPELINE] Nutrition scan: detected={}, {} tiers, {} UK rows",
        detected,
        tiers.len(),
        uk_label.len()
    );

    NutritionScan { detected, record, tiers, uk_label, ocr: summary(ocr) }
}

/// Stage 3b: allergen matching against the session profile.
fn analyze_allergens<E: OcrEngine>(session: &ScanSession<E>, ocr: &OcrOutput) -> AllergenReport {
    let config = session.config();
    let matched = label::detect(&ocr.text, session.profile(), config.allergen_mode);
    label::build_report(matched)
}

fn summary(ocr: &OcrOutput) -> OcrSummary {
    OcrSummary { char_count: ocr.char_count, latency_ms: ocr.latency_ms }
}
