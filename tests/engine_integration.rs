//! Integration test for the Tesseract engine boundary.
//!
//! Exercises real engine acquisition and a recognition call when a
//! tesseract binary is installed; skips (with a note) when it isn't,
//! same as running without the collaborator available.
//!
//! Loads `.env` first so TESSERACT_BIN / OCR_LANG overrides apply.

use label_glass::config::ScannerConfig;
use label_glass::error::OcrError;
use label_glass::ocr::{OcrEngine, TesseractEngine};

fn load_env() {
    let _ = dotenvy::dotenv();
    let _ = env_logger::builder().is_test(true).try_init();
}

fn blank_png() -> Vec<u8> {
    let image = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        120,
        40,
        image::Rgb([255, 255, 255]),
    ));
    let mut png = Vec::new();
    image
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .expect("encode blank png");
    png
}

#[tokio::test]
async fn acquire_and_recognize_blank_image() {
    load_env();

    let config = ScannerConfig::resolve();
    let engine = match TesseractEngine::acquire(&config) {
        Ok(engine) => engine,
        Err(OcrError::EngineUnavailable(msg)) => {
            eprintln!("SKIP: {}", msg);
            return;
        }
        Err(e) => panic!("unexpected acquire error: {}", e),
    };

    let result = engine.recognize(blank_png()).await;
    match result {
        Ok(output) => {
            // A blank page recognizes to empty (or near-empty) text.
            assert!(
                output.text.trim().len() < 20,
                "unexpected text from blank image: {:?}",
                output.text
            );
        }
        // Some tesseract builds report an empty page as a failure; that is
        // still the Recognition kind, never EngineUnavailable.
        Err(OcrError::Recognition(msg)) => {
            eprintln!("blank page reported as recognition failure: {}", msg);
        }
        Err(e) => panic!("unexpected error kind: {}", e),
    }
}

#[test]
fn acquisition_failure_is_reported_as_engine_unavailable() {
    load_env();

    let config = ScannerConfig {
        tesseract_bin: Some("no-such-ocr-engine-on-this-machine".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        TesseractEngine::acquire(&config),
        Err(OcrError::EngineUnavailable(_))
    ));
}
