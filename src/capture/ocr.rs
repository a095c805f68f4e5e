//! OCR (Optical Character Recognition) module using rusty-tesseract

use image::RgbaImage;
use std::collections::HashMap;

use crate::fl;

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    /// The tesseract binary could not be run
    #[error("Tesseract OCR is not installed or not on PATH: {0}")]
    EngineMissing(String),
    #[error("Failed to create tesseract image: {0}")]
    Image(String),
    #[error("Tesseract OCR failed: {0}")]
    Recognition(String),
}

impl OcrError {
    /// Text shown in the result area of the main window
    pub fn user_message(&self) -> String {
        match self {
            OcrError::EngineMissing(_) => fl!("error-ocr-missing"),
            OcrError::Image(reason) | OcrError::Recognition(reason) => {
                fl!("error-ocr", reason = reason.clone())
            }
        }
    }
}

/// Check that the system tesseract can be executed, returning its version.
pub fn tesseract_available() -> Result<String, OcrError> {
    rusty_tesseract::get_tesseract_version()
        .map(|v| v.trim().to_string())
        .map_err(|e| OcrError::EngineMissing(e.to_string()))
}

/// Upscale factor for a selection whose smaller side is `min_dimension` pixels.
///
/// Tesseract works best with text that's at least 10-12 pixels tall.
pub fn upscale_factor(min_dimension: u32) -> u32 {
    if min_dimension < 100 {
        4
    } else if min_dimension < 200 {
        2
    } else {
        1
    }
}

/// DPI hint passed to tesseract; small selections get a higher value
pub fn dpi_for(min_dimension: u32) -> i32 {
    if min_dimension < 200 { 300 } else { 150 }
}

/// Run OCR on a cropped selection and return the recognized plain text.
///
/// An empty string means tesseract ran fine but found nothing.
pub fn recognize(img: &RgbaImage, language: &str) -> Result<String, OcrError> {
    use rusty_tesseract::{Args, Image};

    // Probe first so a missing binary is reported as such, not as a
    // generic command failure.
    if let Err(e) = tesseract_available() {
        log::error!("{e}");
        return Err(e);
    }

    log::info!(
        "Running OCR with rusty-tesseract on {}x{} image...",
        img.width(),
        img.height()
    );

    let dynamic_img = image::DynamicImage::ImageRgba8(img.clone());

    let min_dimension = img.width().min(img.height());
    let factor = upscale_factor(min_dimension);
    let processed_img = if factor > 1 {
        let new_width = img.width() * factor;
        let new_height = img.height() * factor;
        log::info!(
            "Upscaling small image {}x to {}x{}",
            factor,
            new_width,
            new_height
        );
        dynamic_img.resize(new_width, new_height, image::imageops::FilterType::Lanczos3)
    } else {
        dynamic_img
    };

    let tess_img =
        Image::from_dynamic_image(&processed_img).map_err(|e| OcrError::Image(e.to_string()))?;

    let args = Args {
        lang: language.to_string(),
        config_variables: HashMap::new(),
        dpi: Some(dpi_for(min_dimension)),
        psm: Some(3), // Fully automatic page segmentation, keeps reading order
        oem: Some(3), // Default OCR Engine Mode
    };

    let text = rusty_tesseract::image_to_string(&tess_img, &args)
        .map_err(|e| OcrError::Recognition(e.to_string()))?;
    let text = normalize_text(&text);
    log::info!("OCR recognized {} characters", text.chars().count());
    Ok(text)
}

/// Trim each line and drop blank lines tesseract emits between blocks
pub fn normalize_text(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
