//! Image capture and processing module
//!
//! This module consolidates:
//! - Screen capture through the desktop portal (portal.rs)
//! - OCR text recognition (ocr.rs)
//! - Screenshot image type (image.rs)

pub mod image;
pub mod ocr;
pub mod portal;

pub use self::image::ScreenshotImage;
