//! Screenshot image type for captured screenshots

use std::path::Path;

use anyhow::{Context, bail};
use image::RgbaImage;

use crate::domain::Rect;

/// A captured screenshot image with both raw RGBA data and a display handle
#[derive(Clone, Debug)]
pub struct ScreenshotImage {
    pub rgba: RgbaImage,
    pub handle: cosmic::widget::image::Handle,
}

impl ScreenshotImage {
    /// Wrap decoded pixels and build the GUI handle for them
    pub fn new(rgba: RgbaImage) -> Self {
        log::debug!(
            "ScreenshotImage captured: {}x{} pixels",
            rgba.width(),
            rgba.height()
        );
        let handle = cosmic::widget::image::Handle::from_rgba(
            rgba.width(),
            rgba.height(),
            rgba.clone().into_vec(),
        );
        Self { rgba, handle }
    }

    /// Load an image file written by the screenshot portal
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let rgba = image::open(path)
            .with_context(|| format!("Failed to load screenshot from {}", path.display()))?
            .into_rgba8();
        Ok(Self::new(rgba))
    }

    /// Get the width of the image
    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    /// Get the height of the image
    pub fn height(&self) -> u32 {
        self.rgba.height()
    }

    /// Copy out the pixels under `rect` (image pixel coordinates)
    pub fn crop(&self, rect: Rect) -> anyhow::Result<RgbaImage> {
        let bounds = Rect::new(0, 0, self.width() as i32, self.height() as i32);
        let Some(area) = rect.intersect(bounds) else {
            bail!(
                "Selection {:?} lies outside the {}x{} screenshot",
                rect,
                self.width(),
                self.height()
            );
        };
        if area != rect {
            log::warn!("Selection {:?} clipped to {:?}", rect, area);
        }
        let cropped = image::imageops::crop_imm(
            &self.rgba,
            area.left as u32,
            area.top as u32,
            area.width() as u32,
            area.height() as u32,
        )
        .to_image();
        Ok(cropped)
    }
}
