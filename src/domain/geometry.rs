//! Geometric types for screen selections and their mapping onto captured images

use std::num::NonZeroU32;

/// A point in logical overlay coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Logical Size and Position of a rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// Create a new rectangle from coordinates
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Build a normalized rectangle spanning two corner points in any order
    pub fn from_points(a: Point, b: Point) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    /// Calculate the intersection of two rectangles
    pub fn intersect(&self, other: Rect) -> Option<Rect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right);
        let bottom = self.bottom.min(other.bottom);
        if left < right && top < bottom {
            Some(Rect {
                left,
                top,
                right,
                bottom,
            })
        } else {
            None
        }
    }

    /// Get the width of the rectangle
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Get the height of the rectangle
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// True when the rectangle covers no area
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Convert to dimensions (NonZeroU32 width and height)
    pub fn dimensions(self) -> Option<RectDimension> {
        let width = NonZeroU32::new((self.width()).unsigned_abs())?;
        let height = NonZeroU32::new((self.height()).unsigned_abs())?;
        Some(RectDimension { width, height })
    }
}

/// Non-zero dimensions of a rectangle
#[derive(Clone, Copy, Debug)]
pub struct RectDimension {
    pub width: NonZeroU32,
    pub height: NonZeroU32,
}

impl RectDimension {
    /// Get the width as u32
    pub fn width(&self) -> u32 {
        self.width.get()
    }

    /// Get the height as u32
    pub fn height(&self) -> u32 {
        self.height.get()
    }
}

/// How a captured image is laid out inside the overlay.
///
/// The overlay draws the frozen screenshot scaled to fit its viewport with the
/// aspect ratio preserved and the image centered, so a selection made in
/// overlay coordinates has to go through this mapping to address image pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageMapping {
    /// Top-left of the drawn image inside the viewport
    pub offset: (f32, f32),
    /// Logical units per image pixel
    pub scale: f32,
    /// Image size in pixels
    pub image_size: (u32, u32),
}

impl ImageMapping {
    /// Fit an image of `image_size` pixels into a viewport of `viewport` logical units
    pub fn fit(viewport: (f32, f32), image_size: (u32, u32)) -> Option<Self> {
        let (vw, vh) = viewport;
        let (iw, ih) = image_size;
        if vw <= 0.0 || vh <= 0.0 || iw == 0 || ih == 0 {
            return None;
        }
        let scale = (vw / iw as f32).min(vh / ih as f32);
        let drawn_w = iw as f32 * scale;
        let drawn_h = ih as f32 * scale;
        Some(Self {
            offset: ((vw - drawn_w) / 2.0, (vh - drawn_h) / 2.0),
            scale,
            image_size,
        })
    }

    /// Bounds of the drawn image inside the viewport as (x, y, width, height)
    pub fn drawn_bounds(&self) -> (f32, f32, f32, f32) {
        (
            self.offset.0,
            self.offset.1,
            self.image_size.0 as f32 * self.scale,
            self.image_size.1 as f32 * self.scale,
        )
    }

    /// Map a viewport rectangle onto image pixels, clamped to the image.
    ///
    /// Returns `None` if nothing of the rectangle lands on the image.
    pub fn to_image(&self, rect: Rect) -> Option<Rect> {
        let to_px = |v: i32, offset: f32| ((v as f32 - offset) / self.scale).round() as i32;
        let mapped = Rect::from_points(
            Point::new(to_px(rect.left, self.offset.0), to_px(rect.top, self.offset.1)),
            Point::new(
                to_px(rect.right, self.offset.0),
                to_px(rect.bottom, self.offset.1),
            ),
        );
        let image = Rect::new(0, 0, self.image_size.0 as i32, self.image_size.1 as i32);
        mapped.intersect(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_is_order_independent() {
        let a = Point::new(120, 40);
        let b = Point::new(10, 300);
        let r = Rect::from_points(a, b);
        assert_eq!(r, Rect::from_points(b, a));
        assert_eq!(r, Rect::new(10, 40, 120, 300));
        assert!(r.left <= r.right && r.top <= r.bottom);
    }

    #[test]
    fn test_degenerate_rect_has_no_dimensions() {
        let line = Rect::from_points(Point::new(5, 5), Point::new(5, 80));
        assert!(line.is_empty());
        assert!(line.dimensions().is_none());

        let r = Rect::new(0, 0, 3, 4);
        let dim = r.dimensions().unwrap();
        assert_eq!((dim.width(), dim.height()), (3, 4));
    }

    #[test]
    fn test_intersect() {
        let a = Rect::new(0, 0, 100, 100);
        assert_eq!(
            a.intersect(Rect::new(50, 50, 150, 150)),
            Some(Rect::new(50, 50, 100, 100))
        );
        assert_eq!(a.intersect(Rect::new(100, 0, 200, 100)), None);
    }

    #[test]
    fn test_mapping_hidpi_without_letterbox() {
        // 1920x1080 logical viewport showing a 3840x2160 capture
        let m = ImageMapping::fit((1920.0, 1080.0), (3840, 2160)).unwrap();
        assert_eq!(m.offset, (0.0, 0.0));
        assert_eq!(m.scale, 0.5);
        assert_eq!(
            m.to_image(Rect::new(100, 50, 300, 150)),
            Some(Rect::new(200, 100, 600, 300))
        );
    }

    #[test]
    fn test_mapping_letterboxed_image() {
        // 1000x500 image in a 1000x1000 viewport: 250 units of bars top and bottom
        let m = ImageMapping::fit((1000.0, 1000.0), (1000, 500)).unwrap();
        assert_eq!(m.offset, (0.0, 250.0));
        assert_eq!(m.drawn_bounds(), (0.0, 250.0, 1000.0, 500.0));
        assert_eq!(
            m.to_image(Rect::new(10, 260, 110, 360)),
            Some(Rect::new(10, 10, 110, 110))
        );
    }

    #[test]
    fn test_mapping_clamps_and_rejects_outside() {
        let m = ImageMapping::fit((1000.0, 1000.0), (1000, 500)).unwrap();
        // Starts in the top bar, ends inside the image
        assert_eq!(
            m.to_image(Rect::new(0, 0, 50, 300)),
            Some(Rect::new(0, 0, 50, 50))
        );
        // Entirely inside the bottom bar
        assert_eq!(m.to_image(Rect::new(0, 800, 50, 900)), None);
    }

    #[test]
    fn test_mapping_rejects_empty_inputs() {
        assert!(ImageMapping::fit((0.0, 100.0), (10, 10)).is_none());
        assert!(ImageMapping::fit((100.0, 100.0), (0, 10)).is_none());
    }
}
