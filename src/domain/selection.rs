//! Drag selection of a screen region

use super::geometry::{Point, Rect};

/// An in-progress pointer drag on the overlay.
///
/// `begin` is fixed at press time, `end` follows the pointer. The rectangle is
/// normalized only when read, so dragging in any direction works.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub begin: Point,
    pub end: Point,
}

impl Selection {
    /// Start a selection at the press position
    pub fn start(at: Point) -> Self {
        Self { begin: at, end: at }
    }

    /// Move the free corner to the pointer position
    pub fn update(&mut self, to: Point) {
        self.end = to;
    }

    /// Current normalized rectangle
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.begin, self.end)
    }

    /// Consume the selection on release.
    ///
    /// Yields `None` for a click without drag or a zero-width/height line.
    pub fn finish(self) -> Option<Rect> {
        let rect = self.rect();
        rect.dimensions().map(|_| rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_up_left_normalizes() {
        let mut s = Selection::start(Point::new(200, 200));
        s.update(Point::new(50, 120));
        assert_eq!(s.rect(), Rect::new(50, 120, 200, 200));
        assert_eq!(s.finish(), Some(Rect::new(50, 120, 200, 200)));
    }

    #[test]
    fn test_click_without_drag_is_discarded() {
        let s = Selection::start(Point::new(10, 10));
        assert_eq!(s.finish(), None);
    }

    #[test]
    fn test_horizontal_line_is_discarded() {
        let mut s = Selection::start(Point::new(10, 10));
        s.update(Point::new(90, 10));
        assert_eq!(s.finish(), None);
    }
}
