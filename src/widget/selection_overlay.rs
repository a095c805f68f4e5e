//! Full-screen drag selection over a frozen screenshot

use cosmic::{
    iced::mouse,
    iced_core::{
        self, Border, Color, Length, Point as IcedPoint, Rectangle, Shadow, Size,
        layout::Node, renderer::Quad,
    },
    iced_core::Renderer,
    widget::{Widget, image},
};

use crate::domain::{ImageMapping, Point, Rect};
use crate::session::OverlayEvent;

const BORDER_WIDTH: f32 = 2.0;
const DIM_ALPHA: f32 = 0.45;

pub struct SelectionOverlay<Msg> {
    image: image::Handle,
    image_size: (u32, u32),
    /// Current drag rectangle in overlay coordinates, if dragging
    selection: Option<Rect>,
    on_event: Box<dyn Fn(OverlayEvent) -> Msg>,
}

impl<Msg> SelectionOverlay<Msg> {
    pub fn new(
        image: image::Handle,
        image_size: (u32, u32),
        selection: Option<Rect>,
        on_event: impl Fn(OverlayEvent) -> Msg + 'static,
    ) -> Self {
        Self {
            image,
            image_size,
            selection,
            on_event: Box::new(on_event),
        }
    }

    fn is_dragging(&self) -> bool {
        self.selection.is_some()
    }
}

/// Overlay-local integer point for a cursor, clamped into `bounds`
fn local_point(position: IcedPoint, bounds: Rectangle) -> Point {
    let x = (position.x - bounds.x).clamp(0.0, bounds.width);
    let y = (position.y - bounds.y).clamp(0.0, bounds.height);
    Point::new(x.round() as i32, y.round() as i32)
}

/// The up to four bands of `outer` not covered by `inner`
fn outside_bands(outer: Rectangle, inner: Rectangle) -> Vec<Rectangle> {
    let Some(inner) = outer.intersection(&inner) else {
        return vec![outer];
    };
    let bands = [
        // above
        Rectangle::new(
            IcedPoint::new(outer.x, outer.y),
            Size::new(outer.width, inner.y - outer.y),
        ),
        // below
        Rectangle::new(
            IcedPoint::new(outer.x, inner.y + inner.height),
            Size::new(outer.width, outer.y + outer.height - (inner.y + inner.height)),
        ),
        // left
        Rectangle::new(
            IcedPoint::new(outer.x, inner.y),
            Size::new(inner.x - outer.x, inner.height),
        ),
        // right
        Rectangle::new(
            IcedPoint::new(inner.x + inner.width, inner.y),
            Size::new(outer.x + outer.width - (inner.x + inner.width), inner.height),
        ),
    ];
    bands
        .into_iter()
        .filter(|b| b.width > 0.0 && b.height > 0.0)
        .collect()
}

impl<Msg: 'static> Widget<Msg, cosmic::Theme, cosmic::Renderer> for SelectionOverlay<Msg> {
    fn size(&self) -> Size<Length> {
        Size::new(Length::Fill, Length::Fill)
    }

    fn layout(
        &self,
        _tree: &mut cosmic::iced_core::widget::Tree,
        _renderer: &cosmic::Renderer,
        limits: &cosmic::iced_core::layout::Limits,
    ) -> cosmic::iced_core::layout::Node {
        Node::new(limits.width(Length::Fill).height(Length::Fill).resolve(
            Length::Fill,
            Length::Fill,
            cosmic::iced_core::Size::ZERO,
        ))
    }

    fn mouse_interaction(
        &self,
        _state: &iced_core::widget::Tree,
        _layout: iced_core::Layout<'_>,
        _cursor: iced_core::mouse::Cursor,
        _viewport: &Rectangle,
        _renderer: &cosmic::Renderer,
    ) -> iced_core::mouse::Interaction {
        iced_core::mouse::Interaction::Crosshair
    }

    fn on_event(
        &mut self,
        _state: &mut iced_core::widget::Tree,
        event: iced_core::Event,
        layout: iced_core::Layout<'_>,
        cursor: iced_core::mouse::Cursor,
        _renderer: &cosmic::Renderer,
        _clipboard: &mut dyn iced_core::Clipboard,
        shell: &mut iced_core::Shell<'_, Msg>,
        _viewport: &Rectangle,
    ) -> iced_core::event::Status {
        let bounds = layout.bounds();
        let cosmic::iced_core::Event::Mouse(e) = event else {
            return cosmic::iced_core::event::Status::Ignored;
        };

        match e {
            mouse::Event::ButtonPressed(mouse::Button::Left) => {
                let Some(pos) = cursor.position_over(bounds) else {
                    return cosmic::iced_core::event::Status::Ignored;
                };
                shell.publish((self.on_event)(OverlayEvent::Pressed(local_point(pos, bounds))));
                cosmic::iced_core::event::Status::Captured
            }
            mouse::Event::ButtonPressed(mouse::Button::Right) => {
                shell.publish((self.on_event)(OverlayEvent::Cancelled));
                cosmic::iced_core::event::Status::Captured
            }
            mouse::Event::CursorMoved { position } if self.is_dragging() => {
                shell.publish((self.on_event)(OverlayEvent::Dragged(local_point(
                    position, bounds,
                ))));
                cosmic::iced_core::event::Status::Captured
            }
            mouse::Event::ButtonReleased(mouse::Button::Left) if self.is_dragging() => {
                // Positions outside the surface are clamped to its edge
                shell.publish((self.on_event)(OverlayEvent::Released(
                    cursor.position().map(|pos| local_point(pos, bounds)),
                    (bounds.width, bounds.height),
                )));
                cosmic::iced_core::event::Status::Captured
            }
            _ => cosmic::iced_core::event::Status::Ignored,
        }
    }

    fn draw(
        &self,
        _tree: &cosmic::iced_core::widget::Tree,
        renderer: &mut cosmic::Renderer,
        theme: &cosmic::Theme,
        _style: &cosmic::iced_core::renderer::Style,
        layout: cosmic::iced_core::Layout<'_>,
        _cursor: cosmic::iced_core::mouse::Cursor,
        _viewport: &cosmic::iced_core::Rectangle,
    ) {
        let cosmic = theme.cosmic();
        let accent = Color::from(cosmic.accent_color());
        let bounds = layout.bounds();

        // Letterbox background
        renderer.fill_quad(
            Quad {
                bounds,
                border: Border::default(),
                shadow: Shadow::default(),
            },
            Color::BLACK,
        );

        let Some(mapping) = ImageMapping::fit((bounds.width, bounds.height), self.image_size)
        else {
            return;
        };
        let (x, y, w, h) = mapping.drawn_bounds();
        let image_bounds = Rectangle::new(
            IcedPoint::new(bounds.x + x, bounds.y + y),
            Size::new(w, h),
        );
        cosmic::iced_core::image::Renderer::draw_image(
            renderer,
            self.image.clone(),
            cosmic::iced_core::image::FilterMethod::Linear,
            image_bounds,
            cosmic::iced::Radians(0.0),
            1.0,
            [0.0, 0.0, 0.0, 0.0],
        );

        let mut dim = Color::BLACK;
        dim.a = DIM_ALPHA;

        let Some(sel) = self.selection.filter(|r| !r.is_empty()) else {
            renderer.fill_quad(
                Quad {
                    bounds,
                    border: Border::default(),
                    shadow: Shadow::default(),
                },
                dim,
            );
            return;
        };

        let inner = Rectangle::new(
            IcedPoint::new(bounds.x + sel.left as f32, bounds.y + sel.top as f32),
            Size::new(sel.width() as f32, sel.height() as f32),
        );
        for band in outside_bands(bounds, inner) {
            renderer.fill_quad(
                Quad {
                    bounds: band,
                    border: Border::default(),
                    shadow: Shadow::default(),
                },
                dim,
            );
        }

        renderer.fill_quad(
            Quad {
                bounds: inner,
                border: Border {
                    radius: 0.0.into(),
                    width: BORDER_WIDTH,
                    color: accent,
                },
                shadow: Shadow::default(),
            },
            Color::TRANSPARENT,
        );
    }
}

impl<'a, Message> From<SelectionOverlay<Message>> for cosmic::Element<'a, Message>
where
    Message: 'static,
{
    fn from(w: SelectionOverlay<Message>) -> cosmic::Element<'a, Message> {
        cosmic::Element::new(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rectangle {
        Rectangle::new(IcedPoint::new(x, y), Size::new(w, h))
    }

    #[test]
    fn test_local_point_clamps_to_bounds() {
        let bounds = rect(100.0, 50.0, 800.0, 600.0);
        assert_eq!(
            local_point(IcedPoint::new(150.4, 60.6), bounds),
            Point::new(50, 11)
        );
        assert_eq!(
            local_point(IcedPoint::new(10.0, 2000.0), bounds),
            Point::new(0, 600)
        );
    }

    #[test]
    fn test_outside_bands_cover_the_rest() {
        let outer = rect(0.0, 0.0, 100.0, 100.0);
        let inner = rect(20.0, 30.0, 50.0, 40.0);
        let bands = outside_bands(outer, inner);
        assert_eq!(bands.len(), 4);
        let area: f32 = bands.iter().map(|b| b.width * b.height).sum();
        assert_eq!(area, 100.0 * 100.0 - 50.0 * 40.0);
    }

    #[test]
    fn test_outside_bands_touching_edges() {
        let outer = rect(0.0, 0.0, 100.0, 100.0);
        let bands = outside_bands(outer, rect(0.0, 0.0, 100.0, 60.0));
        assert_eq!(bands, vec![rect(0.0, 60.0, 100.0, 40.0)]);
    }

    #[test]
    fn test_outside_bands_disjoint_dims_everything() {
        let outer = rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(outside_bands(outer, rect(50.0, 50.0, 5.0, 5.0)), vec![outer]);
    }
}
