//! Message types for the explain session

use crate::capture::ScreenshotImage;
use crate::domain::Point;
use crate::ollama::OllamaError;

/// Pointer input reported by the selection overlay, in overlay coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayEvent {
    Pressed(Point),
    Dragged(Point),
    /// Release position plus the overlay viewport size.
    /// `None` when the cursor left the surface; the last dragged point is used.
    Released(Option<Point>, (f32, f32)),
    Cancelled,
}

/// A failed Ollama call, reduced to what the window needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerFailure {
    pub message: String,
    /// The server could not be reached at all
    pub unreachable: bool,
}

impl From<&OllamaError> for ServerFailure {
    fn from(err: &OllamaError) -> Self {
        Self {
            message: err.user_message(),
            unreachable: err.is_connect(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Msg {
    /// Result of `GET /api/tags`
    ModelsLoaded(Result<Vec<String>, ServerFailure>),
    RefreshModels,
    ModelSelected(usize),
    /// "Select Text" pressed
    StartSelection,
    ScreenCaptured(Result<ScreenshotImage, String>),
    Overlay(OverlayEvent),
    TextRecognized(Result<String, String>),
    Explained {
        text: String,
        result: Result<String, ServerFailure>,
    },
    Keyboard(cosmic::iced::keyboard::Event),
}
