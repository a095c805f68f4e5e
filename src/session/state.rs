//! State of the main window and the selection session

use cosmic::iced::window;

use crate::capture::ScreenshotImage;
use crate::domain::{Point, Selection};
use crate::fl;
use crate::ollama;

use super::messages::ServerFailure;

/// Where the current explain round stands.
///
/// `Idle → Selecting → Captured → Displayed`; any failure goes back to `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    /// Screen is being grabbed or the overlay waits for a drag
    Selecting,
    /// Region is cut out; OCR and the explanation request are running
    Captured,
    /// Explanation is shown
    Displayed,
}

/// The full-screen overlay showing the frozen screen
#[derive(Debug, Clone)]
pub struct Overlay {
    pub id: window::Id,
    pub screenshot: ScreenshotImage,
    /// Present between pointer press and release
    pub selection: Option<Selection>,
}

impl Overlay {
    pub fn new(screenshot: ScreenshotImage) -> Self {
        Self {
            id: window::Id::unique(),
            screenshot,
            selection: None,
        }
    }

    pub fn press(&mut self, at: Point) {
        self.selection = Some(Selection::start(at));
    }

    pub fn drag(&mut self, to: Point) {
        if let Some(selection) = self.selection.as_mut() {
            selection.update(to);
        }
    }

    /// Take the selection out; the overlay is done after this.
    ///
    /// Without a release position the selection ends where it was last dragged.
    pub fn release(&mut self, at: Option<Point>) -> Option<Selection> {
        let mut selection = self.selection.take()?;
        if let Some(at) = at {
            selection.update(at);
        }
        Some(selection)
    }
}

#[derive(Debug, Default)]
pub struct Session {
    pub phase: Phase,
    pub overlay: Option<Overlay>,
    /// Model names as returned by the server
    pub models: Vec<String>,
    /// Dropdown entries; a single placeholder when `models` is empty
    pub model_labels: Vec<String>,
    pub selected_model: Option<usize>,
    /// Text shown in the result area
    pub result: String,
    /// `result` holds a "cannot connect" error
    pub server_unreachable: bool,
}

impl Session {
    pub fn new() -> Self {
        let mut session = Self::default();
        session.set_models(Vec::new(), None);
        session
    }

    /// True while a capture, OCR run or request is in flight
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Selecting | Phase::Captured)
    }

    /// Enter `Selecting` unless a round is already running
    pub fn begin_selection(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }
        self.phase = Phase::Selecting;
        self.result = fl!("capturing-screen");
        true
    }

    /// Selected region was cut out of the screenshot
    pub fn captured(&mut self) {
        self.phase = Phase::Captured;
        self.overlay = None;
        self.result = fl!("recognizing-text");
    }

    pub fn display(&mut self, text: String) {
        self.phase = Phase::Displayed;
        self.result = text;
        self.server_unreachable = false;
    }

    /// Abort the running round and show `message`
    pub fn fail(&mut self, message: String) {
        self.phase = Phase::Idle;
        self.overlay = None;
        self.result = message;
        self.server_unreachable = false;
    }

    fn fail_server(&mut self, failure: ServerFailure) {
        self.fail(failure.message);
        self.server_unreachable = failure.unreachable;
    }

    /// Decide what to do with recognized text.
    ///
    /// Returns the model to ask, with the result area set to the loading
    /// message. Returns `None` when the round ends here: no text was found or
    /// no model is available.
    pub fn prepare_explain(&mut self, text: &str) -> Option<String> {
        if text.trim().is_empty() {
            self.display(fl!("no-text-detected"));
            return None;
        }
        let Some(model) = self.current_model().map(str::to_string) else {
            self.fail(fl!("error-no-models"));
            return None;
        };
        self.result = fl!("loading-explanation");
        Some(model)
    }

    /// Show the answer for `text`, or the failure
    pub fn explained(&mut self, text: &str, result: Result<String, ServerFailure>) {
        match result {
            Ok(explanation) => self.display(ollama::format_explanation(text, &explanation)),
            Err(failure) => self.fail_server(failure),
        }
    }

    /// Apply a model listing, keeping `preferred` selected if still offered
    pub fn models_loaded(
        &mut self,
        result: Result<Vec<String>, ServerFailure>,
        preferred: Option<&str>,
    ) {
        match result {
            Ok(models) => {
                self.set_models(models, preferred);
                // The server answers again; a stale connect error goes away
                if !self.is_busy() && self.server_unreachable {
                    self.result.clear();
                    self.server_unreachable = false;
                }
            }
            Err(failure) => {
                self.set_models(Vec::new(), None);
                if !self.is_busy() {
                    self.result = failure.message;
                    self.server_unreachable = failure.unreachable;
                }
            }
        }
    }

    /// Replace the model list, keeping `preferred` selected if still offered
    pub fn set_models(&mut self, models: Vec<String>, preferred: Option<&str>) {
        self.selected_model = if models.is_empty() {
            None
        } else {
            preferred
                .and_then(|p| models.iter().position(|m| m == p))
                .or(Some(0))
        };
        self.model_labels = if models.is_empty() {
            vec![fl!("no-models-found")]
        } else {
            models.clone()
        };
        self.models = models;
    }

    pub fn select_model(&mut self, index: usize) -> Option<&str> {
        if index < self.models.len() {
            self.selected_model = Some(index);
        }
        self.current_model()
    }

    pub fn current_model(&self) -> Option<&str> {
        self.selected_model
            .and_then(|i| self.models.get(i))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn overlay() -> Overlay {
        Overlay::new(ScreenshotImage::new(RgbaImage::new(4, 4)))
    }

    #[test]
    fn test_phase_round_trip() {
        let mut s = Session::new();
        assert_eq!(s.phase, Phase::Idle);
        assert!(s.begin_selection());
        assert_eq!(s.phase, Phase::Selecting);
        assert!(s.is_busy());
        // A second click while busy is ignored
        assert!(!s.begin_selection());

        s.overlay = Some(overlay());
        s.captured();
        assert_eq!(s.phase, Phase::Captured);
        assert!(s.overlay.is_none());

        s.display("Selected text: a\n\nExplanation:\nb".into());
        assert_eq!(s.phase, Phase::Displayed);
        assert!(!s.is_busy());
        assert!(s.begin_selection());
    }

    #[test]
    fn test_fail_returns_to_idle() {
        let mut s = Session::new();
        s.begin_selection();
        s.overlay = Some(overlay());
        s.fail("Error: boom".into());
        assert_eq!(s.phase, Phase::Idle);
        assert!(s.overlay.is_none());
        assert_eq!(s.result, "Error: boom");
    }

    #[test]
    fn test_empty_model_list_shows_placeholder() {
        let s = Session::new();
        assert_eq!(s.model_labels, vec!["No models found".to_string()]);
        assert_eq!(s.selected_model, None);
        assert_eq!(s.current_model(), None);
    }

    #[test]
    fn test_preferred_model_is_kept() {
        let mut s = Session::new();
        let models = vec!["a:latest".to_string(), "b:7b".to_string()];
        s.set_models(models.clone(), Some("b:7b"));
        assert_eq!(s.current_model(), Some("b:7b"));

        s.set_models(models, Some("gone:1b"));
        assert_eq!(s.current_model(), Some("a:latest"));
    }

    #[test]
    fn test_select_model_ignores_out_of_range() {
        let mut s = Session::new();
        s.set_models(vec!["a".into(), "b".into()], None);
        assert_eq!(s.select_model(1), Some("b"));
        assert_eq!(s.select_model(9), Some("b"));
    }

    #[test]
    fn test_overlay_drag_and_release() {
        let mut o = overlay();
        // Motion before a press is ignored
        o.drag(Point::new(3, 3));
        assert!(o.selection.is_none());

        o.press(Point::new(30, 40));
        o.drag(Point::new(10, 5));
        let sel = o.release(Some(Point::new(12, 8))).unwrap();
        assert_eq!(sel.finish(), Some(crate::domain::Rect::new(12, 8, 30, 40)));
        assert!(o.selection.is_none());
        assert!(o.release(Some(Point::new(0, 0))).is_none());
    }

    #[test]
    fn test_release_without_position_keeps_last_drag() {
        let mut o = overlay();
        o.press(Point::new(10, 10));
        o.drag(Point::new(200, 120));
        let sel = o.release(None).unwrap();
        assert_eq!(sel.finish(), Some(crate::domain::Rect::new(10, 10, 200, 120)));
    }

    fn captured_session(models: &[&str]) -> Session {
        let mut s = Session::new();
        s.set_models(models.iter().map(|m| m.to_string()).collect(), None);
        s.begin_selection();
        s.overlay = Some(overlay());
        s.captured();
        s
    }

    fn unreachable() -> ServerFailure {
        ServerFailure {
            message: "Error: Cannot connect to Ollama. Is it running?".into(),
            unreachable: true,
        }
    }

    #[test]
    fn test_prepare_explain_empty_text_sends_nothing() {
        let mut s = captured_session(&["llama3.2:latest"]);
        assert_eq!(s.prepare_explain("  \n "), None);
        assert_eq!(s.result, "No text detected");
        assert_eq!(s.phase, Phase::Displayed);
        assert!(!s.is_busy());
    }

    #[test]
    fn test_prepare_explain_without_models() {
        let mut s = captured_session(&[]);
        assert_eq!(s.prepare_explain("carpe diem"), None);
        assert_eq!(
            s.result,
            "Error: No Ollama models available. Is Ollama running?"
        );
        assert_eq!(s.phase, Phase::Idle);
    }

    #[test]
    fn test_prepare_explain_shows_loading() {
        let mut s = captured_session(&["a:latest", "b:7b"]);
        s.select_model(1);
        assert_eq!(s.prepare_explain("carpe diem").as_deref(), Some("b:7b"));
        assert_eq!(s.result, "Loading explanation...");
        assert!(s.is_busy());
    }

    #[test]
    fn test_explained_formats_answer_as_is() {
        let mut s = captured_session(&["a"]);
        s.explained("lorem", Ok("Placeholder text.\n".into()));
        assert_eq!(
            s.result,
            "Selected text: lorem\n\nExplanation:\nPlaceholder text.\n"
        );
        assert_eq!(s.phase, Phase::Displayed);
    }

    #[test]
    fn test_connect_error_cleared_when_server_returns() {
        let mut s = Session::new();
        s.models_loaded(Err(unreachable()), None);
        assert!(s.server_unreachable);
        assert_eq!(s.result, unreachable().message);

        s.models_loaded(Ok(vec!["a".into()]), None);
        assert!(s.result.is_empty());
        assert!(!s.server_unreachable);
        assert_eq!(s.current_model(), Some("a"));
    }

    #[test]
    fn test_other_errors_survive_a_model_refresh() {
        let mut s = captured_session(&["a"]);
        s.explained(
            "lorem",
            Err(ServerFailure {
                message: "Error: Failed to get response from Ollama (Status: 500)".into(),
                unreachable: false,
            }),
        );
        s.models_loaded(Ok(vec!["a".into()]), None);
        assert_eq!(
            s.result,
            "Error: Failed to get response from Ollama (Status: 500)"
        );
    }

    #[test]
    fn test_failed_explanation_after_unreachable_server() {
        let mut s = captured_session(&["a"]);
        s.explained("lorem", Err(unreachable()));
        assert_eq!(s.phase, Phase::Idle);
        s.models_loaded(Ok(vec!["a".into()]), None);
        assert!(s.result.is_empty());
    }
}
