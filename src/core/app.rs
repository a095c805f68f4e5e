use crate::capture::{ScreenshotImage, ocr, portal};
use crate::config::SnapExplainConfig;
use crate::domain::ImageMapping;
use crate::fl;
use crate::ollama::{self, OllamaClient};
use crate::session::{Msg, Overlay, OverlayEvent, ServerFailure, Session, shortcuts};
use crate::widget;
use cosmic::iced_core::layout::Limits;
use cosmic::iced_runtime::platform_specific::wayland::layer_surface::{
    IcedOutput, SctkLayerSurfaceSettings,
};
use cosmic::iced_winit::commands::layer_surface::{destroy_layer_surface, get_layer_surface};
use cosmic::{
    ApplicationExt, Task, app,
    iced::window,
    iced_futures::{Subscription, event::listen_with},
};
use cosmic_client_toolkit::sctk::shell::wlr_layer::{Anchor, KeyboardInteractivity, Layer};

type AppTask = Task<cosmic::Action<Msg>>;

pub(crate) fn run() -> cosmic::iced::Result {
    let settings = cosmic::app::Settings::default().size(cosmic::iced::Size::new(400.0, 500.0));
    cosmic::app::run::<App>(settings, ())
}

pub struct App {
    pub core: app::Core,
    pub config: SnapExplainConfig,
    /// `None` when the HTTP client could not be built
    pub client: Option<OllamaClient>,
    pub session: Session,
}

impl App {
    fn load_models(&self) -> AppTask {
        let Some(client) = self.client.clone() else {
            return Task::none();
        };
        cosmic::Task::perform(
            async move {
                client.list_models().await.map_err(|e| {
                    log::error!("Listing models at {} failed: {e}", client.base_url());
                    ServerFailure::from(&e)
                })
            },
            |result| cosmic::Action::App(Msg::ModelsLoaded(result)),
        )
    }

    fn start_selection(&mut self) -> AppTask {
        if !self.session.begin_selection() {
            log::debug!("Selection requested while busy, ignoring");
            return Task::none();
        }
        cosmic::Task::perform(
            async {
                portal::capture_screen().await.map_err(|e| {
                    log::error!("Screen capture failed: {e:#}");
                    fl!("error-capture", reason = e.to_string())
                })
            },
            |result| cosmic::Action::App(Msg::ScreenCaptured(result)),
        )
    }

    fn open_overlay(&mut self, screenshot: ScreenshotImage) -> AppTask {
        let overlay = Overlay::new(screenshot);
        let id = overlay.id;
        self.session.overlay = Some(overlay);
        get_layer_surface(SctkLayerSurfaceSettings {
            id,
            layer: Layer::Overlay,
            keyboard_interactivity: KeyboardInteractivity::Exclusive,
            input_zone: None,
            anchor: Anchor::all(),
            output: IcedOutput::Active,
            namespace: "snapexplain".to_string(),
            size: Some((None, None)),
            exclusive_zone: -1,
            size_limits: Limits::NONE.min_height(1.0).min_width(1.0),
            ..Default::default()
        })
    }

    /// Close the overlay and show `message` in the result area
    fn cancel_overlay(&mut self, message: String) -> AppTask {
        let id = self.session.overlay.as_ref().map(|o| o.id);
        self.session.fail(message);
        match id {
            Some(id) => destroy_layer_surface(id),
            None => Task::none(),
        }
    }

    fn handle_overlay(&mut self, event: OverlayEvent) -> AppTask {
        let Some(overlay) = self.session.overlay.as_mut() else {
            return Task::none();
        };
        match event {
            OverlayEvent::Pressed(p) => {
                overlay.press(p);
                Task::none()
            }
            OverlayEvent::Dragged(p) => {
                overlay.drag(p);
                Task::none()
            }
            OverlayEvent::Cancelled => self.cancel_overlay(fl!("selection-cancelled")),
            OverlayEvent::Released(p, viewport) => {
                let image_size = (overlay.screenshot.width(), overlay.screenshot.height());
                let pixel_rect = overlay
                    .release(p)
                    .and_then(|selection| selection.finish())
                    .and_then(|rect| ImageMapping::fit(viewport, image_size)?.to_image(rect));
                let Some(pixel_rect) = pixel_rect else {
                    log::info!("Empty selection, closing overlay");
                    return self.cancel_overlay(fl!("selection-cancelled"));
                };

                let id = overlay.id;
                let cropped = match overlay.screenshot.crop(pixel_rect) {
                    Ok(img) => img,
                    Err(e) => {
                        log::error!("Cropping selection failed: {e:#}");
                        return self.cancel_overlay(fl!("error-capture", reason = e.to_string()));
                    }
                };
                log::info!(
                    "Selected {}x{} pixels at ({}, {})",
                    cropped.width(),
                    cropped.height(),
                    pixel_rect.left,
                    pixel_rect.top
                );
                self.session.captured();

                let language = self.config.ocr_language.clone();
                let recognize = cosmic::Task::perform(
                    async move {
                        match tokio::task::spawn_blocking(move || {
                            ocr::recognize(&cropped, &language)
                        })
                        .await
                        {
                            Ok(Ok(text)) => Ok(text),
                            Ok(Err(e)) => Err(e.user_message()),
                            Err(e) => Err(fl!("error-ocr", reason = e.to_string())),
                        }
                    },
                    |result| cosmic::Action::App(Msg::TextRecognized(result)),
                );
                cosmic::Task::batch([destroy_layer_surface(id), recognize])
            }
        }
    }

    fn explain(&mut self, text: String) -> AppTask {
        let Some(model) = self.session.prepare_explain(&text) else {
            return Task::none();
        };
        let Some(client) = self.client.clone() else {
            self.session.fail(fl!("error-cannot-connect"));
            return Task::none();
        };
        let prompt = ollama::explain_prompt(&self.config.prompt_template, &text);

        cosmic::Task::perform(
            async move {
                let result = client.generate(&model, &prompt).await.map_err(|e| {
                    log::error!("Explanation with {model} failed: {e}");
                    ServerFailure::from(&e)
                });
                (text, result)
            },
            |(text, result)| cosmic::Action::App(Msg::Explained { text, result }),
        )
    }

    fn select_model(&mut self, index: usize) {
        let Some(model) = self.session.select_model(index) else {
            return;
        };
        if self.config.last_model.as_deref() != Some(model) {
            self.config.last_model = Some(model.to_string());
            self.config.save();
        }
    }
}

impl cosmic::Application for App {
    type Executor = cosmic::executor::Default;

    type Flags = ();

    type Message = Msg;

    const APP_ID: &'static str = SnapExplainConfig::ID;

    fn core(&self) -> &app::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut app::Core {
        &mut self.core
    }

    fn init(core: app::Core, _flags: Self::Flags) -> (Self, AppTask) {
        let config = SnapExplainConfig::load();
        log::info!("Using Ollama at {}", config.server_url);

        match ocr::tesseract_available() {
            Ok(version) => log::info!("Found tesseract {version}"),
            // Reported on the console only; the user sees a message once OCR is attempted
            Err(e) => log::error!("{e}"),
        }

        let mut session = Session::new();
        let client = match OllamaClient::new(&config.server_url, config.request_timeout()) {
            Ok(client) => Some(client),
            Err(e) => {
                log::error!("Could not create HTTP client: {e}");
                session.result = e.user_message();
                None
            }
        };

        let mut app = Self {
            core,
            config,
            client,
            session,
        };
        app.set_header_title(fl!("app-title"));

        let mut tasks = vec![app.load_models()];
        if let Some(id) = app.core.main_window_id() {
            tasks.push(app.set_window_title(fl!("app-title"), id));
        }
        (app, Task::batch(tasks))
    }

    fn view(&self) -> cosmic::Element<'_, Self::Message> {
        widget::main_view(&self.session)
    }

    fn view_window(&self, id: window::Id) -> cosmic::Element<'_, Self::Message> {
        match &self.session.overlay {
            Some(overlay) if overlay.id == id => widget::overlay_view(overlay),
            _ => cosmic::widget::horizontal_space()
                .width(cosmic::iced_core::Length::Fixed(1.0))
                .into(),
        }
    }

    fn update(&mut self, message: Self::Message) -> AppTask {
        match message {
            Msg::ModelsLoaded(result) => {
                self.session
                    .models_loaded(result, self.config.last_model.as_deref());
                Task::none()
            }
            Msg::RefreshModels => self.load_models(),
            Msg::ModelSelected(index) => {
                self.select_model(index);
                Task::none()
            }
            Msg::StartSelection => self.start_selection(),
            Msg::ScreenCaptured(Ok(screenshot)) => {
                if self.session.overlay.is_some() {
                    return Task::none();
                }
                self.open_overlay(screenshot)
            }
            Msg::ScreenCaptured(Err(message)) => {
                self.session.fail(message);
                Task::none()
            }
            Msg::Overlay(event) => self.handle_overlay(event),
            Msg::TextRecognized(Ok(text)) => self.explain(text),
            Msg::TextRecognized(Err(message)) => {
                self.session.fail(message);
                Task::none()
            }
            Msg::Explained { text, result } => {
                self.session.explained(&text, result);
                Task::none()
            }
            Msg::Keyboard(cosmic::iced::keyboard::Event::KeyPressed { key, modifiers, .. }) => {
                match shortcuts::handle_key_event(key, modifiers, self.session.overlay.is_some()) {
                    Some(msg) => self.update(msg),
                    None => Task::none(),
                }
            }
            Msg::Keyboard(_) => Task::none(),
        }
    }

    fn subscription(&self) -> Subscription<Self::Message> {
        listen_with(|e, _, _| match e {
            cosmic::iced_core::Event::Keyboard(keyboard_event) => Some(Msg::Keyboard(keyboard_event)),
            _ => None,
        })
    }
}
