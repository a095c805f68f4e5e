//! Main window: model picker, selection trigger and result area

use cosmic::Element;
use cosmic::iced::Length;
use cosmic::iced_widget::{column, row};
use cosmic::widget::{button, container, dropdown, icon, scrollable, text, tooltip};

use crate::fl;
use crate::session::{Msg, Overlay, OverlayEvent, Session};

use super::selection_overlay::SelectionOverlay;

/// Build the main window content
pub fn main_view(session: &Session) -> Element<'_, Msg> {
    let spacing = cosmic::theme::active().cosmic().spacing;
    let busy = session.is_busy();

    // The placeholder entry is shown selected when the list is empty
    let selected = session.selected_model.or(Some(0));
    let model_picker = dropdown(&session.model_labels, selected, Msg::ModelSelected)
        .width(Length::Fill);

    let refresh = tooltip(
        button::icon(icon::from_name("view-refresh-symbolic"))
            .on_press_maybe((!busy).then_some(Msg::RefreshModels)),
        text::body(fl!("refresh-models")),
        tooltip::Position::Bottom,
    );

    let model_row = row![model_picker, refresh]
        .spacing(spacing.space_xs)
        .align_y(cosmic::iced_core::Alignment::Center)
        .width(Length::Fill);

    let select_button = button::suggested(fl!("select-text"))
        .on_press_maybe((!busy).then_some(Msg::StartSelection))
        .width(Length::Fill);

    let result = container(scrollable(
        container(text::body(session.result.as_str()).width(Length::Fill))
            .padding(spacing.space_xs),
    ))
    .class(cosmic::theme::Container::Card)
    .width(Length::Fill)
    .height(Length::Fill);

    column![model_row, select_button, result]
        .spacing(spacing.space_s)
        .padding(spacing.space_s)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Build the full-screen overlay content for the frozen screenshot
pub fn overlay_view(overlay: &Overlay) -> Element<'_, Msg> {
    let screenshot = &overlay.screenshot;
    SelectionOverlay::new(
        screenshot.handle.clone(),
        (screenshot.width(), screenshot.height()),
        overlay.selection.map(|s| s.rect()),
        |event: OverlayEvent| Msg::Overlay(event),
    )
    .into()
}
