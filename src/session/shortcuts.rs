use cosmic::iced::keyboard::{Key, Modifiers, key::Named};

use super::messages::{Msg, OverlayEvent};

/// Map a key press to a message. `overlay_open` is true while the selection overlay is shown.
pub fn handle_key_event(key: Key, modifiers: Modifiers, overlay_open: bool) -> Option<Msg> {
    match key {
        Key::Named(Named::Escape) if overlay_open => Some(Msg::Overlay(OverlayEvent::Cancelled)),
        Key::Character(c) if c.as_str() == "r" && modifiers.control() && !overlay_open => {
            Some(Msg::RefreshModels)
        }
        Key::Named(Named::Enter) if modifiers.control() && !overlay_open => {
            Some(Msg::StartSelection)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_cancels_only_with_overlay() {
        assert!(matches!(
            handle_key_event(Key::Named(Named::Escape), Modifiers::empty(), true),
            Some(Msg::Overlay(OverlayEvent::Cancelled))
        ));
        assert!(handle_key_event(Key::Named(Named::Escape), Modifiers::empty(), false).is_none());
    }

    #[test]
    fn test_ctrl_r_refreshes_models() {
        assert!(matches!(
            handle_key_event(Key::Character("r".into()), Modifiers::CTRL, false),
            Some(Msg::RefreshModels)
        ));
        assert!(handle_key_event(Key::Character("r".into()), Modifiers::empty(), false).is_none());
        assert!(handle_key_event(Key::Character("r".into()), Modifiers::CTRL, true).is_none());
    }

    #[test]
    fn test_ctrl_enter_starts_selection() {
        assert!(matches!(
            handle_key_event(Key::Named(Named::Enter), Modifiers::CTRL, false),
            Some(Msg::StartSelection)
        ));
    }
}
