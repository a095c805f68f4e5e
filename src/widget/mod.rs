//! Custom widgets and view builders

pub mod main_view;
pub mod selection_overlay;

pub use main_view::{main_view, overlay_view};
