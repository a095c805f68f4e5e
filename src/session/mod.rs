//! Session state and messages
//!
//! This module contains:
//! - Message types for the main window and the overlay
//! - Phase tracking and model list state
//! - Keyboard shortcuts

pub mod messages;
pub mod shortcuts;
pub mod state;

pub use messages::{Msg, OverlayEvent, ServerFailure};
pub use state::{Overlay, Phase, Session};
