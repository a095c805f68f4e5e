//! Core application module
//!
//! This module contains the Cosmic Application implementation: the main
//! window, the selection overlay surface and the message loop tying capture,
//! OCR and the explainer client together.

pub mod app;
