//! Explainer client for a local Ollama server
//!
//! - `GET /api/tags` lists the installed models
//! - `POST /api/generate` with `stream: false` returns the explanation

pub mod client;
pub mod error;
pub mod prompt;

pub use client::{DEFAULT_SERVER_URL, OllamaClient};
pub use error::OllamaError;
pub use prompt::{DEFAULT_PROMPT_TEMPLATE, explain_prompt, format_explanation};
