//! HTTP client for a local Ollama instance.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::OllamaError;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:11434";

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Cheap to clone; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, OllamaError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(OllamaError::Request)?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Names of the locally installed models, in server order.
    ///
    /// A non-success status yields an empty list; only transport failures are errors.
    pub async fn list_models(&self) -> Result<Vec<String>, OllamaError> {
        let resp = self
            .http
            .get(self.endpoint("/api/tags"))
            .send()
            .await
            .map_err(|e| OllamaError::from_reqwest(e, &self.base_url))?;

        let status = resp.status();
        if !status.is_success() {
            log::warn!("Ollama /api/tags returned {status}, treating as no models");
            return Ok(Vec::new());
        }

        let tags: TagsResponse = resp
            .json()
            .await
            .map_err(|e| OllamaError::from_reqwest(e, &self.base_url))?;
        let names: Vec<String> = tags.models.into_iter().map(|m| m.name).collect();
        log::info!("Ollama lists {} models", names.len());
        Ok(names)
    }

    /// Run a single non-streaming generation and return the response text
    pub async fn generate(&self, model: &str, prompt: &str) -> Result<String, OllamaError> {
        let body = GenerateRequest {
            model,
            prompt,
            stream: false,
        };

        log::info!(
            "Requesting explanation from {model} ({} prompt chars)",
            prompt.chars().count()
        );
        let resp = self
            .http
            .post(self.endpoint("/api/generate"))
            .json(&body)
            .send()
            .await
            .map_err(|e| OllamaError::from_reqwest(e, &self.base_url))?;

        let status = resp.status();
        if !status.is_success() {
            log::error!("Ollama /api/generate returned {status}");
            return Err(OllamaError::Status(status.as_u16()));
        }

        let out: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| OllamaError::from_reqwest(e, &self.base_url))?;
        Ok(out.response)
    }
}
