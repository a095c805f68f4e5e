use crate::fl;

/// Failures talking to the local Ollama server
#[derive(Debug, thiserror::Error)]
pub enum OllamaError {
    #[error("cannot connect to Ollama at {url}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to Ollama timed out")]
    Timeout(#[source] reqwest::Error),
    #[error("Ollama responded with status {0}")]
    Status(u16),
    #[error("unexpected response from Ollama: {0}")]
    Decode(String),
    #[error("request to Ollama failed")]
    Request(#[source] reqwest::Error),
}

impl OllamaError {
    /// Classify a transport error from reqwest
    pub fn from_reqwest(err: reqwest::Error, url: &str) -> Self {
        if err.is_timeout() {
            OllamaError::Timeout(err)
        } else if err.is_connect() {
            OllamaError::Connect {
                url: url.to_string(),
                source: err,
            }
        } else if err.is_decode() {
            OllamaError::Decode(err.to_string())
        } else {
            OllamaError::Request(err)
        }
    }

    pub fn is_connect(&self) -> bool {
        matches!(self, OllamaError::Connect { .. })
    }

    /// Text shown in the result area of the main window
    pub fn user_message(&self) -> String {
        match self {
            OllamaError::Connect { .. } => fl!("error-cannot-connect"),
            OllamaError::Status(code) => fl!("error-bad-status", status = code.to_string()),
            OllamaError::Timeout(_) => fl!("error-timeout"),
            OllamaError::Decode(_) | OllamaError::Request(_) => {
                fl!("error-request", reason = self.to_string())
            }
        }
    }
}
