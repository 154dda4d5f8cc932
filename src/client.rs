use async_trait::async_trait;
use std::time::Instant;
use tracing::debug;

use crate::error::GenerateError;
use crate::models::{GenerateRequest, GenerateResponse, Generation};

/// The remote "generate" call the cache sits in front of.
#[async_trait]
pub trait Generator {
    async fn generate(&self, prompt: &str, model: &str) -> Result<Generation, GenerateError>;
}

// Client for a single Ollama server
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
}

impl OllamaClient {
    // accepts "localhost:11434" as well as "http://localhost:11434/"
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        let url = base_url.trim().trim_end_matches('/');
        // add http:// if not present
        let base_url = if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("http://{}", url)
        };
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Generator for OllamaClient {
    async fn generate(&self, prompt: &str, model: &str) -> Result<Generation, GenerateError> {
        let url = format!("{}/api/generate", self.base_url);
        debug!(%url, model, "Calling Ollama");

        let start = Instant::now();
        let res = self
            .http
            .post(&url)
            .json(&GenerateRequest::new(prompt, model))
            .send()
            .await
            .map_err(|source| GenerateError::Request { url: url.clone(), source })?;

        if !res.status().is_success() {
            return Err(GenerateError::Status { url, status: res.status() });
        }

        let body = res.json::<GenerateResponse>().await.map_err(GenerateError::Decode)?;
        let elapsed = start.elapsed();

        Ok(Generation { text: body.response, elapsed })
    }
}
