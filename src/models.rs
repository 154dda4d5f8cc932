use serde::{Deserialize, Serialize};
use std::time::Duration;

// Ollama API request format
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    #[serde(default)]
    pub stream: bool,
}

impl GenerateRequest {
    // non-streaming request, the only kind this client sends
    pub fn new(prompt: &str, model: &str) -> Self {
        Self {
            model: model.to_string(),
            prompt: prompt.to_string(),
            stream: false,
        }
    }
}

// Ollama API response format (other fields are ignored)
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GenerateResponse {
    #[serde(default)]
    pub model: String,
    #[serde(default = "no_response")]
    pub response: String,
}

fn no_response() -> String {
    "No response".to_string()
}

// One completed remote call
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub text: String,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Remote,
    // original_latency is what the remote call took when the entry was made
    Cache { original_latency: f64 },
}

/// Text handed back to the caller plus where it came from.
///
/// `elapsed` is always measured for this call: the network round trip for
/// [`Source::Remote`], the lookup time for [`Source::Cache`].
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub text: String,
    pub elapsed: Duration,
    pub source: Source,
}

impl Answer {
    pub fn is_cached(&self) -> bool {
        matches!(self.source, Source::Cache { .. })
    }
}
