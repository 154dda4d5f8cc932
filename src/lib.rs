//! Ollama client with a persistent, content-addressed response cache.
//!
//! [`ResponseCache`] stores one entry per (model, prompt) pair in a single
//! JSON file. [`CachedGenerator`] puts it in front of any [`Generator`] so
//! that a prompt already answered never reaches the server again.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod worker;

pub use cache::{CacheEntry, CacheKey, CacheStats, ResponseCache, derive_key};
pub use client::{Generator, OllamaClient};
pub use error::{CacheError, GenerateError};
pub use models::{Answer, Generation, Source};
pub use worker::CachedGenerator;
