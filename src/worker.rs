use std::time::Instant;
use tracing::{info, warn};

use crate::cache::ResponseCache;
use crate::client::Generator;
use crate::error::{CacheError, GenerateError};
use crate::metrics::{CACHE_HITS, CACHE_MISSES, CACHE_SIZE, GENERATE_LATENCY, REQUEST_TOTAL};
use crate::models::{Answer, Source};

/// Answers prompts from the cache when it can and from `G` when it must.
///
/// Only a miss reaches the generator, and every successful remote answer is
/// stored before it is returned. With `use_cache` off the cache is neither
/// read nor written.
pub struct CachedGenerator<G> {
    generator: G,
    cache: ResponseCache,
    use_cache: bool,
}

impl<G: Generator> CachedGenerator<G> {
    pub fn new(generator: G, cache: ResponseCache) -> Self {
        CACHE_SIZE.set(cache.len() as f64);
        Self {
            generator,
            cache,
            use_cache: true,
        }
    }

    pub fn use_cache(mut self, enabled: bool) -> Self {
        self.use_cache = enabled;
        self
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Empty the cache and delete its file, keeping the size gauge in step.
    pub fn clear(&mut self) -> Result<(), CacheError> {
        let result = self.cache.clear();
        CACHE_SIZE.set(self.cache.len() as f64);
        result
    }

    pub fn into_cache(self) -> ResponseCache {
        self.cache
    }

    pub async fn respond(&mut self, prompt: &str, model: &str) -> Result<Answer, GenerateError> {
        REQUEST_TOTAL.inc();

        // check cache first
        if self.use_cache {
            let lookup = Instant::now();
            if let Some(entry) = self.cache.get(prompt, model) {
                let text = entry.response.clone();
                let original_latency = entry.original_latency;
                let elapsed = lookup.elapsed();
                CACHE_HITS.inc();
                info!(
                    original = original_latency,
                    retrieval = elapsed.as_secs_f64(),
                    "Cache hit"
                );
                return Ok(Answer {
                    text,
                    elapsed,
                    source: Source::Cache { original_latency },
                });
            }
            CACHE_MISSES.inc();
        }

        let generation = self.generator.generate(prompt, model).await?;
        let latency = generation.elapsed.as_secs_f64();
        GENERATE_LATENCY.observe(latency);

        if self.use_cache {
            // durability lost for this entry only, the answer is still good
            if let Err(e) = self.cache.put(prompt, model, generation.text.clone(), latency) {
                warn!(error = %e, "Response kept in memory only");
            } else {
                info!(took = latency, "Response cached for future use");
            }
            CACHE_SIZE.set(self.cache.len() as f64);
        }

        Ok(Answer {
            text: generation.text,
            elapsed: generation.elapsed,
            source: Source::Remote,
        })
    }
}
