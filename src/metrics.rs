use lazy_static::lazy_static;
use prometheus::{
    Counter, Encoder, Gauge, Histogram, TextEncoder, register_counter, register_gauge,
    register_histogram,
};

lazy_static! {
    pub static ref REQUEST_TOTAL: Counter = register_counter!(
        "ollama_cache_requests_total",
        "Total number of answered prompts"
    )
    .unwrap();
    pub static ref CACHE_HITS: Counter =
        register_counter!("ollama_cache_hits_total", "Total cache hits").unwrap();
    pub static ref CACHE_MISSES: Counter =
        register_counter!("ollama_cache_misses_total", "Total cache misses").unwrap();
    pub static ref GENERATE_LATENCY: Histogram = register_histogram!(
        "ollama_generate_latency_seconds",
        "Latency of remote generate calls in seconds"
    )
    .unwrap();
    pub static ref CACHE_SIZE: Gauge =
        register_gauge!("ollama_cache_size", "Current number of items in cache").unwrap();
}

// Text exposition of everything registered above
pub fn render() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        tracing::warn!(error = %e, "Failed to encode metrics");
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_cache_metrics() {
        CACHE_HITS.inc();
        CACHE_SIZE.set(1.0);
        let text = render();
        assert!(text.contains("ollama_cache_hits_total"));
        assert!(text.contains("ollama_cache_size"));
    }
}
