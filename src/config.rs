use clap::{Parser, Subcommand};
use std::path::PathBuf;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "ollama-cache")]
#[command(about = "Ollama client with a persistent response cache")]
pub struct Args {
    // Ollama server url
    #[arg(short, long, global = true, default_value = "http://localhost:11434")]
    pub ollama_url: String,

    // Model used when the command does not pick one
    #[arg(short, long, global = true, default_value = "llama3")]
    pub model: String,

    // File the cache is persisted to
    #[arg(short, long, global = true, default_value = "ollama_cache.json")]
    pub cache_file: PathBuf,

    // Skip the cache entirely (no lookups, no writes)
    #[arg(long, global = true)]
    pub no_cache: bool,

    // Print Prometheus metrics after the command
    #[arg(long, global = true)]
    pub metrics: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Answer one prompt
    Ask { prompt: String },
    /// Send the same prompt twice and compare timings
    Demo {
        #[arg(long, default_value = "Capital of India? Provide one word answer")]
        prompt: String,
        #[arg(long, default_value = "llama3.2:3b")]
        demo_model: String,
    },
    /// Show cache size and file info
    Stats,
    /// Remove all cached responses from memory and disk
    Clear,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["ollama-cache", "stats"]).unwrap();
        assert_eq!(args.ollama_url, "http://localhost:11434");
        assert_eq!(args.model, "llama3");
        assert_eq!(args.cache_file, PathBuf::from("ollama_cache.json"));
        assert!(!args.no_cache);
        assert!(matches!(args.command, Command::Stats));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "ollama-cache", "ask", "Capital of India?", "--model", "mistral", "--no-cache",
        ])
        .unwrap();
        assert_eq!(args.model, "mistral");
        assert!(args.no_cache);
        match args.command {
            Command::Ask { prompt } => assert_eq!(prompt, "Capital of India?"),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_demo_defaults() {
        let args = Args::try_parse_from(["ollama-cache", "demo"]).unwrap();
        match args.command {
            Command::Demo { prompt, demo_model } => {
                assert_eq!(prompt, "Capital of India? Provide one word answer");
                assert_eq!(demo_model, "llama3.2:3b");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
