use anyhow::Context;
use clap::Parser; // for cli
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ollama_cache::config::{Args, Command};
use ollama_cache::{CachedGenerator, OllamaClient, ResponseCache, metrics};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ollama_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // parse cli arguments
    let args = Args::parse();

    match &args.command {
        Command::Ask { prompt } => {
            let mut cached = cached_generator(&args);
            let answer = cached
                .respond(prompt, &args.model)
                .await
                .context("generate failed")?;
            println!("{}", answer.text);
            println!("Response time: {:.4} seconds", answer.elapsed.as_secs_f64());
        }
        Command::Demo { prompt, demo_model } => demo(&args, prompt, demo_model).await?,
        Command::Stats => print_stats(&ResponseCache::open(&args.cache_file)),
        Command::Clear => {
            ResponseCache::new(&args.cache_file)
                .clear()
                .context("could not clear cache")?;
            println!("Cache cleared from memory and disk");
        }
    }

    if args.metrics {
        print!("{}", metrics::render());
    }
    Ok(())
}

fn cached_generator(args: &Args) -> CachedGenerator<OllamaClient> {
    let cache = if args.no_cache {
        ResponseCache::new(&args.cache_file)
    } else {
        ResponseCache::open(&args.cache_file)
    };
    CachedGenerator::new(OllamaClient::new(&args.ollama_url), cache).use_cache(!args.no_cache)
}

fn print_stats(cache: &ResponseCache) {
    let stats = cache.stats();
    println!("Cache file: {}", cache.path().display());
    println!("Cached items: {}", stats.size);
    if stats.file_exists {
        println!("Cache file size: {} bytes", stats.file_size_bytes);
    }
    for key in &stats.sample_keys {
        println!("  {}", key);
    }
}

// Same prompt twice: the second call should come from the cache
async fn demo(args: &Args, prompt: &str, model: &str) -> anyhow::Result<()> {
    let mut cached = cached_generator(args);
    print_stats(cached.cache());

    println!("\nRequest: '{}'", prompt);
    let first = cached.respond(prompt, model).await.context("first request failed")?;
    println!("Response: {}", first.text);
    println!("Response time: {:.4} seconds", first.elapsed.as_secs_f64());

    println!("\nSame request again (should use cache)");
    let second = cached.respond(prompt, model).await.context("second request failed")?;
    println!("Response: {}", second.text);
    println!("Response time: {:.4} seconds", second.elapsed.as_secs_f64());

    println!("\nFinal cache stats: {} items", cached.cache().len());

    let (t1, t2) = (first.elapsed.as_secs_f64(), second.elapsed.as_secs_f64());
    if t1 > t2 && t2 > 0.0 {
        println!("Speed improvement: {:.0}x faster with cache", t1 / t2);
    }
    Ok(())
}
