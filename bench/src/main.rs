use anyhow::Result;
use clap::Parser;
use inference::{ClassificationResult, SentimentEngine};
use std::path::PathBuf;
use tracing::info;

mod report;

use report::LatencyReport;

/// Fixed corpus the benchmark cycles through.
const SAMPLE_TEXTS: &[&str] = &[
    "The battery life on this phone is absolutely incredible",
    "Terrible customer service, I will never shop here again",
    "The package arrived on Tuesday as scheduled",
    "I can't believe how good this movie was, easily the best this year",
    "The food was cold and the waiter was rude to us",
    "Meeting moved to three o'clock in the main conference room",
    "This update completely broke the app and deleted my saved data",
    "Honestly the best purchase I have made all year, worth every penny",
];

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Model variant config file
    #[arg(long, default_value = "config/sentiment_config.json")]
    config: PathBuf,

    /// Analyze a single text and exit
    #[arg(long)]
    text: Option<String>,

    /// Number of analyze calls to measure
    #[arg(long, default_value = "100")]
    iterations: usize,

    /// Warmup calls excluded from the statistics
    #[arg(long, default_value = "1")]
    warmup: usize,

    /// Print the report as JSON instead of the table
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    info!("Loading sentiment engine from {:?}", args.config);
    let mut engine = SentimentEngine::from_config_file(&args.config)?;

    if let Some(text) = args.text {
        let result = engine.analyze(&text)?;
        print_result(&result);
        return Ok(());
    }

    run_benchmark(&mut engine, args.iterations, args.warmup, args.json)
}

fn print_result(result: &ClassificationResult) {
    println!("Label:      {}", result.label);
    println!("Confidence: {:.3}", result.confidence);
    println!("Score:      {:+.3}", result.score);

    let mut entries: Vec<_> = result.probabilities.iter().collect();
    entries.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));
    for (label, probability) in entries {
        println!("  {:<10} {:.3}", label, probability);
    }

    println!("Latency:    {:.2}ms", result.latency.as_secs_f64() * 1000.0);
}

fn run_benchmark(
    engine: &mut SentimentEngine,
    iterations: usize,
    warmup: usize,
    json: bool,
) -> Result<()> {
    info!("Warming up with {} calls", warmup);
    for text in SAMPLE_TEXTS.iter().cycle().take(warmup) {
        engine.analyze(text)?;
    }

    info!(
        "Benchmarking {} analyze calls over {} sample texts",
        iterations,
        SAMPLE_TEXTS.len()
    );
    let mut latencies = Vec::with_capacity(iterations);
    for (i, text) in SAMPLE_TEXTS.iter().cycle().take(iterations).enumerate() {
        let result = engine.analyze(text)?;
        latencies.push(result.latency);

        if (i + 1) % 25 == 0 {
            info!("Processed {}/{} calls", i + 1, iterations);
        }
    }

    let report = LatencyReport::from_latencies(&latencies);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.display();
    }

    Ok(())
}
