/*
cargo run --release --bin run_lint -- \
  db.json output.json \
  --preferred-language japanese
*/

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use log::info;
use nlplint::client::CompletionClient;
use nlplint::harness::{self, BatchOptions};
use nlplint::{prompts, sample, types};
use rand::thread_rng;
use simplelog::{CombinedLogger, ConfigBuilder, LevelFilter, WriteLogger};
use std::{env, fs, path::PathBuf};

// command-line args
#[derive(Parser, Debug)]
#[command(version, author, about = "Batch-score a corpus of source files with every prompt variant")]
struct Cli {
    /// Corpus JSON produced by the crawler
    #[arg(default_value = "db.json")]
    corpus: PathBuf,

    /// Where the run summary is written
    #[arg(default_value = "output.json")]
    output: PathBuf,

    #[arg(long, default_value = "code-davinci-002")]
    model: String,

    #[arg(long, default_value_t = 0.9)]
    temperature: f64,

    #[arg(long, default_value_t = 256)]
    max_tokens: u32,

    // Natural language the score descriptions should be written in
    #[arg(long, default_value = "japanese")]
    preferred_language: String,

    // Full sweeps over (variant x candidate)
    #[arg(long, default_value_t = harness::SWEEP_COUNT)]
    sweeps: u32,

    // Provider quota the pacing sleep respects
    #[arg(long, default_value_t = harness::CALLS_PER_MINUTE)]
    calls_per_minute: u64,

    #[arg(long, default_value = "https://api.openai.com/v1")]
    endpoint: String,

    // OpenAI API key (overrides $OPENAI_API_KEY)
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    #[arg(long)]
    organization_id: Option<String>,

    /// Fabricate outcomes instead of calling the provider
    #[arg(long)]
    dummy: bool,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    fs::create_dir_all("logs")?;
    let ts = Local::now().format("%Y%m%d-%H%M%S");
    let log_path = format!("logs/run_lint_{ts}.log");
    CombinedLogger::init(vec![WriteLogger::new(
        LevelFilter::Info,
        ConfigBuilder::new().build(),
        fs::File::create(&log_path)?,
    )])?;
    info!("run started -> model={} log={log_path}", cli.model);

    let api_key = if cli.dummy {
        cli.api_key.clone().unwrap_or_default()
    } else {
        cli.api_key
            .clone()
            .or_else(|| env::var("OPENAI_API_KEY").ok())
            .context("provide --api-key or set OPENAI_API_KEY")?
    };

    let corpus = types::load_corpus(&cli.corpus)?;
    info!("loaded {} corpus records", corpus.len());

    let candidates = sample::select_candidates(&corpus, &mut thread_rng());
    info!("selected {} candidates", candidates.len());

    let variants = prompts::builtin_variants();
    for variant in &variants {
        println!("{}", variant.description);
        println!();
        println!("{}", variant.prompt);
        println!("=====================");
    }

    let client = CompletionClient::new(&cli.endpoint, &api_key, cli.organization_id.clone())?;
    let opts = BatchOptions {
        model: cli.model,
        temperature: cli.temperature,
        max_tokens: cli.max_tokens,
        stop: "````\n".to_string(),
        preferred_language: cli.preferred_language,
        sweeps: cli.sweeps,
        calls_per_minute: cli.calls_per_minute,
        dummy: cli.dummy,
    };

    let summary = harness::run_batch(&client, &variants, &candidates, &opts).await?;
    summary.write(&cli.output)?;
    info!("summary written to {}", cli.output.display());
    println!("\ndone - summary {}", cli.output.display());
    Ok(())
}
