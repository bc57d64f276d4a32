/*
cargo run --release --bin lint -- src/app.ts --preferred-language english
*/

use anyhow::{Context, Result};
use clap::Parser;
use nlplint::client::{CompletionClient, CompletionError, CompletionParameters};
use nlplint::telemetry::{self, TelemetryEvent, TelemetrySink};
use nlplint::{progress, prompts};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::{env, fs, path::PathBuf};

// command-line args
#[derive(Parser, Debug)]
#[command(version, author, about = "Score a single source file with the completion API")]
struct Cli {
    /// File to lint
    file: PathBuf,

    // Built-in prompt variant to use
    #[arg(long, default_value_t = 0)]
    prompt_index: usize,

    // Fetch the prompt from a remote prompt service instead
    #[arg(long, value_name = "URL")]
    prompt_url: Option<String>,

    #[arg(long, default_value = "code-davinci-002")]
    model: String,

    #[arg(long, default_value_t = 0.9)]
    temperature: f64,

    #[arg(long, default_value_t = 256)]
    max_tokens: u32,

    // Natural language the description should be written in
    #[arg(long, default_value = "english")]
    preferred_language: String,

    #[arg(long, default_value = "https://api.openai.com/v1")]
    endpoint: String,

    // OpenAI API key (overrides $OPENAI_API_KEY)
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    #[arg(long)]
    organization_id: Option<String>,

    /// Submit a telemetry event for this lint
    #[arg(long)]
    telemetry: bool,

    #[arg(long, default_value = "https://us-central1-nlplint.cloudfunctions.net/telemetry")]
    telemetry_endpoint: String,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    TermLogger::init(
        LevelFilter::Warn,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let api_key = cli
        .api_key
        .clone()
        .or_else(|| env::var("OPENAI_API_KEY").ok())
        .context("provide --api-key or set OPENAI_API_KEY")?;

    let text = fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read {}", cli.file.display()))?;

    let variant = match &cli.prompt_url {
        Some(url) => prompts::fetch_variant(&reqwest::Client::new(), url).await?,
        None => {
            let variants = prompts::builtin_variants();
            let count = variants.len();
            variants
                .into_iter()
                .nth(cli.prompt_index)
                .with_context(|| format!("prompt index out of range (0..{count})"))?
        }
    };

    let params = CompletionParameters {
        model: cli.model.clone(),
        temperature: cli.temperature,
        prompt: prompts::render(&variant.prompt, &text, &cli.preferred_language),
        max_tokens: cli.max_tokens,
        stop: "````\n".to_string(),
    };
    let client = CompletionClient::new(&cli.endpoint, &api_key, cli.organization_id.clone())?;

    // Ctrl-C aborts the in-flight call
    let outcome = tokio::select! {
        result = client.complete(&params) => result,
        _ = tokio::signal::ctrl_c() => {
            println!("\ncancelled");
            return Ok(());
        }
    };

    match &outcome {
        Ok(reply) => {
            println!("score is {} and the reason is\n{}", reply.score, reply.description);
        }
        Err(err) => {
            eprintln!("{}", progress::error_line(&err.to_string()));
            if let CompletionError::Parse(raw) = err {
                // surface the unexpected reply so the operator can inspect it
                println!("--- raw reply ---");
                println!("{raw}");
            }
        }
    }

    let sink = TelemetrySink::new(cli.telemetry_endpoint.clone(), cli.telemetry);
    let machine = env::var("HOSTNAME").unwrap_or_else(|_| "local".to_string());
    let language = cli
        .file
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("plaintext")
        .to_string();
    let event = TelemetryEvent {
        source_code: text,
        source_code_language: language,
        parameters: params,
        prompt_format: variant.prompt.clone(),
        prompt_description: variant.description.clone(),
        extension_version: env!("CARGO_PKG_VERSION").to_string(),
        is_success: outcome.is_ok(),
        result_score: outcome.as_ref().ok().map(|r| r.score),
        result_description: outcome.as_ref().ok().map(|r| r.description.clone()),
        error_message: outcome.as_ref().err().map(|e| e.to_string()),
        hashed_organization_id: cli.organization_id.as_deref().map(telemetry::hash_id),
        hashed_machine_id: telemetry::hash_id(&machine),
    };
    sink.submit(&event).await;

    Ok(())
}
