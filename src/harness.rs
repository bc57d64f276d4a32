use crate::client::{CompletionClient, CompletionParameters};
use crate::progress;
use crate::prompts::{self, PromptVariant};
use crate::summary::RunSummary;
use crate::types::{Candidate, Outcome};
use anyhow::Result;
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rand::Rng;
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Provider quota the pacing sleep respects by default.
pub const CALLS_PER_MINUTE: u64 = 10;

/// Full sweeps over (variant x candidate) by default.
pub const SWEEP_COUNT: u32 = 5;

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub stop: String,
    pub preferred_language: String,
    pub sweeps: u32,
    pub calls_per_minute: u64,
    /// Fabricate outcomes locally instead of calling the provider.
    pub dummy: bool,
}

/// Sleep owed after a call that took `elapsed`: the per-call budget
/// plus a 10% margin, minus the time the call already consumed,
/// clamped at zero.
pub fn pacing_delay(budget: Duration, elapsed: Duration) -> Duration {
    (budget + budget / 10).saturating_sub(elapsed)
}

/// Drive one completion per (sweep, variant, candidate) triple,
/// sequentially, under the provider quota. Every outcome is final;
/// the loop never retries and never stops early.
pub async fn run_batch(
    client: &CompletionClient,
    variants: &[PromptVariant],
    candidates: &[Candidate],
    opts: &BatchOptions,
) -> Result<RunSummary> {
    let planned = candidates.len() as u64 * variants.len() as u64 * opts.sweeps as u64;
    let budget = Duration::from_millis(60_000 / opts.calls_per_minute.max(1));

    let mut summary = RunSummary::new();
    let bar = ProgressBar::new(planned);
    bar.set_style(ProgressStyle::with_template("{msg}")?);
    bar.set_message(progress::status_line(&summary, planned, Local::now()));

    for sweep in 0..opts.sweeps {
        for variant in variants {
            for candidate in candidates {
                let call_start = Instant::now();

                let outcome = if opts.dummy {
                    dummy_complete().await
                } else {
                    let prompt = prompts::render(
                        &variant.prompt,
                        &candidate.content,
                        &opts.preferred_language,
                    );
                    let params = CompletionParameters {
                        model: opts.model.clone(),
                        temperature: opts.temperature,
                        prompt,
                        max_tokens: opts.max_tokens,
                        stop: opts.stop.clone(),
                    };
                    match client.complete(&params).await {
                        Ok(reply) => Outcome::Success { score: reply.score },
                        Err(e) => Outcome::Failure { error: e.to_string() },
                    }
                };

                if let Outcome::Failure { error } = &outcome {
                    bar.println(progress::error_line(error));
                }

                summary.record(&outcome);
                bar.inc(1);
                bar.set_message(progress::status_line(&summary, planned, Local::now()));

                sleep(pacing_delay(budget, call_start.elapsed())).await;
            }
        }
        info!("sweep {}/{} finished", sweep + 1, opts.sweeps);
    }

    bar.finish();
    Ok(summary)
}

// Stand-in for the provider: random latency, coin-flip success with a
// random integer score, numbered dummy failures.
async fn dummy_complete() -> Outcome {
    let (latency, outcome) = {
        let mut rng = rand::thread_rng();
        let latency = Duration::from_millis(rng.gen_range(500..1500));
        let outcome = if rng.gen_bool(0.5) {
            Outcome::Success {
                score: rng.gen_range(0..100) as f64,
            }
        } else {
            Outcome::Failure {
                error: format!("dummy error {}", rng.gen_range(0..10)),
            }
        };
        (latency, outcome)
    };
    sleep(latency).await;
    outcome
}
