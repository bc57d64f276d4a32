//! Scores source text with an LLM completion API.
//!
//! The library half of nlplint: corpus loading and sampling, prompt
//! rendering, the completion client with its reply parser, and the
//! rate-limited batch harness behind the `run_lint` binary.

pub mod client;
pub mod harness;
pub mod parser;
pub mod progress;
pub mod prompts;
pub mod sample;
pub mod summary;
pub mod telemetry;
pub mod types;
