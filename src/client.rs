use crate::parser::{self, ParseError, Reply};
use log::warn;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

const COMPLETION_TIMEOUT: Duration = Duration::from_secs(60);

/// Request body for the completions endpoint. The caller supplies a
/// fully rendered prompt.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionParameters {
    pub model: String,
    pub temperature: f64,
    pub prompt: String,
    pub max_tokens: u32,
    pub stop: String,
}

/// Everything that can go wrong with one completion call. All four are
/// non-fatal to the batch harness; each becomes a `Failure` outcome
/// keyed by its display text.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("{0}")]
    Transport(String),
    #[error("No result")]
    EmptyResult,
    #[error("Invalid result. result is \n\"\"\"\n{0}\n\"\"\"")]
    Parse(String),
    #[error("Invalid score {0}")]
    InvalidScore(String),
}

pub struct CompletionClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    organization_id: Option<String>,
}

impl CompletionClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        organization_id: Option<String>,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(COMPLETION_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            organization_id,
        })
    }

    /// One completion round trip: POST the prompt, pull
    /// `choices[0].text` out of the response, parse it.
    pub async fn complete(
        &self,
        params: &CompletionParameters,
    ) -> Result<Reply, CompletionError> {
        let url = format!("{}/completions", self.endpoint);
        let mut request = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(params);
        if let Some(org) = &self.organization_id {
            request = request.header("OpenAI-Organization", org);
        }

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => return Err(self.fail(CompletionError::Transport(e.to_string()))),
        };

        if !response.status().is_success() {
            // providers wrap their message in { "error": { "message": … } }
            let message = match response.json::<Value>().await {
                Ok(body) => body["error"]["message"]
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| "Unknown completion API error".to_string()),
                Err(e) => e.to_string(),
            };
            return Err(self.fail(CompletionError::Transport(message)));
        }

        let body: Value = match response.json().await {
            Ok(b) => b,
            Err(e) => return Err(self.fail(CompletionError::Transport(e.to_string()))),
        };

        let text = body["choices"][0]["text"].as_str().unwrap_or("");
        if text.is_empty() {
            return Err(self.fail(CompletionError::EmptyResult));
        }

        match parser::parse_reply(text) {
            Ok(reply) => Ok(reply),
            Err(ParseError::NoMatch) => {
                Err(self.fail(CompletionError::Parse(text.to_string())))
            }
            Err(ParseError::InvalidScore(raw)) => {
                Err(self.fail(CompletionError::InvalidScore(raw)))
            }
        }
    }

    fn fail(&self, err: CompletionError) -> CompletionError {
        warn!("completion failed: {err}");
        err
    }
}
