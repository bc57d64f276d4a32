use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Provenance of the repository a candidate was crawled from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub id: String,
    pub author: String,
    pub name: String,
    pub license: String,
    pub url: String,
    pub commit_hash: Option<String>,
}

/// One source file drawn from the corpus. Read once, referenced
/// read-only for the rest of the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub repository_id: String,
    pub path: String,
    pub name: String,
    pub content: String,
    pub repository: Repository,
}

/// Result of one completion call after parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success { score: f64 },
    Failure { error: String },
}

pub fn load_corpus(path: &Path) -> Result<Vec<Candidate>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let corpus = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(corpus)
}
