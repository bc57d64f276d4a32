use crate::types::Outcome;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde_json::{json, Map as JsonMap, Value};
use std::{collections::HashMap, fs, path::Path};

/// Cumulative statistics over every completion call in a batch run.
/// Owned by the batch loop alone; serialized once at run end.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub success_count: u64,
    pub failure_count: u64,
    pub success_total_score: f64,
    pub error_reasons: HashMap<String, u64>,
    pub start_at: DateTime<Local>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self {
            success_count: 0,
            failure_count: 0,
            success_total_score: 0.0,
            error_reasons: HashMap::new(),
            start_at: Local::now(),
        }
    }

    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Success { score } => {
                self.success_count += 1;
                self.success_total_score += score;
            }
            Outcome::Failure { error } => {
                self.failure_count += 1;
                *self.error_reasons.entry(error.clone()).or_insert(0) += 1;
            }
        }
    }

    pub fn completed(&self) -> u64 {
        self.success_count + self.failure_count
    }

    /// JSON shape written at the end of a run. Error reasons are keyed
    /// in descending lexicographic order of the message string.
    pub fn to_json(&self) -> Value {
        let mut reasons: Vec<(&String, &u64)> = self.error_reasons.iter().collect();
        reasons.sort_by(|a, b| b.0.cmp(a.0));

        let mut reason_map = JsonMap::new();
        for (message, count) in reasons {
            reason_map.insert(message.clone(), Value::from(*count));
        }

        json!({
            "successCount": self.success_count,
            "failureCount": self.failure_count,
            "successTotalScore": self.success_total_score,
            "errorReasons": reason_map,
            "startAt": self.start_at.to_rfc3339(),
        })
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(&self.to_json())?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success(score: f64) -> Outcome {
        Outcome::Success { score }
    }

    fn failure(error: &str) -> Outcome {
        Outcome::Failure { error: error.to_string() }
    }

    #[test]
    fn every_outcome_lands_in_exactly_one_bucket() {
        let mut summary = RunSummary::new();
        summary.record(&success(10.0));
        summary.record(&success(20.0));
        summary.record(&failure("No result"));

        assert_eq!(summary.success_count, 2);
        assert_eq!(summary.failure_count, 1);
        assert_eq!(summary.completed(), 3);
        assert_eq!(summary.success_total_score, 30.0);
    }

    #[test]
    fn error_histogram_counts_by_message() {
        let mut summary = RunSummary::new();
        summary.record(&failure("rate limited"));
        summary.record(&failure("rate limited"));
        summary.record(&failure("No result"));

        assert_eq!(summary.error_reasons["rate limited"], 2);
        assert_eq!(summary.error_reasons["No result"], 1);
    }

    #[test]
    fn json_keys_reasons_in_descending_order() {
        let mut summary = RunSummary::new();
        summary.record(&failure("alpha"));
        summary.record(&failure("charlie"));
        summary.record(&failure("bravo"));
        summary.record(&failure("charlie"));

        let value = summary.to_json();
        let reasons = value["errorReasons"].as_object().unwrap();
        let keys: Vec<&str> = reasons.keys().map(String::as_str).collect();
        assert_eq!(keys, ["charlie", "bravo", "alpha"]);
        assert_eq!(reasons["charlie"], 2);
    }

    #[test]
    fn json_carries_the_run_fields() {
        let mut summary = RunSummary::new();
        summary.record(&success(42.5));

        let value = summary.to_json();
        assert_eq!(value["successCount"], 1);
        assert_eq!(value["failureCount"], 0);
        assert_eq!(value["successTotalScore"], 42.5);
        assert!(value["startAt"].is_string());
    }

    #[test]
    fn writes_pretty_json() {
        let mut summary = RunSummary::new();
        summary.record(&failure("boom"));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.json");
        summary.write(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["errorReasons"]["boom"], 1);
    }
}
