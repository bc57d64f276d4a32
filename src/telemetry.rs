use crate::client::CompletionParameters;
use log::{debug, warn};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Hex digest used to pseudonymize machine and organization
/// identifiers before they leave the machine.
pub fn hash_id(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}

/// One lint event, successful or not, as POSTed to the telemetry
/// endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryEvent {
    pub source_code: String,
    pub source_code_language: String,
    pub parameters: CompletionParameters,
    pub prompt_format: String,
    pub prompt_description: String,
    pub extension_version: String,
    pub is_success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub hashed_organization_id: Option<String>,
    pub hashed_machine_id: String,
}

pub struct TelemetrySink {
    http: reqwest::Client,
    endpoint: String,
    enabled: bool,
}

impl TelemetrySink {
    pub fn new(endpoint: impl Into<String>, enabled: bool) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            enabled,
        }
    }

    /// Failures are logged and swallowed; telemetry never interrupts
    /// the lint itself.
    pub async fn submit(&self, event: &TelemetryEvent) {
        if !self.enabled {
            return;
        }
        match self.http.post(&self.endpoint).json(event).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("telemetry accepted");
            }
            Ok(response) => warn!("telemetry rejected: {}", response.status()),
            Err(e) => warn!("telemetry failed: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_hex() {
        let a = hash_id("org-1234");
        let b = hash_id("org-1234");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(hash_id("org-1234"), hash_id("org-5678"));
    }

    #[test]
    fn event_serializes_with_camel_case_keys() {
        let event = TelemetryEvent {
            source_code: "let x = 1".to_string(),
            source_code_language: "typescript".to_string(),
            parameters: CompletionParameters {
                model: "code-davinci-002".to_string(),
                temperature: 0.9,
                prompt: "p".to_string(),
                max_tokens: 256,
                stop: "````\n".to_string(),
            },
            prompt_format: "score: {code}".to_string(),
            prompt_description: "plain".to_string(),
            extension_version: "0.2.0".to_string(),
            is_success: false,
            result_score: None,
            result_description: None,
            error_message: Some("No result".to_string()),
            hashed_organization_id: None,
            hashed_machine_id: hash_id("machine"),
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["isSuccess"], false);
        assert_eq!(value["errorMessage"], "No result");
        assert_eq!(value["sourceCodeLanguage"], "typescript");
        assert!(value.get("resultScore").is_none());
        assert!(value["hashedMachineId"].is_string());
    }
}
