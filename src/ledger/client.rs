//! Ledger Client - HTTP facade over the ledger web app
//!
//! Each operation is one GET request carrying `function=<operationName>`
//! plus flat string parameters; the response is a JSON object with at least
//! a `success` boolean.
//!
//! ## Failure normalization
//!
//! Three distinct failure modes are deliberately collapsed to one signal:
//!
//! 1. network-level error sending the request
//! 2. non-200 status
//! 3. 200 status with an unparseable body
//!
//! All yield `None` from [`LedgerClient::invoke`]. Callers must treat it as
//! "operation did not take effect, reason unknown"; the client never
//! retries.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::directory::MemberId;
use crate::types::{QuarterdeckError, Result};

use super::{Ledger, MedalStats};

/// Configuration for the ledger client
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Ledger web-app endpoint URL
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8090/exec".to_string(),
            timeout_ms: 30_000,
        }
    }
}

/// HTTP client for the medal ledger
pub struct LedgerClient {
    config: LedgerConfig,
    http: reqwest::Client,
}

impl LedgerClient {
    /// Create a new ledger client
    pub fn new(config: LedgerConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| QuarterdeckError::Ledger(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, http })
    }

    /// Invoke a named remote operation
    ///
    /// Returns the parsed response object, or `None` for any failure mode.
    pub async fn invoke(&self, function: &str, params: &[(&str, String)]) -> Option<Value> {
        let mut query: Vec<(&str, String)> = vec![("function", function.to_string())];
        query.extend(params.iter().cloned());

        debug!(function, ?params, "calling ledger");

        let response = match self.http.get(&self.config.base_url).query(&query).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(function, error = %e, "ledger request failed at transport");
                return None;
            }
        };

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => {
                warn!(function, error = %e, "failed to read ledger response body");
                return None;
            }
        };

        let result = classify_response(status, &body);
        if result.is_none() {
            warn!(function, status, "ledger returned no usable result");
        }
        result
    }

    /// Invoke and keep the response only when it reports `success: true`
    async fn invoke_success(&self, function: &str, params: &[(&str, String)]) -> Option<Value> {
        self.invoke(function, params).await.and_then(success_payload)
    }
}

/// Classify a transport outcome: only a 200 with parseable JSON counts
fn classify_response(status: u16, body: &str) -> Option<Value> {
    if status != 200 {
        return None;
    }
    serde_json::from_str(body).ok()
}

/// Keep the response object only when its `success` field is true
fn success_payload(result: Value) -> Option<Value> {
    if result.get("success").and_then(Value::as_bool).unwrap_or(false) {
        Some(result)
    } else {
        None
    }
}

fn string_array(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl Ledger for LedgerClient {
    async fn find_user_row(&self, user_id: MemberId) -> Option<i64> {
        let result = self
            .invoke_success("findUserRow", &[("userId", user_id.to_string())])
            .await?;
        // -1 means not found; collapse with failure
        match result.get("row").and_then(Value::as_i64) {
            Some(row) if row != -1 => Some(row),
            _ => None,
        }
    }

    async fn add_user(&self, user_id: MemberId) -> Option<i64> {
        let result = self
            .invoke_success("addUser", &[("userId", user_id.to_string())])
            .await?;
        result.get("row").and_then(Value::as_i64)
    }

    async fn get_user_medals(&self, user_id: MemberId) -> Vec<String> {
        let result = self
            .invoke_success("getUserMedals", &[("userId", user_id.to_string())])
            .await;
        string_array(result.as_ref().and_then(|r| r.get("medals")))
    }

    async fn update_medal(&self, user_id: MemberId, medal_name: &str, has_medal: bool) -> bool {
        self.invoke_success(
            "updateMedal",
            &[
                ("userId", user_id.to_string()),
                ("medalName", medal_name.to_string()),
                ("hasMedal", has_medal.to_string()),
            ],
        )
        .await
        .is_some()
    }

    async fn medal_types(&self) -> Vec<String> {
        let result = self.invoke_success("getAllMedalTypes", &[]).await;
        string_array(result.as_ref().and_then(|r| r.get("medals")))
    }

    async fn add_medal_type(&self, medal_name: &str) -> bool {
        self.invoke_success("addMedalType", &[("medalName", medal_name.to_string())])
            .await
            .is_some()
    }

    async fn delete_medal_type(&self, medal_name: &str) -> bool {
        self.invoke_success("deleteMedalType", &[("medalName", medal_name.to_string())])
            .await
            .is_some()
    }

    async fn medal_stats(&self) -> Option<MedalStats> {
        let result = self.invoke_success("getMedalStats", &[]).await?;
        let data = result.get("data")?.clone();
        serde_json::from_value(data).ok()
    }

    async fn probe(&self) -> bool {
        self.invoke_success("test", &[]).await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_200_yields_no_result() {
        assert!(classify_response(500, r#"{"success":true}"#).is_none());
        assert!(classify_response(302, r#"{"success":true}"#).is_none());
    }

    #[test]
    fn test_unparseable_body_yields_no_result() {
        assert!(classify_response(200, "<html>sign in</html>").is_none());
        assert!(classify_response(200, "").is_none());
    }

    #[test]
    fn test_parseable_200_yields_result() {
        let result = classify_response(200, r#"{"success":true,"row":4}"#);
        assert!(result.is_some());
    }

    #[test]
    fn test_success_payload_filters_failures() {
        let ok: Value = serde_json::from_str(r#"{"success":true}"#).unwrap();
        let failed: Value = serde_json::from_str(r#"{"success":false,"error":"nope"}"#).unwrap();
        let missing: Value = serde_json::from_str(r#"{"row":3}"#).unwrap();

        assert!(success_payload(ok).is_some());
        assert!(success_payload(failed).is_none());
        assert!(success_payload(missing).is_none());
    }

    #[test]
    fn test_stats_payload_parses_wire_names() {
        let data = r#"{
            "totalUsers": 12,
            "totalMedalTypes": 3,
            "mostAwarded": {"name": "Valor", "count": 7},
            "medalDistribution": {"Valor": 7, "Service": 2}
        }"#;

        let stats: MedalStats = serde_json::from_str(data).unwrap();
        assert_eq!(stats.total_users, 12);
        assert_eq!(stats.total_medal_types, 3);
        assert_eq!(stats.most_awarded.as_ref().map(|m| m.name.as_str()), Some("Valor"));
        assert_eq!(stats.medal_distribution.get("Valor"), Some(&7));
    }

    #[test]
    fn test_stats_payload_tolerates_missing_fields() {
        let stats: MedalStats = serde_json::from_str("{}").unwrap();
        assert_eq!(stats.total_users, 0);
        assert!(stats.most_awarded.is_none());
        assert!(stats.medal_distribution.is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_yields_no_result() {
        // Nothing listens on port 1; the send error must collapse to the
        // same "no result" as a bad status or body.
        let client = LedgerClient::new(LedgerConfig {
            base_url: "http://127.0.0.1:1/exec".to_string(),
            timeout_ms: 1_000,
        })
        .unwrap();

        assert!(client.invoke("test", &[]).await.is_none());
    }

    #[test]
    fn test_default_config() {
        let config = LedgerConfig::default();
        assert_eq!(config.timeout_ms, 30_000);
    }
}
