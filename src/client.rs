use crate::config::ClientConfig;
use crate::error::MetaScanError;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Response};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};

/// Statuses that are retried with backoff before giving up.
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Statuses whose `Retry-After` header replaces the computed backoff.
const RETRY_AFTER_STATUSES: [u16; 2] = [429, 503];

const SNIPPET_CHARS: usize = 300;

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub backoff_factor: f64,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_factor: 0.6,
            max_backoff: Duration::from_secs(120),
        }
    }
}

impl RetryPolicy {
    pub fn should_retry_status(&self, status: u16) -> bool {
        RETRYABLE_STATUSES.contains(&status)
    }

    /// Sleep before retry number `retry` (1-based): `backoff_factor * 2^(retry - 1)`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(retry - 1).unwrap_or(i32::MAX);
        let secs = self.backoff_factor * 2f64.powi(exponent);
        if secs.is_nan() || secs <= 0.0 {
            return Duration::ZERO;
        }
        if secs >= self.max_backoff.as_secs_f64() {
            return self.max_backoff;
        }
        Duration::from_secs_f64(secs)
    }

    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (1..=self.max_retries).map(|retry| self.delay_for(retry))
    }
}

/// A GET-only client for RapidAPI-hosted providers.
///
/// One instance is built per run and shared by every lookup so the
/// underlying connection pool is reused.
#[derive(Debug, Clone)]
pub struct RapidApiClient {
    http: Client,
    config: ClientConfig,
    base_url: Option<String>,
}

impl RapidApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, MetaScanError> {
        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| MetaScanError::ClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            config,
            base_url: None,
        })
    }

    /// Sends every request to `base_url` instead of `https://<host>`.
    /// The `x-rapidapi-host` header still carries the logical host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    fn url_for(&self, host: &str, path: &str) -> String {
        match &self.base_url {
            Some(base) => format!("{}{}", base.trim_end_matches('/'), path),
            None => format!("https://{host}{path}"),
        }
    }

    pub async fn get_json(
        &self,
        host: &str,
        path: &str,
        params: &[(&str, &str)],
        api_key: &str,
    ) -> Result<Value, MetaScanError> {
        let url = self.url_for(host, path);
        let policy = &self.config.retry;
        let mut retry = 0;

        loop {
            debug!(host, path, attempt = retry + 1, "sending request");

            let result = self
                .http
                .get(&url)
                .header("x-rapidapi-host", host)
                .header("x-rapidapi-key", api_key)
                .query(params)
                .send()
                .await;

            match result {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if policy.should_retry_status(status) && retry < policy.max_retries {
                        retry += 1;
                        let delay = retry_after(&response)
                            .map(|d| d.min(policy.max_backoff))
                            .unwrap_or_else(|| policy.delay_for(retry));
                        warn!(
                            host,
                            path,
                            status,
                            retry,
                            delay_ms = delay.as_millis() as u64,
                            "retrying request"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return read_response(host, path, response).await;
                }
                Err(err) => {
                    if (err.is_connect() || err.is_timeout()) && retry < policy.max_retries {
                        retry += 1;
                        let delay = policy.delay_for(retry);
                        warn!(host, path, retry, error = %err, "retrying after transport error");
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(classify_transport_error(host, path, &err));
                }
            }
        }
    }
}

fn retry_after(response: &Response) -> Option<Duration> {
    if !RETRY_AFTER_STATUSES.contains(&response.status().as_u16()) {
        return None;
    }
    let value = response.headers().get(RETRY_AFTER)?.to_str().ok()?;
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

async fn read_response(
    host: &str,
    path: &str,
    response: Response,
) -> Result<Value, MetaScanError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| classify_transport_error(host, path, &e))?;

    if status.is_success() {
        return serde_json::from_str(&body).map_err(|_| MetaScanError::MalformedResponse {
            host: host.to_string(),
            path: path.to_string(),
            snippet: truncate_chars(&body, SNIPPET_CHARS),
        });
    }

    Err(status_error(host, path, status.as_u16(), &body))
}

/// Builds the error for a final non-2xx response.
pub fn status_error(host: &str, path: &str, status: u16, body: &str) -> MetaScanError {
    let payload = serde_json::from_str::<Value>(body)
        .unwrap_or_else(|_| json!({ "error": truncate_chars(body, SNIPPET_CHARS) }));
    let details = payload.to_string();

    if status == 403 && body.to_lowercase().contains("not subscribed") {
        return MetaScanError::NotSubscribed {
            host: host.to_string(),
            path: path.to_string(),
            details,
        };
    }

    MetaScanError::Http {
        status,
        host: host.to_string(),
        path: path.to_string(),
        details,
    }
}

fn classify_transport_error(host: &str, path: &str, err: &reqwest::Error) -> MetaScanError {
    if err.is_timeout() {
        if err.is_connect() {
            MetaScanError::ConnectTimeout {
                host: host.to_string(),
            }
        } else {
            MetaScanError::ReadTimeout {
                host: host.to_string(),
            }
        }
    } else if err.is_connect() {
        MetaScanError::Unreachable {
            host: host.to_string(),
            reason: error_chain(err),
        }
    } else {
        MetaScanError::Network {
            host: host.to_string(),
            path: path.to_string(),
            reason: error_chain(err),
        }
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_delays_are_exponential() {
        let policy = RetryPolicy::default();
        let delays: Vec<Duration> = policy.delays().collect();

        assert_eq!(delays.len(), 3);
        assert_eq!(delays[0], Duration::from_secs_f64(0.6));
        assert_eq!(delays[1], Duration::from_secs_f64(1.2));
        assert_eq!(delays[2], Duration::from_secs_f64(2.4));
        assert!(delays.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_delay_is_capped() {
        let policy = RetryPolicy {
            max_retries: 20,
            backoff_factor: 0.6,
            max_backoff: Duration::from_secs(10),
        };
        assert_eq!(policy.delay_for(15), Duration::from_secs(10));
        assert_eq!(policy.delay_for(0), Duration::ZERO);
        assert!(policy.delays().collect::<Vec<_>>().windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_retryable_statuses() {
        let policy = RetryPolicy::default();
        for status in [429, 500, 502, 503, 504] {
            assert!(policy.should_retry_status(status), "{status} should retry");
        }
        for status in [200, 400, 401, 403, 404, 501] {
            assert!(!policy.should_retry_status(status), "{status} should not retry");
        }
    }

    #[test]
    fn test_status_error_detects_not_subscribed() {
        let body = r#"{"message":"You are NOT SUBSCRIBED to this API."}"#;
        let err = status_error("host", "/path", 403, body);
        assert!(matches!(err, MetaScanError::NotSubscribed { .. }));

        let err = status_error("host", "/path", 403, r#"{"message":"Forbidden"}"#);
        assert!(matches!(err, MetaScanError::Http { status: 403, .. }));
    }

    #[test]
    fn test_status_error_only_classifies_403() {
        let err = status_error("host", "/path", 401, "You are not subscribed");
        assert!(matches!(err, MetaScanError::Http { status: 401, .. }));
    }

    #[test]
    fn test_status_error_keeps_json_payload() {
        let err = status_error("host", "/path", 404, r#"{"message":"missing"}"#);
        match err {
            MetaScanError::Http { details, .. } => {
                let payload: Value = serde_json::from_str(&details).unwrap();
                assert_eq!(payload["message"], "missing");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_status_error_truncates_text_payload() {
        let body = "x".repeat(1000);
        let err = status_error("host", "/path", 502, &body);
        match err {
            MetaScanError::Http { details, .. } => {
                let payload: Value = serde_json::from_str(&details).unwrap();
                assert_eq!(payload["error"].as_str().unwrap().len(), 300);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_url_for_uses_https_host_by_default() {
        let client = RapidApiClient::new(ClientConfig::default()).unwrap();
        assert_eq!(
            client.url_for("example.p.rapidapi.com", "/path"),
            "https://example.p.rapidapi.com/path"
        );

        let client = client.with_base_url("http://127.0.0.1:1234/");
        assert_eq!(
            client.url_for("example.p.rapidapi.com", "/path"),
            "http://127.0.0.1:1234/path"
        );
    }
}
