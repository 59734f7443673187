//! Credentials and client settings.
//!
//! Keys come from the environment (optionally seeded from a `.env` file) and
//! are resolved once at startup. Timeouts and retry behavior travel with the
//! client as a [`ClientConfig`] value.

use crate::client::RetryPolicy;
use crate::error::MetaScanError;
use std::time::Duration;

pub const RAPIDAPI_KEY: &str = "RAPIDAPI_KEY";
pub const RAPIDAPI_KEY_FB_SCRAPER3: &str = "RAPIDAPI_KEY_FB_SCRAPER3";
pub const RAPIDAPI_KEY_SOCIAL_SCRAPE: &str = "RAPIDAPI_KEY_SOCIAL_SCRAPE";

pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 45;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    common: String,
    profile_override: Option<String>,
    social_override: Option<String>,
}

impl Credentials {
    /// Loads `.env` (if any) and then reads the process environment.
    pub fn from_env() -> Result<Self, MetaScanError> {
        // A missing .env is normal; real variables still apply.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, MetaScanError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let common = read(RAPIDAPI_KEY);
        let profile_override = read(RAPIDAPI_KEY_FB_SCRAPER3);
        let social_override = read(RAPIDAPI_KEY_SOCIAL_SCRAPE);

        if common.is_none() && profile_override.is_none() && social_override.is_none() {
            return Err(MetaScanError::MissingCredentials);
        }

        Ok(Self {
            common: common.unwrap_or_default(),
            profile_override,
            social_override,
        })
    }

    /// Key for the profile provider (facebook-pages-scraper3).
    pub fn profile_key(&self) -> &str {
        choose_key(&self.common, self.profile_override.as_deref())
    }

    /// Key for the page and posts provider (social-media-scrape).
    pub fn social_key(&self) -> &str {
        choose_key(&self.common, self.social_override.as_deref())
    }
}

pub fn choose_key<'a>(common: &'a str, specific: Option<&'a str>) -> &'a str {
    match specific.map(str::trim) {
        Some(key) if !key.is_empty() => key,
        _ => common,
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub retry: RetryPolicy,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn with_timeouts(connect_secs: u64, read_secs: u64) -> Self {
        Self {
            connect_timeout: Duration::from_secs(connect_secs),
            read_timeout: Duration::from_secs(read_secs),
            ..Default::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
            user_agent: concat!("meta_scan/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_missing_all_keys_is_config_error() {
        let result = Credentials::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(MetaScanError::MissingCredentials)));
    }

    #[test]
    fn test_blank_keys_count_as_missing() {
        let result = Credentials::from_lookup(lookup_from(&[
            (RAPIDAPI_KEY, "   "),
            (RAPIDAPI_KEY_SOCIAL_SCRAPE, ""),
        ]));
        assert!(matches!(result, Err(MetaScanError::MissingCredentials)));
    }

    #[test]
    fn test_common_key_used_when_no_overrides() {
        let creds = Credentials::from_lookup(lookup_from(&[(RAPIDAPI_KEY, "common")])).unwrap();
        assert_eq!(creds.profile_key(), "common");
        assert_eq!(creds.social_key(), "common");
    }

    #[test]
    fn test_specific_key_overrides_common() {
        let creds = Credentials::from_lookup(lookup_from(&[
            (RAPIDAPI_KEY, "common"),
            (RAPIDAPI_KEY_FB_SCRAPER3, " fb-key "),
        ]))
        .unwrap();
        assert_eq!(creds.profile_key(), "fb-key");
        assert_eq!(creds.social_key(), "common");
    }

    #[test]
    fn test_override_only_is_accepted() {
        let creds = Credentials::from_lookup(lookup_from(&[(RAPIDAPI_KEY_SOCIAL_SCRAPE, "social")]))
            .unwrap();
        assert_eq!(creds.social_key(), "social");
        assert_eq!(creds.profile_key(), "");
    }

    #[test]
    fn test_choose_key() {
        assert_eq!(choose_key("common", Some("x")), "x");
        assert_eq!(choose_key("common", Some("  ")), "common");
        assert_eq!(choose_key("common", None), "common");
    }

    #[test]
    fn test_client_config_timeouts() {
        let config = ClientConfig::with_timeouts(5, 20);
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.read_timeout, Duration::from_secs(20));
        assert_eq!(config.retry.max_retries, 3);
        assert!(config.user_agent.starts_with("meta_scan/"));
    }
}
