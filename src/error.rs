use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetaScanError {
    #[error(
        "No RAPIDAPI_KEY found in the environment or .env (or RAPIDAPI_KEY_FB_SCRAPER3 / RAPIDAPI_KEY_SOCIAL_SCRAPE)."
    )]
    MissingCredentials,

    #[error("Connection timeout connecting to {host}. Try raising --connect-timeout or check your network/VPN/proxy.")]
    ConnectTimeout { host: String },

    #[error("Read timeout reading response from {host}. Try raising --read-timeout.")]
    ReadTimeout { host: String },

    #[error(
        "Could not connect to {host}: {reason}. Possible causes: provider down, network/ISP blocks, VPN/Proxy, or port 443 filtered."
    )]
    Unreachable { host: String, reason: String },

    #[error("Network error querying {host}{path}: {reason}")]
    Network {
        host: String,
        path: String,
        reason: String,
    },

    #[error("Response from {host}{path} is not valid JSON: {snippet}")]
    MalformedResponse {
        host: String,
        path: String,
        snippet: String,
    },

    #[error(
        "HTTP 403 from {host}{path}: you are not subscribed to this API. Check your RapidAPI plan. Details: {details}"
    )]
    NotSubscribed {
        host: String,
        path: String,
        details: String,
    },

    #[error("HTTP {status} from {host}{path}. Details: {details}")]
    Http {
        status: u16,
        host: String,
        path: String,
        details: String,
    },

    #[error("Error saving JSON to {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error serializing results: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Could not build HTTP client: {0}")]
    ClientBuild(String),
}

impl MetaScanError {
    /// Transport-level failures (the request never produced a usable response).
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            MetaScanError::ConnectTimeout { .. }
                | MetaScanError::ReadTimeout { .. }
                | MetaScanError::Unreachable { .. }
                | MetaScanError::Network { .. }
                | MetaScanError::MalformedResponse { .. }
        )
    }

    /// The provider rejected the request because the key's plan lacks the endpoint.
    pub fn is_entitlement(&self) -> bool {
        matches!(self, MetaScanError::NotSubscribed { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            MetaScanError::NotSubscribed { .. } => Some(403),
            MetaScanError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_subscribed_is_distinct_from_plain_forbidden() {
        let entitlement = MetaScanError::NotSubscribed {
            host: "h".to_string(),
            path: "/p".to_string(),
            details: "{}".to_string(),
        };
        let forbidden = MetaScanError::Http {
            status: 403,
            host: "h".to_string(),
            path: "/p".to_string(),
            details: "{}".to_string(),
        };

        assert_eq!(entitlement.status(), forbidden.status());
        assert!(entitlement.is_entitlement());
        assert!(!forbidden.is_entitlement());
        assert!(entitlement.to_string().contains("not subscribed"));
        assert!(!forbidden.to_string().contains("not subscribed"));
    }

    #[test]
    fn test_malformed_response_counts_as_network() {
        let err = MetaScanError::MalformedResponse {
            host: "h".to_string(),
            path: "/p".to_string(),
            snippet: "<html>".to_string(),
        };
        assert!(err.is_network());
        assert!(!MetaScanError::MissingCredentials.is_network());
    }
}
