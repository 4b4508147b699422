//! Gateway credentials and endpoint configuration.

use serde::{Deserialize, Serialize};
use url::Url;

/// Settings for the external payment gateway.
///
/// Resolved and validated once at startup, then injected into the
/// services that need it; nothing re-reads the environment per
/// request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// School this server collects payments for; stamped on every order.
    pub school_id: String,
    /// Merchant key sent in the collect-request body.
    pub merchant_key: String,
    /// API key sent in the `x-api-key` header.
    pub api_key: String,
    /// Endpoint accepting collect requests.
    pub create_collect_url: Url,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<(), GatewayConfigError> {
        if self.school_id.trim().is_empty() {
            return Err(GatewayConfigError::MissingField("school_id"));
        }
        if self.merchant_key.trim().is_empty() {
            return Err(GatewayConfigError::MissingField("merchant_key"));
        }
        if self.api_key.trim().is_empty() {
            return Err(GatewayConfigError::MissingField("api_key"));
        }
        match self.create_collect_url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(GatewayConfigError::UnsupportedScheme(other.to_string())),
        }
    }
}

/// Errors from gateway configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayConfigError {
    #[error("gateway configuration field `{0}` is missing or empty")]
    MissingField(&'static str),
    #[error("create_collect_url must use http or https, got `{0}`")]
    UnsupportedScheme(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GatewayConfig {
        GatewayConfig {
            school_id: "65b0e6293e9f76a9694d84b4".to_string(),
            merchant_key: "merchant-key".to_string(),
            api_key: "api-key".to_string(),
            create_collect_url: Url::parse("https://pg.example/create-collect-request").unwrap(),
        }
    }

    #[test]
    fn accepts_complete_config() {
        assert_eq!(config().validate(), Ok(()));
    }

    #[test]
    fn rejects_blank_api_key() {
        let mut cfg = config();
        cfg.api_key = " ".to_string();
        assert_eq!(
            cfg.validate(),
            Err(GatewayConfigError::MissingField("api_key"))
        );
    }

    #[test]
    fn rejects_non_http_url() {
        let mut cfg = config();
        cfg.create_collect_url = Url::parse("ftp://pg.example/collect").unwrap();
        assert_eq!(
            cfg.validate(),
            Err(GatewayConfigError::UnsupportedScheme("ftp".to_string()))
        );
    }
}
