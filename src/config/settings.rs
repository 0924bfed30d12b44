//! API endpoint and transport settings.

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};
use crate::api::transport::DEFAULT_TIMEOUT_SECS;
use crate::api::DEFAULT_PAGE_SIZE;

/// Where and how the client talks to Simplenote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiSettings {
    /// Login endpoint; answers with a token.
    pub login_url: String,
    /// Note data endpoint; notes live at `{data_url}/{key}`.
    pub data_url: String,
    /// Note index endpoint.
    pub index_url: String,
    /// Notes requested per index page.
    pub page_size: u32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            login_url: "https://app.simplenote.com/api/login".to_string(),
            data_url: "https://app.simplenote.com/api2/data".to_string(),
            index_url: "https://app.simplenote.com/api2/index".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiSettings {
    /// Validate the endpoint URLs and limits.
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("login_url", &self.login_url),
            ("data_url", &self.data_url),
            ("index_url", &self.index_url),
        ] {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(ConfigError::ValidationError(format!(
                    "api.{} must start with http:// or https://",
                    name
                )));
            }
        }

        if self.page_size == 0 {
            return Err(ConfigError::ValidationError(
                "api.page_size must be greater than zero".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "api.timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
