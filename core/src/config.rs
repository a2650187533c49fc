//! Client configuration.
//!
//! Defaults are layered under `TESTHUB_`-prefixed environment variables:
//! `TESTHUB_BASE_URL` and `TESTHUB_TIMEOUT_SECS`.

use std::time::Duration;

use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const ENV_PREFIX: &str = "TESTHUB_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend root including the `/api` prefix.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    pub fn load() -> Result<Self, ApiError> {
        Self::figment()
            .extract()
            .map_err(|e| ApiError::Config(e.to_string()))
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(ClientConfig::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
