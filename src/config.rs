// Copyright (c) 2025 - Cowboy AI, Inc.
//! Engine configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::entity::EntityId;
use crate::errors::{OcciError, OcciResult};

/// Settings shared by the services, the variable store and the CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Cloud automation variables endpoint
    pub variables_endpoint: String,

    /// Store request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Prefix for generated entity identifiers
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,

    /// Reject kinds without a registered builder instead of falling back
    #[serde(default)]
    pub strict_kinds: bool,
}

fn default_timeout() -> u64 {
    30
}

fn default_id_prefix() -> String {
    EntityId::DEFAULT_PREFIX.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            variables_endpoint: "http://localhost:8080/cloud-automation-service/variables"
                .to_string(),
            timeout_secs: default_timeout(),
            id_prefix: default_id_prefix(),
            strict_kinds: false,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `OCCI_VARIABLES_ENDPOINT`, `OCCI_STORE_TIMEOUT_SECS`,
    /// `OCCI_ID_PREFIX` and `OCCI_STRICT_KINDS`
    pub fn from_env() -> OcciResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> OcciResult<Self> {
        let mut config = Self::default();

        if let Some(endpoint) = lookup("OCCI_VARIABLES_ENDPOINT") {
            config.variables_endpoint = endpoint;
        }
        if let Some(timeout) = lookup("OCCI_STORE_TIMEOUT_SECS") {
            config.timeout_secs = timeout.trim().parse().map_err(|_| {
                OcciError::Configuration(format!(
                    "OCCI_STORE_TIMEOUT_SECS must be a number of seconds, got {timeout:?}"
                ))
            })?;
        }
        if let Some(prefix) = lookup("OCCI_ID_PREFIX") {
            config.id_prefix = prefix;
        }
        if let Some(strict) = lookup("OCCI_STRICT_KINDS") {
            config.strict_kinds = match strict.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                other => {
                    return Err(OcciError::Configuration(format!(
                        "OCCI_STRICT_KINDS must be a boolean, got {other:?}"
                    )))
                }
            };
        }

        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
