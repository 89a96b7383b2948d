// Copyright (c) 2025 - Cowboy AI, Inc.
//! HTTP Variable Store
//!
//! Client for the cloud automation service's variables endpoint:
//!
//! ```text
//! get(k)       = GET    {endpoint}/{k}
//! post(k, v)   = POST   {endpoint}?key={k}     body: v
//! put(k, v)    = PUT    {endpoint}/{k}         body: v
//! delete(k)    = DELETE {endpoint}/{k}
//! keys()       = GET    {endpoint}             JSON array of keys
//! ```
//!
//! Keys are percent-encoded. Any status of 300 or above is reported as
//! [`StoreError::Status`]; 404 maps to [`StoreError::NotFound`].

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{StoreError, StoreResult, VariableStore};
use crate::config::EngineConfig;

#[derive(Debug, Clone)]
pub struct HttpVariableStore {
    endpoint: String,
    client: Client,
}

impl HttpVariableStore {
    pub fn new(config: &EngineConfig) -> StoreResult<Self> {
        info!("Using variable store at {}", config.variables_endpoint);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            endpoint: config.variables_endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn key_url(&self, key: &str) -> String {
        format!("{}/{}", self.endpoint, urlencoding::encode(key))
    }

    fn check(key: &str, response: Response) -> StoreResult<Response> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(key.to_string()));
        }
        if status.as_u16() >= 300 {
            let reason = response.text().unwrap_or_default();
            warn!(key, status = status.as_u16(), "variable store request failed");
            return Err(StoreError::Status {
                code: status.as_u16(),
                reason,
            });
        }
        Ok(response)
    }
}

fn transport(err: reqwest::Error) -> StoreError {
    StoreError::Transport(err.to_string())
}

impl VariableStore for HttpVariableStore {
    fn get(&self, key: &str) -> StoreResult<String> {
        debug!(key, "GET variable");
        let response = self.client.get(self.key_url(key)).send().map_err(transport)?;
        Self::check(key, response)?.text().map_err(transport)
    }

    fn post(&self, key: &str, value: &str) -> StoreResult<()> {
        debug!(key, "POST variable");
        let url = format!("{}?key={}", self.endpoint, urlencoding::encode(key));
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(value.to_string())
            .send()
            .map_err(transport)?;
        if response.status() == StatusCode::CONFLICT {
            return Err(StoreError::Conflict(key.to_string()));
        }
        Self::check(key, response).map(|_| ())
    }

    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        debug!(key, "PUT variable");
        let response = self
            .client
            .put(self.key_url(key))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(value.to_string())
            .send()
            .map_err(transport)?;
        Self::check(key, response).map(|_| ())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        debug!(key, "DELETE variable");
        let response = self.client.delete(self.key_url(key)).send().map_err(transport)?;
        Self::check(key, response).map(|_| ())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let response = self.client.get(&self.endpoint).send().map_err(transport)?;
        let body = Self::check("*", response)?.text().map_err(transport)?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_urls_are_encoded() {
        let config = EngineConfig {
            variables_endpoint: "http://automation.local/variables/".into(),
            ..EngineConfig::default()
        };
        let store = HttpVariableStore::new(&config).unwrap();
        assert_eq!(
            store.key_url("instance:urn:uuid:1"),
            "http://automation.local/variables/instance%3Aurn%3Auuid%3A1"
        );
    }
}
