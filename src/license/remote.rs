//! Clients for the two remote licensing endpoints: activation-code
//! validation and one-time-code dispatch. Both are plain request/response
//! JSON calls with no retry policy; callers decide what a failure means
//! (for activation, a silent fall back to the local rules).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the validator reports for a code/device pair.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteActivation {
    pub valid: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
struct ValidateRequest<'a> {
    code: &'a str,
    device_id: &'a str,
}

/// Remote activation-code validator.
#[derive(Clone)]
pub struct ActivationClient {
    http: reqwest::Client,
    url: Option<String>,
}

impl ActivationClient {
    pub fn new(url: Option<String>) -> Self {
        Self { http: reqwest::Client::new(), url }
    }

    /// Ok(None) when no validator is configured; Err on any transport or
    /// protocol failure, which the caller treats as "use the local path".
    pub async fn validate(
        &self,
        code: &str,
        device_id: &str,
    ) -> Result<Option<RemoteActivation>, String> {
        let url = match &self.url {
            Some(url) => url,
            None => return Ok(None),
        };

        tracing::debug!(code, "validating activation code remotely");

        let response = self
            .http
            .post(url)
            .json(&ValidateRequest { code, device_id })
            .send()
            .await
            .map_err(|e| format!("activation request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("activation validator returned {}", response.status()));
        }

        let result: RemoteActivation = response
            .json()
            .await
            .map_err(|e| format!("unreadable activation response: {}", e))?;

        Ok(Some(result))
    }
}

/// Dispatches a one-time numeric code to an email address.
#[async_trait]
pub trait CodeSender: Send + Sync {
    async fn send(&self, email: &str, code: &str) -> Result<(), String>;
}

#[derive(Debug, Serialize)]
struct SendCodeRequest<'a> {
    email: &'a str,
    code: &'a str,
}

pub struct HttpCodeSender {
    http: reqwest::Client,
    url: Option<String>,
}

impl HttpCodeSender {
    pub fn new(url: Option<String>) -> Self {
        Self { http: reqwest::Client::new(), url }
    }
}

#[async_trait]
impl CodeSender for HttpCodeSender {
    async fn send(&self, email: &str, code: &str) -> Result<(), String> {
        let url = match &self.url {
            Some(url) => url,
            None => return Err("no code sender configured".to_string()),
        };

        let response = self
            .http
            .post(url)
            .json(&SendCodeRequest { email, code })
            .send()
            .await
            .map_err(|e| format!("code dispatch failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("code sender returned {}", response.status()));
        }

        Ok(())
    }
}
