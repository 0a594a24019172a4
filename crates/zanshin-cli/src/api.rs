//! Thin client for the Zanshin API. Every method forwards a request and
//! returns the JSON body; domain modelling stays out of the CLI.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

use crate::config::Settings;

/// Default scan schedule: once a day, overnight.
pub const DAILY_SCHEDULE: &str = r#"{"frequency":"1d","timeOfDay":"NIGHT"}"#;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct ZanshinClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
}

/// Payload for scan-target creation.
#[derive(Debug, Serialize)]
pub struct NewScanTarget {
    pub name: String,
    pub kind: String,
    pub credential: Value,
    pub schedule: Value,
}

impl ZanshinClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("zanshin-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build the HTTP client")?;
        Ok(Self {
            http,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        })
    }

    /// The caller's own account (GET /me).
    pub async fn me(&self) -> Result<Value> {
        self.get("/me").await
    }

    /// Organizations this user has direct access to.
    pub async fn organizations(&self) -> Result<Vec<Value>> {
        let body = self.get("/organizations").await?;
        as_array(body, "/organizations")
    }

    /// Scan targets of one organization.
    pub async fn scan_targets(&self, organization_id: &Uuid) -> Result<Vec<Value>> {
        let path = format!("/organizations/{organization_id}/scantargets");
        let body = self.get(&path).await?;
        as_array(body, &path)
    }

    /// Create a scan target in the organization.
    pub async fn create_scan_target(
        &self,
        organization_id: &Uuid,
        scan_target: &NewScanTarget,
    ) -> Result<Value> {
        let path = format!("/organizations/{organization_id}/scantargets");
        let response = self
            .http
            .post(format!("{}{path}", self.api_url))
            .bearer_auth(&self.api_key)
            .json(scan_target)
            .send()
            .await
            .with_context(|| format!("POST {path} failed"))?;
        Self::into_json(response).await
    }

    async fn get(&self, path: &str) -> Result<Value> {
        let response = self
            .http
            .get(format!("{}{path}", self.api_url))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .with_context(|| format!("GET {path} failed"))?;
        Self::into_json(response).await
    }

    async fn into_json(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("API request failed with {status}: {body}");
        }
        response.json().await.context("invalid JSON in API response")
    }
}

fn as_array(body: Value, path: &str) -> Result<Vec<Value>> {
    match body {
        Value::Array(items) => Ok(items),
        other => bail!("expected a JSON array from {path}, got: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
