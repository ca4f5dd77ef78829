use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;
use tracing::{debug, instrument};
use url::Url;

use crate::config::Config;
use crate::error::Result;
use crate::models::failure::Failure;

/// Command/response contract of the persistence service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteBoundary: Send + Sync {
    async fn invoke(&self, command: &str, payload: JsonValue) -> std::result::Result<JsonValue, Failure>;
}

/// Sends each command as `POST {base_url}/{command}` with the payload as JSON body.
#[derive(Clone)]
pub struct HttpBoundary {
    client: Client,
    base_url: Url,
}

impl HttpBoundary {
    pub fn new(base_url: Url, client: Client) -> Self {
        Self { client, base_url }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.remote_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::new(config.remote_base_url.clone(), builder.build()?))
    }
}

#[async_trait]
impl RemoteBoundary for HttpBoundary {
    #[instrument(level = "debug", skip(self, payload))]
    async fn invoke(&self, command: &str, payload: JsonValue) -> std::result::Result<JsonValue, Failure> {
        let url = self.base_url.join(command).map_err(Failure::native)?;

        let resp = self
            .client
            .post(url)
            .header("Accept", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(Failure::native)?;

        let status = resp.status();
        let body = resp.text().await.map_err(Failure::native)?;
        debug!(status = status.as_u16(), "remote command settled");

        let parsed = if body.trim().is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_str(&body).unwrap_or(JsonValue::String(body))
        };

        if status.is_success() {
            Ok(parsed)
        } else if parsed.is_null() {
            Err(Failure::Message(format!("Remote command {} failed with status {}", command, status.as_u16())))
        } else {
            Err(Failure::from_value(parsed))
        }
    }
}
