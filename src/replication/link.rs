//! Peer Links
//!
//! A `PeerLink` is a one-way JSON channel to another node's endpoint (a secondary's
//! `/sync`, the gateway's `/invalidate-cache`). Delivery succeeds only on an explicit
//! acknowledgment: HTTP 200 with `success: true` in the envelope.

use crate::error::ShopResult;
use crate::http::endpoint_url;
use crate::protocol::ApiResponse;

use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeliveryError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("peer answered {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("payload could not be encoded: {0}")]
    Encode(String),
}

#[async_trait]
pub trait PeerLink: Send + Sync {
    /// Human-readable destination, used in logs.
    fn target(&self) -> String;

    async fn deliver(&self, payload: &serde_json::Value) -> Result<ApiResponse, DeliveryError>;
}

pub struct HttpPeerLink {
    client: reqwest::Client,
    url: Url,
    timeout: Duration,
}

impl HttpPeerLink {
    /// Link to `<base_url>/<endpoint>`.
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        endpoint: &str,
        timeout: Duration,
    ) -> ShopResult<Self> {
        Ok(Self {
            client,
            url: endpoint_url(base_url, &[endpoint])?,
            timeout,
        })
    }
}

#[async_trait]
impl PeerLink for HttpPeerLink {
    fn target(&self) -> String {
        self.url.to_string()
    }

    async fn deliver(&self, payload: &serde_json::Value) -> Result<ApiResponse, DeliveryError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(payload)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        let body: Option<ApiResponse> = response.json().await.ok();

        match body {
            Some(ack) if status == reqwest::StatusCode::OK && ack.success => Ok(ack),
            Some(ack) => Err(DeliveryError::Rejected {
                status: status.as_u16(),
                message: ack.message.unwrap_or_default(),
            }),
            None => Err(DeliveryError::Rejected {
                status: status.as_u16(),
                message: "response is not a valid envelope".to_string(),
            }),
        }
    }
}
