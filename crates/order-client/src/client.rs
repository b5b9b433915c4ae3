//! HTTP client for the order API.

use crate::error::Error;
use crate::types::*;
use reqwest::Client;
use std::time::Duration;
use url::Url;


/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "http://localhost:3000").
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the Coffee Order API.
#[derive(Debug, Clone)]
pub struct OrderClient {
    client: Client,
    base_url: Url,
}

impl OrderClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or the HTTP client cannot be
    /// built.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))?;

        Ok(Self { client, base_url })
    }

    /// Creates a new client with default configuration.
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or the HTTP client cannot be
    /// built.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::new(ClientConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        })
    }

    /// Builds an endpoint URL, percent-encoding every segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ========================================================================
    // Health & Status
    // ========================================================================

    /// Performs a health check.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn health_check(&self) -> Result<HealthResponse, Error> {
        let url = self.endpoint(&["health"])?;
        let resp = self.client.get(url).send().await?;
        self.handle_response(resp).await
    }

    /// Lists open orders with per-drink counts.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn status(&self) -> Result<StatusResponse, Error> {
        let url = self.endpoint(&["status"])?;
        let resp = self.client.get(url).send().await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // Orders
    // ========================================================================

    /// Places an order, or updates the guest's order for the same drink.
    ///
    /// # Errors
    /// Returns [`Error::Api`] with status 400 if guest or coffee is blank.
    pub async fn place_order(
        &self,
        request: &PlaceOrderRequest,
    ) -> Result<PlaceOrderResponse, Error> {
        let url = self.endpoint(&["order"])?;
        let resp = self.client.post(url).json(request).send().await?;
        self.handle_response(resp).await
    }

    /// Removes one order.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if no order matches.
    pub async fn delete_order(&self, guest: &str, coffee: &str) -> Result<ActionResponse, Error> {
        let url = self.endpoint(&["order", guest, coffee])?;
        let resp = self.client.delete(url).send().await?;
        self.handle_response(resp).await
    }

    /// Removes every open order.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn clear_orders(&self) -> Result<ActionResponse, Error> {
        let url = self.endpoint(&["orders"])?;
        let resp = self.client.delete(url).send().await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();

        if status.is_success() {
            return Ok(resp.json().await?);
        }

        let text = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&text)
            .map(|body| body.error)
            .unwrap_or(text);

        if status.as_u16() == 404 {
            Err(Error::NotFound(message))
        } else {
            Err(Error::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}
