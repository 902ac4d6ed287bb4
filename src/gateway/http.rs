//! `reqwest`-backed gateway.
//!
//! Requires the `http` feature.
//!
//! ## Example
//!
//! ```ignore
//! use taskhub_sync::{ClientConfig, HttpGateway};
//!
//! let gateway = HttpGateway::new(&ClientConfig::from_env()?)?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;

use super::{remote_message, ApiRequest, Gateway, GatewayError, Method};
use crate::config::{ClientConfig, ConfigError};

/// Gateway that performs real HTTP calls against `ClientConfig::api_url`.
#[derive(Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpGateway {
    /// Build a gateway from a validated config.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            timeout: config.request_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Transport(format!("request timed out after {:?}", self.timeout))
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn send(&self, request: ApiRequest) -> Result<Value, GatewayError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, self.url(&request.path));
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        debug!(request = %request, "sending api request");
        let response = builder.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        let body: Result<Value, serde_json::Error> = if bytes.is_empty() {
            Ok(Value::Object(Map::new()))
        } else {
            serde_json::from_slice(&bytes)
        };

        debug!(request = %request, status = status.as_u16(), "api response received");

        if !status.is_success() {
            return Err(GatewayError::Remote {
                status: status.as_u16(),
                message: body.ok().as_ref().and_then(remote_message),
            });
        }

        body.map_err(|e| GatewayError::Transport(format!("malformed response body: {}", e)))
    }
}
