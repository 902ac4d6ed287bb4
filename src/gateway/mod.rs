//! Gateway - the HTTP boundary consumed by the request coordinator.
//!
//! The core never talks to the network directly. It hands an [`ApiRequest`]
//! to a [`Gateway`] and gets back the decoded JSON body or a
//! [`GatewayError`]. The `http` feature provides [`HttpGateway`], backed by
//! `reqwest`; tests plug in scripted gateways.

#[cfg(feature = "http")]
mod http;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

#[cfg(feature = "http")]
pub use http::HttpGateway;

/// HTTP method of an API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One API call, relative to the gateway's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn query_pairs(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// The query string in `name=value&...` form, for logs and filter labels.
    pub fn query_string(&self) -> String {
        self.query
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)?;
        if !self.query.is_empty() {
            write!(f, "?{}", self.query_string())?;
        }
        Ok(())
    }
}

/// Failure reported by a gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Non-2xx answer. `message` is the payload's `message` or `error` field if present.
    Remote { status: u16, message: Option<String> },
    /// No usable answer: connection failure, timeout or malformed body.
    Transport(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Remote {
                status,
                message: Some(message),
            } => write!(f, "HTTP {}: {}", status, message),
            GatewayError::Remote {
                status,
                message: None,
            } => write!(f, "HTTP {}", status),
            GatewayError::Transport(msg) => write!(f, "transport failure: {}", msg),
        }
    }
}

impl std::error::Error for GatewayError {}

/// Pull the human-readable failure reason out of an error payload.
pub fn remote_message(body: &Value) -> Option<String> {
    ["message", "error"].iter().find_map(|field| {
        body.get(*field)
            .and_then(Value::as_str)
            .filter(|msg| !msg.trim().is_empty())
            .map(str::to_string)
    })
}

/// Performs API calls. Implementations must apply a bounded timeout and report
/// it as [`GatewayError::Transport`].
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<Value, GatewayError>;
}

#[async_trait]
impl<G: Gateway + ?Sized> Gateway for Arc<G> {
    async fn send(&self, request: ApiRequest) -> Result<Value, GatewayError> {
        (**self).send(request).await
    }
}
