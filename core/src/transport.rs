//! Transport: one HTTP exchange per public operation.
//!
//! RULE: The transport never interprets payloads.
//! Status codes and bodies are handed back untouched; the mapper
//! decides what they mean.

use crate::error::{PlaidError, PlaidResult};
use async_trait::async_trait;
use std::time::Duration;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get    => "GET",
            Self::Post   => "POST",
            Self::Delete => "DELETE",
        }
    }
}

/// A fully built request. Bodies are always form-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method:  Method,
    pub url:     String,
    pub body:    Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body:   Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_empty(&self) -> bool {
        self.body.iter().all(|b| b.is_ascii_whitespace())
    }

    /// Body as text for logging. Invalid UTF-8 is replaced, never rejected.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// The contract every transport must fulfill.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform exactly one exchange. No retries.
    async fn send(&self, request: &ApiRequest) -> PlaidResult<ApiResponse>;
}

/// `reqwest`-backed transport sharing one connection pool across calls.
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(default_timeout: Duration) -> PlaidResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(default_timeout)
            .build()
            .map_err(|e| PlaidError::Transport(format!("HTTP client build failed: {e}")))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> PlaidResult<ApiResponse> {
        let method = match request.method {
            Method::Get    => reqwest::Method::GET,
            Method::Post   => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .http
            .request(method, &request.url)
            .timeout(request.timeout);
        if let Some(body) = &request.body {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| PlaidError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| PlaidError::Transport(e.to_string()))?;

        Ok(ApiResponse::new(status, body.to_vec()))
    }
}
