//! Per-operation request builders.
//!
//! RULE: Every request carries `client_id` and `secret`.
//! Writes put parameters in a form body, reads in the query string.
//! Nested option structures are JSON-stringified, then percent-encoded.

use crate::{
    config::ClientConfig,
    dates::DateFormats,
    mfa::MfaResponse,
    types::Product,
    transport::{ApiRequest, Method},
};
use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};
use std::time::Duration;

/// Login credentials for `connect`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub pin:      Option<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            pin: None,
        }
    }

    pub fn with_pin(mut self, pin: impl Into<String>) -> Self {
        self.pin = Some(pin.into());
        self
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("pin", &self.pin.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Filters for `fetch_transactions`. Both bounds are inclusive and
/// independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionQuery {
    pub include_pending: bool,
    pub start:           Option<DateTime<Utc>>,
    pub end:             Option<DateTime<Utc>>,
}

impl TransactionQuery {
    pub fn new(include_pending: bool) -> Self {
        Self { include_pending, ..Self::default() }
    }

    pub fn since(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    pub fn until(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }
}

/// Ordered `key=value` pairs; values are percent-encoded on render.
#[derive(Debug, Default)]
struct Params(Vec<(&'static str, String)>);

impl Params {
    fn push(&mut self, key: &'static str, value: impl Into<String>) -> &mut Self {
        self.0.push((key, value.into()));
        self
    }

    fn encode(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Builds the one request each public operation sends.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url:  String,
    client_id: String,
    secret:    String,
    timeout:   Duration,
    formats:   DateFormats,
}

impl RequestBuilder {
    pub fn new(config: &ClientConfig, formats: DateFormats) -> Self {
        Self {
            base_url: config.base_url().to_string(),
            client_id: config.client_id.clone(),
            secret: config.secret.clone(),
            timeout: config.timeout(),
            formats,
        }
    }

    pub fn formats(&self) -> &DateFormats {
        &self.formats
    }

    fn credentials(&self) -> Params {
        let mut params = Params::default();
        params
            .push("client_id", self.client_id.as_str())
            .push("secret", self.secret.as_str());
        params
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn read(&self, path: &str, params: &Params) -> ApiRequest {
        ApiRequest {
            method: Method::Get,
            url: format!("{}?{}", self.url(path), params.encode()),
            body: None,
            timeout: self.timeout,
        }
    }

    fn write(&self, method: Method, path: &str, params: &Params) -> ApiRequest {
        ApiRequest {
            method,
            url: self.url(path),
            body: Some(params.encode()),
            timeout: self.timeout,
        }
    }

    // ── Auth ───────────────────────────────────────────────────

    pub fn add_user(&self, credentials: &Credentials, institution_type: &str) -> ApiRequest {
        let mut params = self.credentials();
        params
            .push("username", credentials.username.as_str())
            .push("password", credentials.password.as_str())
            .push("type", institution_type)
            .push("options", json!({ "list": true }).to_string());
        if let Some(pin) = &credentials.pin {
            params.push("pin", pin.as_str());
        }
        self.write(Method::Post, "connect", &params)
    }

    pub fn submit_mfa(&self, access_token: &str, response: &MfaResponse) -> ApiRequest {
        let mut params = self.credentials();
        params.push("access_token", access_token);
        let (key, value) = response.to_param();
        params.push(key, value);
        self.write(Method::Post, "connect/step", &params)
    }

    pub fn remove_user(&self, access_token: &str) -> ApiRequest {
        let mut params = self.credentials();
        params.push("access_token", access_token);
        self.write(Method::Delete, "connect", &params)
    }

    // ── Reads ──────────────────────────────────────────────────

    pub fn balances(&self, access_token: &str) -> ApiRequest {
        let mut params = self.credentials();
        params.push("access_token", access_token);
        self.read("balance", &params)
    }

    pub fn transactions(&self, access_token: &str, query: &TransactionQuery) -> ApiRequest {
        let mut options = Map::new();
        options.insert("pending".into(), Value::Bool(query.include_pending));
        if let Some(start) = &query.start {
            options.insert("gte".into(), Value::String(self.formats.to_wire(start)));
        }
        if let Some(end) = &query.end {
            options.insert("lte".into(), Value::String(self.formats.to_wire(end)));
        }

        let mut params = self.credentials();
        params
            .push("access_token", access_token)
            .push("options", Value::Object(options).to_string());
        self.read("connect", &params)
    }

    pub fn categories(&self) -> ApiRequest {
        self.read("categories", &self.credentials())
    }

    pub fn institutions(&self) -> ApiRequest {
        self.read("institutions", &self.credentials())
    }

    pub fn longtail_institutions(&self, count: u32, offset: u32) -> ApiRequest {
        let mut params = self.credentials();
        params
            .push("count", count.to_string())
            .push("offset", offset.to_string());
        self.write(Method::Post, "institutions/longtail", &params)
    }

    pub fn search_institutions(&self, query: &str, product: Option<Product>) -> ApiRequest {
        let mut params = self.credentials();
        params.push("q", query);
        if let Some(product) = product {
            params.push("p", product.as_str());
        }
        self.read("institutions/search", &params)
    }

    pub fn search_institution_by_id(&self, id: &str) -> ApiRequest {
        let mut params = self.credentials();
        params.push("id", id);
        self.read("institutions/search", &params)
    }
}
