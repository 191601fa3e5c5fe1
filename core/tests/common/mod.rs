//! Shared helpers for integration tests: a scripted in-memory transport.

#![allow(dead_code)]

use async_trait::async_trait;
use plaidster_core::{
    ApiRequest, ApiResponse, ClientConfig, PlaidClient, PlaidError, PlaidResult, Transport,
};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// What the fake remote does for one request.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Raw(&'static str),
    Empty,
    Fail(&'static str),
    /// Never answers. Used to exercise cancellation.
    Hang,
}

pub type Seen = Arc<Mutex<Vec<ApiRequest>>>;
pub type Lines = Arc<Mutex<Vec<String>>>;

pub struct FakeTransport {
    replies: Mutex<VecDeque<Reply>>,
    seen:    Seen,
}

impl FakeTransport {
    pub fn new(replies: Vec<Reply>) -> (Self, Seen) {
        let seen: Seen = Arc::default();
        let transport = Self {
            replies: Mutex::new(replies.into()),
            seen: seen.clone(),
        };
        (transport, seen)
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: &ApiRequest) -> PlaidResult<ApiResponse> {
        self.seen.lock().unwrap().push(request.clone());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Json(v)) => Ok(ApiResponse::new(200, v.to_string())),
            Some(Reply::Raw(text)) => Ok(ApiResponse::new(200, text)),
            Some(Reply::Empty) => Ok(ApiResponse::new(200, Vec::new())),
            Some(Reply::Fail(msg)) => Err(PlaidError::Transport(msg.to_string())),
            Some(Reply::Hang) => std::future::pending::<PlaidResult<ApiResponse>>().await,
            None => Err(PlaidError::Transport("no scripted reply left".into())),
        }
    }
}

/// Route library logs to the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn client(replies: Vec<Reply>) -> (PlaidClient, Seen) {
    init_logging();
    let (transport, seen) = FakeTransport::new(replies);
    let client = PlaidClient::builder(ClientConfig::default_test())
        .transport(transport)
        .build()
        .expect("client");
    (client, seen)
}

/// Client whose generic and raw sinks write into the returned buffers.
pub fn logging_client(replies: Vec<Reply>) -> (PlaidClient, Seen, Lines, Lines) {
    init_logging();
    let (transport, seen) = FakeTransport::new(replies);
    let logs: Lines = Arc::default();
    let raw: Lines = Arc::default();
    let (logs_sink, raw_sink) = (logs.clone(), raw.clone());
    let client = PlaidClient::builder(ClientConfig::default_test().with_raw_logging(true))
        .transport(transport)
        .logger(move |line| logs_sink.lock().unwrap().push(line.to_string()))
        .raw_logger(move |line| raw_sink.lock().unwrap().push(line.to_string()))
        .build()
        .expect("client");
    (client, seen, logs, raw)
}

/// Decode `a=1&b=2` (query string or form body) into a map.
pub fn params(encoded: &str) -> HashMap<String, String> {
    encoded
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (k.to_string(), urlencoding::decode(v).expect("utf-8").into_owned())
        })
        .collect()
}

pub fn query_of(request: &ApiRequest) -> HashMap<String, String> {
    let (_, query) = request.url.split_once('?').expect("query string");
    params(query)
}

pub fn body_of(request: &ApiRequest) -> HashMap<String, String> {
    params(request.body.as_deref().expect("form body"))
}

// ── Fixtures ────────────────────────────────────────────────────

pub fn account_json(id: &str) -> Value {
    serde_json::json!({
        "_id": id,
        "_item": "item-1",
        "_user": "user-1",
        "balance": { "available": 1203.42, "current": 1274.93 },
        "institution_type": "fake_institution",
        "meta": { "name": "Plaid Savings", "number": "9606" },
        "type": "depository",
        "subtype": "savings"
    })
}

pub fn transaction_json(id: &str, amount: f64) -> Value {
    serde_json::json!({
        "_id": id,
        "_account": "acct-1",
        "amount": amount,
        "date": "2014-07-21",
        "name": "ATM Withdrawal",
        "meta": { "location": { "city": "San Francisco", "state": "CA" } },
        "pending": false,
        "type": { "primary": "special" },
        "category": ["Transfer", "Withdrawal", "ATM"],
        "category_id": "21012002"
    })
}
