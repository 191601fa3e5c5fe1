//! Caller-supplied log sinks and the raw request/response record.
//!
//! Without sinks, everything goes through the `log` facade:
//! generic messages at warn, raw records at info on `plaidster::raw`.

use crate::{
    dates::DateFormats,
    transport::{ApiRequest, ApiResponse},
};
use std::sync::Arc;

pub const RAW_TARGET: &str = "plaidster::raw";

pub type LogSink = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Clone, Default)]
pub struct Sinks {
    pub logger:     Option<LogSink>,
    pub raw_logger: Option<LogSink>,
}

impl Sinks {
    pub fn log(&self, message: &str) {
        match &self.logger {
            Some(sink) => sink(message),
            None => log::warn!("{message}"),
        }
    }

    pub fn log_raw(&self, message: &str) {
        match (&self.raw_logger, &self.logger) {
            (Some(sink), _) => sink(message),
            (None, Some(sink)) => sink(message),
            (None, None) => log::info!(target: RAW_TARGET, "{message}"),
        }
    }
}

impl std::fmt::Debug for Sinks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sinks")
            .field("logger", &self.logger.is_some())
            .field("raw_logger", &self.raw_logger.is_some())
            .finish()
    }
}

/// Render one raw exchange. A transport failure stands in for the response.
pub fn raw_record(
    formats: &DateFormats,
    operation: &str,
    request: &ApiRequest,
    outcome: Result<&ApiResponse, &str>,
) -> String {
    let stamp = formats.log_stamp(&chrono::Utc::now());
    let body = request.body.as_deref().unwrap_or("");
    let response = match outcome {
        Ok(resp) => resp.body_text(),
        Err(e)   => format!("<transport error: {e}>"),
    };
    format!(
        "{stamp} {operation}:\nURL: {}\nBody: {body}\nResponse: {response}",
        request.url
    )
}
