//! The API client: one request, one result, per public operation.
//!
//! RULES:
//!   - Operations share nothing mutable; the client is a cheap clone
//!     over immutable config, one transport and the log sinks.
//!   - When raw logging is on, every exchange is logged before the
//!     mapper looks at it, failures included.
//!   - Nothing is retried. A transport failure is the call's result.

use crate::{
    config::ClientConfig,
    dates::DateFormats,
    error::PlaidResult,
    logging::{raw_record, LogSink, Sinks},
    mapper::{self, AddUserResponse, AuthOutcome, LongtailPage},
    mfa::MfaResponse,
    model::{Account, Category, Institution, Transaction},
    request::{Credentials, RequestBuilder, TransactionQuery},
    search::SearchHandle,
    transport::{ApiRequest, ApiResponse, HttpTransport, Transport},
    types::{AccessToken, Environment, Product},
};
use std::sync::Arc;

struct ClientInner {
    environment: Environment,
    raw_logging: bool,
    requests:    RequestBuilder,
    transport:   Box<dyn Transport>,
    sinks:       Sinks,
}

#[derive(Clone)]
pub struct PlaidClient {
    inner: Arc<ClientInner>,
}

pub struct ClientBuilder {
    config:    ClientConfig,
    transport: Option<Box<dyn Transport>>,
    sinks:     Sinks,
}

impl ClientBuilder {
    /// Replace the default `reqwest` transport.
    pub fn transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    pub fn logger<F>(mut self, sink: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.sinks.logger = Some(Arc::new(sink) as LogSink);
        self
    }

    pub fn raw_logger<F>(mut self, sink: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.sinks.raw_logger = Some(Arc::new(sink) as LogSink);
        self
    }

    pub fn build(self) -> PlaidResult<PlaidClient> {
        let transport = match self.transport {
            Some(t) => t,
            None => Box::new(HttpTransport::new(self.config.timeout())?),
        };
        Ok(PlaidClient {
            inner: Arc::new(ClientInner {
                environment: self.config.environment,
                raw_logging: self.config.raw_logging,
                requests: RequestBuilder::new(&self.config, DateFormats::new()),
                transport,
                sinks: self.sinks,
            }),
        })
    }
}

impl PlaidClient {
    /// Client over the default HTTP transport, logging through `log`.
    pub fn new(config: ClientConfig) -> PlaidResult<Self> {
        Self::builder(config).build()
    }

    pub fn builder(config: ClientConfig) -> ClientBuilder {
        ClientBuilder {
            config,
            transport: None,
            sinks: Sinks::default(),
        }
    }

    pub fn environment(&self) -> Environment {
        self.inner.environment
    }

    async fn execute(&self, operation: &str, request: ApiRequest) -> PlaidResult<ApiResponse> {
        log::debug!("{operation}: {} request", request.method.as_str());
        let outcome = self.inner.transport.send(&request).await;

        if self.inner.raw_logging {
            let formats = self.inner.requests.formats();
            let record = match &outcome {
                Ok(response) => raw_record(formats, operation, &request, Ok(response)),
                Err(e) => {
                    let detail = e.to_string();
                    raw_record(formats, operation, &request, Err(detail.as_str()))
                }
            };
            self.inner.sinks.log_raw(&record);
        }

        if let Err(e) = &outcome {
            log::warn!("{operation}: {e}");
        }
        outcome
    }

    // ── Auth ───────────────────────────────────────────────────

    /// Log a user in at an institution. Either connects outright or
    /// returns the first MFA challenge alongside the access token.
    pub async fn add_user(
        &self,
        credentials: &Credentials,
        institution_type: &str,
    ) -> PlaidResult<AddUserResponse> {
        self.add_user_keeping_token(credentials, institution_type).await.1
    }

    /// `add_user`, plus the access token the remote issued even when the
    /// rest of its reply was unusable.
    pub(crate) async fn add_user_keeping_token(
        &self,
        credentials: &Credentials,
        institution_type: &str,
    ) -> (Option<AccessToken>, PlaidResult<AddUserResponse>) {
        let request = self.inner.requests.add_user(credentials, institution_type);
        match self.execute("add_user", request).await {
            Ok(response) => mapper::map_add_user_with_token(&response, &self.inner.sinks),
            Err(e) => (None, Err(e)),
        }
    }

    /// Answer the pending challenge. May return a further challenge.
    pub async fn submit_mfa(
        &self,
        access_token: &str,
        response: &MfaResponse,
    ) -> PlaidResult<AuthOutcome> {
        let request = self.inner.requests.submit_mfa(access_token, response);
        let reply = self.execute("submit_mfa", request).await?;
        mapper::map_submit_mfa(&reply, &self.inner.sinks)
    }

    pub async fn submit_mfa_code(&self, access_token: &str, code: &str) -> PlaidResult<AuthOutcome> {
        self.submit_mfa(access_token, &MfaResponse::Code(code.to_string())).await
    }

    pub async fn submit_mfa_answer(&self, access_token: &str, answer: &str) -> PlaidResult<AuthOutcome> {
        self.submit_mfa(access_token, &MfaResponse::Answer(answer.to_string())).await
    }

    pub async fn submit_mfa_device_type(&self, access_token: &str, device: &str) -> PlaidResult<AuthOutcome> {
        self.submit_mfa(access_token, &MfaResponse::DeviceType(device.to_string())).await
    }

    pub async fn submit_mfa_device_mask(&self, access_token: &str, mask: &str) -> PlaidResult<AuthOutcome> {
        self.submit_mfa(access_token, &MfaResponse::DeviceMask(mask.to_string())).await
    }

    /// Delete the user at the remote. Returns the remote's message, if any.
    pub async fn remove_user(&self, access_token: &str) -> PlaidResult<Option<String>> {
        let request = self.inner.requests.remove_user(access_token);
        let response = self.execute("remove_user", request).await?;
        mapper::map_remove_user(&response)
    }

    // ── Per-user reads ─────────────────────────────────────────

    /// An empty account list is an error here, not an empty success.
    pub async fn fetch_balances(&self, access_token: &str) -> PlaidResult<Vec<Account>> {
        let request = self.inner.requests.balances(access_token);
        let response = self.execute("fetch_balances", request).await?;
        mapper::map_balances(&response, &self.inner.sinks)
    }

    pub async fn fetch_transactions(
        &self,
        access_token: &str,
        query: &TransactionQuery,
    ) -> PlaidResult<Vec<Transaction>> {
        let request = self.inner.requests.transactions(access_token, query);
        let response = self.execute("fetch_transactions", request).await?;
        mapper::map_transactions(&response, &self.inner.sinks)
    }

    // ── Lookups ────────────────────────────────────────────────

    pub async fn fetch_categories(&self) -> PlaidResult<Vec<Category>> {
        let request = self.inner.requests.categories();
        let response = self.execute("fetch_categories", request).await?;
        mapper::map_categories(&response, &self.inner.sinks)
    }

    pub async fn fetch_institutions(&self) -> PlaidResult<Vec<Institution>> {
        let request = self.inner.requests.institutions();
        let response = self.execute("fetch_institutions", request).await?;
        mapper::map_institutions(&response, &self.inner.sinks)
    }

    pub async fn fetch_longtail_institutions(&self, count: u32, offset: u32) -> PlaidResult<LongtailPage> {
        let request = self.inner.requests.longtail_institutions(count, offset);
        let response = self.execute("fetch_longtail_institutions", request).await?;
        mapper::map_longtail(&response, &self.inner.sinks)
    }

    /// Start a search by name. Must be called inside a tokio runtime.
    pub fn search_institutions(&self, query: &str, product: Option<Product>) -> SearchHandle {
        let client = self.clone();
        let request = self.inner.requests.search_institutions(query, product);
        SearchHandle::spawn(async move {
            let response = client.execute("search_institutions", request).await?;
            mapper::map_search(&response, &client.inner.sinks)
        })
    }

    /// Start a lookup by institution id. Must be called inside a tokio runtime.
    pub fn search_institution_by_id(&self, id: &str) -> SearchHandle {
        let client = self.clone();
        let request = self.inner.requests.search_institution_by_id(id);
        SearchHandle::spawn(async move {
            let response = client.execute("search_institution_by_id", request).await?;
            mapper::map_search_by_id(&response, &client.inner.sinks)
        })
    }
}

impl std::fmt::Debug for PlaidClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaidClient")
            .field("environment", &self.inner.environment)
            .field("raw_logging", &self.inner.raw_logging)
            .field("sinks", &self.inner.sinks)
            .finish()
    }
}
