//! plaidster-core: typed client for a financial-data aggregation API.
//!
//! Authenticates users (with multi-round MFA), then fetches accounts,
//! transactions, categories and institution metadata as typed records.

pub mod auth;
pub mod client;
pub mod config;
pub mod dates;
pub mod error;
pub mod logging;
pub mod mapper;
pub mod mfa;
pub mod model;
pub mod request;
pub mod search;
pub mod transport;
pub mod types;

pub use auth::{AuthState, LinkSession};
pub use client::{ClientBuilder, PlaidClient};
pub use config::ClientConfig;
pub use error::{PlaidError, PlaidResult};
pub use mapper::{AddUserResponse, AuthOutcome, LongtailPage};
pub use mfa::{MfaChallenge, MfaResponse, MfaType};
pub use model::{Account, Category, Institution, SearchInstitution, Transaction, WireRecord};
pub use request::{Credentials, TransactionQuery};
pub use search::SearchHandle;
pub use transport::{ApiRequest, ApiResponse, Method, Transport};
pub use types::{Environment, Product};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
