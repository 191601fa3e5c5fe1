//! Shared primitive types used across the client.

use serde::{Deserialize, Serialize};

/// Opaque credential returned by a successful `connect` call.
pub type AccessToken = String;

/// A remote identifier (account, transaction, institution, category).
pub type RemoteId = String;

/// Remote environment. Selects one of two fixed base endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Development => "https://tartan.plaid.com/",
            Self::Production  => "https://api.plaid.com/",
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" | "tartan" => Ok(Self::Development),
            "production" | "prod"            => Ok(Self::Production),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

/// Product filter for institution search.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Product {
    Connect,
    Auth,
}

impl Product {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Auth    => "auth",
        }
    }
}

impl std::str::FromStr for Product {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "connect" => Ok(Self::Connect),
            "auth"    => Ok(Self::Auth),
            other     => Err(format!("unknown product '{other}'")),
        }
    }
}
