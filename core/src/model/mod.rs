//! Domain records decoded from remote payloads.
//!
//! RULE: A record is either fully decoded or not produced at all.
//! Each record keeps its wire shape in a private struct; the public
//! record is what presentation code consumes.

mod account;
mod category;
mod institution;
mod search_institution;
mod transaction;

pub use account::Account;
pub use category::Category;
pub use institution::{CredentialLabels, Institution};
pub use search_institution::{CredentialField, SearchInstitution};
pub use transaction::Transaction;

use crate::error::{PlaidError, PlaidResult};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A record with a remote JSON representation.
pub trait WireRecord: Sized {
    /// Short name used in decode errors and skip logs.
    const KIND: &'static str;

    fn from_wire(value: &Value) -> PlaidResult<Self>;

    fn to_wire(&self) -> PlaidResult<Value>;
}

pub(crate) fn decode_wire<W: DeserializeOwned>(kind: &str, value: &Value) -> PlaidResult<W> {
    W::deserialize(value).map_err(|e| PlaidError::DecodingFailed(format!("{kind}: {e}")))
}

pub(crate) fn encode_wire<W: Serialize>(kind: &str, wire: &W) -> PlaidResult<Value> {
    serde_json::to_value(wire).map_err(|e| PlaidError::DecodingFailed(format!("{kind}: {e}")))
}

/// Products arrive either as a list of names or as a `{name: enabled}` map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum ProductsWire {
    List(Vec<String>),
    Flags(BTreeMap<String, bool>),
}

impl Default for ProductsWire {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl ProductsWire {
    pub(crate) fn into_names(self) -> Vec<String> {
        match self {
            Self::List(names) => names,
            Self::Flags(flags) => flags
                .into_iter()
                .filter(|(_, enabled)| *enabled)
                .map(|(name, _)| name)
                .collect(),
        }
    }
}

/// Signed decimal amounts. Numeric strings are parsed digit for digit.
/// JSON numbers pass through `f64` in serde_json first, so they are exact
/// only up to 15-17 significant digits.
pub(crate) mod amount {
    use rust_decimal::Decimal;
    use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Number(serde_json::Number),
        Text(String),
    }

    fn parse(text: &str) -> Result<Decimal, String> {
        Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .map_err(|e| format!("invalid amount '{text}': {e}"))
    }

    fn from_raw(raw: RawAmount) -> Result<Decimal, String> {
        match raw {
            RawAmount::Number(n) => parse(&n.to_string()),
            RawAmount::Text(t)   => parse(t.trim()),
        }
    }

    fn to_number(value: &Decimal) -> Result<serde_json::Number, String> {
        value
            .normalize()
            .to_string()
            .parse::<serde_json::Number>()
            .map_err(|e| format!("unencodable amount {value}: {e}"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
        from_raw(RawAmount::deserialize(d)?).map_err(de::Error::custom)
    }

    pub fn serialize<S: Serializer>(value: &Decimal, s: S) -> Result<S::Ok, S::Error> {
        to_number(value).map_err(ser::Error::custom)?.serialize(s)
    }

    pub mod option {
        use super::*;

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Decimal>, D::Error> {
            match Option::<RawAmount>::deserialize(d)? {
                Some(raw) => from_raw(raw).map(Some).map_err(de::Error::custom),
                None => Ok(None),
            }
        }

        pub fn serialize<S: Serializer>(value: &Option<Decimal>, s: S) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => to_number(v).map_err(ser::Error::custom)?.serialize(s),
                None => s.serialize_none(),
            }
        }
    }
}
