use super::{decode_wire, encode_wire, WireRecord};
use crate::{error::PlaidResult, types::RemoteId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: RemoteId,
    #[serde(rename = "type")]
    pub category_type: String,
    /// Most general first, e.g. `["Travel", "Airlines"]`.
    pub hierarchy: Vec<String>,
}

impl WireRecord for Category {
    const KIND: &'static str = "category";

    fn from_wire(value: &Value) -> PlaidResult<Self> {
        decode_wire(Self::KIND, value)
    }

    fn to_wire(&self) -> PlaidResult<Value> {
        encode_wire(Self::KIND, self)
    }
}
