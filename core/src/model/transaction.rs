use super::{amount, decode_wire, encode_wire, WireRecord};
use crate::{error::PlaidResult, types::RemoteId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One posted or pending transaction. Positive amounts are debits.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Transaction {
    pub id:                     RemoteId,
    pub account_id:             RemoteId,
    pub amount:                 Decimal,
    pub date:                   NaiveDate,
    /// Merchant or counterparty name, when the institution reports one.
    pub name:                   Option<String>,
    pub pending:                bool,
    pub pending_transaction_id: Option<RemoteId>,
    pub category:               Option<Vec<String>>,
    pub category_id:            Option<String>,
    pub transaction_type:       Option<String>,
    /// Raw location object; shape varies by institution.
    pub location:               Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TransactionTypeWire {
    primary: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TransactionMetaWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TransactionWire {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_account")]
    account: String,
    #[serde(with = "amount")]
    amount: Decimal,
    date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default)]
    pending: bool,
    #[serde(rename = "_pendingTransaction", default, skip_serializing_if = "Option::is_none")]
    pending_transaction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category_id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<TransactionTypeWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    meta: Option<TransactionMetaWire>,
}

impl From<TransactionWire> for Transaction {
    fn from(w: TransactionWire) -> Self {
        Self {
            id: w.id,
            account_id: w.account,
            amount: w.amount,
            date: w.date,
            name: w.name,
            pending: w.pending,
            pending_transaction_id: w.pending_transaction,
            category: w.category,
            category_id: w.category_id,
            transaction_type: w.kind.map(|k| k.primary),
            location: w.meta.and_then(|m| m.location),
        }
    }
}

impl From<&Transaction> for TransactionWire {
    fn from(t: &Transaction) -> Self {
        Self {
            id: t.id.clone(),
            account: t.account_id.clone(),
            amount: t.amount,
            date: t.date,
            name: t.name.clone(),
            pending: t.pending,
            pending_transaction: t.pending_transaction_id.clone(),
            category: t.category.clone(),
            category_id: t.category_id.clone(),
            kind: t
                .transaction_type
                .clone()
                .map(|primary| TransactionTypeWire { primary }),
            meta: t
                .location
                .clone()
                .map(|location| TransactionMetaWire { location: Some(location) }),
        }
    }
}

impl WireRecord for Transaction {
    const KIND: &'static str = "transaction";

    fn from_wire(value: &Value) -> PlaidResult<Self> {
        decode_wire::<TransactionWire>(Self::KIND, value).map(Into::into)
    }

    fn to_wire(&self) -> PlaidResult<Value> {
        encode_wire(Self::KIND, &TransactionWire::from(self))
    }
}
