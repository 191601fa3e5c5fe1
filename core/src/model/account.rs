use super::{amount, decode_wire, encode_wire, WireRecord};
use crate::{error::PlaidResult, types::RemoteId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_CURRENCY: &str = "USD";

/// A bank account snapshot. Rebuilt from scratch on every fetch.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Account {
    pub id:                RemoteId,
    pub item_id:           Option<String>,
    pub user_id:           Option<String>,
    pub name:              String,
    pub number:            Option<String>,
    pub account_type:      String,
    pub subtype:           Option<String>,
    pub available_balance: Option<Decimal>,
    pub current_balance:   Option<Decimal>,
    pub credit_limit:      Option<Decimal>,
    pub currency:          String,
    pub institution_type:  Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct BalanceWire {
    #[serde(default, with = "amount::option", skip_serializing_if = "Option::is_none")]
    available: Option<Decimal>,
    #[serde(default, with = "amount::option", skip_serializing_if = "Option::is_none")]
    current: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AccountMetaWire {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    number: Option<String>,
    #[serde(default, with = "amount::option", skip_serializing_if = "Option::is_none")]
    limit: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AccountWire {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_item", default, skip_serializing_if = "Option::is_none")]
    item: Option<String>,
    #[serde(rename = "_user", default, skip_serializing_if = "Option::is_none")]
    user: Option<String>,
    #[serde(default)]
    balance: BalanceWire,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    institution_type: Option<String>,
    meta: AccountMetaWire,
    #[serde(rename = "type")]
    account_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subtype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iso_currency_code: Option<String>,
}

impl From<AccountWire> for Account {
    fn from(w: AccountWire) -> Self {
        Self {
            id: w.id,
            item_id: w.item,
            user_id: w.user,
            name: w.meta.name,
            number: w.meta.number,
            account_type: w.account_type,
            subtype: w.subtype,
            available_balance: w.balance.available,
            current_balance: w.balance.current,
            credit_limit: w.meta.limit,
            currency: w
                .currency
                .or(w.iso_currency_code)
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            institution_type: w.institution_type,
        }
    }
}

impl From<&Account> for AccountWire {
    fn from(a: &Account) -> Self {
        Self {
            id: a.id.clone(),
            item: a.item_id.clone(),
            user: a.user_id.clone(),
            balance: BalanceWire {
                available: a.available_balance,
                current: a.current_balance,
            },
            institution_type: a.institution_type.clone(),
            meta: AccountMetaWire {
                name: a.name.clone(),
                number: a.number.clone(),
                limit: a.credit_limit,
            },
            account_type: a.account_type.clone(),
            subtype: a.subtype.clone(),
            currency: Some(a.currency.clone()),
            iso_currency_code: None,
        }
    }
}

impl WireRecord for Account {
    const KIND: &'static str = "account";

    fn from_wire(value: &Value) -> PlaidResult<Self> {
        decode_wire::<AccountWire>(Self::KIND, value).map(Into::into)
    }

    fn to_wire(&self) -> PlaidResult<Value> {
        encode_wire(Self::KIND, &AccountWire::from(self))
    }
}
