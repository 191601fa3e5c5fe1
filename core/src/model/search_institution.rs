use super::{decode_wire, encode_wire, ProductsWire, WireRecord};
use crate::{error::PlaidResult, types::RemoteId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One login field the institution expects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialField {
    pub name:  String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

/// An institution as returned by type-ahead search.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SearchInstitution {
    pub id:                     RemoteId,
    pub name:                   String,
    pub institution_type:       Option<String>,
    pub products:               Vec<String>,
    pub fields:                 Vec<CredentialField>,
    pub forgotten_password_url: Option<String>,
    pub account_locked_url:     Option<String>,
    pub account_setup_url:      Option<String>,
    /// Base64 encoded logo.
    pub logo:                   Option<String>,
    pub colors:                 Option<BTreeMap<String, String>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SearchInstitutionWire {
    id: String,
    name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    institution_type: Option<String>,
    #[serde(default)]
    products: ProductsWire,
    #[serde(default)]
    fields: Vec<CredentialField>,
    #[serde(rename = "forgottenPassword", default, skip_serializing_if = "Option::is_none")]
    forgotten_password: Option<String>,
    #[serde(rename = "accountLocked", default, skip_serializing_if = "Option::is_none")]
    account_locked: Option<String>,
    #[serde(rename = "accountSetup", default, skip_serializing_if = "Option::is_none")]
    account_setup: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    colors: Option<BTreeMap<String, String>>,
}

impl From<SearchInstitutionWire> for SearchInstitution {
    fn from(w: SearchInstitutionWire) -> Self {
        Self {
            id: w.id,
            name: w.name,
            institution_type: w.institution_type,
            products: w.products.into_names(),
            fields: w.fields,
            forgotten_password_url: w.forgotten_password,
            account_locked_url: w.account_locked,
            account_setup_url: w.account_setup,
            logo: w.logo,
            colors: w.colors,
        }
    }
}

impl From<&SearchInstitution> for SearchInstitutionWire {
    fn from(s: &SearchInstitution) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            institution_type: s.institution_type.clone(),
            products: ProductsWire::List(s.products.clone()),
            fields: s.fields.clone(),
            forgotten_password: s.forgotten_password_url.clone(),
            account_locked: s.account_locked_url.clone(),
            account_setup: s.account_setup_url.clone(),
            logo: s.logo.clone(),
            colors: s.colors.clone(),
        }
    }
}

impl WireRecord for SearchInstitution {
    const KIND: &'static str = "search institution";

    fn from_wire(value: &Value) -> PlaidResult<Self> {
        decode_wire::<SearchInstitutionWire>(Self::KIND, value).map(Into::into)
    }

    fn to_wire(&self) -> PlaidResult<Value> {
        encode_wire(Self::KIND, &SearchInstitutionWire::from(self))
    }
}
