use super::{decode_wire, encode_wire, ProductsWire, WireRecord};
use crate::{error::PlaidResult, types::RemoteId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Labels the institution uses for its login fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialLabels {
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,
}

/// A supported institution, from the curated or the longtail list.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Institution {
    pub id:               RemoteId,
    pub name:             String,
    pub institution_type: Option<String>,
    pub has_mfa:          bool,
    /// MFA descriptions such as `"questions(3)"`.
    pub mfa:              Vec<String>,
    pub credentials:      Option<CredentialLabels>,
    pub products:         Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct InstitutionWire {
    id: String,
    name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    institution_type: Option<String>,
    #[serde(default)]
    has_mfa: bool,
    #[serde(default)]
    mfa: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    credentials: Option<CredentialLabels>,
    #[serde(default)]
    products: ProductsWire,
}

impl From<InstitutionWire> for Institution {
    fn from(w: InstitutionWire) -> Self {
        Self {
            id: w.id,
            name: w.name,
            institution_type: w.institution_type,
            has_mfa: w.has_mfa,
            mfa: w.mfa,
            credentials: w.credentials,
            products: w.products.into_names(),
        }
    }
}

impl From<&Institution> for InstitutionWire {
    fn from(i: &Institution) -> Self {
        Self {
            id: i.id.clone(),
            name: i.name.clone(),
            institution_type: i.institution_type.clone(),
            has_mfa: i.has_mfa,
            mfa: i.mfa.clone(),
            credentials: i.credentials.clone(),
            products: ProductsWire::List(i.products.clone()),
        }
    }
}

impl WireRecord for Institution {
    const KIND: &'static str = "institution";

    fn from_wire(value: &Value) -> PlaidResult<Self> {
        decode_wire::<InstitutionWire>(Self::KIND, value).map(Into::into)
    }

    fn to_wire(&self) -> PlaidResult<Value> {
        encode_wire(Self::KIND, &InstitutionWire::from(self))
    }
}
