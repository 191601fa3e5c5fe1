//! Response mapper: raw payloads to typed records or typed errors.
//!
//! ORDER (fixed for every operation):
//!   1. Empty body check
//!   2. JSON parse
//!   3. Top-level container check
//!   4. Embedded remote error (`code` / `message`)
//!   5. Required keys, then per-record decoding
//!
//! RULES:
//!   - A list item that fails to decode is logged and skipped.
//!     It never fails the whole call.
//!   - HTTP status is ignored; the body's `code` decides.
//!   - Empty-list semantics differ per operation and are kept as the
//!     remote service behaves: balances reject empty, lookups accept it,
//!     search accepts even an empty body.

use crate::{
    error::{PlaidError, PlaidResult},
    logging::Sinks,
    mfa::{ChallengeItem, MfaChallenge, MfaType},
    model::{Account, Category, Institution, SearchInstitution, Transaction, WireRecord},
    transport::ApiResponse,
    types::AccessToken,
};
use serde::Serialize;
use serde_json::{Map, Value};

type JsonObject = Map<String, Value>;

/// Where a login or MFA step landed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuthOutcome {
    /// Another verification round is needed.
    MfaRequired { challenge: MfaChallenge },
    /// Login complete. Lists missing from the payload come back empty.
    Connected {
        accounts:     Vec<Account>,
        transactions: Vec<Transaction>,
    },
}

impl AuthOutcome {
    pub fn challenge(&self) -> Option<&MfaChallenge> {
        match self {
            Self::MfaRequired { challenge } => Some(challenge),
            Self::Connected { .. } => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddUserResponse {
    pub access_token: AccessToken,
    pub outcome:      AuthOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongtailPage {
    pub institutions: Vec<Institution>,
    pub total_count:  u64,
}

// ── Shape checks ───────────────────────────────────────────────

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null      => "null",
        Value::Bool(_)   => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_)  => "array",
        Value::Object(_) => "object",
    }
}

pub fn parse_body(response: &ApiResponse) -> PlaidResult<Value> {
    if response.is_empty() {
        return Err(PlaidError::EmptyResponse("no data returned".into()));
    }
    Ok(serde_json::from_slice(&response.body)?)
}

/// Raise the domain error for an embedded remote `code`, if any.
pub fn check_remote_error(object: &JsonObject) -> PlaidResult<()> {
    match object.get("code").and_then(Value::as_i64) {
        Some(code) => {
            let message = object
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string);
            Err(PlaidError::from_remote(code, message))
        }
        None => Ok(()),
    }
}

pub fn expect_object(value: Value) -> PlaidResult<JsonObject> {
    match value {
        Value::Object(object) => {
            check_remote_error(&object)?;
            Ok(object)
        }
        other => Err(PlaidError::DecodingFailed(format!(
            "expected a JSON object, got {}",
            kind_of(&other)
        ))),
    }
}

/// An error object in place of the expected array reports the remote error.
pub fn expect_array(value: Value) -> PlaidResult<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(object) => {
            check_remote_error(&object)?;
            Err(PlaidError::DecodingFailed("expected a JSON array, got object".into()))
        }
        other => Err(PlaidError::DecodingFailed(format!(
            "expected a JSON array, got {}",
            kind_of(&other)
        ))),
    }
}

// ── Records ────────────────────────────────────────────────────

/// Decode every item that decodes; log and drop the rest.
pub fn decode_list<T: WireRecord>(items: &[Value], sinks: &Sinks) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match T::from_wire(item) {
            Ok(record) => Some(record),
            Err(e) => {
                sinks.log(&format!("skipping {} at index {index}: {e}", T::KIND));
                None
            }
        })
        .collect()
}

/// A list under `key` that must be present. Absence is an empty response.
fn required_list<'a>(object: &'a JsonObject, key: &str) -> PlaidResult<&'a [Value]> {
    match object.get(key) {
        Some(Value::Array(items)) => Ok(items),
        Some(Value::Null) | None => Err(PlaidError::EmptyResponse(format!("No {key} returned"))),
        Some(other) => Err(PlaidError::DecodingFailed(format!(
            "'{key}' should be an array, got {}",
            kind_of(other)
        ))),
    }
}

/// A list under `key` that may be absent. Absence decodes to empty.
fn optional_list<T: WireRecord>(object: &JsonObject, key: &str, sinks: &Sinks) -> PlaidResult<Vec<T>> {
    match object.get(key) {
        Some(Value::Array(items)) => Ok(decode_list(items, sinks)),
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(other) => Err(PlaidError::DecodingFailed(format!(
            "'{key}' should be an array, got {}",
            kind_of(other)
        ))),
    }
}

// ── MFA ────────────────────────────────────────────────────────

fn challenge_items(value: &Value) -> PlaidResult<Option<Vec<ChallengeItem>>> {
    match value {
        Value::Null => Ok(None),
        Value::Object(item) => Ok(Some(vec![item.clone()])),
        Value::Array(entries) => entries
            .iter()
            .map(|entry| match entry {
                Value::Object(item) => Ok(item.clone()),
                other => Err(PlaidError::DecodingFailed(format!(
                    "MFA challenge entry should be an object, got {}",
                    kind_of(other)
                ))),
            })
            .collect::<PlaidResult<Vec<_>>>()
            .map(Some),
        other => Err(PlaidError::DecodingFailed(format!(
            "'mfa' should be an array or object, got {}",
            kind_of(other)
        ))),
    }
}

/// The MFA pair must be complete or absent. Half a pair is a protocol violation.
pub fn decode_challenge(object: &JsonObject) -> PlaidResult<Option<MfaChallenge>> {
    let kind = object
        .get("type")
        .and_then(Value::as_str)
        .and_then(MfaType::from_wire);
    let items = match object.get("mfa") {
        Some(value) => challenge_items(value)?,
        None => None,
    };

    match (kind, items) {
        (None, None) => Ok(None),
        (Some(kind), Some(items)) if items.is_empty() => Err(PlaidError::DecodingFailed(format!(
            "MFA type '{}' came with an empty challenge list",
            kind.as_str()
        ))),
        (Some(kind), Some(items)) => Ok(Some(MfaChallenge::new(kind, items))),
        (Some(kind), None) => Err(PlaidError::DecodingFailed(format!(
            "MFA type '{}' present without a challenge payload",
            kind.as_str()
        ))),
        (None, Some(_)) => Err(PlaidError::DecodingFailed(
            "MFA challenge payload present without a recognised type".into(),
        )),
    }
}

fn auth_outcome(object: &JsonObject, sinks: &Sinks) -> PlaidResult<AuthOutcome> {
    if let Some(challenge) = decode_challenge(object)? {
        return Ok(AuthOutcome::MfaRequired { challenge });
    }
    Ok(AuthOutcome::Connected {
        accounts: optional_list(object, "accounts", sinks)?,
        transactions: optional_list(object, "transactions", sinks)?,
    })
}

// ── Per-operation mapping ──────────────────────────────────────

pub fn map_add_user(response: &ApiResponse, sinks: &Sinks) -> PlaidResult<AddUserResponse> {
    map_add_user_with_token(response, sinks).1
}

/// Same as `map_add_user`, but also hands back the access token whenever
/// the remote issued one, even if the rest of the reply failed to decode.
pub fn map_add_user_with_token(
    response: &ApiResponse,
    sinks: &Sinks,
) -> (Option<AccessToken>, PlaidResult<AddUserResponse>) {
    let object = match parse_body(response).and_then(expect_object) {
        Ok(object) => object,
        Err(e) => return (None, Err(e)),
    };
    let issued = object
        .get("access_token")
        .and_then(Value::as_str)
        .map(str::to_string);
    let result = match &issued {
        Some(access_token) => auth_outcome(&object, sinks).map(|outcome| AddUserResponse {
            access_token: access_token.clone(),
            outcome,
        }),
        None => Err(PlaidError::EmptyResponse("No access token returned".into())),
    };
    (issued, result)
}

pub fn map_submit_mfa(response: &ApiResponse, sinks: &Sinks) -> PlaidResult<AuthOutcome> {
    let object = expect_object(parse_body(response)?)?;
    auth_outcome(&object, sinks)
}

/// Returns the remote confirmation message, if it sent one.
pub fn map_remove_user(response: &ApiResponse) -> PlaidResult<Option<String>> {
    let object = expect_object(parse_body(response)?)?;
    Ok(object
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string))
}

pub fn map_balances(response: &ApiResponse, sinks: &Sinks) -> PlaidResult<Vec<Account>> {
    let object = expect_object(parse_body(response)?)?;
    let items = required_list(&object, "accounts")?;
    if items.is_empty() {
        return Err(PlaidError::EmptyResponse("No accounts returned".into()));
    }
    Ok(decode_list(items, sinks))
}

pub fn map_transactions(response: &ApiResponse, sinks: &Sinks) -> PlaidResult<Vec<Transaction>> {
    let object = expect_object(parse_body(response)?)?;
    let items = required_list(&object, "transactions")?;
    Ok(decode_list(items, sinks))
}

pub fn map_categories(response: &ApiResponse, sinks: &Sinks) -> PlaidResult<Vec<Category>> {
    let items = expect_array(parse_body(response)?)?;
    Ok(decode_list(&items, sinks))
}

pub fn map_institutions(response: &ApiResponse, sinks: &Sinks) -> PlaidResult<Vec<Institution>> {
    let items = expect_array(parse_body(response)?)?;
    Ok(decode_list(&items, sinks))
}

pub fn map_longtail(response: &ApiResponse, sinks: &Sinks) -> PlaidResult<LongtailPage> {
    let object = expect_object(parse_body(response)?)?;
    let total_count = object
        .get("total_count")
        .and_then(Value::as_u64)
        .ok_or_else(|| PlaidError::DecodingFailed("missing or invalid 'total_count'".into()))?;
    let results = match object.get("results") {
        Some(Value::Array(items)) => items,
        _ => return Err(PlaidError::DecodingFailed("missing or invalid 'results'".into())),
    };
    Ok(LongtailPage {
        institutions: decode_list(results, sinks),
        total_count,
    })
}

/// An empty body means "no matches" here, not a failure.
pub fn map_search(response: &ApiResponse, sinks: &Sinks) -> PlaidResult<Vec<SearchInstitution>> {
    if response.is_empty() {
        return Ok(Vec::new());
    }
    let items = expect_array(parse_body(response)?)?;
    Ok(decode_list(&items, sinks))
}

/// An empty body means "no match". A single object becomes a one-element list.
pub fn map_search_by_id(response: &ApiResponse, sinks: &Sinks) -> PlaidResult<Vec<SearchInstitution>> {
    if response.is_empty() {
        return Ok(Vec::new());
    }
    match parse_body(response)? {
        Value::Array(items) => Ok(decode_list(&items, sinks)),
        other => {
            let object = expect_object(other)?;
            let institution = SearchInstitution::from_wire(&Value::Object(object))?;
            Ok(vec![institution])
        }
    }
}
