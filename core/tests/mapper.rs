//! Response mapping: shape checks, remote error codes, empty-list
//! semantics and the MFA pairing rule.

mod common;

use common::{account_json, transaction_json};
use plaidster_core::{
    logging::Sinks,
    mapper::{self, AuthOutcome},
    ApiResponse, MfaType, PlaidError,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

// ── Test helpers ────────────────────────────────────────────────────────────

fn reply(value: Value) -> ApiResponse {
    ApiResponse::new(200, value.to_string())
}

fn quiet() -> Sinks {
    Sinks {
        logger: Some(Arc::new(|_: &str| {})),
        raw_logger: None,
    }
}

fn capturing() -> (Sinks, Arc<Mutex<Vec<String>>>) {
    let lines: Arc<Mutex<Vec<String>>> = Arc::default();
    let sink = lines.clone();
    let sinks = Sinks {
        logger: Some(Arc::new(move |line: &str| sink.lock().unwrap().push(line.to_string()))),
        raw_logger: None,
    };
    (sinks, lines)
}

// ── Remote error codes ──────────────────────────────────────────────────────

/// Known codes map to their dedicated variant whatever the message says.
#[test]
fn known_remote_codes_map_by_code_only() {
    for message in ["institution down", "something else entirely", ""] {
        let err = mapper::map_balances(&reply(json!({ "code": 1300, "message": message })), &quiet())
            .unwrap_err();
        assert!(matches!(err, PlaidError::InstitutionDown), "1300 / {message:?}: {err:?}");

        let err = mapper::map_balances(&reply(json!({ "code": 1105, "message": message })), &quiet())
            .unwrap_err();
        assert!(matches!(err, PlaidError::BadAccessToken), "1105 / {message:?}: {err:?}");

        let err = mapper::map_balances(&reply(json!({ "code": 1600, "message": message })), &quiet())
            .unwrap_err();
        assert!(matches!(err, PlaidError::ItemNotFound), "1600 / {message:?}: {err:?}");
    }
}

#[test]
fn unknown_remote_code_keeps_code_and_message() {
    let err = mapper::map_add_user(
        &reply(json!({ "code": 1200, "message": "invalid credentials", "resolve": "check" })),
        &quiet(),
    )
    .unwrap_err();
    match err {
        PlaidError::Remote { code, message } => {
            assert_eq!(code, 1200);
            assert_eq!(message.as_deref(), Some("invalid credentials"));
        }
        other => panic!("expected Remote, got {other:?}"),
    }
}

/// The body decides, even when the HTTP status says otherwise.
#[test]
fn http_status_is_not_interpreted() {
    let response = ApiResponse::new(402, json!({ "code": 1105, "message": "bad" }).to_string());
    let err = mapper::map_remove_user(&response).unwrap_err();
    assert!(matches!(err, PlaidError::BadAccessToken));
}

/// An array endpoint answered with an error object reports the remote error.
#[test]
fn error_object_on_array_endpoint_is_remote_error() {
    let err = mapper::map_categories(&reply(json!({ "code": 1300, "message": "down" })), &quiet())
        .unwrap_err();
    assert!(matches!(err, PlaidError::InstitutionDown));
}

// ── Local failures ──────────────────────────────────────────────────────────

#[test]
fn empty_body_is_empty_response() {
    let err = mapper::map_categories(&ApiResponse::new(200, ""), &quiet()).unwrap_err();
    assert!(matches!(err, PlaidError::EmptyResponse(_)), "{err:?}");
}

#[test]
fn malformed_json_is_decoding_failure() {
    let err = mapper::map_institutions(&ApiResponse::new(200, "{not json"), &quiet()).unwrap_err();
    assert!(matches!(err, PlaidError::DecodingFailed(_)), "{err:?}");
}

#[test]
fn wrong_top_level_container_is_decoding_failure() {
    let err = mapper::map_balances(&reply(json!([account_json("a")])), &quiet()).unwrap_err();
    assert!(matches!(err, PlaidError::DecodingFailed(_)), "{err:?}");

    let err = mapper::map_categories(&reply(json!({ "categories": [] })), &quiet()).unwrap_err();
    assert!(matches!(err, PlaidError::DecodingFailed(_)), "{err:?}");
}

// ── Empty-list semantics ────────────────────────────────────────────────────

#[test]
fn balances_with_empty_accounts_is_an_error() {
    let err = mapper::map_balances(&reply(json!({ "accounts": [] })), &quiet()).unwrap_err();
    assert!(matches!(err, PlaidError::EmptyResponse(_)), "{err:?}");
}

#[test]
fn balances_without_accounts_key_is_an_error() {
    let err = mapper::map_balances(&reply(json!({ "access_token": "t" })), &quiet()).unwrap_err();
    assert!(matches!(err, PlaidError::EmptyResponse(_)), "{err:?}");
}

#[test]
fn categories_and_institutions_accept_empty_arrays() {
    let categories = mapper::map_categories(&reply(json!([])), &quiet()).unwrap();
    assert!(categories.is_empty());

    let institutions = mapper::map_institutions(&reply(json!([])), &quiet()).unwrap();
    assert!(institutions.is_empty());
}

#[test]
fn transactions_key_must_exist_but_may_be_empty() {
    let txns = mapper::map_transactions(&reply(json!({ "transactions": [] })), &quiet()).unwrap();
    assert!(txns.is_empty());

    let err = mapper::map_transactions(&reply(json!({ "accounts": [] })), &quiet()).unwrap_err();
    assert!(matches!(err, PlaidError::EmptyResponse(_)), "{err:?}");
}

// ── Per-item decode failures ────────────────────────────────────────────────

/// A broken item is logged and dropped; its neighbours survive.
#[test]
fn bad_list_items_are_skipped_and_logged() {
    let (sinks, lines) = capturing();
    let body = json!({
        "accounts": [
            account_json("good-1"),
            { "_id": "no-meta", "type": "depository" },
            "not even an object",
            account_json("good-2"),
        ]
    });

    let accounts = mapper::map_balances(&reply(body), &sinks).unwrap();

    let ids: Vec<_> = accounts.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, ["good-1", "good-2"]);
    let lines = lines.lock().unwrap();
    assert_eq!(lines.len(), 2, "one log line per skipped item: {lines:?}");
    assert!(lines[0].contains("account") && lines[0].contains("index 1"), "{}", lines[0]);
}

#[test]
fn categories_skip_items_missing_hierarchy() {
    let body = json!([
        { "id": "10000000", "type": "special", "hierarchy": ["Bank Fees"] },
        { "id": "10001000", "type": "special" },
    ]);
    let categories = mapper::map_categories(&reply(body), &quiet()).unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].hierarchy, ["Bank Fees"]);
}

// ── Longtail ────────────────────────────────────────────────────────────────

#[test]
fn longtail_requires_total_count_and_results() {
    let page = mapper::map_longtail(
        &reply(json!({
            "total_count": 8000,
            "results": [{ "id": "ins_1", "name": "First Local", "products": { "auth": true, "connect": false } }]
        })),
        &quiet(),
    )
    .unwrap();
    assert_eq!(page.total_count, 8000);
    assert_eq!(page.institutions[0].products, ["auth"]);

    let missing_count = mapper::map_longtail(&reply(json!({ "results": [] })), &quiet()).unwrap_err();
    assert!(matches!(missing_count, PlaidError::DecodingFailed(_)));

    let missing_results = mapper::map_longtail(&reply(json!({ "total_count": 3 })), &quiet()).unwrap_err();
    assert!(matches!(missing_results, PlaidError::DecodingFailed(_)));
}

// ── MFA pairing ─────────────────────────────────────────────────────────────

/// Type without payload: a protocol violation, reported as a decoding error
/// whose detail names the missing payload.
#[test]
fn mfa_type_without_payload_is_decoding_error() {
    let err = mapper::map_add_user(
        &reply(json!({ "access_token": "tok", "type": "questions" })),
        &quiet(),
    )
    .unwrap_err();
    match err {
        PlaidError::DecodingFailed(detail) => assert!(detail.contains("without a challenge payload"), "{detail}"),
        other => panic!("expected DecodingFailed, got {other:?}"),
    }
}

/// Payload without type: same error kind, different detail.
#[test]
fn mfa_payload_without_type_is_decoding_error() {
    let err = mapper::map_submit_mfa(
        &reply(json!({ "mfa": [{ "question": "What was your first pet?" }] })),
        &quiet(),
    )
    .unwrap_err();
    match err {
        PlaidError::DecodingFailed(detail) => assert!(detail.contains("without a recognised type"), "{detail}"),
        other => panic!("expected DecodingFailed, got {other:?}"),
    }
}

/// An unrecognised type string counts as no type at all.
#[test]
fn unrecognised_mfa_type_with_payload_is_decoding_error() {
    let err = mapper::map_submit_mfa(
        &reply(json!({ "type": "carrier_pigeon", "mfa": [{ "question": "?" }] })),
        &quiet(),
    )
    .unwrap_err();
    assert!(matches!(err, PlaidError::DecodingFailed(_)));
}

#[test]
fn single_object_mfa_payload_is_wrapped() {
    let outcome = mapper::map_submit_mfa(
        &reply(json!({ "type": "device", "mfa": { "message": "Code sent to xxx-xxx-5309" } })),
        &quiet(),
    )
    .unwrap();
    let challenge = outcome.challenge().expect("challenge");
    assert_eq!(challenge.kind(), MfaType::Device);
    assert_eq!(challenge.prompts(), ["Code sent to xxx-xxx-5309"]);
}

#[test]
fn connected_outcome_defaults_missing_lists_to_empty() {
    let outcome = mapper::map_submit_mfa(
        &reply(json!({ "accounts": [account_json("a")] })),
        &quiet(),
    )
    .unwrap();
    match outcome {
        AuthOutcome::Connected { accounts, transactions } => {
            assert_eq!(accounts.len(), 1);
            assert!(transactions.is_empty());
        }
        other => panic!("expected Connected, got {other:?}"),
    }
}

#[test]
fn add_user_without_access_token_fails() {
    let err = mapper::map_add_user(
        &reply(json!({ "accounts": [account_json("a")], "transactions": [transaction_json("t", 1.0)] })),
        &quiet(),
    )
    .unwrap_err();
    assert!(matches!(err, PlaidError::EmptyResponse(_)), "{err:?}");
}
