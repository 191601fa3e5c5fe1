//! Type-ahead search: empty results, single-object replies, cancellation.

mod common;

use common::{client, query_of, Reply};
use plaidster_core::{PlaidError, Product};
use serde_json::json;
use std::time::Duration;

fn bofa() -> serde_json::Value {
    json!({
        "id": "5301a93ac140de84910000e0",
        "name": "Bank of America",
        "type": "bofa",
        "products": { "auth": true, "connect": true, "info": false },
        "fields": [
            { "name": "username", "label": "Online ID", "type": "text" },
            { "name": "password", "label": "Password", "type": "password" }
        ],
        "forgottenPassword": "https://www.bankofamerica.com/forgot",
        "colors": { "primary": "rgb(220,20,48)" }
    })
}

#[tokio::test]
async fn query_search_decodes_matches() {
    let (client, seen) = client(vec![Reply::Json(json!([bofa()]))]);

    let found = client.search_institutions("bank of", Some(Product::Auth)).await.unwrap();
    assert_eq!(found.len(), 1);
    let bank = &found[0];
    assert_eq!(bank.name, "Bank of America");
    assert_eq!(bank.products, ["auth", "connect"]);
    assert_eq!(bank.fields[0].label, "Online ID");
    assert_eq!(bank.forgotten_password_url.as_deref(), Some("https://www.bankofamerica.com/forgot"));
    assert!(bank.logo.is_none());

    let query = query_of(&seen.lock().unwrap()[0]);
    assert_eq!(query["q"], "bank of");
    assert_eq!(query["p"], "auth");
}

#[tokio::test]
async fn empty_body_is_an_empty_success() {
    let (client, _) = client(vec![Reply::Empty, Reply::Raw("  \n"), Reply::Empty]);

    assert!(client.search_institutions("zzz", None).await.unwrap().is_empty());
    assert!(client.search_institutions("zzz", None).await.unwrap().is_empty());
    assert!(client.search_institution_by_id("nope").await.unwrap().is_empty());
}

#[tokio::test]
async fn id_lookup_wraps_a_single_object() {
    let (client, _) = client(vec![Reply::Json(bofa())]);
    let found = client.search_institution_by_id("5301a93ac140de84910000e0").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "5301a93ac140de84910000e0");
}

#[tokio::test]
async fn id_lookup_reports_remote_errors() {
    let (client, _) = client(vec![Reply::Json(json!({ "code": 1600, "message": "item not found" }))]);
    let err = client.search_institution_by_id("missing").await.unwrap_err();
    assert!(matches!(err, PlaidError::ItemNotFound));
}

#[tokio::test]
async fn search_transport_failure_stays_an_error() {
    let (client, _) = client(vec![Reply::Fail("dns lookup failed")]);
    let err = client.search_institutions("chase", None).await.unwrap_err();
    assert!(matches!(err, PlaidError::Transport(_)));
}

#[tokio::test]
async fn cancelled_search_reports_cancelled() {
    let (client, seen) = client(vec![Reply::Hang]);
    let handle = client.search_institutions("ch", None);

    // Let the task reach the transport before aborting it.
    while seen.lock().unwrap().is_empty() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(!handle.is_finished());
    handle.cancel();

    let err = handle.await.unwrap_err();
    assert!(matches!(err, PlaidError::Cancelled));
}

/// A newer query can supersede an older one while both are in flight.
#[tokio::test]
async fn superseded_search_does_not_block_the_next() {
    let (client, seen) = client(vec![Reply::Hang, Reply::Json(json!([bofa()]))]);
    let stale = client.search_institutions("b", None);
    while seen.lock().unwrap().is_empty() {
        tokio::task::yield_now().await;
    }
    let fresh = client.search_institutions("bank", None);

    stale.cancel();
    assert!(matches!(stale.await, Err(PlaidError::Cancelled)));
    assert_eq!(fresh.await.unwrap().len(), 1);
}
