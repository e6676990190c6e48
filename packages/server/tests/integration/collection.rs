use std::time::Duration;

use dashboard_server::collection::activation::ACTIVATION_LOCK;
use sea_orm::{ConnectionTrait, TransactionTrait};
use serde_json::json;

use crate::common::{COLLECTION_A, COLLECTION_B, OWNER, TestApp, routes};

const CID_ONE: &str = "bafybeigdyrzt5sfp7udm7hu76uh7y26nf3efuylqabf3oclgtqy55fbzdi";
const CID_TWO: &str = "bafybeibwzifw52ttrkqlikfzext5akxu7lz4xiwjgwzmqcpdzmp3n5vnbe";

#[tokio::test]
async fn get_unknown_collection_is_not_found() {
    let app = TestApp::spawn().await;
    let res = app.get(&routes::collection(COLLECTION_A)).await;
    assert_eq!(res.status, 404);
    assert_eq!(res.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn malformed_address_is_rejected() {
    let app = TestApp::spawn().await;
    let res = app.get(&routes::collection("not-an-address")).await;
    assert_eq!(res.status, 400);
    assert_eq!(res.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn put_records_owner_and_cid() {
    let app = TestApp::spawn().await;
    let res = app
        .put(
            &routes::collection(COLLECTION_A),
            &json!({ "cid": CID_ONE, "owner": OWNER }),
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["ok"], true);

    let res = app.get(&routes::collection(COLLECTION_A)).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["address"], COLLECTION_A);
    assert_eq!(res.body["owner"], OWNER);
    assert_eq!(res.body["cid"], CID_ONE);
    assert_eq!(res.body["active"], false);
}

#[tokio::test]
async fn mixed_case_addresses_resolve_to_one_record() {
    let app = TestApp::spawn().await;
    let upper = "0x00000000000000000000000000000000000000AA";
    app.register_collection(upper, CID_ONE).await;
    app.register_collection(COLLECTION_A, CID_TWO).await;

    let res = app.get(&routes::collection(upper)).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["address"], COLLECTION_A);
    assert_eq!(res.body["cid"], CID_TWO);
}

#[tokio::test]
async fn put_without_required_fields_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app
        .put(&routes::collection(COLLECTION_A), &json!({ "owner": OWNER }))
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.error_code(), "VALIDATION_ERROR");

    let res = app
        .put(&routes::collection(COLLECTION_A), &json!({ "cid": CID_ONE }))
        .await;
    assert_eq!(res.status, 400);

    let res = app.get(&routes::collection(COLLECTION_A)).await;
    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn activation_moves_between_collections() {
    let app = TestApp::spawn().await;
    app.register_collection(COLLECTION_A, CID_ONE).await;
    app.register_collection(COLLECTION_B, CID_TWO).await;

    let res = app
        .put(&routes::activate(COLLECTION_A), &json!({ "cid": CID_ONE }))
        .await;
    assert_eq!(res.status, 200, "{}", res.text);

    let res = app.get(routes::ACTIVE_COLLECTION).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["address"], COLLECTION_A);
    assert_eq!(res.body["cid"], CID_ONE);

    let res = app
        .put(&routes::activate(COLLECTION_B), &json!({ "cid": CID_TWO }))
        .await;
    assert_eq!(res.status, 200);

    let a = app.get(&routes::collection(COLLECTION_A)).await;
    let b = app.get(&routes::collection(COLLECTION_B)).await;
    assert_eq!(a.body["active"], false);
    assert_eq!(b.body["active"], true);
}

#[tokio::test]
async fn activate_overwrites_cid() {
    let app = TestApp::spawn().await;
    app.register_collection(COLLECTION_A, CID_ONE).await;

    app.put(&routes::activate(COLLECTION_A), &json!({ "cid": CID_TWO }))
        .await;

    let res = app.get(&routes::collection(COLLECTION_A)).await;
    assert_eq!(res.body["cid"], CID_TWO);
    assert_eq!(res.body["active"], true);
}

#[tokio::test]
async fn activate_unknown_collection_keeps_current() {
    let app = TestApp::spawn().await;
    app.register_collection(COLLECTION_A, CID_ONE).await;
    app.put(&routes::activate(COLLECTION_A), &json!({ "cid": CID_ONE }))
        .await;

    let res = app
        .put(&routes::activate(COLLECTION_B), &json!({ "cid": CID_TWO }))
        .await;
    assert_eq!(res.status, 404);
    assert_eq!(res.error_code(), "NOT_FOUND");

    let res = app.get(routes::ACTIVE_COLLECTION).await;
    assert_eq!(res.body["address"], COLLECTION_A);
}

#[tokio::test]
async fn activate_requires_cid() {
    let app = TestApp::spawn().await;
    app.register_collection(COLLECTION_A, CID_ONE).await;

    let res = app.put(&routes::activate(COLLECTION_A), &json!({})).await;
    assert_eq!(res.status, 400);
    assert_eq!(res.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn concurrent_activations_leave_one_active() {
    let app = TestApp::spawn().await;
    app.register_collection(COLLECTION_A, CID_ONE).await;
    app.register_collection(COLLECTION_B, CID_TWO).await;

    let requests = (0..20).map(|i| {
        let (address, cid) = if i % 2 == 0 {
            (COLLECTION_A, CID_ONE)
        } else {
            (COLLECTION_B, CID_TWO)
        };
        let url = format!("http://{}{}", app.addr, routes::activate(address));
        let client = app.client.clone();
        async move {
            client
                .put(url)
                .json(&json!({ "cid": cid }))
                .send()
                .await
                .unwrap()
                .status()
                .as_u16()
        }
    });
    let statuses = spawn_all(requests).await;
    assert!(statuses.iter().all(|s| *s == 200));

    let a = app.get(&routes::collection(COLLECTION_A)).await;
    let b = app.get(&routes::collection(COLLECTION_B)).await;
    let active = [&a, &b]
        .iter()
        .filter(|r| r.body["active"] == true)
        .count();
    assert_eq!(active, 1);
}

#[tokio::test]
async fn activation_waits_for_the_activation_lock() {
    let app = TestApp::spawn().await;
    app.register_collection(COLLECTION_A, CID_ONE).await;

    // Another instance is mid-activation.
    let holder = app.db.begin().await.unwrap();
    holder.execute_unprepared(ACTIVATION_LOCK).await.unwrap();

    let url = format!("http://{}{}", app.addr, routes::activate(COLLECTION_A));
    let client = app.client.clone();
    let pending = tokio::spawn(async move {
        client
            .put(url)
            .json(&json!({ "cid": CID_ONE }))
            .send()
            .await
            .unwrap()
            .status()
            .as_u16()
    });

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(!pending.is_finished(), "activation ran while the lock was held");

    holder.commit().await.unwrap();
    assert_eq!(pending.await.unwrap(), 200);

    let res = app.get(routes::ACTIVE_COLLECTION).await;
    assert_eq!(res.body["address"], COLLECTION_A);
}

#[tokio::test]
async fn deactivate_clears_active_collection() {
    let app = TestApp::spawn().await;
    app.register_collection(COLLECTION_A, CID_ONE).await;
    app.put(&routes::activate(COLLECTION_A), &json!({ "cid": CID_ONE }))
        .await;

    let res = app.delete(routes::ACTIVE_COLLECTION).await;
    assert_eq!(res.status, 204);

    let res = app.get(routes::ACTIVE_COLLECTION).await;
    assert_eq!(res.status, 404);

    let res = app.get(&routes::collection(COLLECTION_A)).await;
    assert_eq!(res.body["active"], false);
    assert_eq!(res.body["cid"], CID_ONE);
}

/// Run the futures concurrently on spawned tasks and collect their outputs
/// in order.
async fn spawn_all<F>(futures: impl Iterator<Item = F>) -> Vec<F::Output>
where
    F: std::future::Future + Send + 'static,
    F::Output: Send + 'static,
{
    let handles: Vec<_> = futures.map(tokio::spawn).collect();
    let mut out = Vec::with_capacity(handles.len());
    for handle in handles {
        out.push(handle.await.unwrap());
    }
    out
}
