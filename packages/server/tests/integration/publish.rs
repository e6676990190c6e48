use dashboard_common::fingerprint;
use dashboard_common::storage::Cid;
use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};

use crate::common::{COLLECTION_A, OWNER, TestApp, routes};

fn image(name: &str, bytes: &[u8]) -> Part {
    Part::bytes(bytes.to_vec())
        .file_name(name.to_string())
        .mime_str("image/png")
        .unwrap()
}

fn publish_form(images: &[(&str, &[u8])], codes: &str, name: Option<&str>) -> Form {
    let mut form = Form::new();
    for (file_name, bytes) in images {
        form = form.part("image", image(file_name, bytes));
    }
    form = form.text("codes", codes.to_string());
    if let Some(name) = name {
        form = form.text("name", name.to_string());
    }
    form
}

#[tokio::test]
async fn publish_returns_bundle_and_fingerprints() {
    let app = TestApp::spawn().await;
    let form = publish_form(
        &[("a.png", &b"first image"[..]), ("b.png", &b"second image"[..])],
        "PASS-001\nPASS-002\n",
        Some("Cardify"),
    );

    let res = app.post_multipart(&routes::publish(COLLECTION_A), form).await;
    assert_eq!(res.status, 200, "{}", res.text);

    let cid = res.body["cid"].as_str().unwrap().to_string();
    let items = res.body["items"].as_array().unwrap();
    let hashes = res.body["hashes"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(hashes.len(), 2);

    for (i, item) in items.iter().enumerate() {
        let uri = format!("ipfs://{cid}/metadata/{i}.json");
        assert_eq!(item["uri"], uri);
        assert_eq!(item["code"], format!("PASS-00{}", i + 1));

        let expected = fingerprint::derive(item["code"].as_str().unwrap(), &uri)
            .unwrap()
            .to_hex();
        assert_eq!(item["hash"], expected);
        assert_eq!(hashes[i], expected);
    }

    let root = Cid::parse(&cid).unwrap();
    let doc = app.pins.fetch(&root, Some("metadata/1.json")).await.unwrap();
    let doc: Value = serde_json::from_slice(&doc).unwrap();
    assert_eq!(doc["name"], "Cardify #2");
    assert_eq!(doc["description"], "Claimed with PASS-002");

    let image_cid = doc["image"].as_str().unwrap().strip_prefix("ipfs://").unwrap();
    let image = app
        .pins
        .fetch(&Cid::parse(image_cid).unwrap(), None)
        .await
        .unwrap();
    assert_eq!(image, b"second image");
}

#[tokio::test]
async fn publish_does_not_touch_the_registry() {
    let app = TestApp::spawn().await;
    let form = publish_form(&[("a.png", &b"img"[..])], "PASS-001", None);
    let res = app.post_multipart(&routes::publish(COLLECTION_A), form).await;
    assert_eq!(res.status, 200, "{}", res.text);

    let res = app.get(&routes::collection(COLLECTION_A)).await;
    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn publish_rejects_count_mismatch() {
    let app = TestApp::spawn().await;
    let form = publish_form(
        &[("a.png", &b"1"[..]), ("b.png", &b"2"[..]), ("c.png", &b"3"[..])],
        "PASS-001\nPASS-002",
        None,
    );

    let res = app.post_multipart(&routes::publish(COLLECTION_A), form).await;
    assert_eq!(res.status, 400);
    assert_eq!(res.error_code(), "VALIDATION_ERROR");
    assert!(res.body["message"].as_str().unwrap().contains("mismatch"));
}

#[tokio::test]
async fn publish_rejects_empty_input() {
    let app = TestApp::spawn().await;
    let form = publish_form(&[], "", None);

    let res = app.post_multipart(&routes::publish(COLLECTION_A), form).await;
    assert_eq!(res.status, 400);
    assert_eq!(res.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn publish_then_register_then_activate() {
    let app = TestApp::spawn().await;
    let form = publish_form(&[("a.png", &b"img"[..])], "PASS-001", None);
    let res = app.post_multipart(&routes::publish(COLLECTION_A), form).await;
    let cid = res.body["cid"].as_str().unwrap().to_string();

    app.register_collection(COLLECTION_A, &cid).await;
    let res = app
        .put(&routes::activate(COLLECTION_A), &json!({ "cid": cid }))
        .await;
    assert_eq!(res.status, 200);

    let res = app.get(routes::ACTIVE_COLLECTION).await;
    assert_eq!(res.body["address"], COLLECTION_A);
    assert_eq!(res.body["cid"], cid);

    let res = app.get(&routes::collection(COLLECTION_A)).await;
    assert_eq!(res.body["owner"], OWNER);
}

#[tokio::test]
async fn hashes_endpoint_derives_pairs() {
    let app = TestApp::spawn().await;
    let input = "PASS-001,ipfs://bafybeigdyrzt5sfp7udm7hu76uh7y26nf3efuylqabf3oclgtqy55fbzdi/metadata/0.json\n\
        0xab06bad193a08a57f3444e9c092fe3355c3d42dbdd359663218b6197df68564a";

    let res = app.post(routes::HASHES, &json!({ "input": input })).await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(
        res.body["hashes"],
        json!([
            "0x54c65df561f2b4b4ead118a18e2f83a95bc122eaa8529024bfce1bf07e1dfb3a",
            "0xab06bad193a08a57f3444e9c092fe3355c3d42dbdd359663218b6197df68564a",
        ])
    );
}

#[tokio::test]
async fn hashes_endpoint_rejects_bad_lines() {
    let app = TestApp::spawn().await;
    let res = app
        .post(routes::HASHES, &json!({ "input": "just-a-code" }))
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.error_code(), "VALIDATION_ERROR");
}
