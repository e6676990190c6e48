use dashboard_server::entity::dashboard_role;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn create_list_and_delete_role() {
    let app = TestApp::spawn().await;

    let res = app
        .post(
            routes::ROLES,
            &json!({ "email": " Ops@Example.com ", "role": "admin" }),
        )
        .await;
    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["email"], "ops@example.com");
    assert_eq!(res.body["role"], "admin");
    let id = res.body["id"].as_i64().unwrap();

    let res = app
        .post(
            routes::ROLES,
            &json!({ "email": "root@example.com", "role": "super_admin" }),
        )
        .await;
    assert_eq!(res.status, 201);

    let res = app.get(routes::ROLES).await;
    assert_eq!(res.status, 200);
    let list = res.body.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["email"], "ops@example.com");
    assert_eq!(list[1]["role"], "super_admin");

    let res = app.delete_with_body(routes::ROLES, &json!({ "id": id })).await;
    assert_eq!(res.status, 204);

    let res = app.delete_with_body(routes::ROLES, &json!({ "id": id })).await;
    assert_eq!(res.status, 404);
    assert_eq!(res.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let app = TestApp::spawn().await;
    let body = json!({ "email": "ops@example.com", "role": "admin" });
    assert_eq!(app.post(routes::ROLES, &body).await.status, 201);

    let res = app
        .post(
            routes::ROLES,
            &json!({ "email": "OPS@example.com", "role": "super_admin" }),
        )
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.error_code(), "DUPLICATE");

    let rows = dashboard_role::Entity::find().count(&app.db).await.unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn invalid_input_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app
        .post(routes::ROLES, &json!({ "email": "nope", "role": "admin" }))
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.error_code(), "VALIDATION_ERROR");

    let res = app
        .post(
            routes::ROLES,
            &json!({ "email": "ops@example.com", "role": "owner" }),
        )
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn lookup_by_email() {
    let app = TestApp::spawn().await;
    app.post(
        routes::ROLES,
        &json!({ "email": "root@example.com", "role": "super_admin" }),
    )
    .await;

    let res = app.get(&routes::role_lookup("Root@Example.com")).await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["role"], "super_admin");

    let res = app.get(&routes::role_lookup("nobody@example.com")).await;
    assert_eq!(res.status, 404);

    let res = app.get("/api/v1/roles/lookup").await;
    assert_eq!(res.status, 400);
}
