mod common;

use serde_json::Value;

#[tokio::test]
async fn admin_sees_claims_routed_to_their_place() {
    let app = common::spawn_app().await;
    let (admin, admin_token) = common::create_test_admin(&app, "nodal").await;
    let (_, reporter_token) = common::create_test_user(&app, "reporter").await;

    // Two items routed to this admin, one routed elsewhere.
    let routed_a = common::create_test_item(&app, &reporter_token, &admin, &["hall"]).await;
    let routed_b = common::create_test_item(&app, &reporter_token, &admin, &[]).await;
    common::create_test_item(&app, &reporter_token, "somewhere_else", &[]).await;

    let resp = app
        .client
        .get(app.url("/admin/claims"))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    let mut ids: Vec<i64> = items.iter().map(|i| i["id"].as_i64().unwrap()).collect();
    ids.sort();
    assert_eq!(ids, vec![routed_a as i64, routed_b as i64]);
}

#[tokio::test]
async fn non_admin_gets_forbidden() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_test_user(&app, "civilian").await;

    let resp = app
        .client
        .get(app.url("/admin/claims"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn admin_view_requires_authentication() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .get(app.url("/admin/claims"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn role_is_a_login_time_snapshot() {
    let app = common::spawn_app().await;
    let (username, old_token) = common::create_test_user(&app, "late_promote").await;

    // Promote after login: the old token still carries the "user" role.
    common::make_admin(&app.db, &username).await;

    let resp = app
        .client
        .get(app.url("/admin/claims"))
        .bearer_auth(&old_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    // A fresh login picks up the admin role.
    let new_token = common::login_user(&app, &username).await;
    let resp = app
        .client
        .get(app.url("/admin/claims"))
        .bearer_auth(&new_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}
