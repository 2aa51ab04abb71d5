mod common;

use chrono::NaiveDate;
use serde_json::Value;

fn ts(hour: u32, min: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 14)
        .unwrap()
        .and_hms_opt(hour, min, 0)
        .unwrap()
}

#[tokio::test]
async fn claim_seeds_exactly_one_templated_message() {
    let app = common::spawn_app().await;
    let (owner, owner_token) = common::create_test_user(&app, "finder").await;
    let (claimer, claimer_token) = common::create_test_user(&app, "loser").await;

    let item_id = common::create_test_item(&app, &owner_token, "library", &["desk"]).await;

    let resp = app
        .client
        .post(app.url(&format!("/items/{}/claim", item_id)))
        .bearer_auth(&claimer_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["sender"], claimer);
    assert_eq!(body["data"]["receiver"], owner);
    assert_eq!(
        body["data"]["message"],
        format!("Submitted claim request for item_id {}", item_id)
    );
    assert!(body["message"].as_str().unwrap().contains("Claim"));

    assert_eq!(common::count_rows(&app.db, "conversations").await, 1);

    // The claim is just the first message of the thread.
    let resp = app
        .client
        .get(app.url(&format!("/conversations/{}", owner)))
        .bearer_auth(&claimer_token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let thread = body["data"].as_array().unwrap();
    assert_eq!(thread.len(), 1);
    assert_eq!(
        thread[0]["message"],
        format!("Submitted claim request for item_id {}", item_id)
    );
}

#[tokio::test]
async fn claim_on_missing_item_creates_nothing() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_test_user(&app, "hopeful").await;

    let resp = app
        .client
        .post(app.url("/items/999999/claim"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(common::count_rows(&app.db, "conversations").await, 0);
}

#[tokio::test]
async fn inbox_groups_by_counterpart_ordered_by_latest_activity() {
    let app = common::spawn_app().await;
    let (a, a_token) = common::create_test_user(&app, "ia").await;
    let (b, _) = common::create_test_user(&app, "ib").await;
    let (c, _) = common::create_test_user(&app, "ic").await;

    // (A->B, t1), (B->A, t2), (A->C, t3) with t2 > t3 > t1
    common::insert_message(&app.db, &a, &b, "m1", ts(9, 0)).await;
    common::insert_message(&app.db, &b, &a, "m2", ts(11, 0)).await;
    common::insert_message(&app.db, &a, &c, "m3", ts(10, 0)).await;

    let resp = app
        .client
        .get(app.url("/conversations"))
        .bearer_auth(&a_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let inbox = body["data"].as_array().unwrap();

    assert_eq!(inbox.len(), 2);
    assert_eq!(inbox[0]["counterpart"], b);
    assert_eq!(inbox[0]["last_message"], "m2");
    assert_eq!(inbox[1]["counterpart"], c);
    assert_eq!(inbox[1]["last_message"], "m3");
}

#[tokio::test]
async fn thread_is_ascending_regardless_of_direction() {
    let app = common::spawn_app().await;
    let (a, a_token) = common::create_test_user(&app, "ta").await;
    let (b, b_token) = common::create_test_user(&app, "tb").await;

    // Inserted out of order, mixed directions.
    common::insert_message(&app.db, &b, &a, "second", ts(10, 0)).await;
    common::insert_message(&app.db, &a, &b, "third", ts(11, 0)).await;
    common::insert_message(&app.db, &a, &b, "first", ts(9, 0)).await;

    let resp = app
        .client
        .get(app.url(&format!("/conversations/{}", b)))
        .bearer_auth(&a_token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let messages: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["message"].as_str().unwrap())
        .collect();
    assert_eq!(messages, vec!["first", "second", "third"]);

    // Both parties see the same thread.
    let resp = app
        .client
        .get(app.url(&format!("/conversations/{}", a)))
        .bearer_auth(&b_token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let messages: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["message"].as_str().unwrap())
        .collect();
    assert_eq!(messages, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn thread_excludes_other_pairs() {
    let app = common::spawn_app().await;
    let (a, a_token) = common::create_test_user(&app, "xa").await;
    let (b, _) = common::create_test_user(&app, "xb").await;
    let (c, _) = common::create_test_user(&app, "xc").await;

    common::insert_message(&app.db, &a, &b, "for b", ts(9, 0)).await;
    common::insert_message(&app.db, &a, &c, "for c", ts(9, 1)).await;
    common::insert_message(&app.db, &b, &c, "not ours", ts(9, 2)).await;

    let resp = app
        .client
        .get(app.url(&format!("/conversations/{}", b)))
        .bearer_auth(&a_token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let thread = body["data"].as_array().unwrap();
    assert_eq!(thread.len(), 1);
    assert_eq!(thread[0]["message"], "for b");
}

#[tokio::test]
async fn sent_message_is_visible_on_next_read() {
    let app = common::spawn_app().await;
    let (_, a_token) = common::create_test_user(&app, "sa").await;
    let (b, _) = common::create_test_user(&app, "sb").await;

    let resp = app
        .client
        .post(app.url(&format!("/conversations/{}", b)))
        .bearer_auth(&a_token)
        .json(&serde_json::json!({ "message": "is this yours?" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .get(app.url(&format!("/conversations/{}", b)))
        .bearer_auth(&a_token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let thread = body["data"].as_array().unwrap();
    assert_eq!(thread.len(), 1);
    assert_eq!(thread[0]["message"], "is this yours?");
}

#[tokio::test]
async fn message_to_unknown_user_is_404() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_test_user(&app, "lonely").await;

    let resp = app
        .client
        .post(app.url("/conversations/nobody_home"))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "message": "hello?" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(common::count_rows(&app.db, "conversations").await, 0);
}

#[tokio::test]
async fn inbox_and_thread_reads_are_idempotent() {
    let app = common::spawn_app().await;
    let (a, a_token) = common::create_test_user(&app, "ra").await;
    let (b, _) = common::create_test_user(&app, "rb").await;

    common::insert_message(&app.db, &a, &b, "one", ts(9, 0)).await;
    common::insert_message(&app.db, &b, &a, "two", ts(10, 0)).await;

    let first: Value = app
        .client
        .get(app.url("/conversations"))
        .bearer_auth(&a_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let second: Value = app
        .client
        .get(app.url("/conversations"))
        .bearer_auth(&a_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first, second);

    let first: Value = app
        .client
        .get(app.url(&format!("/conversations/{}", b)))
        .bearer_auth(&a_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let second: Value = app
        .client
        .get(app.url(&format!("/conversations/{}", b)))
        .bearer_auth(&a_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn inbox_requires_authentication() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .get(app.url("/conversations"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}
