use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::test_utils::TestContext;

#[test_log::test(tokio::test)]
async fn test_new_barbers_are_appended() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/barbers")
        .json(&json!({ "name": "  Emre " }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let created: Value = response.json();
    assert_eq!(created["name"], "Emre");

    let barbers: Vec<Value> = ctx.server.get("/api/barbers").await.json();
    let names: Vec<&str> = barbers.iter().map(|b| b["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Ali", "Emre"]);
}

#[test_log::test(tokio::test)]
async fn test_blank_barber_name_is_rejected() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/barbers")
        .json(&json!({ "name": "" }))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn test_update_and_delete_barber() {
    let ctx = TestContext::new().await;
    let path = format!("/api/barbers/{}", ctx.barber.id);

    let renamed: Value = ctx
        .server
        .put(&path)
        .json(&json!({ "name": "Ali K." }))
        .await
        .json();
    assert_eq!(renamed["name"], "Ali K.");
    assert_eq!(renamed["display_order"], 1);

    ctx.server
        .delete(&path)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    ctx.server
        .delete(&path)
        .expect_failure()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn test_service_minutes_round_up_to_slots() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/services")
        .json(&json!({
            "name": "Bart",
            "price": "12",
            "duration_minutes": 45,
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let service: Value = response.json();
    assert_eq!(service["duration_slots"], 2);
    assert_eq!(service["duration_minutes"], 45);
    assert_eq!(service["price"], "12€");
    assert_eq!(service["is_combined"], false);
}

#[rstest]
#[case(5)]
#[case(25)]
#[tokio::test]
async fn test_unlisted_service_duration_is_rejected(#[case] minutes: u32) {
    let ctx = TestContext::new().await;

    ctx.server
        .post("/api/services")
        .json(&json!({
            "name": "Augenbrauen",
            "price": "5",
            "duration_minutes": minutes,
        }))
        .expect_failure()
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn test_services_filter_by_barber() {
    let ctx = TestContext::new().await;
    let second: Value = ctx
        .server
        .post("/api/barbers")
        .json(&json!({ "name": "Emre" }))
        .await
        .json();
    let second_id = second["id"].as_str().unwrap();

    ctx.server
        .put(&format!("/api/barbers/{}/services", second_id))
        .json(&json!({ "service_ids": [ctx.long_cut.id] }))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let offered: Vec<Value> = ctx
        .server
        .get("/api/services")
        .add_query_param("barber_id", second_id)
        .await
        .json();
    assert_eq!(offered.len(), 1);
    assert_eq!(offered[0]["id"], json!(ctx.long_cut.id));

    let all: Vec<Value> = ctx.server.get("/api/services").await.json();
    assert_eq!(all.len(), 2);
}

#[test_log::test(tokio::test)]
async fn test_offering_unknown_service_fails() {
    let ctx = TestContext::new().await;

    ctx.server
        .put(&format!("/api/barbers/{}/services", ctx.barber.id))
        .json(&json!({ "service_ids": [Uuid::new_v4()] }))
        .expect_failure()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
