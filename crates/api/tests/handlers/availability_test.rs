use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::test_utils::{open_day, slot, sunday, TestContext};

#[test_log::test(tokio::test)]
async fn test_every_grid_label_is_listed() {
    let ctx = TestContext::new().await;

    let availability = ctx.availability(&ctx.haircut, open_day()).await;

    let slots = availability["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 21);
    assert_eq!(slots[0]["time"], "09:00");
    assert_eq!(slots[20]["time"], "19:00");
    assert!(slots.iter().all(|s| s["available"] == true));
    assert_eq!(availability["duration_slots"], 1);
}

#[test_log::test(tokio::test)]
async fn test_long_service_cannot_start_near_closing() {
    let ctx = TestContext::new().await;

    let availability = ctx.availability(&ctx.long_cut, open_day()).await;

    assert_eq!(slot(&availability, "18:00")["available"], true);
    for time in ["18:30", "19:00"] {
        let entry = slot(&availability, time);
        assert_eq!(entry["available"], false);
        assert_eq!(entry["reasons"], json!(["does_not_fit"]));
    }
}

#[test_log::test(tokio::test)]
async fn test_booking_hides_overlapping_starts() {
    let ctx = TestContext::new().await;
    ctx.book(&ctx.long_cut, "11:00", "0151 2345678").await;

    let availability = ctx.availability(&ctx.long_cut, open_day()).await;

    // a three-slot run starting at 10:00 reaches 11:00
    for time in ["10:00", "10:30", "11:00", "11:30", "12:00"] {
        assert_eq!(slot(&availability, time)["available"], false, "{} should be taken", time);
    }
    assert_eq!(slot(&availability, "09:30")["available"], true);
    assert_eq!(slot(&availability, "12:30")["available"], true);
}

#[test_log::test(tokio::test)]
async fn test_closed_weekday_has_no_open_slot() {
    let ctx = TestContext::new().await;

    let availability = ctx.availability(&ctx.haircut, sunday()).await;

    let slots = availability["slots"].as_array().unwrap();
    assert!(slots.iter().all(|s| s["available"] == false));
    assert!(slots
        .iter()
        .all(|s| s["reasons"].as_array().unwrap().contains(&json!("closed_day"))));
}

#[test_log::test(tokio::test)]
async fn test_raw_slot_count_is_accepted() {
    let ctx = TestContext::new().await;

    let availability: Value = ctx
        .server
        .get("/api/availability")
        .add_query_param("barber_id", ctx.barber.id)
        .add_query_param("date", open_day())
        .add_query_param("duration_slots", 2)
        .await
        .json();

    assert_eq!(availability["duration_slots"], 2);
    assert_eq!(slot(&availability, "19:00")["available"], false);
}

#[test_log::test(tokio::test)]
async fn test_duration_source_must_be_unique() {
    let ctx = TestContext::new().await;

    let both = ctx
        .server
        .get("/api/availability")
        .add_query_param("barber_id", ctx.barber.id)
        .add_query_param("date", open_day())
        .add_query_param("service_id", ctx.haircut.id)
        .add_query_param("duration_slots", 2)
        .expect_failure()
        .await;
    both.assert_status(StatusCode::BAD_REQUEST);

    let neither = ctx
        .server
        .get("/api/availability")
        .add_query_param("barber_id", ctx.barber.id)
        .add_query_param("date", open_day())
        .expect_failure()
        .await;
    neither.assert_status(StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn test_unknown_barber_is_not_found() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .get("/api/availability")
        .add_query_param("barber_id", uuid::Uuid::new_v4())
        .add_query_param("date", open_day())
        .add_query_param("duration_slots", 1)
        .expect_failure()
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}
