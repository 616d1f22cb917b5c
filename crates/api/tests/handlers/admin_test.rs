use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::test_utils::{open_day, slot, TestContext};

async fn toggle(ctx: &TestContext, time: &str) -> Value {
    ctx.server
        .post("/api/admin/slots/toggle")
        .json(&json!({
            "barber_id": ctx.barber.id,
            "date": open_day(),
            "time": time,
        }))
        .await
        .json()
}

async fn schedule(ctx: &TestContext) -> Value {
    ctx.server
        .get("/api/admin/schedule")
        .add_query_param("barber_id", ctx.barber.id)
        .add_query_param("date", open_day())
        .await
        .json()
}

fn cell<'a>(schedule: &'a Value, time: &str) -> &'a Value {
    schedule["cells"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["time"] == time)
        .unwrap()
}

#[test_log::test(tokio::test)]
async fn test_toggle_blocks_then_unblocks() {
    let ctx = TestContext::new().await;

    let blocked = toggle(&ctx, "12:00").await;
    assert_eq!(blocked["outcome"], "blocked");
    assert_eq!(blocked["appointment"]["status"], "blocked");
    assert_eq!(cell(&schedule(&ctx).await, "12:00")["state"], "blocked");

    let availability = ctx.availability(&ctx.haircut, open_day()).await;
    assert_eq!(slot(&availability, "12:00")["available"], false);

    let unblocked = toggle(&ctx, "12:00").await;
    assert_eq!(unblocked, json!({ "outcome": "unblocked", "count": 1 }));
    assert_eq!(cell(&schedule(&ctx).await, "12:00")["state"], "free");
}

#[test_log::test(tokio::test)]
async fn test_toggle_on_booking_navigates() {
    let ctx = TestContext::new().await;
    let booked = ctx.book(&ctx.long_cut, "10:00", "0151 2345678").await;

    let outcome = toggle(&ctx, "10:30").await;

    assert_eq!(
        outcome,
        json!({
            "outcome": "navigate",
            "appointment_id": booked["id"],
            "highlight_ms": 1600,
        })
    );
}

#[test_log::test(tokio::test)]
async fn test_schedule_marks_range_heads() {
    let ctx = TestContext::new().await;
    let booked = ctx.book(&ctx.long_cut, "10:00", "0151 2345678").await;

    let day = schedule(&ctx).await;

    assert_eq!(day["appointments"].as_array().unwrap().len(), 1);
    let head = cell(&day, "10:00");
    assert_eq!(head["state"], "booked");
    assert_eq!(head["is_range_head"], true);
    assert_eq!(head["appointment_id"], booked["id"]);
    for time in ["10:30", "11:00"] {
        let tail = cell(&day, time);
        assert_eq!(tail["state"], "booked");
        assert_eq!(tail["is_range_head"], false);
    }
    assert_eq!(cell(&day, "11:30")["state"], "free");
}

#[test_log::test(tokio::test)]
async fn test_edit_moves_appointment() {
    let ctx = TestContext::new().await;
    let booked = ctx.book(&ctx.haircut, "10:00", "0151 2345678").await;
    let id = booked["id"].as_str().unwrap();

    let moved: Value = ctx
        .server
        .put(&format!("/api/admin/appointments/{}", id))
        .json(&json!({
            "service_id": ctx.long_cut.id,
            "barber_id": ctx.barber.id,
            "date": open_day(),
            "time": "14:00",
        }))
        .await
        .json();

    assert_eq!(moved["time"], "14:00");
    assert_eq!(moved["duration_slots"], 3);
    assert_eq!(moved["customer_phone"], "+491512345678");
    let day = schedule(&ctx).await;
    assert_eq!(cell(&day, "10:00")["state"], "free");
    assert_eq!(cell(&day, "15:00")["state"], "booked");
}

#[test_log::test(tokio::test)]
async fn test_edit_into_block_conflicts() {
    let ctx = TestContext::new().await;
    let booked = ctx.book(&ctx.haircut, "10:00", "0151 2345678").await;
    toggle(&ctx, "15:00").await;

    let response = ctx
        .server
        .put(&format!("/api/admin/appointments/{}", booked["id"].as_str().unwrap()))
        .json(&json!({
            "service_id": ctx.long_cut.id,
            "barber_id": ctx.barber.id,
            "date": open_day(),
            "time": "14:00",
        }))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[test_log::test(tokio::test)]
async fn test_admin_cancel_frees_the_run() {
    let ctx = TestContext::new().await;
    let booked = ctx.book(&ctx.long_cut, "10:00", "0151 2345678").await;

    let canceled: Value = ctx
        .server
        .post(&format!("/api/admin/appointments/{}/cancel", booked["id"].as_str().unwrap()))
        .await
        .json();

    assert_eq!(canceled["status"], "canceled");
    let day = schedule(&ctx).await;
    assert!(day["appointments"].as_array().unwrap().is_empty());
    assert_eq!(cell(&day, "10:30")["state"], "free");
}

#[test_log::test(tokio::test)]
async fn test_toggle_off_grid_is_rejected() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/admin/slots/toggle")
        .json(&json!({
            "barber_id": ctx.barber.id,
            "date": open_day(),
            "time": "10:15",
        }))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
