use axum::http::StatusCode;
use barbershop_core::errors::{AUTHORIZATION_MESSAGE, CONFLICT_MESSAGE};
use fake::{faker::name::en::FirstName, Fake};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::test_utils::{open_day, slot, TestContext};

#[test_log::test(tokio::test)]
async fn test_book_stores_normalized_phone() {
    let ctx = TestContext::new().await;
    let name: String = FirstName().fake();

    let response = ctx
        .server
        .post("/api/appointments")
        .json(&json!({
            "service_id": ctx.haircut.id,
            "barber_id": ctx.barber.id,
            "date": open_day(),
            "time": "10:00",
            "customer_name": format!("  {}  ", name),
            "customer_phone": "0151 2345678",
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let appointment: Value = response.json();
    assert_eq!(appointment["status"], "booked");
    assert_eq!(appointment["time"], "10:00");
    assert_eq!(appointment["duration_slots"], 1);
    assert_eq!(appointment["service_name"], "Haarschnitt");
    assert_eq!(appointment["customer_name"], name.as_str());
    assert_eq!(appointment["customer_phone"], "+491512345678");
}

#[test_log::test(tokio::test)]
async fn test_second_booking_for_taken_slot_conflicts() {
    let ctx = TestContext::new().await;
    ctx.book(&ctx.long_cut, "10:00", "0151 2345678").await;

    let response = ctx
        .server
        .post("/api/appointments")
        .json(&json!({
            "service_id": ctx.haircut.id,
            "barber_id": ctx.barber.id,
            "date": open_day(),
            "time": "11:00",
            "customer_name": "Mia",
            "customer_phone": "+49 170 1111111",
        }))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::CONFLICT);
    response.assert_json(&json!({
        "error": CONFLICT_MESSAGE,
        "retryable": true,
    }));
}

#[test_log::test(tokio::test)]
async fn test_blank_name_is_rejected() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/appointments")
        .json(&json!({
            "service_id": ctx.haircut.id,
            "barber_id": ctx.barber.id,
            "date": open_day(),
            "time": "10:00",
            "customer_name": "   ",
            "customer_phone": "0151 2345678",
        }))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["retryable"], false);
}

#[test_log::test(tokio::test)]
async fn test_lookup_matches_any_spelling() {
    let ctx = TestContext::new().await;
    ctx.book(&ctx.haircut, "10:00", "0151 2345678").await;
    ctx.book(&ctx.haircut, "14:30", "+49 151 2345678").await;
    ctx.book(&ctx.haircut, "16:00", "0170 9999999").await;

    let found: Vec<Value> = ctx
        .server
        .get("/api/appointments/lookup")
        .add_query_param("phone", "0049 (151) 234-56-78")
        .await
        .json();

    let times: Vec<&str> = found.iter().map(|a| a["time"].as_str().unwrap()).collect();
    assert_eq!(times.len(), 2);
    assert!(times.contains(&"10:00"));
    assert!(times.contains(&"14:30"));
}

#[test_log::test(tokio::test)]
async fn test_cancel_requires_matching_phone() {
    let ctx = TestContext::new().await;
    let booked = ctx.book(&ctx.haircut, "10:00", "0151 2345678").await;
    let id = booked["id"].as_str().unwrap();

    let wrong = ctx
        .server
        .post(&format!("/api/appointments/{}/cancel", id))
        .json(&json!({ "phone": "0170 1234567" }))
        .expect_failure()
        .await;
    wrong.assert_status(StatusCode::FORBIDDEN);
    wrong.assert_json(&json!({
        "error": AUTHORIZATION_MESSAGE,
        "retryable": false,
    }));

    let canceled: Value = ctx
        .server
        .post(&format!("/api/appointments/{}/cancel", id))
        .json(&json!({ "phone": "+491512345678" }))
        .await
        .json();
    assert_eq!(canceled["status"], "canceled");
    assert!(canceled["canceled_at"].is_string());

    let availability = ctx.availability(&ctx.haircut, open_day()).await;
    assert_eq!(slot(&availability, "10:00")["available"], true);
}

#[test_log::test(tokio::test)]
async fn test_unknown_appointment_reads_like_wrong_phone() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post(&format!("/api/appointments/{}/cancel", Uuid::new_v4()))
        .json(&json!({ "phone": "0151 2345678" }))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["error"], AUTHORIZATION_MESSAGE);
}
