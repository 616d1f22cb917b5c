use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/admin/schedule", get(handlers::admin::day_schedule))
        .route(
            "/api/admin/appointments/:id",
            put(handlers::admin::update_appointment),
        )
        .route(
            "/api/admin/appointments/:id/cancel",
            post(handlers::admin::cancel_appointment),
        )
        .route("/api/admin/slots/toggle", post(handlers::admin::toggle_slot))
}
