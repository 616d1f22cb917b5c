use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/barbers",
            get(handlers::directory::list_barbers).post(handlers::directory::create_barber),
        )
        .route(
            "/api/barbers/:id",
            put(handlers::directory::update_barber).delete(handlers::directory::delete_barber),
        )
        .route(
            "/api/barbers/:id/services",
            put(handlers::directory::set_barber_services),
        )
        .route(
            "/api/services",
            get(handlers::directory::list_services).post(handlers::directory::create_service),
        )
        .route(
            "/api/services/:id",
            put(handlers::directory::update_service).delete(handlers::directory::delete_service),
        )
}
