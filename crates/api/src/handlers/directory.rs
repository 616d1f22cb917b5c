use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use barbershop_core::models::{
    barber::{Barber, CreateBarberRequest, SetBarberServicesRequest, UpdateBarberRequest},
    service::{Service, ServiceFilter, ServiceRequest},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn list_barbers(State(state): State<Arc<ApiState>>) -> Result<Json<Vec<Barber>>, AppError> {
    Ok(Json(state.booking.list_barbers().await?))
}

#[axum::debug_handler]
pub async fn create_barber(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateBarberRequest>,
) -> Result<(StatusCode, Json<Barber>), AppError> {
    let barber = state.booking.create_barber(&payload.name).await?;
    Ok((StatusCode::CREATED, Json(barber)))
}

#[axum::debug_handler]
pub async fn update_barber(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBarberRequest>,
) -> Result<Json<Barber>, AppError> {
    let changes = payload.into_changes()?;
    Ok(Json(state.booking.update_barber(id, changes).await?))
}

#[axum::debug_handler]
pub async fn delete_barber(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.booking.delete_barber(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn set_barber_services(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetBarberServicesRequest>,
) -> Result<StatusCode, AppError> {
    state.booking.set_barber_services(id, payload.service_ids).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn list_services(
    State(state): State<Arc<ApiState>>,
    Query(filter): Query<ServiceFilter>,
) -> Result<Json<Vec<Service>>, AppError> {
    Ok(Json(state.booking.list_services(&filter).await?))
}

#[axum::debug_handler]
pub async fn create_service(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<ServiceRequest>,
) -> Result<(StatusCode, Json<Service>), AppError> {
    let draft = payload.into_draft()?;
    let service = state.booking.create_service(draft).await?;
    Ok((StatusCode::CREATED, Json(service)))
}

#[axum::debug_handler]
pub async fn update_service(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ServiceRequest>,
) -> Result<Json<Service>, AppError> {
    let draft = payload.into_draft()?;
    Ok(Json(state.booking.update_service(id, draft).await?))
}

#[axum::debug_handler]
pub async fn delete_service(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.booking.delete_service(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
