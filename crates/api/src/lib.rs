//! # Barbershop API
//!
//! The API crate provides the web server for the barbershop booking service.
//! It exposes the public booking flow (availability, booking, lookup and
//! self-service cancellation), the admin day view with its one-click block
//! toggle, and the barber and service directory.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Extract requests and delegate to [`BookingService`]
//! - **Middleware**: Map [`barbershop_core::BookingError`] onto HTTP responses
//! - **Config**: Handle environment and server configuration
//!
//! Handlers never touch storage directly; everything goes through the
//! booking service so the placement checks cannot be bypassed.

/// Configuration module for API settings
pub mod config;
/// Request handlers that delegate to the booking service
pub mod handlers;
/// Error mapping for handler results
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    error_handling::HandleErrorLayer,
    http::{header, HeaderValue, Method, StatusCode},
    BoxError, Json, Router,
};
use barbershop_core::BookingService;
use eyre::{Result, WrapErr};
use serde_json::json;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
///
/// # Example
///
/// ```rust,ignore
/// let state = Arc::new(ApiState::new(booking));
/// let app = barbershop_api::app(state);
/// ```
pub struct ApiState {
    /// Booking rules and storage behind one facade
    pub booking: BookingService,
}

impl ApiState {
    pub fn new(booking: BookingService) -> Self {
        Self { booking }
    }
}

/// Builds the router with every endpoint and request tracing.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Barbers and services
        .merge(routes::directory::routes())
        // Public booking flow
        .merge(routes::availability::routes())
        .merge(routes::appointments::routes())
        // Admin day view and slot toggling
        .merge(routes::admin::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .wrap_err_with(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(origins))
}

async fn handle_timeout(err: BoxError) -> (StatusCode, Json<serde_json::Value>) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({ "error": "request timed out", "retryable": true })),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("unhandled internal error: {}", err), "retryable": false })),
        )
    }
}

/// Starts the API server with the provided configuration and booking service
///
/// Sets up logging, applies CORS and the request timeout, then serves until
/// the listener fails.
pub async fn start_server(config: config::ApiConfig, booking: BookingService) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(ApiState::new(booking));
    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)?),
        None => app,
    };

    // Add request timeout middleware
    let app = app.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_timeout))
            .timeout(Duration::from_secs(config.request_timeout)),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
