//! Simple REST API server example for the booking engine.
//!
//! Run with: `cargo run --example server`
//!
//! ## Endpoints
//!
//! - `POST /properties` - Register a property
//! - `POST /reservations` - Request a reservation
//! - `POST /reservations/{id}/approve` - Owner approves
//! - `POST /reservations/{id}/reject` - Owner rejects
//! - `POST /reservations/{id}/cancel` - Owner or tenant cancels
//! - `GET /reservations/{id}` - Fetch a reservation
//! - `GET /properties/{id}/calendar/{year}/{month}` - Month grid
//! - `GET /properties/{id}/quote?start=..&end=..` - Range quote
//! - `GET /tenants/{id}/reviewable` - Reservations eligible for review
//! - `POST /reviews` - Submit a review
//!
//! ## Example Usage
//!
//! ```bash
//! # Register a property
//! curl -X POST http://localhost:3000/properties \
//!   -H "Content-Type: application/json" \
//!   -d '{"id": 1, "owner": 10, "base_price": "100"}'
//!
//! # Request a stay
//! curl -X POST http://localhost:3000/reservations \
//!   -H "Content-Type: application/json" \
//!   -d '{"property_id": 1, "requester": 7, "start": "2025-09-10", "end": "2025-09-13"}'
//!
//! # Approve it
//! curl -X POST http://localhost:3000/reservations/1/approve \
//!   -H "Content-Type: application/json" -d '{"actor": 10}'
//! ```

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use staybook_rs::{
    BookingError, DateRange, Engine, Property, PropertyId, Reservation, ReservationId, UserId,
};
use std::sync::Arc;
use tokio::net::TcpListener;

// === Request/Response DTOs ===

#[derive(Debug, Deserialize)]
struct RegisterPropertyRequest {
    id: u32,
    owner: u32,
    base_price: Decimal,
}

#[derive(Debug, Deserialize)]
struct CreateReservationRequest {
    property_id: u32,
    requester: u32,
    start: NaiveDate,
    end: NaiveDate,
}

/// Body for approve/reject/cancel transitions.
#[derive(Debug, Deserialize)]
struct TransitionRequest {
    actor: u32,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuoteParams {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Debug, Deserialize)]
struct SubmitReviewRequest {
    reservation_id: u64,
    reviewer: u32,
    rating: u8,
    comment: String,
}

/// Response body for reservation state.
#[derive(Debug, Serialize)]
struct ReservationResponse {
    id: u64,
    property_id: u32,
    requester: u32,
    start: NaiveDate,
    end: NaiveDate,
    status: String,
    total_price: Option<Decimal>,
}

impl From<Reservation> for ReservationResponse {
    fn from(r: Reservation) -> Self {
        ReservationResponse {
            id: r.id.0,
            property_id: r.property_id.0,
            requester: r.requester.0,
            start: r.range.start,
            end: r.range.end,
            status: r.status.to_string(),
            total_price: r.total_price,
        }
    }
}

/// Response body for errors.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    code: String,
}

// === Application State ===

#[derive(Clone)]
struct AppState {
    engine: Arc<Engine>,
}

// === Error Handling ===

/// Wrapper for converting `BookingError` into HTTP responses.
#[derive(Debug)]
struct AppError(BookingError);

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            BookingError::InvalidDateRange => (StatusCode::BAD_REQUEST, "INVALID_DATE_RANGE"),
            BookingError::DateRangeUnavailable => {
                (StatusCode::CONFLICT, "DATE_RANGE_UNAVAILABLE")
            }
            BookingError::InvalidTransition { .. } => (StatusCode::CONFLICT, "INVALID_TRANSITION"),
            BookingError::NotAuthorized => (StatusCode::FORBIDDEN, "NOT_AUTHORIZED"),
            BookingError::PropertyNotFound => (StatusCode::NOT_FOUND, "PROPERTY_NOT_FOUND"),
            BookingError::PropertyInactive => {
                (StatusCode::UNPROCESSABLE_ENTITY, "PROPERTY_INACTIVE")
            }
            BookingError::ReservationNotFound => (StatusCode::NOT_FOUND, "RESERVATION_NOT_FOUND"),
            BookingError::BlockNotFound => (StatusCode::NOT_FOUND, "BLOCK_NOT_FOUND"),
            BookingError::NotEligible => (StatusCode::UNPROCESSABLE_ENTITY, "NOT_ELIGIBLE"),
            BookingError::DuplicateReview => (StatusCode::CONFLICT, "DUPLICATE_REVIEW"),
            BookingError::InvalidRating => (StatusCode::BAD_REQUEST, "INVALID_RATING"),
            BookingError::InvalidPrice => (StatusCode::BAD_REQUEST, "INVALID_PRICE"),
        };

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

// === Handlers ===

async fn register_property(
    State(state): State<AppState>,
    Json(request): Json<RegisterPropertyRequest>,
) -> StatusCode {
    state.engine.register_property(Property::new(
        PropertyId(request.id),
        UserId(request.owner),
        request.base_price,
    ));
    StatusCode::CREATED
}

async fn create_reservation(
    State(state): State<AppState>,
    Json(request): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ReservationResponse>), AppError> {
    let reservation = state.engine.create_reservation(
        PropertyId(request.property_id),
        UserId(request.requester),
        request.start,
        request.end,
    )?;
    Ok((StatusCode::CREATED, Json(reservation.into())))
}

async fn approve_reservation(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<TransitionRequest>,
) -> Result<Json<ReservationResponse>, AppError> {
    let reservation = state
        .engine
        .approve(ReservationId(id), UserId(request.actor))?;
    Ok(Json(reservation.into()))
}

async fn reject_reservation(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<TransitionRequest>,
) -> Result<Json<ReservationResponse>, AppError> {
    let reservation =
        state
            .engine
            .reject(ReservationId(id), UserId(request.actor), request.reason)?;
    Ok(Json(reservation.into()))
}

async fn cancel_reservation(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<TransitionRequest>,
) -> Result<Json<ReservationResponse>, AppError> {
    let reservation = state
        .engine
        .cancel(ReservationId(id), UserId(request.actor))?;
    Ok(Json(reservation.into()))
}

async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ReservationResponse>, AppError> {
    state
        .engine
        .get_reservation(ReservationId(id))
        .map(|r| Json(r.into()))
        .ok_or(AppError(BookingError::ReservationNotFound))
}

async fn get_month_calendar(
    State(state): State<AppState>,
    Path((id, year, month)): Path<(u32, i32, u32)>,
) -> Result<Response, AppError> {
    let grid = state.engine.build_month(PropertyId(id), year, month)?;
    Ok(Json(&*grid).into_response())
}

async fn get_quote(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Query(params): Query<QuoteParams>,
) -> Result<Response, AppError> {
    let range = DateRange::new(params.start, params.end)?;
    let quote = state.engine.range_quote(PropertyId(id), range)?;
    Ok(Json(quote).into_response())
}

async fn list_reviewable(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Json<Vec<ReservationResponse>> {
    Json(
        state
            .engine
            .eligible_reservations(UserId(id), None)
            .into_iter()
            .map(ReservationResponse::from)
            .collect(),
    )
}

async fn submit_review(
    State(state): State<AppState>,
    Json(request): Json<SubmitReviewRequest>,
) -> Result<StatusCode, AppError> {
    state.engine.submit_review(
        ReservationId(request.reservation_id),
        UserId(request.reviewer),
        request.rating,
        request.comment,
    )?;
    Ok(StatusCode::CREATED)
}

// === Router ===

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/properties", post(register_property))
        .route("/reservations", post(create_reservation))
        .route("/reservations/{id}", get(get_reservation))
        .route("/reservations/{id}/approve", post(approve_reservation))
        .route("/reservations/{id}/reject", post(reject_reservation))
        .route("/reservations/{id}/cancel", post(cancel_reservation))
        .route(
            "/properties/{id}/calendar/{year}/{month}",
            get(get_month_calendar),
        )
        .route("/properties/{id}/quote", get(get_quote))
        .route("/tenants/{id}/reviewable", get(list_reviewable))
        .route("/reviews", post(submit_review))
        .with_state(state)
}

// === Main ===

#[tokio::main]
async fn main() {
    let state = AppState {
        engine: Arc::new(Engine::new()),
    };

    let app = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:3000").await.unwrap();
    println!("Booking API server running on http://127.0.0.1:3000");
    println!();
    println!("Endpoints:");
    println!("  POST /properties                       - Register a property");
    println!("  POST /reservations                     - Request a reservation");
    println!("  POST /reservations/:id/approve         - Approve a request");
    println!("  POST /reservations/:id/reject          - Reject a request");
    println!("  POST /reservations/:id/cancel          - Cancel a reservation");
    println!("  GET  /reservations/:id                 - Fetch a reservation");
    println!("  GET  /properties/:id/calendar/:y/:m    - Month grid");
    println!("  GET  /properties/:id/quote             - Range quote");
    println!("  GET  /tenants/:id/reviewable           - Reviewable stays");
    println!("  POST /reviews                          - Submit a review");

    axum::serve(listener, app).await.unwrap();
}

// === Tests ===
