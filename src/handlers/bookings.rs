use actix_web::{web, HttpResponse, ResponseError, Result};
use serde_json::json;

use crate::models::*;
use crate::services::BookingService;

#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 200, description = "Booking created and hours debited", body = BookingResponse),
        (status = 402, description = "Insufficient package hours"),
        (status = 409, description = "Slot unavailable"),
        (status = 400, description = "Invalid booking window")
    )
)]
pub async fn create_booking(
    booking_service: web::Data<BookingService>,
    request: web::Json<CreateBookingRequest>,
) -> Result<HttpResponse> {
    match booking_service.create_booking(request.into_inner()).await {
        Ok(booking) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": booking
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/bookings/{id}/confirm",
    tag = "bookings",
    params(
        ("id" = i64, Path, description = "Booking id")
    ),
    responses(
        (status = 200, description = "Booking confirmed", body = BookingResponse),
        (status = 404, description = "Booking not found"),
        (status = 400, description = "Booking not pending")
    )
)]
pub async fn confirm_booking(
    booking_service: web::Data<BookingService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match booking_service.confirm_booking(path.into_inner()).await {
        Ok(booking) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": booking
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/bookings/{id}/complete",
    tag = "bookings",
    params(
        ("id" = i64, Path, description = "Booking id")
    ),
    request_body = CompleteBookingRequest,
    responses(
        (status = 200, description = "Booking completed", body = BookingResponse),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Adjusted duration differs from hours already debited")
    )
)]
pub async fn complete_booking(
    booking_service: web::Data<BookingService>,
    path: web::Path<i64>,
    request: web::Json<CompleteBookingRequest>,
) -> Result<HttpResponse> {
    match booking_service
        .complete_booking(path.into_inner(), request.into_inner().actual_duration_hours)
        .await
    {
        Ok(booking) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": booking
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/bookings/{id}/cancel",
    tag = "bookings",
    params(
        ("id" = i64, Path, description = "Booking id")
    ),
    responses(
        (status = 200, description = "Booking cancelled, refundable hours credited", body = BookingResponse),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking already completed or cancelled")
    )
)]
pub async fn cancel_booking(
    booking_service: web::Data<BookingService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match booking_service.cancel_booking(path.into_inner()).await {
        Ok(booking) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": booking
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn bookings_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/bookings")
            .route("", web::post().to(create_booking))
            .route("/{id}/confirm", web::post().to(confirm_booking))
            .route("/{id}/complete", web::post().to(complete_booking))
            .route("/{id}/cancel", web::post().to(cancel_booking)),
    );
}
