use actix_web::{HttpResponse, ResponseError};
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("No pricing rule matched {lesson_type} / {subject} / {duration_hours}h")]
    NoRuleMatched {
        lesson_type: String,
        subject: String,
        duration_hours: Decimal,
    },

    #[error("Insufficient package hours: {remaining} remaining, {requested} requested")]
    InsufficientPackageHours {
        remaining: Decimal,
        requested: Decimal,
    },

    #[error("Time slot not available for tutor {tutor_id}")]
    SlotUnavailable { tutor_id: i64 },

    #[error("Invalid booking window: end time must be after start time")]
    InvalidBookingWindow,

    #[error("Booking {0} cannot be cancelled in its current status")]
    BookingNotCancellable(i64),

    #[error("Duration adjustment rejected: would change consumed hours ({consumed}h -> {requested}h)")]
    DurationAdjustmentRejected {
        consumed: Decimal,
        requested: Decimal,
    },

    #[error("Payment not found: {0}")]
    PaymentNotFound(i64),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = match self {
            AppError::NoRuleMatched { .. } => {
                log::warn!("Pricing resolution failed: {self}");
                (
                    actix_web::http::StatusCode::UNPROCESSABLE_ENTITY,
                    "NO_RULE_MATCHED",
                    self.to_string(),
                )
            }
            AppError::InsufficientPackageHours { .. } => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "INSUFFICIENT_PACKAGE_HOURS",
                self.to_string(),
            ),
            AppError::SlotUnavailable { .. } => (
                actix_web::http::StatusCode::CONFLICT,
                "SLOT_UNAVAILABLE",
                self.to_string(),
            ),
            AppError::InvalidBookingWindow => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "INVALID_BOOKING_WINDOW",
                self.to_string(),
            ),
            AppError::BookingNotCancellable(_) => (
                actix_web::http::StatusCode::CONFLICT,
                "BOOKING_NOT_CANCELLABLE",
                self.to_string(),
            ),
            AppError::DurationAdjustmentRejected { .. } => (
                actix_web::http::StatusCode::CONFLICT,
                "DURATION_ADJUSTMENT_REJECTED",
                self.to_string(),
            ),
            AppError::PaymentNotFound(_) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "PAYMENT_NOT_FOUND",
                self.to_string(),
            ),
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                (
                    actix_web::http::StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    msg.clone(),
                )
            }
            AppError::NotFound(msg) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "NOT_FOUND",
                msg.clone(),
            ),
            AppError::DatabaseError(err) => {
                log::error!("Database error: {err}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Database error".to_string(),
                )
            }
            _ => {
                log::error!("Internal error: {self}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        HttpResponse::build(status_code).json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message
            }
        }))
    }
}
