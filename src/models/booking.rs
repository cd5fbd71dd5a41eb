use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{booking_entity, BookingStatus, LessonType};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    pub student_id: i64,
    pub tutor_id: i64,
    pub package_purchase_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub subject: String,
    pub notes: Option<String>,
    /// Optional explicit lesson type; inferred from the package or the time
    /// of day when absent.
    pub lesson_type: Option<LessonType>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompleteBookingRequest {
    pub actual_duration_hours: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookingResponse {
    pub id: i64,
    pub student_id: i64,
    pub tutor_id: i64,
    pub package_purchase_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub subject: String,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub calculated_duration: Option<Decimal>,
    pub calculated_price: Option<Decimal>,
    pub tutor_earnings: Option<Decimal>,
    pub platform_fee: Option<Decimal>,
    pub pricing_rule_applied: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<booking_entity::Model> for BookingResponse {
    fn from(b: booking_entity::Model) -> Self {
        Self {
            id: b.id,
            student_id: b.student_id,
            tutor_id: b.tutor_id,
            package_purchase_id: b.package_purchase_id,
            start_time: b.start_time,
            end_time: b.end_time,
            subject: b.subject,
            notes: b.notes,
            status: b.status,
            calculated_duration: b.calculated_duration,
            calculated_price: b.calculated_price,
            tutor_earnings: b.tutor_earnings,
            platform_fee: b.platform_fee,
            pricing_rule_applied: b.pricing_rule_applied,
            created_at: b.created_at,
        }
    }
}
