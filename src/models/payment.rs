use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{
    assignment_entity, payment_entity, AssignmentStatus, PaymentMethod, PaymentStatus,
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateAssignmentRequest {
    pub student_id: i64,
    pub tutor_id: i64,
    pub package_id: i64,
    pub assigned_by_admin_id: i64,
    pub custom_total_hours: Option<i32>,
    pub custom_price: Option<Decimal>,
    pub custom_expiry_date: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub auto_activate_on_payment: bool,
    pub admin_notes: Option<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecordPaymentRequest {
    pub package_assignment_id: i64,
    pub student_id: i64,
    pub admin_id: i64,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_date: Option<NaiveDate>,
    pub reference_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConfirmPaymentRequest {
    pub admin_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    pub id: i64,
    pub package_assignment_id: i64,
    pub student_id: i64,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_date: Option<NaiveDate>,
    pub status: PaymentStatus,
    pub reference_number: Option<String>,
    pub confirmed_by_admin_id: Option<i64>,
    pub confirmation_date: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<payment_entity::Model> for PaymentResponse {
    fn from(p: payment_entity::Model) -> Self {
        Self {
            id: p.id,
            package_assignment_id: p.package_assignment_id,
            student_id: p.student_id,
            amount: p.amount,
            payment_method: p.payment_method,
            payment_date: p.payment_date,
            status: p.status,
            reference_number: p.reference_number,
            confirmed_by_admin_id: p.confirmed_by_admin_id,
            confirmation_date: p.confirmation_date,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignmentResponse {
    pub id: i64,
    pub student_id: i64,
    pub tutor_id: i64,
    pub package_id: i64,
    pub status: AssignmentStatus,
    pub hours_used: Decimal,
    pub hours_remaining: Decimal,
    pub auto_activate_on_payment: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<assignment_entity::Model> for AssignmentResponse {
    fn from(a: assignment_entity::Model) -> Self {
        Self {
            id: a.id,
            student_id: a.student_id,
            tutor_id: a.tutor_id,
            package_id: a.package_id,
            status: a.status,
            hours_used: a.hours_used,
            hours_remaining: a.hours_remaining,
            auto_activate_on_payment: a.auto_activate_on_payment,
            completed_at: a.completed_at,
            created_at: a.created_at,
        }
    }
}
