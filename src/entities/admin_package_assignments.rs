use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "package_assignment_status"
)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "assigned")]
    Assigned,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "suspended")]
    Suspended,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentStatus::Draft => write!(f, "draft"),
            AssignmentStatus::Assigned => write!(f, "assigned"),
            AssignmentStatus::Active => write!(f, "active"),
            AssignmentStatus::Suspended => write!(f, "suspended"),
            AssignmentStatus::Completed => write!(f, "completed"),
            AssignmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Admin-created hour grant, parallel to a student purchase. Correlated to
/// bookings by the (student_id, tutor_id, package_id) business key, not by
/// foreign key.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "admin_package_assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub tutor_id: i64,
    pub package_id: i64,
    pub assigned_by_admin_id: i64,
    pub custom_total_hours: Option<i32>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub custom_price: Option<Decimal>,
    pub custom_expiry_date: Option<NaiveDate>,
    pub status: AssignmentStatus,
    #[sea_orm(column_type = "Decimal(Some((6, 2)))")]
    pub hours_used: Decimal,
    #[sea_orm(column_type = "Decimal(Some((6, 2)))")]
    pub hours_remaining: Decimal,
    pub auto_activate_on_payment: bool,
    pub admin_notes: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
