use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_status")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Completed => write!(f, "completed"),
            PaymentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "check")]
    Check,
    #[sea_orm(string_value = "card_offline")]
    CardOffline,
    #[sea_orm(string_value = "other")]
    Other,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::BankTransfer => write!(f, "bank_transfer"),
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Check => write!(f, "check"),
            PaymentMethod::CardOffline => write!(f, "card_offline"),
            PaymentMethod::Other => write!(f, "other"),
        }
    }
}

/// Offline payment recorded against a package assignment. The database
/// enforces at most one completed payment per non-null reference number via
/// a partial unique index.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "admin_payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub package_assignment_id: i64,
    pub student_id: i64,
    pub processed_by_admin_id: i64,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_date: Option<NaiveDate>,
    pub status: PaymentStatus,
    pub reference_number: Option<String>,
    pub confirmed_by_admin_id: Option<i64>,
    pub confirmation_date: Option<DateTime<Utc>>,
    pub admin_notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::admin_package_assignments::Entity",
        from = "Column::PackageAssignmentId",
        to = "super::admin_package_assignments::Column::Id"
    )]
    PackageAssignment,
}

impl Related<super::admin_package_assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PackageAssignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
