use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

/// Append-only audit row, one per resolved calculation. Never updated.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "pricing_calculations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub booking_id: Option<i64>,
    pub lesson_type: String,
    pub subject: String,
    #[sea_orm(column_type = "Decimal(Some((6, 2)))")]
    pub duration_hours: Decimal,
    pub tutor_id: i64,
    pub applied_pricing_rule_id: Option<i64>,
    pub applied_override_id: Option<i64>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub base_price_per_hour: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub total_base_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 4)))")]
    pub volume_discount_rate: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub final_total_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub tutor_earnings: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub platform_fee: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 4)))")]
    pub tutor_share_applied: Decimal,
    pub calculated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
