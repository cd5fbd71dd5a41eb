use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "lesson_type")]
#[serde(rename_all = "snake_case")]
pub enum LessonType {
    #[sea_orm(string_value = "after_school")]
    AfterSchool,
    #[sea_orm(string_value = "one_to_one")]
    OneToOne,
    #[sea_orm(string_value = "group")]
    Group,
    #[sea_orm(string_value = "online")]
    Online,
}

impl std::fmt::Display for LessonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LessonType::AfterSchool => write!(f, "after_school"),
            LessonType::OneToOne => write!(f, "one_to_one"),
            LessonType::Group => write!(f, "group"),
            LessonType::Online => write!(f, "online"),
        }
    }
}

/// Tariff rule. The (lesson_type, subject, duration band) triple is the
/// lookup key; `priority` breaks overlaps, lower value wins.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "pricing_rules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub lesson_type: LessonType,
    pub subject: String,
    pub min_duration_hours: i32,
    pub max_duration_hours: Option<i32>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub base_price_per_hour: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 4)))")]
    pub tutor_share: Decimal,
    /// Map of stringified hour threshold to discount ratio, e.g.
    /// `{"4": 0.05, "8": 0.10}`. Shape is part of the persisted contract.
    pub volume_discounts: Option<Json>,
    pub priority: i32,
    pub is_active: bool,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
