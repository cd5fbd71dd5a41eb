use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

/// Per-tutor replacement for a rule's price and/or tutor share. Fields left
/// NULL fall back to the referenced rule's values at resolution time.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tutor_pricing_overrides")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tutor_id: i64,
    pub pricing_rule_id: i64,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub custom_price_per_hour: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((5, 4)))", nullable)]
    pub custom_tutor_share: Option<Decimal>,
    pub is_active: bool,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pricing_rules::Entity",
        from = "Column::PricingRuleId",
        to = "super::pricing_rules::Column::Id"
    )]
    PricingRule,
}

impl Related<super::pricing_rules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PricingRule.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
