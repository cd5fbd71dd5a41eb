use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

/// A student-purchased hour package. hours_used/hours_remaining are written
/// only by the ledger service; hours_remaining never goes negative and the
/// purchase deactivates when it reaches zero.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "package_purchases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub package_id: i64,
    #[sea_orm(column_type = "Decimal(Some((6, 2)))")]
    pub hours_used: Decimal,
    #[sea_orm(column_type = "Decimal(Some((6, 2)))")]
    pub hours_remaining: Decimal,
    pub is_active: bool,
    pub expiry_date: Option<NaiveDate>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::packages::Entity",
        from = "Column::PackageId",
        to = "super::packages::Column::Id"
    )]
    Package,
}

impl Related<super::packages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Package.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
