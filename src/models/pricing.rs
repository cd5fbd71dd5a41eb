use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::entities::{rule_entity, LessonType};

/// A discount ratio inside a volume-discount table. Persisted as a JSON
/// number so the stored column reads `{"4": 0.05}`; input tolerates both
/// numbers and decimal strings.
#[derive(Debug, Clone, Copy, PartialEq, ToSchema)]
pub struct DiscountRate(pub Decimal);

impl Serialize for DiscountRate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self.0.to_f64() {
            Some(rate) => serializer.serialize_f64(rate),
            None => Err(serde::ser::Error::custom("discount rate out of range")),
        }
    }
}

impl<'de> Deserialize<'de> for DiscountRate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        <Decimal as Deserialize>::deserialize(deserializer).map(DiscountRate)
    }
}

/// Volume-discount table as persisted: stringified hour threshold -> ratio,
/// e.g. `{"4": 0.05, "8": 0.10}`.
pub type VolumeDiscounts = BTreeMap<String, DiscountRate>;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResolvePriceRequest {
    pub lesson_type: LessonType,
    pub subject: String,
    pub duration_hours: Decimal,
    pub tutor_id: i64,
}

/// Full breakdown of one resolved calculation. Every intermediate amount is
/// carried so the caller (and the audit row) can reproduce the math.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PricingResult {
    pub lesson_type: LessonType,
    pub subject: String,
    pub duration_hours: Decimal,
    pub tutor_id: i64,

    pub applied_rule_id: Option<i64>,
    pub applied_rule_name: String,
    pub applied_override_id: Option<i64>,

    pub base_price_per_hour: Decimal,
    pub total_base_price: Decimal,
    pub volume_discount_rate: Decimal,
    pub discount_amount: Decimal,
    pub final_total_price: Decimal,

    pub tutor_share: Decimal,
    pub tutor_earnings: Decimal,
    pub platform_fee: Decimal,

    pub has_override: bool,
    pub has_volume_discount: bool,
    pub calculated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
pub struct PricingRuleQuery {
    pub lesson_type: Option<LessonType>,
    pub subject: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePricingRuleRequest {
    pub name: String,
    pub lesson_type: LessonType,
    pub subject: String,
    #[serde(default = "default_min_duration")]
    pub min_duration_hours: i32,
    pub max_duration_hours: Option<i32>,
    pub base_price_per_hour: Decimal,
    pub tutor_share: Decimal,
    pub volume_discounts: Option<VolumeDiscounts>,
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub description: Option<String>,
}

fn default_min_duration() -> i32 {
    1
}

fn default_priority() -> i32 {
    100
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdatePricingRuleRequest {
    pub base_price_per_hour: Option<Decimal>,
    pub tutor_share: Option<Decimal>,
    pub volume_discounts: Option<VolumeDiscounts>,
    pub min_duration_hours: Option<i32>,
    pub max_duration_hours: Option<i32>,
    pub priority: Option<i32>,
    pub is_active: Option<bool>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PricingRuleResponse {
    pub id: i64,
    pub name: String,
    pub lesson_type: LessonType,
    pub subject: String,
    pub min_duration_hours: i32,
    pub max_duration_hours: Option<i32>,
    pub base_price_per_hour: Decimal,
    pub tutor_share: Decimal,
    pub volume_discounts: Option<VolumeDiscounts>,
    pub priority: i32,
    pub is_active: bool,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<rule_entity::Model> for PricingRuleResponse {
    fn from(rule: rule_entity::Model) -> Self {
        let volume_discounts = rule
            .volume_discounts
            .and_then(|v| serde_json::from_value(v).ok());
        Self {
            id: rule.id,
            name: rule.name,
            lesson_type: rule.lesson_type,
            subject: rule.subject,
            min_duration_hours: rule.min_duration_hours,
            max_duration_hours: rule.max_duration_hours,
            base_price_per_hour: rule.base_price_per_hour,
            tutor_share: rule.tutor_share,
            volume_discounts,
            priority: rule.priority,
            is_active: rule.is_active,
            description: rule.description,
            created_at: rule.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateTutorOverrideRequest {
    pub tutor_id: i64,
    pub pricing_rule_id: i64,
    pub custom_price_per_hour: Option<Decimal>,
    pub custom_tutor_share: Option<Decimal>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TutorOverrideResponse {
    pub id: i64,
    pub tutor_id: i64,
    pub pricing_rule_id: i64,
    pub custom_price_per_hour: Option<Decimal>,
    pub custom_tutor_share: Option<Decimal>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<crate::entities::override_entity::Model> for TutorOverrideResponse {
    fn from(o: crate::entities::override_entity::Model) -> Self {
        Self {
            id: o.id,
            tutor_id: o.tutor_id,
            pricing_rule_id: o.pricing_rule_id,
            custom_price_per_hour: o.custom_price_per_hour,
            custom_tutor_share: o.custom_tutor_share,
            valid_from: o.valid_from,
            valid_until: o.valid_until,
            is_active: o.is_active,
            created_at: o.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_volume_discount_table_accepts_numeric_and_string_rates() {
        let table: VolumeDiscounts = serde_json::from_str(r#"{"4": 0.05, "8": 0.10}"#).unwrap();
        assert_eq!(table.get("4"), Some(&DiscountRate(dec!(0.05))));
        assert_eq!(table.get("8"), Some(&DiscountRate(dec!(0.10))));

        let table: VolumeDiscounts = serde_json::from_str(r#"{"4": "0.05"}"#).unwrap();
        assert_eq!(table.get("4"), Some(&DiscountRate(dec!(0.05))));
    }

    #[test]
    fn test_volume_discount_table_persists_numeric_json() {
        let table: VolumeDiscounts = serde_json::from_str(r#"{"4": 0.05, "8": 0.10}"#).unwrap();
        let persisted = serde_json::to_value(&table).unwrap();
        // Stored column shape stays numeric, not stringified.
        assert_eq!(persisted, serde_json::json!({"4": 0.05, "8": 0.1}));

        let back: VolumeDiscounts = serde_json::from_value(persisted).unwrap();
        assert_eq!(back, table);
    }
}
