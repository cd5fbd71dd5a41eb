use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set,
};

use crate::entities::{calculation_entity, override_entity, rule_entity, LessonType};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreatePricingRuleRequest, CreateTutorOverrideRequest, PricingResult, PricingRuleResponse,
    TutorOverrideResponse, UpdatePricingRuleRequest, VolumeDiscounts,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct PricingService {
    // Arc so the service stays Clone even when sea-orm's `mock` feature
    // removes Clone from DatabaseConnection in test builds.
    pool: Arc<DatabaseConnection>,
}

impl PricingService {
    pub fn new(pool: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { pool: pool.into() }
    }

    /// Resolve the tariff for one lesson: tutor override first, then the
    /// general rule table, lowest priority value winning. Persists an audit
    /// row when `persist_audit` is set (booking creation does, previews
    /// don't).
    pub async fn resolve_price(
        &self,
        lesson_type: LessonType,
        subject: &str,
        duration_hours: Decimal,
        tutor_id: i64,
        persist_audit: bool,
    ) -> AppResult<PricingResult> {
        self.resolve_price_on(self.pool.as_ref(), lesson_type, subject, duration_hours, tutor_id, persist_audit)
            .await
    }

    /// Same as [`resolve_price`](Self::resolve_price) but running on the
    /// caller's connection, so booking creation can resolve inside its own
    /// transaction.
    pub async fn resolve_price_on<C: ConnectionTrait>(
        &self,
        conn: &C,
        lesson_type: LessonType,
        subject: &str,
        duration_hours: Decimal,
        tutor_id: i64,
        persist_audit: bool,
    ) -> AppResult<PricingResult> {
        if duration_hours <= Decimal::ZERO {
            return Err(AppError::ValidationError(
                "duration_hours must be positive".to_string(),
            ));
        }

        let override_match = self
            .find_tutor_override(conn, tutor_id, &lesson_type, subject, duration_hours)
            .await?;

        let (rule, applied_override) = match override_match {
            Some((o, rule)) => (rule, Some(o)),
            None => {
                let rule = self
                    .find_pricing_rule(conn, &lesson_type, subject, duration_hours)
                    .await?
                    .ok_or_else(|| AppError::NoRuleMatched {
                        lesson_type: lesson_type.to_string(),
                        subject: subject.to_string(),
                        duration_hours,
                    })?;
                (rule, None)
            }
        };

        let base_price_per_hour = applied_override
            .as_ref()
            .and_then(|o| o.custom_price_per_hour)
            .unwrap_or(rule.base_price_per_hour);
        let tutor_share = applied_override
            .as_ref()
            .and_then(|o| o.custom_tutor_share)
            .unwrap_or(rule.tutor_share);

        // Exact multiply, no intermediate rounding.
        let total_base_price = base_price_per_hour * duration_hours;

        let discounts: Option<VolumeDiscounts> = rule
            .volume_discounts
            .as_ref()
            .map(|v| serde_json::from_value(v.clone()))
            .transpose()?;
        let volume_discount_rate = discounts
            .as_ref()
            .map(|t| volume_discount_rate(t, duration_hours))
            .unwrap_or(Decimal::ZERO);

        let discount_amount = total_base_price * volume_discount_rate;
        let final_total_price = round_money(total_base_price - discount_amount);

        let (tutor_earnings, platform_fee) = split_price(final_total_price, tutor_share);

        let result = PricingResult {
            lesson_type,
            subject: subject.to_string(),
            duration_hours,
            tutor_id,
            applied_rule_id: Some(rule.id),
            applied_rule_name: rule.name.clone(),
            applied_override_id: applied_override.as_ref().map(|o| o.id),
            base_price_per_hour,
            total_base_price,
            volume_discount_rate,
            discount_amount,
            final_total_price,
            tutor_share,
            tutor_earnings,
            platform_fee,
            has_override: applied_override.is_some(),
            has_volume_discount: volume_discount_rate > Decimal::ZERO,
            calculated_at: Utc::now(),
        };

        if persist_audit {
            self.log_calculation(conn, &result, None).await?;
        }

        Ok(result)
    }

    /// Append the audit row for a resolved calculation. Rows are immutable.
    pub async fn log_calculation<C: ConnectionTrait>(
        &self,
        conn: &C,
        result: &PricingResult,
        booking_id: Option<i64>,
    ) -> AppResult<()> {
        calculation_entity::ActiveModel {
            booking_id: Set(booking_id),
            lesson_type: Set(result.lesson_type.to_string()),
            subject: Set(result.subject.clone()),
            duration_hours: Set(result.duration_hours),
            tutor_id: Set(result.tutor_id),
            applied_pricing_rule_id: Set(result.applied_rule_id),
            applied_override_id: Set(result.applied_override_id),
            base_price_per_hour: Set(result.base_price_per_hour),
            total_base_price: Set(result.total_base_price),
            volume_discount_rate: Set(result.volume_discount_rate),
            final_total_price: Set(result.final_total_price),
            tutor_earnings: Set(result.tutor_earnings),
            platform_fee: Set(result.platform_fee),
            tutor_share_applied: Set(result.tutor_share),
            calculated_at: Set(result.calculated_at),
            ..Default::default()
        }
        .insert(conn)
        .await?;
        Ok(())
    }

    async fn find_tutor_override<C: ConnectionTrait>(
        &self,
        conn: &C,
        tutor_id: i64,
        lesson_type: &LessonType,
        subject: &str,
        duration_hours: Decimal,
    ) -> AppResult<Option<(override_entity::Model, rule_entity::Model)>> {
        let now = Utc::now();

        let found = override_entity::Entity::find()
            .find_also_related(rule_entity::Entity)
            .filter(override_entity::Column::TutorId.eq(tutor_id))
            .filter(override_entity::Column::IsActive.eq(true))
            .filter(
                Condition::any()
                    .add(override_entity::Column::ValidFrom.is_null())
                    .add(override_entity::Column::ValidFrom.lte(now)),
            )
            .filter(
                Condition::any()
                    .add(override_entity::Column::ValidUntil.is_null())
                    .add(override_entity::Column::ValidUntil.gte(now)),
            )
            .filter(rule_entity::Column::LessonType.eq(lesson_type.clone()))
            .filter(rule_entity::Column::Subject.eq(subject))
            .filter(rule_entity::Column::IsActive.eq(true))
            .filter(rule_entity::Column::MinDurationHours.lte(duration_hours))
            .filter(
                Condition::any()
                    .add(rule_entity::Column::MaxDurationHours.is_null())
                    .add(rule_entity::Column::MaxDurationHours.gte(duration_hours)),
            )
            .order_by_asc(rule_entity::Column::Priority)
            .order_by_asc(override_entity::Column::Id)
            .one(conn)
            .await?;

        // The inner relation is an INNER JOIN through the FK, so the rule is
        // always present when a row comes back.
        Ok(found.and_then(|(o, rule)| rule.map(|r| (o, r))))
    }

    async fn find_pricing_rule<C: ConnectionTrait>(
        &self,
        conn: &C,
        lesson_type: &LessonType,
        subject: &str,
        duration_hours: Decimal,
    ) -> AppResult<Option<rule_entity::Model>> {
        let rule = rule_entity::Entity::find()
            .filter(rule_entity::Column::LessonType.eq(lesson_type.clone()))
            .filter(rule_entity::Column::Subject.eq(subject))
            .filter(rule_entity::Column::IsActive.eq(true))
            .filter(rule_entity::Column::MinDurationHours.lte(duration_hours))
            .filter(
                Condition::any()
                    .add(rule_entity::Column::MaxDurationHours.is_null())
                    .add(rule_entity::Column::MaxDurationHours.gte(duration_hours)),
            )
            .order_by_asc(rule_entity::Column::Priority)
            .order_by_asc(rule_entity::Column::Id)
            .one(conn)
            .await?;
        Ok(rule)
    }

    pub async fn list_rules(
        &self,
        lesson_type: Option<LessonType>,
        subject: Option<String>,
        include_inactive: bool,
    ) -> AppResult<Vec<PricingRuleResponse>> {
        let mut query = rule_entity::Entity::find();
        if let Some(lt) = lesson_type {
            query = query.filter(rule_entity::Column::LessonType.eq(lt));
        }
        if let Some(subject) = subject {
            query = query.filter(rule_entity::Column::Subject.eq(subject));
        }
        if !include_inactive {
            query = query.filter(rule_entity::Column::IsActive.eq(true));
        }
        let rules = query
            .order_by_asc(rule_entity::Column::Priority)
            .order_by_asc(rule_entity::Column::Id)
            .all(self.pool.as_ref())
            .await?;
        Ok(rules.into_iter().map(PricingRuleResponse::from).collect())
    }

    /// Create a tariff rule. Malformed discount tables are rejected here,
    /// never at resolution time.
    pub async fn create_rule(
        &self,
        req: CreatePricingRuleRequest,
    ) -> AppResult<PricingRuleResponse> {
        validate_tutor_share(req.tutor_share)?;
        if req.base_price_per_hour <= Decimal::ZERO {
            return Err(AppError::ValidationError(
                "base_price_per_hour must be positive".to_string(),
            ));
        }
        if let Some(max) = req.max_duration_hours {
            if max < req.min_duration_hours {
                return Err(AppError::ValidationError(
                    "max_duration_hours must be >= min_duration_hours".to_string(),
                ));
            }
        }
        if let Some(table) = &req.volume_discounts {
            validate_volume_discounts(table)?;
        }

        let rule = rule_entity::ActiveModel {
            name: Set(req.name),
            lesson_type: Set(req.lesson_type),
            subject: Set(req.subject),
            min_duration_hours: Set(req.min_duration_hours),
            max_duration_hours: Set(req.max_duration_hours),
            base_price_per_hour: Set(req.base_price_per_hour),
            tutor_share: Set(req.tutor_share),
            volume_discounts: Set(req
                .volume_discounts
                .map(serde_json::to_value)
                .transpose()?),
            priority: Set(req.priority),
            is_active: Set(req.is_active),
            description: Set(req.description),
            ..Default::default()
        }
        .insert(self.pool.as_ref())
        .await?;

        Ok(PricingRuleResponse::from(rule))
    }

    pub async fn update_rule(
        &self,
        rule_id: i64,
        req: UpdatePricingRuleRequest,
    ) -> AppResult<PricingRuleResponse> {
        let rule = rule_entity::Entity::find_by_id(rule_id)
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Pricing rule {rule_id} not found")))?;

        if let Some(share) = req.tutor_share {
            validate_tutor_share(share)?;
        }
        if let Some(table) = &req.volume_discounts {
            validate_volume_discounts(table)?;
        }

        let mut am = rule.into_active_model();
        if let Some(price) = req.base_price_per_hour {
            if price <= Decimal::ZERO {
                return Err(AppError::ValidationError(
                    "base_price_per_hour must be positive".to_string(),
                ));
            }
            am.base_price_per_hour = Set(price);
        }
        if let Some(share) = req.tutor_share {
            am.tutor_share = Set(share);
        }
        if let Some(table) = req.volume_discounts {
            am.volume_discounts = Set(Some(serde_json::to_value(table)?));
        }
        if let Some(min) = req.min_duration_hours {
            am.min_duration_hours = Set(min);
        }
        if req.max_duration_hours.is_some() {
            am.max_duration_hours = Set(req.max_duration_hours);
        }
        if let Some(priority) = req.priority {
            am.priority = Set(priority);
        }
        if let Some(active) = req.is_active {
            am.is_active = Set(active);
        }
        if req.description.is_some() {
            am.description = Set(req.description);
        }
        am.updated_at = Set(Some(Utc::now()));

        let rule = am.update(self.pool.as_ref()).await?;
        Ok(PricingRuleResponse::from(rule))
    }

    pub async fn create_override(
        &self,
        req: CreateTutorOverrideRequest,
    ) -> AppResult<TutorOverrideResponse> {
        if req.custom_price_per_hour.is_none() && req.custom_tutor_share.is_none() {
            return Err(AppError::ValidationError(
                "override must set custom_price_per_hour and/or custom_tutor_share".to_string(),
            ));
        }
        if let Some(share) = req.custom_tutor_share {
            validate_tutor_share(share)?;
        }
        if let Some(price) = req.custom_price_per_hour {
            if price <= Decimal::ZERO {
                return Err(AppError::ValidationError(
                    "custom_price_per_hour must be positive".to_string(),
                ));
            }
        }
        if let (Some(from), Some(until)) = (req.valid_from, req.valid_until) {
            if until <= from {
                return Err(AppError::ValidationError(
                    "valid_until must be after valid_from".to_string(),
                ));
            }
        }

        rule_entity::Entity::find_by_id(req.pricing_rule_id)
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Pricing rule {} not found", req.pricing_rule_id))
            })?;

        let o = override_entity::ActiveModel {
            tutor_id: Set(req.tutor_id),
            pricing_rule_id: Set(req.pricing_rule_id),
            custom_price_per_hour: Set(req.custom_price_per_hour),
            custom_tutor_share: Set(req.custom_tutor_share),
            is_active: Set(req.is_active),
            valid_from: Set(req.valid_from),
            valid_until: Set(req.valid_until),
            notes: Set(req.notes),
            ..Default::default()
        }
        .insert(self.pool.as_ref())
        .await?;

        Ok(TutorOverrideResponse::from(o))
    }
}

/// Round a money amount to 2 decimals, half away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Split a final price into (tutor_earnings, platform_fee). Only the tutor
/// side is rounded; the fee is the exact remainder so the two always sum
/// back to the final price.
pub fn split_price(final_total_price: Decimal, tutor_share: Decimal) -> (Decimal, Decimal) {
    let tutor_earnings = round_money(final_total_price * tutor_share);
    let platform_fee = final_total_price - tutor_earnings;
    (tutor_earnings, platform_fee)
}

/// Pick the discount for the highest threshold not exceeding the duration;
/// zero when no threshold qualifies.
pub fn volume_discount_rate(table: &VolumeDiscounts, duration_hours: Decimal) -> Decimal {
    let mut best: Option<(Decimal, Decimal)> = None;
    for (key, rate) in table {
        let threshold = match key.parse::<Decimal>() {
            Ok(t) => t,
            // Malformed keys are rejected at write time; skip here.
            Err(_) => continue,
        };
        if threshold <= duration_hours {
            match best {
                Some((t, _)) if t >= threshold => {}
                _ => best = Some((threshold, rate.0)),
            }
        }
    }
    best.map(|(_, rate)| rate).unwrap_or(Decimal::ZERO)
}

pub fn validate_tutor_share(share: Decimal) -> AppResult<()> {
    if share < Decimal::ZERO || share > Decimal::ONE {
        return Err(AppError::ValidationError(
            "tutor_share must be between 0 and 1".to_string(),
        ));
    }
    Ok(())
}

/// A discount table maps stringified whole-hour thresholds to ratios in
/// [0, 1). Anything else is refused before it reaches storage.
pub fn validate_volume_discounts(table: &VolumeDiscounts) -> AppResult<()> {
    for (key, rate) in table {
        let threshold: i64 = key.parse().map_err(|_| {
            AppError::ValidationError(format!(
                "volume discount threshold '{key}' is not a whole hour count"
            ))
        })?;
        if threshold < 1 {
            return Err(AppError::ValidationError(format!(
                "volume discount threshold '{key}' must be at least 1"
            )));
        }
        if rate.0 < Decimal::ZERO || rate.0 >= Decimal::ONE {
            return Err(AppError::ValidationError(format!(
                "volume discount rate for threshold '{key}' must be in [0, 1)"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn table(entries: &[(&str, Decimal)]) -> VolumeDiscounts {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), crate::models::DiscountRate(*v)))
            .collect()
    }

    #[test]
    fn test_volume_discount_picks_highest_qualifying_threshold() {
        let t = table(&[("4", dec!(0.05)), ("8", dec!(0.10)), ("12", dec!(0.15))]);
        assert_eq!(volume_discount_rate(&t, dec!(3)), dec!(0));
        assert_eq!(volume_discount_rate(&t, dec!(4)), dec!(0.05));
        assert_eq!(volume_discount_rate(&t, dec!(7.5)), dec!(0.05));
        assert_eq!(volume_discount_rate(&t, dec!(8)), dec!(0.10));
        assert_eq!(volume_discount_rate(&t, dec!(20)), dec!(0.15));
    }

    #[test]
    fn test_volume_discount_empty_table() {
        assert_eq!(volume_discount_rate(&table(&[]), dec!(10)), dec!(0));
    }

    #[test]
    fn test_split_price_sums_back_exactly() {
        // 25.00 at 70%: the canonical example.
        let (earnings, fee) = split_price(dec!(25.00), dec!(0.70));
        assert_eq!(earnings, dec!(17.50));
        assert_eq!(fee, dec!(7.50));

        // Awkward share: fee picks up the rounding remainder.
        let (earnings, fee) = split_price(dec!(33.33), dec!(0.6667));
        assert_eq!(earnings + fee, dec!(33.33));
        assert_eq!(earnings, round_money(dec!(33.33) * dec!(0.6667)));
    }

    #[test]
    fn test_split_price_half_up() {
        // 10.01 * 0.5 = 5.005 -> 5.01 half-up, fee takes the short side.
        let (earnings, fee) = split_price(dec!(10.01), dec!(0.5));
        assert_eq!(earnings, dec!(5.01));
        assert_eq!(fee, dec!(5.00));
    }

    #[test]
    fn test_discounted_example_from_tariff_sheet() {
        // 4h at 25.00/h with a 5% threshold-4 discount.
        let total_base = dec!(25.00) * dec!(4);
        let rate = volume_discount_rate(&table(&[("4", dec!(0.05))]), dec!(4));
        let final_price = round_money(total_base - total_base * rate);
        assert_eq!(final_price, dec!(95.00));
        let (earnings, fee) = split_price(final_price, dec!(0.70));
        assert_eq!(earnings, dec!(66.50));
        assert_eq!(fee, dec!(28.50));
    }

    #[test]
    fn test_validate_volume_discounts() {
        assert!(validate_volume_discounts(&table(&[("4", dec!(0.05))])).is_ok());
        assert!(validate_volume_discounts(&table(&[("abc", dec!(0.05))])).is_err());
        assert!(validate_volume_discounts(&table(&[("0", dec!(0.05))])).is_err());
        assert!(validate_volume_discounts(&table(&[("4", dec!(1.0))])).is_err());
        assert!(validate_volume_discounts(&table(&[("4", dec!(-0.1))])).is_err());
    }

    #[test]
    fn test_validate_tutor_share_bounds() {
        assert!(validate_tutor_share(dec!(0)).is_ok());
        assert!(validate_tutor_share(dec!(0.70)).is_ok());
        assert!(validate_tutor_share(dec!(1)).is_ok());
        assert!(validate_tutor_share(dec!(1.01)).is_err());
        assert!(validate_tutor_share(dec!(-0.01)).is_err());
    }
}
