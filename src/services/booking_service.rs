use chrono::{DateTime, Timelike, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QuerySelect, Set, TransactionTrait,
};

use crate::entities::{
    booking_entity, package_entity, purchase_entity, slot_entity, BookingStatus, LessonType,
};
use crate::error::{AppError, AppResult};
use crate::models::{BookingResponse, CreateBookingRequest, PricingResult};
use crate::services::{LedgerService, PricingService};
use crate::utils::{band_hours, billable_hours};
use std::sync::Arc;

#[derive(Clone)]
pub struct BookingService {
    // Arc so the service stays Clone even when sea-orm's `mock` feature
    // removes Clone from DatabaseConnection in test builds.
    pool: Arc<DatabaseConnection>,
    pricing_service: PricingService,
    ledger_service: LedgerService,
}

impl BookingService {
    pub fn new(
        pool: impl Into<Arc<DatabaseConnection>>,
        pricing_service: PricingService,
        ledger_service: LedgerService,
    ) -> Self {
        Self {
            pool: pool.into(),
            pricing_service,
            ledger_service,
        }
    }

    /// Create a booking: validate, price, persist and debit the ledger, all
    /// inside one transaction so a conflicting writer cannot slip between
    /// the availability check and the insert.
    pub async fn create_booking(&self, req: CreateBookingRequest) -> AppResult<BookingResponse> {
        let duration = billable_hours(req.start_time, req.end_time)?;

        let txn = self.pool.begin().await?;

        let purchase = purchase_entity::Entity::find_by_id(req.package_purchase_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Package purchase {} not found",
                    req.package_purchase_id
                ))
            })?;

        if purchase.hours_remaining < duration {
            return Err(AppError::InsufficientPackageHours {
                remaining: purchase.hours_remaining,
                requested: duration,
            });
        }

        if !self
            .is_slot_available(&txn, req.tutor_id, req.start_time, req.end_time)
            .await?
        {
            return Err(AppError::SlotUnavailable {
                tutor_id: req.tutor_id,
            });
        }

        let package = package_entity::Entity::find_by_id(purchase.package_id)
            .one(&txn)
            .await?;
        let lesson_type = infer_lesson_type(
            req.lesson_type.clone(),
            package.as_ref().map(|p| p.name.as_str()),
            req.start_time,
        );

        let pricing = match self
            .pricing_service
            .resolve_price_on(
                &txn,
                lesson_type.clone(),
                &req.subject,
                duration,
                req.tutor_id,
                false,
            )
            .await
        {
            Ok(result) => result,
            Err(AppError::NoRuleMatched { .. }) | Err(AppError::ValidationError(_)) => {
                // Availability over precision: an unconfigured tariff must
                // not block the booking. The fallback is marked in the
                // persisted record.
                log::warn!(
                    "Pricing resolution failed for tutor {} ({} / {} / {}h), using fallback rates",
                    req.tutor_id,
                    lesson_type,
                    req.subject,
                    duration
                );
                fallback_pricing(
                    lesson_type.clone(),
                    &req.subject,
                    duration,
                    req.tutor_id,
                )
            }
            Err(e) => return Err(e),
        };

        let booking = booking_entity::ActiveModel {
            student_id: Set(req.student_id),
            tutor_id: Set(req.tutor_id),
            package_purchase_id: Set(req.package_purchase_id),
            start_time: Set(req.start_time),
            end_time: Set(req.end_time),
            subject: Set(req.subject.clone()),
            notes: Set(req.notes),
            status: Set(BookingStatus::Pending),
            calculated_duration: Set(Some(duration)),
            calculated_price: Set(Some(pricing.final_total_price)),
            tutor_earnings: Set(Some(pricing.tutor_earnings)),
            platform_fee: Set(Some(pricing.platform_fee)),
            pricing_rule_applied: Set(Some(pricing.applied_rule_name.clone())),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        // Audit only resolved calculations; fallback prices have no rule to
        // reference and are identifiable by their applied-rule name.
        if pricing.applied_rule_id.is_some() {
            self.pricing_service
                .log_calculation(&txn, &pricing, Some(booking.id))
                .await?;
        }

        self.ledger_service
            .debit(&txn, req.package_purchase_id, req.tutor_id, duration)
            .await?;

        txn.commit().await?;

        log::info!(
            "Booking {} created: {}h of {} for student {} with tutor {} ({})",
            booking.id,
            duration,
            booking.subject,
            booking.student_id,
            booking.tutor_id,
            pricing.applied_rule_name
        );

        Ok(BookingResponse::from(booking))
    }

    /// Cancel a booking, refunding hours per the time-to-lesson policy.
    /// The booking is cancelled even when nothing is refundable.
    pub async fn cancel_booking(&self, booking_id: i64) -> AppResult<BookingResponse> {
        let txn = self.pool.begin().await?;

        let booking = booking_entity::Entity::find_by_id(booking_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {booking_id} not found")))?;

        if matches!(
            booking.status,
            BookingStatus::Completed | BookingStatus::Cancelled
        ) {
            return Err(AppError::BookingNotCancellable(booking_id));
        }

        let consumed = match booking.calculated_duration {
            Some(d) => d,
            None => billable_hours(booking.start_time, booking.end_time)?,
        };
        let ratio = refund_ratio(Utc::now(), booking.start_time);
        // Fractional refunds are intentionally truncated to whole hours.
        let refund_hours = (consumed * ratio).trunc();

        if refund_hours > Decimal::ZERO {
            self.ledger_service
                .credit(&txn, booking.package_purchase_id, refund_hours)
                .await?;
            log::info!("Booking {booking_id} cancelled, {refund_hours}h refunded to purchase");
        } else {
            log::info!("Booking {booking_id} cancelled, no hours refundable");
        }

        let mut am = booking.into_active_model();
        am.status = Set(BookingStatus::Cancelled);
        am.updated_at = Set(Some(Utc::now()));
        let booking = am.update(&txn).await?;

        txn.commit().await?;

        Ok(BookingResponse::from(booking))
    }

    pub async fn confirm_booking(&self, booking_id: i64) -> AppResult<BookingResponse> {
        let booking = booking_entity::Entity::find_by_id(booking_id)
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {booking_id} not found")))?;

        if booking.status != BookingStatus::Pending {
            return Err(AppError::ValidationError(format!(
                "Booking {booking_id} is {}, only pending bookings can be confirmed",
                booking.status
            )));
        }

        let mut am = booking.into_active_model();
        am.status = Set(BookingStatus::Confirmed);
        am.updated_at = Set(Some(Utc::now()));
        let booking = am.update(self.pool.as_ref()).await?;

        Ok(BookingResponse::from(booking))
    }

    /// Complete a booking. When an actual duration is reported it may only
    /// refresh the pricing: hours were consumed at creation, so an
    /// adjustment whose banded hours differ from the consumed hours is
    /// rejected instead of silently drifting the ledger.
    pub async fn complete_booking(
        &self,
        booking_id: i64,
        actual_duration_hours: Option<Decimal>,
    ) -> AppResult<BookingResponse> {
        let txn = self.pool.begin().await?;

        let booking = booking_entity::Entity::find_by_id(booking_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {booking_id} not found")))?;

        if matches!(
            booking.status,
            BookingStatus::Completed | BookingStatus::Cancelled
        ) {
            return Err(AppError::ValidationError(format!(
                "Booking {booking_id} is {}, cannot complete",
                booking.status
            )));
        }

        let mut am = booking.clone().into_active_model();

        if let Some(actual) = actual_duration_hours {
            let banded = band_hours(actual)?;
            let consumed = match booking.calculated_duration {
                Some(d) => d,
                None => billable_hours(booking.start_time, booking.end_time)?,
            };
            if banded != consumed {
                return Err(AppError::DurationAdjustmentRejected {
                    consumed,
                    requested: banded,
                });
            }

            let purchase = purchase_entity::Entity::find_by_id(booking.package_purchase_id)
                .one(&txn)
                .await?;
            let package = match &purchase {
                Some(p) => {
                    package_entity::Entity::find_by_id(p.package_id)
                        .one(&txn)
                        .await?
                }
                None => None,
            };
            let lesson_type = infer_lesson_type(
                None,
                package.as_ref().map(|p| p.name.as_str()),
                booking.start_time,
            );

            let pricing = match self
                .pricing_service
                .resolve_price_on(&txn, lesson_type.clone(), &booking.subject, banded, booking.tutor_id, false)
                .await
            {
                Ok(result) => result,
                Err(AppError::NoRuleMatched { .. }) => {
                    fallback_pricing(lesson_type, &booking.subject, banded, booking.tutor_id)
                }
                Err(e) => return Err(e),
            };

            log::info!(
                "Booking {booking_id} completed with recomputed pricing: {} -> {} ({})",
                booking.calculated_price.unwrap_or(Decimal::ZERO),
                pricing.final_total_price,
                pricing.applied_rule_name
            );

            if pricing.applied_rule_id.is_some() {
                self.pricing_service
                    .log_calculation(&txn, &pricing, Some(booking_id))
                    .await?;
            }

            am.calculated_price = Set(Some(pricing.final_total_price));
            am.tutor_earnings = Set(Some(pricing.tutor_earnings));
            am.platform_fee = Set(Some(pricing.platform_fee));
            am.pricing_rule_applied = Set(Some(pricing.applied_rule_name));
        }

        am.status = Set(BookingStatus::Completed);
        am.updated_at = Set(Some(Utc::now()));
        let booking = am.update(&txn).await?;

        txn.commit().await?;

        Ok(BookingResponse::from(booking))
    }

    /// A slot is available when the tutor has an open calendar slot
    /// covering the window and no pending/confirmed booking overlaps it.
    async fn is_slot_available<C: ConnectionTrait>(
        &self,
        conn: &C,
        tutor_id: i64,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> AppResult<bool> {
        let overlapping = booking_entity::Entity::find()
            .filter(booking_entity::Column::TutorId.eq(tutor_id))
            .filter(
                Condition::any()
                    .add(booking_entity::Column::Status.eq(BookingStatus::Pending))
                    .add(booking_entity::Column::Status.eq(BookingStatus::Confirmed)),
            )
            .filter(booking_entity::Column::StartTime.lt(end_time))
            .filter(booking_entity::Column::EndTime.gt(start_time))
            .one(conn)
            .await?;

        if overlapping.is_some() {
            return Ok(false);
        }

        let slot = slot_entity::Entity::find()
            .filter(slot_entity::Column::TutorId.eq(tutor_id))
            .filter(slot_entity::Column::Date.eq(start_time.date_naive()))
            .filter(slot_entity::Column::StartTime.lte(start_time.time()))
            .filter(slot_entity::Column::EndTime.gte(end_time.time()))
            .filter(slot_entity::Column::IsAvailable.eq(true))
            .one(conn)
            .await?;

        Ok(slot.is_some())
    }
}

/// Refund ratio by time to lesson: more than 24h ahead refunds fully,
/// 2-24h half, anything closer nothing.
pub fn refund_ratio(now: DateTime<Utc>, lesson_start: DateTime<Utc>) -> Decimal {
    let hours_until = Decimal::from((lesson_start - now).num_seconds()) / Decimal::from(3600);
    if hours_until > dec!(24) {
        Decimal::ONE
    } else if hours_until > dec!(2) {
        dec!(0.5)
    } else {
        Decimal::ZERO
    }
}

/// Best-effort lesson-type inference when the caller supplies none: the
/// purchased package's category name wins, then a time-of-day heuristic.
pub fn infer_lesson_type(
    explicit: Option<LessonType>,
    package_name: Option<&str>,
    start_time: DateTime<Utc>,
) -> LessonType {
    if let Some(lesson_type) = explicit {
        return lesson_type;
    }

    if let Some(name) = package_name {
        let name = name.to_uppercase();
        if name.contains("ONE-TO-ONE") || name.contains("ONE TO ONE") {
            return LessonType::OneToOne;
        }
        if name.contains("GROUP") {
            return LessonType::Group;
        }
        if name.contains("ONLINE") {
            return LessonType::Online;
        }
        if name.contains("AFTER-SCHOOL") || name.contains("AFTER SCHOOL") {
            return LessonType::AfterSchool;
        }
    }

    match start_time.hour() {
        14..=19 => LessonType::AfterSchool,
        8..=13 => LessonType::OneToOne,
        _ => LessonType::AfterSchool,
    }
}

/// Fixed rate table used when no tariff rule resolves. 70% tutor share,
/// applied-rule name marked so the record is recognizably a fallback.
pub fn fallback_pricing(
    lesson_type: LessonType,
    subject: &str,
    duration_hours: Decimal,
    tutor_id: i64,
) -> PricingResult {
    let base_price_per_hour = match lesson_type {
        LessonType::AfterSchool => dec!(25.00),
        LessonType::OneToOne => dec!(35.00),
        LessonType::Group => dec!(18.00),
        LessonType::Online => dec!(30.00),
    };
    let tutor_share = dec!(0.70);

    let total_base_price = base_price_per_hour * duration_hours;
    let final_total_price = crate::services::pricing_service::round_money(total_base_price);
    let (tutor_earnings, platform_fee) =
        crate::services::pricing_service::split_price(final_total_price, tutor_share);

    let rule_name = format!("FALLBACK_{}", lesson_type.to_string().to_uppercase());

    PricingResult {
        lesson_type,
        subject: subject.to_string(),
        duration_hours,
        tutor_id,
        applied_rule_id: None,
        applied_rule_name: rule_name,
        applied_override_id: None,
        base_price_per_hour,
        total_base_price,
        volume_discount_rate: Decimal::ZERO,
        discount_amount: Decimal::ZERO,
        final_total_price,
        tutor_share,
        tutor_earnings,
        platform_fee,
        has_override: false,
        has_volume_discount: false,
        calculated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_refund_ratio_bands() {
        let start = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let full = start - chrono::Duration::hours(25);
        let half = start - chrono::Duration::hours(12);
        let edge_24 = start - chrono::Duration::hours(24);
        let edge_2 = start - chrono::Duration::hours(2);
        let late = start - chrono::Duration::minutes(30);

        assert_eq!(refund_ratio(full, start), dec!(1));
        assert_eq!(refund_ratio(half, start), dec!(0.5));
        // Exactly 24h is inside the 50% band, exactly 2h inside the 0% band.
        assert_eq!(refund_ratio(edge_24, start), dec!(0.5));
        assert_eq!(refund_ratio(edge_2, start), dec!(0));
        assert_eq!(refund_ratio(late, start), dec!(0));
    }

    #[test]
    fn test_infer_lesson_type_explicit_wins() {
        let start = Utc.with_ymd_and_hms(2025, 3, 10, 15, 0, 0).unwrap();
        assert_eq!(
            infer_lesson_type(Some(LessonType::Group), Some("ONLINE MATH PACK"), start),
            LessonType::Group
        );
    }

    #[test]
    fn test_infer_lesson_type_from_package_name() {
        let start = Utc.with_ymd_and_hms(2025, 3, 10, 15, 0, 0).unwrap();
        assert_eq!(
            infer_lesson_type(None, Some("One-to-One English 10h"), start),
            LessonType::OneToOne
        );
        assert_eq!(
            infer_lesson_type(None, Some("Group Science"), start),
            LessonType::Group
        );
        assert_eq!(
            infer_lesson_type(None, Some("Online Tutoring"), start),
            LessonType::Online
        );
    }

    #[test]
    fn test_infer_lesson_type_time_of_day() {
        let afternoon = Utc.with_ymd_and_hms(2025, 3, 10, 15, 0, 0).unwrap();
        let morning = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2025, 3, 10, 21, 0, 0).unwrap();
        assert_eq!(
            infer_lesson_type(None, None, afternoon),
            LessonType::AfterSchool
        );
        assert_eq!(infer_lesson_type(None, None, morning), LessonType::OneToOne);
        assert_eq!(
            infer_lesson_type(None, None, evening),
            LessonType::AfterSchool
        );
    }

    #[test]
    fn test_fallback_pricing_split() {
        let result = fallback_pricing(LessonType::OneToOne, "Math", dec!(2), 7);
        assert_eq!(result.final_total_price, dec!(70.00));
        assert_eq!(result.tutor_earnings, dec!(49.00));
        assert_eq!(result.platform_fee, dec!(21.00));
        assert_eq!(result.applied_rule_name, "FALLBACK_ONE_TO_ONE");
        assert_eq!(
            result.tutor_earnings + result.platform_fee,
            result.final_total_price
        );
    }
}
