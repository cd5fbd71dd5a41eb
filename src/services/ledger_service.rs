use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QuerySelect, Set,
};

use crate::entities::{assignment_entity, purchase_entity, AssignmentStatus};
use crate::error::{AppError, AppResult};

/// Single legal write path for package hour balances. Debit and credit run
/// on the caller's transaction so balance changes commit or roll back with
/// the booking state they belong to.
#[derive(Clone)]
pub struct LedgerService;

impl LedgerService {
    pub fn new() -> Self {
        Self
    }

    /// Consume hours from a purchase, and from the admin assignment
    /// correlated by (student, tutor, package) when one is active. Fails
    /// without writing when the purchase balance is short.
    pub async fn debit<C: ConnectionTrait>(
        &self,
        conn: &C,
        purchase_id: i64,
        tutor_id: i64,
        hours: Decimal,
    ) -> AppResult<purchase_entity::Model> {
        let purchase = purchase_entity::Entity::find_by_id(purchase_id)
            .lock_exclusive()
            .one(conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Package purchase {purchase_id} not found")))?;

        let (new_used, new_remaining) =
            debit_balances(purchase.hours_used, purchase.hours_remaining, hours)?;

        let student_id = purchase.student_id;
        let package_id = purchase.package_id;

        let mut am = purchase.into_active_model();
        am.hours_used = Set(new_used);
        am.hours_remaining = Set(new_remaining);
        if new_remaining <= Decimal::ZERO {
            am.is_active = Set(false);
        }
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(conn).await?;

        self.debit_assignment(conn, student_id, tutor_id, package_id, hours)
            .await?;

        Ok(updated)
    }

    /// Return hours to a purchase after a refund. hours_used floors at
    /// zero; a drained purchase reactivates when its balance recovers.
    pub async fn credit<C: ConnectionTrait>(
        &self,
        conn: &C,
        purchase_id: i64,
        hours: Decimal,
    ) -> AppResult<purchase_entity::Model> {
        let purchase = purchase_entity::Entity::find_by_id(purchase_id)
            .lock_exclusive()
            .one(conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Package purchase {purchase_id} not found")))?;

        let (new_used, new_remaining) =
            credit_balances(purchase.hours_used, purchase.hours_remaining, hours);
        let was_active = purchase.is_active;

        let mut am = purchase.into_active_model();
        am.hours_used = Set(new_used);
        am.hours_remaining = Set(new_remaining);
        if !was_active && new_remaining > Decimal::ZERO {
            am.is_active = Set(true);
        }
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(conn).await?;

        Ok(updated)
    }

    /// Lookup-then-update on the business key, inside the same transaction
    /// as the purchase debit. No cascade: the parallel assignment is an
    /// implicit join and stays auditable as an explicit step.
    async fn debit_assignment<C: ConnectionTrait>(
        &self,
        conn: &C,
        student_id: i64,
        tutor_id: i64,
        package_id: i64,
        hours: Decimal,
    ) -> AppResult<()> {
        let assignment = assignment_entity::Entity::find()
            .filter(assignment_entity::Column::StudentId.eq(student_id))
            .filter(assignment_entity::Column::TutorId.eq(tutor_id))
            .filter(assignment_entity::Column::PackageId.eq(package_id))
            .filter(assignment_entity::Column::Status.eq(AssignmentStatus::Active))
            .lock_exclusive()
            .one(conn)
            .await?;

        let Some(assignment) = assignment else {
            return Ok(());
        };

        let new_remaining = (assignment.hours_remaining - hours).max(Decimal::ZERO);
        let drained = new_remaining <= Decimal::ZERO;

        let mut am = assignment.clone().into_active_model();
        am.hours_used = Set(assignment.hours_used + hours);
        am.hours_remaining = Set(new_remaining);
        if drained {
            am.status = Set(AssignmentStatus::Completed);
            am.completed_at = Set(Some(Utc::now()));
        }
        am.updated_at = Set(Some(Utc::now()));
        am.update(conn).await?;

        if drained {
            log::info!(
                "Admin assignment for student {student_id} / tutor {tutor_id} / package {package_id} drained, marked completed"
            );
        }

        Ok(())
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}

/// Debit arithmetic: moves hours from remaining to used, refusing to
/// overdraw. used + remaining is invariant across the move.
pub fn debit_balances(
    used: Decimal,
    remaining: Decimal,
    hours: Decimal,
) -> AppResult<(Decimal, Decimal)> {
    if remaining < hours {
        return Err(AppError::InsufficientPackageHours {
            remaining,
            requested: hours,
        });
    }
    Ok((used + hours, remaining - hours))
}

/// Credit arithmetic: returns hours to remaining, flooring used at zero.
pub fn credit_balances(used: Decimal, remaining: Decimal, hours: Decimal) -> (Decimal, Decimal) {
    ((used - hours).max(Decimal::ZERO), remaining + hours)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_debit_conserves_total_hours() {
        let (used, remaining) = debit_balances(dec!(2), dec!(8), dec!(3)).unwrap();
        assert_eq!(used, dec!(5));
        assert_eq!(remaining, dec!(5));
        assert_eq!(used + remaining, dec!(2) + dec!(8));
    }

    #[test]
    fn test_debit_refuses_overdraw() {
        let err = debit_balances(dec!(8.5), dec!(1.5), dec!(2)).unwrap_err();
        assert!(matches!(
            err,
            AppError::InsufficientPackageHours {
                remaining,
                requested,
            } if remaining == dec!(1.5) && requested == dec!(2)
        ));
    }

    #[test]
    fn test_debit_can_drain_to_exactly_zero() {
        let (used, remaining) = debit_balances(dec!(8), dec!(2), dec!(2)).unwrap();
        assert_eq!(used, dec!(10));
        assert_eq!(remaining, dec!(0));
    }

    #[test]
    fn test_credit_conserves_total_hours() {
        let (used, remaining) = credit_balances(dec!(5), dec!(5), dec!(2));
        assert_eq!(used, dec!(3));
        assert_eq!(remaining, dec!(7));
        assert_eq!(used + remaining, dec!(5) + dec!(5));
    }

    #[test]
    fn test_credit_floors_used_at_zero() {
        let (used, remaining) = credit_balances(dec!(1), dec!(0), dec!(2));
        assert_eq!(used, dec!(0));
        assert_eq!(remaining, dec!(2));
    }

    #[test]
    fn test_debit_then_credit_restores_balances() {
        let (used, remaining) = debit_balances(dec!(2), dec!(8), dec!(3)).unwrap();
        let (used, remaining) = credit_balances(used, remaining, dec!(3));
        assert_eq!((used, remaining), (dec!(2), dec!(8)));
    }
}
