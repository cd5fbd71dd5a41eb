use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QuerySelect, Set, SqlErr, TransactionTrait,
};

use crate::entities::{
    assignment_entity, package_entity, payment_entity, AssignmentStatus, PaymentStatus,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    AssignmentResponse, CreateAssignmentRequest, PaymentResponse, RecordPaymentRequest,
};
use std::sync::Arc;

/// Settlement of offline payments: recording, exactly-once confirmation,
/// and activation of the paid-for assignment.
#[derive(Clone)]
pub struct PaymentService {
    // Arc so the service stays Clone even when sea-orm's `mock` feature
    // removes Clone from DatabaseConnection in test builds.
    pool: Arc<DatabaseConnection>,
}

impl PaymentService {
    pub fn new(pool: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { pool: pool.into() }
    }

    /// Admin creates an hour grant for a student/tutor/package triple. It
    /// stays in `assigned` until a payment confirmation activates it.
    pub async fn create_assignment(
        &self,
        req: CreateAssignmentRequest,
    ) -> AppResult<AssignmentResponse> {
        let package = package_entity::Entity::find_by_id(req.package_id)
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Package {} not found", req.package_id)))?;

        let total_hours = req.custom_total_hours.unwrap_or(package.total_hours);
        if total_hours <= 0 {
            return Err(AppError::ValidationError(
                "assignment must grant at least one hour".to_string(),
            ));
        }

        let assignment = assignment_entity::ActiveModel {
            student_id: Set(req.student_id),
            tutor_id: Set(req.tutor_id),
            package_id: Set(req.package_id),
            assigned_by_admin_id: Set(req.assigned_by_admin_id),
            custom_total_hours: Set(req.custom_total_hours),
            custom_price: Set(req.custom_price),
            custom_expiry_date: Set(req.custom_expiry_date),
            status: Set(AssignmentStatus::Assigned),
            hours_used: Set(Decimal::ZERO),
            hours_remaining: Set(Decimal::from(total_hours)),
            auto_activate_on_payment: Set(req.auto_activate_on_payment),
            admin_notes: Set(req.admin_notes),
            ..Default::default()
        }
        .insert(self.pool.as_ref())
        .await?;

        Ok(AssignmentResponse::from(assignment))
    }

    /// Record an offline payment against an assignment, in `pending` until
    /// an admin confirms it.
    pub async fn record_payment(&self, req: RecordPaymentRequest) -> AppResult<PaymentResponse> {
        assignment_entity::Entity::find_by_id(req.package_assignment_id)
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Package assignment {} not found",
                    req.package_assignment_id
                ))
            })?;

        let reference = req.reference_number.clone();
        let insert_result = payment_entity::ActiveModel {
            package_assignment_id: Set(req.package_assignment_id),
            student_id: Set(req.student_id),
            processed_by_admin_id: Set(req.admin_id),
            amount: Set(req.amount),
            payment_method: Set(req.payment_method),
            payment_date: Set(req.payment_date),
            status: Set(PaymentStatus::Pending),
            reference_number: Set(req.reference_number),
            ..Default::default()
        }
        .insert(self.pool.as_ref())
        .await;

        match insert_result {
            Ok(payment) => Ok(PaymentResponse::from(payment)),
            Err(e) => match self.resolve_reference_conflict(&e, reference.as_deref()).await? {
                Some(existing) => Ok(existing),
                None => Err(e.into()),
            },
        }
    }

    /// Confirm a payment exactly once. Idempotent on re-confirmation,
    /// short-circuits on a duplicate reference, and resolves a losing
    /// commit race by returning the winner's record.
    pub async fn confirm_payment(&self, payment_id: i64, admin_id: i64) -> AppResult<PaymentResponse> {
        let txn = self.pool.begin().await?;

        let payment = payment_entity::Entity::find_by_id(payment_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(AppError::PaymentNotFound(payment_id))?;

        // Idempotency: a completed payment is returned unchanged.
        if payment.status == PaymentStatus::Completed {
            return Ok(PaymentResponse::from(payment));
        }

        // A duplicate submission may already have been settled under the
        // same reference; return that record instead of completing twice.
        if let Some(reference) = payment.reference_number.as_deref() {
            if let Some(existing) = self.find_completed_by_reference(&txn, reference).await? {
                log::warn!(
                    "Payment {payment_id} shares reference '{reference}' with completed payment {}, returning the settled record",
                    existing.id
                );
                return Ok(PaymentResponse::from(existing));
            }
        }

        let assignment = assignment_entity::Entity::find_by_id(payment.package_assignment_id)
            .lock_exclusive()
            .one(&txn)
            .await?;

        let reference = payment.reference_number.clone();

        let mut am = payment.into_active_model();
        am.status = Set(PaymentStatus::Completed);
        am.confirmation_date = Set(Some(Utc::now()));
        am.confirmed_by_admin_id = Set(Some(admin_id));
        am.updated_at = Set(Some(Utc::now()));
        let updated = match am.update(&txn).await {
            Ok(p) => p,
            Err(e) => {
                // A concurrent confirmation of a same-reference payment won
                // the partial unique index; re-resolve once, never loop.
                drop(txn);
                return match self.resolve_reference_conflict(&e, reference.as_deref()).await? {
                    Some(existing) => Ok(existing),
                    None => Err(e.into()),
                };
            }
        };

        if let Some(assignment) = assignment {
            if assignment.auto_activate_on_payment && assignment.status != AssignmentStatus::Active
            {
                let assignment_id = assignment.id;
                let mut am = assignment.into_active_model();
                am.status = Set(AssignmentStatus::Active);
                am.updated_at = Set(Some(Utc::now()));
                am.update(&txn).await?;
                log::info!(
                    "Assignment {assignment_id} activated by confirmation of payment {payment_id}"
                );
            }
        }

        txn.commit().await?;

        log::info!("Payment {payment_id} confirmed by admin {admin_id}");

        Ok(PaymentResponse::from(updated))
    }

    async fn find_completed_by_reference(
        &self,
        txn: &DatabaseTransaction,
        reference: &str,
    ) -> AppResult<Option<payment_entity::Model>> {
        let found = payment_entity::Entity::find()
            .filter(payment_entity::Column::ReferenceNumber.eq(reference))
            .filter(payment_entity::Column::Status.eq(PaymentStatus::Completed))
            .one(txn)
            .await?;
        Ok(found)
    }

    /// When a write lost a unique-constraint race on the reference number,
    /// the completed payment it collided with is the answer the caller
    /// wants. Any other error stays an error.
    async fn resolve_reference_conflict(
        &self,
        err: &DbErr,
        reference: Option<&str>,
    ) -> AppResult<Option<PaymentResponse>> {
        if !matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
            return Ok(None);
        }
        let Some(reference) = reference else {
            return Ok(None);
        };

        let existing = payment_entity::Entity::find()
            .filter(payment_entity::Column::ReferenceNumber.eq(reference))
            .filter(payment_entity::Column::Status.eq(PaymentStatus::Completed))
            .one(self.pool.as_ref())
            .await?;

        Ok(existing.map(PaymentResponse::from))
    }
}
