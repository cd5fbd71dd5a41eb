use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase};

use tutorhub_backend::entities::{assignment_entity, purchase_entity, AssignmentStatus};
use tutorhub_backend::error::AppError;
use tutorhub_backend::services::LedgerService;

fn purchase(used: Decimal, remaining: Decimal, is_active: bool) -> purchase_entity::Model {
    purchase_entity::Model {
        id: 1,
        student_id: 10,
        package_id: 3,
        hours_used: used,
        hours_remaining: remaining,
        is_active,
        expiry_date: None,
        created_at: Some(Utc::now()),
        updated_at: None,
    }
}

fn active_assignment(remaining: Decimal) -> assignment_entity::Model {
    assignment_entity::Model {
        id: 1,
        student_id: 10,
        tutor_id: 20,
        package_id: 3,
        assigned_by_admin_id: 5,
        custom_total_hours: None,
        custom_price: None,
        custom_expiry_date: None,
        status: AssignmentStatus::Active,
        hours_used: dec!(10) - remaining,
        hours_remaining: remaining,
        auto_activate_on_payment: true,
        admin_notes: None,
        completed_at: None,
        created_at: Some(Utc::now()),
        updated_at: None,
    }
}

#[tokio::test]
async fn debit_refuses_overdraw_before_any_write() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![purchase(dec!(8.5), dec!(1.5), true)]])
        .into_connection();

    let ledger = LedgerService::new();
    let err = ledger.debit(&db, 1, 20, dec!(2)).await.unwrap_err();

    assert!(matches!(
        err,
        AppError::InsufficientPackageHours {
            remaining,
            requested,
        } if remaining == dec!(1.5) && requested == dec!(2)
    ));
}

#[tokio::test]
async fn debit_updates_purchase_and_matching_active_assignment() {
    let before = purchase(dec!(2), dec!(8), true);
    let after = purchase(dec!(4), dec!(6), true);
    let mut drained = active_assignment(dec!(0));
    drained.status = AssignmentStatus::Completed;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![before], vec![after.clone()]])
        .append_query_results([vec![active_assignment(dec!(2))], vec![drained]])
        .into_connection();

    let ledger = LedgerService::new();
    let updated = ledger.debit(&db, 1, 20, dec!(2)).await.unwrap();

    assert_eq!(updated.hours_used, dec!(4));
    assert_eq!(updated.hours_remaining, dec!(6));
    assert_eq!(
        updated.hours_used + updated.hours_remaining,
        after.hours_used + after.hours_remaining
    );
}

#[tokio::test]
async fn debit_without_matching_assignment_touches_only_the_purchase() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([
            vec![purchase(dec!(0), dec!(10), true)],
            vec![purchase(dec!(1), dec!(9), true)],
        ])
        .append_query_results([Vec::<assignment_entity::Model>::new()])
        .into_connection();

    let ledger = LedgerService::new();
    let updated = ledger.debit(&db, 1, 20, dec!(1)).await.unwrap();

    assert_eq!(updated.hours_remaining, dec!(9));
}

#[tokio::test]
async fn credit_reactivates_a_drained_purchase() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([
            vec![purchase(dec!(10), dec!(0), false)],
            vec![purchase(dec!(8), dec!(2), true)],
        ])
        .into_connection();

    let ledger = LedgerService::new();
    let updated = ledger.credit(&db, 1, dec!(2)).await.unwrap();

    assert_eq!(updated.hours_remaining, dec!(2));
    assert!(updated.is_active);
}

#[tokio::test]
async fn credit_of_a_missing_purchase_fails() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<purchase_entity::Model>::new()])
        .into_connection();

    let ledger = LedgerService::new();
    let err = ledger.credit(&db, 7, dec!(1)).await.unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}
