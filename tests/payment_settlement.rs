use chrono::Utc;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase};

use tutorhub_backend::entities::{
    assignment_entity, payment_entity, AssignmentStatus, PaymentMethod, PaymentStatus,
};
use tutorhub_backend::error::AppError;
use tutorhub_backend::services::PaymentService;

fn payment(id: i64, status: PaymentStatus, reference: Option<&str>) -> payment_entity::Model {
    payment_entity::Model {
        id,
        package_assignment_id: 1,
        student_id: 10,
        processed_by_admin_id: 5,
        amount: dec!(250.00),
        payment_method: PaymentMethod::BankTransfer,
        payment_date: None,
        status,
        reference_number: reference.map(str::to_string),
        confirmed_by_admin_id: None,
        confirmation_date: None,
        admin_notes: None,
        created_at: Some(Utc::now()),
        updated_at: None,
    }
}

fn assignment(status: AssignmentStatus) -> assignment_entity::Model {
    assignment_entity::Model {
        id: 1,
        student_id: 10,
        tutor_id: 20,
        package_id: 3,
        assigned_by_admin_id: 5,
        custom_total_hours: None,
        custom_price: None,
        custom_expiry_date: None,
        status,
        hours_used: dec!(0),
        hours_remaining: dec!(10),
        auto_activate_on_payment: true,
        admin_notes: None,
        completed_at: None,
        created_at: Some(Utc::now()),
        updated_at: None,
    }
}

#[tokio::test]
async fn confirming_a_completed_payment_returns_it_unchanged() {
    let mut settled = payment(1, PaymentStatus::Completed, Some("REF-001"));
    settled.confirmed_by_admin_id = Some(5);
    settled.confirmation_date = Some(Utc::now());

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![settled.clone()]])
        .into_connection();

    let service = PaymentService::new(db);
    let result = service.confirm_payment(1, 9).await.unwrap();

    // Second confirmation by a different admin changes nothing.
    assert_eq!(result.id, 1);
    assert_eq!(result.status, PaymentStatus::Completed);
    assert_eq!(result.confirmed_by_admin_id, Some(5));
}

#[tokio::test]
async fn duplicate_reference_resolves_to_the_already_settled_payment() {
    let pending = payment(2, PaymentStatus::Pending, Some("REF-001"));
    let mut winner = payment(1, PaymentStatus::Completed, Some("REF-001"));
    winner.confirmed_by_admin_id = Some(5);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![pending], vec![winner.clone()]])
        .into_connection();

    let service = PaymentService::new(db);
    let result = service.confirm_payment(2, 9).await.unwrap();

    // The pending duplicate is never completed; the settled record wins.
    assert_eq!(result.id, 1);
    assert_eq!(result.status, PaymentStatus::Completed);
}

#[tokio::test]
async fn confirming_a_pending_payment_settles_it_and_activates_the_assignment() {
    let pending = payment(1, PaymentStatus::Pending, None);
    let assigned = assignment(AssignmentStatus::Assigned);

    let mut settled = payment(1, PaymentStatus::Completed, None);
    settled.confirmed_by_admin_id = Some(9);
    settled.confirmation_date = Some(Utc::now());
    let activated = assignment(AssignmentStatus::Active);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![pending]])
        .append_query_results([vec![assigned]])
        .append_query_results([vec![settled]])
        .append_query_results([vec![activated]])
        .into_connection();

    let service = PaymentService::new(db);
    let result = service.confirm_payment(1, 9).await.unwrap();

    assert_eq!(result.status, PaymentStatus::Completed);
    assert_eq!(result.confirmed_by_admin_id, Some(9));
}

#[tokio::test]
async fn confirming_a_missing_payment_fails() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<payment_entity::Model>::new()])
        .into_connection();

    let service = PaymentService::new(db);
    let err = service.confirm_payment(42, 9).await.unwrap_err();

    assert!(matches!(err, AppError::PaymentNotFound(42)));
}
