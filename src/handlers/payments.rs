use actix_web::{web, HttpResponse, ResponseError, Result};
use serde_json::json;

use crate::models::*;
use crate::services::PaymentService;

#[utoipa::path(
    post,
    path = "/admin/assignments",
    tag = "admin",
    request_body = CreateAssignmentRequest,
    responses(
        (status = 200, description = "Assignment created", body = AssignmentResponse),
        (status = 404, description = "Package not found"),
        (status = 400, description = "Invalid assignment parameters")
    )
)]
pub async fn create_assignment(
    payment_service: web::Data<PaymentService>,
    request: web::Json<CreateAssignmentRequest>,
) -> Result<HttpResponse> {
    match payment_service.create_assignment(request.into_inner()).await {
        Ok(assignment) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": assignment
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/payments",
    tag = "admin",
    request_body = RecordPaymentRequest,
    responses(
        (status = 200, description = "Payment recorded as pending", body = PaymentResponse),
        (status = 404, description = "Assignment not found")
    )
)]
pub async fn record_payment(
    payment_service: web::Data<PaymentService>,
    request: web::Json<RecordPaymentRequest>,
) -> Result<HttpResponse> {
    match payment_service.record_payment(request.into_inner()).await {
        Ok(payment) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": payment
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/payments/{id}/confirm",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "Payment id")
    ),
    request_body = ConfirmPaymentRequest,
    responses(
        (status = 200, description = "Payment settled, idempotent on repeats", body = PaymentResponse),
        (status = 404, description = "Payment not found")
    )
)]
pub async fn confirm_payment(
    payment_service: web::Data<PaymentService>,
    path: web::Path<i64>,
    request: web::Json<ConfirmPaymentRequest>,
) -> Result<HttpResponse> {
    match payment_service
        .confirm_payment(path.into_inner(), request.into_inner().admin_id)
        .await
    {
        Ok(payment) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": payment
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn payments_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/assignments", web::post().to(create_assignment))
            .route("/payments", web::post().to(record_payment))
            .route("/payments/{id}/confirm", web::post().to(confirm_payment)),
    );
}
