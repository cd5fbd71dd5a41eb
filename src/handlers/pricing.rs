use actix_web::{web, HttpResponse, ResponseError, Result};
use serde_json::json;

use crate::models::*;
use crate::services::PricingService;

#[utoipa::path(
    post,
    path = "/pricing/resolve",
    tag = "pricing",
    request_body = ResolvePriceRequest,
    responses(
        (status = 200, description = "Price resolved", body = PricingResult),
        (status = 422, description = "No pricing rule matched"),
        (status = 400, description = "Invalid request parameters")
    )
)]
pub async fn resolve_price(
    pricing_service: web::Data<PricingService>,
    request: web::Json<ResolvePriceRequest>,
) -> Result<HttpResponse> {
    let req = request.into_inner();
    match pricing_service
        .resolve_price(req.lesson_type, &req.subject, req.duration_hours, req.tutor_id, true)
        .await
    {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": result
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// Same resolution as `/pricing/resolve` but leaves no audit row, for
/// price displays ahead of a booking.
#[utoipa::path(
    post,
    path = "/pricing/preview",
    tag = "pricing",
    request_body = ResolvePriceRequest,
    responses(
        (status = 200, description = "Price previewed", body = PricingResult),
        (status = 422, description = "No pricing rule matched"),
        (status = 400, description = "Invalid request parameters")
    )
)]
pub async fn preview_price(
    pricing_service: web::Data<PricingService>,
    request: web::Json<ResolvePriceRequest>,
) -> Result<HttpResponse> {
    let req = request.into_inner();
    match pricing_service
        .resolve_price(req.lesson_type, &req.subject, req.duration_hours, req.tutor_id, false)
        .await
    {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": result
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/pricing/rules",
    tag = "pricing",
    params(PricingRuleQuery),
    responses(
        (status = 200, description = "Rules listed", body = [PricingRuleResponse])
    )
)]
pub async fn list_rules(
    pricing_service: web::Data<PricingService>,
    query: web::Query<PricingRuleQuery>,
) -> Result<HttpResponse> {
    let q = query.into_inner();
    match pricing_service
        .list_rules(q.lesson_type, q.subject, q.include_inactive)
        .await
    {
        Ok(rules) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": rules
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/pricing/rules",
    tag = "pricing",
    request_body = CreatePricingRuleRequest,
    responses(
        (status = 200, description = "Rule created", body = PricingRuleResponse),
        (status = 400, description = "Invalid rule definition")
    )
)]
pub async fn create_rule(
    pricing_service: web::Data<PricingService>,
    request: web::Json<CreatePricingRuleRequest>,
) -> Result<HttpResponse> {
    match pricing_service.create_rule(request.into_inner()).await {
        Ok(rule) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": rule
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/pricing/rules/{id}",
    tag = "pricing",
    params(
        ("id" = i64, Path, description = "Pricing rule id")
    ),
    request_body = UpdatePricingRuleRequest,
    responses(
        (status = 200, description = "Rule updated", body = PricingRuleResponse),
        (status = 404, description = "Rule not found"),
        (status = 400, description = "Invalid rule definition")
    )
)]
pub async fn update_rule(
    pricing_service: web::Data<PricingService>,
    path: web::Path<i64>,
    request: web::Json<UpdatePricingRuleRequest>,
) -> Result<HttpResponse> {
    match pricing_service
        .update_rule(path.into_inner(), request.into_inner())
        .await
    {
        Ok(rule) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": rule
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/pricing/overrides",
    tag = "pricing",
    request_body = CreateTutorOverrideRequest,
    responses(
        (status = 200, description = "Override created", body = TutorOverrideResponse),
        (status = 404, description = "Referenced rule not found"),
        (status = 400, description = "Invalid override definition")
    )
)]
pub async fn create_override(
    pricing_service: web::Data<PricingService>,
    request: web::Json<CreateTutorOverrideRequest>,
) -> Result<HttpResponse> {
    match pricing_service.create_override(request.into_inner()).await {
        Ok(o) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": o
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn pricing_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/pricing")
            .route("/resolve", web::post().to(resolve_price))
            .route("/preview", web::post().to(preview_price))
            .route("/rules", web::get().to(list_rules))
            .route("/rules", web::post().to(create_rule))
            .route("/rules/{id}", web::put().to(update_rule))
            .route("/overrides", web::post().to(create_override)),
    );
}
