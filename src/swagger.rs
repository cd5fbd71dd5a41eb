use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{AssignmentStatus, BookingStatus, LessonType, PaymentMethod, PaymentStatus};
use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::pricing::resolve_price,
        handlers::pricing::preview_price,
        handlers::pricing::list_rules,
        handlers::pricing::create_rule,
        handlers::pricing::update_rule,
        handlers::pricing::create_override,
        handlers::bookings::create_booking,
        handlers::bookings::confirm_booking,
        handlers::bookings::complete_booking,
        handlers::bookings::cancel_booking,
        handlers::payments::create_assignment,
        handlers::payments::record_payment,
        handlers::payments::confirm_payment,
    ),
    components(
        schemas(
            LessonType,
            BookingStatus,
            AssignmentStatus,
            PaymentStatus,
            PaymentMethod,
            ResolvePriceRequest,
            PricingResult,
            DiscountRate,
            CreatePricingRuleRequest,
            UpdatePricingRuleRequest,
            PricingRuleResponse,
            CreateTutorOverrideRequest,
            TutorOverrideResponse,
            CreateBookingRequest,
            CompleteBookingRequest,
            BookingResponse,
            CreateAssignmentRequest,
            AssignmentResponse,
            RecordPaymentRequest,
            ConfirmPaymentRequest,
            PaymentResponse,
        )
    ),
    tags(
        (name = "pricing", description = "Tariff rules, tutor overrides and price resolution"),
        (name = "bookings", description = "Booking lifecycle and package hour settlement"),
        (name = "admin", description = "Admin assignments and offline payment settlement"),
    ),
    info(
        title = "TutorHub Pricing API",
        version = "1.0.0",
        description = "Pricing and settlement core for the TutorHub tutoring marketplace"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
