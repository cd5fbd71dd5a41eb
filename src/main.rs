use actix_web::{middleware::Logger, web, App, HttpServer};
use chrono::Local;
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use tutorhub_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    handlers,
    middlewares::create_cors,
    services::*,
    swagger::swagger_config,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().expect("Failed to load configuration file");

    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // Shared behind Arc: DatabaseConnection itself is not Clone when the
    // sea-orm `mock` dev-feature is unified into test builds.
    let pool = std::sync::Arc::new(pool);

    let pricing_service = PricingService::new(pool.clone());
    let ledger_service = LedgerService::new();
    let booking_service = BookingService::new(
        pool.clone(),
        pricing_service.clone(),
        ledger_service.clone(),
    );
    let payment_service = PaymentService::new(pool.clone());

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .app_data(web::Data::new(pricing_service.clone()))
            .app_data(web::Data::new(booking_service.clone()))
            .app_data(web::Data::new(payment_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::pricing_config)
                    .configure(handlers::bookings_config)
                    .configure(handlers::payments_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
