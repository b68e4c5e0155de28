use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bizflow::config::Config;
use bizflow::middleware::{ApiKeyAuth, RequestId};
use bizflow::modules::catalog::controllers::product_controller;
use bizflow::modules::catalog::repositories::ProductRepository;
use bizflow::modules::catalog::services::ProductService;
use bizflow::modules::ledger::controllers::payment_controller;
use bizflow::modules::ledger::repositories::{LedgerRepository, LedgerStore};
use bizflow::modules::ledger::services::PaymentService;
use bizflow::modules::parties::controllers::party_controller;
use bizflow::modules::parties::repositories::PartyRepository;
use bizflow::modules::parties::services::PartyService;
use bizflow::modules::purchases::controllers::purchase_controller;
use bizflow::modules::purchases::repositories::PurchaseRepository;
use bizflow::modules::purchases::services::PurchaseService;
use bizflow::modules::reports::controllers::report_controller;
use bizflow::modules::reports::repositories::ReportRepository;
use bizflow::modules::reports::services::ReportService;
use bizflow::modules::sales::controllers::sales_controller;
use bizflow::modules::sales::repositories::SalesRepository;
use bizflow::modules::sales::services::SalesService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bizflow=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");
    config.validate().expect("Configuration validation failed");

    tracing::info!("Starting BizFlow billing and inventory backend");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    // Create database connection pool
    let db_pool = config
        .database
        .create_pool()
        .await
        .expect("Failed to create database pool");

    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.pool_size
    );

    // Repositories
    let party_repository = Arc::new(PartyRepository::new(db_pool.clone()));
    let product_repository = Arc::new(ProductRepository::new(db_pool.clone()));
    let sales_repository = Arc::new(SalesRepository::new(db_pool.clone()));
    let purchase_repository = Arc::new(PurchaseRepository::new(db_pool.clone()));
    let report_repository = Arc::new(ReportRepository::new(db_pool.clone()));
    let ledger_store: Arc<dyn LedgerStore> = Arc::new(LedgerRepository::new(db_pool.clone()));

    // Services
    let party_service = Arc::new(PartyService::new(party_repository.clone()));
    let product_service = Arc::new(ProductService::new(
        product_repository.clone(),
        config.app.default_gst_rate,
    ));
    let sales_service = Arc::new(SalesService::new(
        sales_repository,
        product_repository.clone(),
        party_repository.clone(),
    ));
    let purchase_service = Arc::new(PurchaseService::new(
        purchase_repository,
        product_repository.clone(),
        party_repository,
    ));
    let payment_service = Arc::new(PaymentService::new(ledger_store));
    let report_service = Arc::new(ReportService::new(
        report_repository,
        product_repository,
        i64::from(config.app.analytics_window_days),
    ));

    let api_key_secret = config.security.api_key_secret.clone();
    let cors_origin = config.security.cors_allowed_origin.clone();
    let bind_address = config.server.bind_address();
    let workers = config.server.workers;

    let server = HttpServer::new(move || {
        let cors = match &cors_origin {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
                .allow_any_header()
                .max_age(3600),
            None => Cors::permissive(),
        };

        App::new()
            .wrap(tracing_actix_web::TracingLogger::default())
            .wrap(ApiKeyAuth::new(api_key_secret.clone()))
            .wrap(RequestId)
            .wrap(cors)
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(party_service.clone()))
            .app_data(web::Data::new(product_service.clone()))
            .app_data(web::Data::new(sales_service.clone()))
            .app_data(web::Data::new(purchase_service.clone()))
            .app_data(web::Data::new(payment_service.clone()))
            .app_data(web::Data::new(report_service.clone()))
            .configure(party_controller::configure)
            .configure(product_controller::configure)
            .configure(sales_controller::configure)
            .configure(purchase_controller::configure)
            .configure(payment_controller::configure)
            .configure(report_controller::configure)
            .route("/health", web::get().to(health_check))
            .route("/", web::get().to(index))
    })
    .workers(workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "bizflow"
    }))
}

async fn index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "service": "BizFlow Billing and Inventory Backend",
        "version": "0.1.0",
        "status": "running"
    }))
}
