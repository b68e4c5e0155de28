use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

use crate::core::Result;
use crate::modules::ledger::models::PartyType;
use crate::modules::reports::services::ReportService;

#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

async fn dashboard(service: web::Data<Arc<ReportService>>) -> Result<HttpResponse> {
    let summary = service.dashboard().await?;
    Ok(HttpResponse::Ok().json(summary))
}

async fn revenue_by_day(
    service: web::Data<Arc<ReportService>>,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse> {
    let days = service
        .revenue_by_day(query.from_date, query.to_date)
        .await?;
    Ok(HttpResponse::Ok().json(days))
}

async fn top_products(
    service: web::Data<Arc<ReportService>>,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse> {
    let products = service.top_products(query.from_date, query.to_date).await?;
    Ok(HttpResponse::Ok().json(products))
}

async fn category_revenue(
    service: web::Data<Arc<ReportService>>,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse> {
    let categories = service
        .category_revenue(query.from_date, query.to_date)
        .await?;
    Ok(HttpResponse::Ok().json(categories))
}

async fn outstanding(
    service: web::Data<Arc<ReportService>>,
    path: web::Path<PartyType>,
) -> Result<HttpResponse> {
    let parties = service.outstanding(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(parties))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .route("/dashboard", web::get().to(dashboard))
            .route("/revenue-by-day", web::get().to(revenue_by_day))
            .route("/top-products", web::get().to(top_products))
            .route("/category-revenue", web::get().to(category_revenue))
            .route("/outstanding/{party_type}", web::get().to(outstanding)),
    );
}
