use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::{PaymentStatus, Result};
use crate::modules::sales::models::{SalesInvoice, SalesInvoiceInput, SalesItem};
use crate::modules::sales::repositories::SalesFilter;
use crate::modules::sales::services::SalesService;

#[derive(Debug, Serialize)]
struct SaleResponse {
    #[serde(flatten)]
    invoice: SalesInvoice,
    items: Vec<SalesItem>,
}

#[derive(Debug, Deserialize)]
pub struct SalesListQuery {
    pub customer_id: Option<String>,
    pub payment_status: Option<PaymentStatus>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub search: Option<String>,
}

async fn create_sale(
    service: web::Data<Arc<SalesService>>,
    input: web::Json<SalesInvoiceInput>,
) -> Result<HttpResponse> {
    let (invoice, items) = service.create_sale(input.into_inner()).await?;
    Ok(HttpResponse::Created().json(SaleResponse { invoice, items }))
}

async fn get_sale(
    service: web::Data<Arc<SalesService>>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let (invoice, items) = service.get_sale(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(SaleResponse { invoice, items }))
}

async fn list_sales(
    service: web::Data<Arc<SalesService>>,
    query: web::Query<SalesListQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let invoices = service
        .list_sales(SalesFilter {
            customer_id: query.customer_id,
            payment_status: query.payment_status,
            from_date: query.from_date,
            to_date: query.to_date,
            search: query.search,
        })
        .await?;
    Ok(HttpResponse::Ok().json(invoices))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/sales")
            .route("", web::post().to(create_sale))
            .route("", web::get().to(list_sales))
            .route("/{id}", web::get().to(get_sale)),
    );
}
