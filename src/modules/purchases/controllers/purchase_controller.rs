use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::Result;
use crate::modules::purchases::models::{
    PurchaseInvoice, PurchaseInvoiceInput, PurchaseItem, PurchaseKind,
};
use crate::modules::purchases::repositories::PurchaseFilter;
use crate::modules::purchases::services::PurchaseService;

#[derive(Debug, Serialize)]
struct PurchaseResponse {
    #[serde(flatten)]
    invoice: PurchaseInvoice,
    items: Vec<PurchaseItem>,
}

#[derive(Debug, Deserialize)]
pub struct PurchaseListQuery {
    pub supplier_id: Option<String>,
    pub kind: Option<PurchaseKind>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub search: Option<String>,
}

async fn create_purchase(
    service: web::Data<Arc<PurchaseService>>,
    input: web::Json<PurchaseInvoiceInput>,
) -> Result<HttpResponse> {
    let (invoice, items) = service.create_purchase(input.into_inner()).await?;
    Ok(HttpResponse::Created().json(PurchaseResponse { invoice, items }))
}

async fn get_purchase(
    service: web::Data<Arc<PurchaseService>>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let (invoice, items) = service.get_purchase(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(PurchaseResponse { invoice, items }))
}

async fn list_purchases(
    service: web::Data<Arc<PurchaseService>>,
    query: web::Query<PurchaseListQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let invoices = service
        .list_purchases(PurchaseFilter {
            supplier_id: query.supplier_id,
            kind: query.kind,
            from_date: query.from_date,
            to_date: query.to_date,
            search: query.search,
        })
        .await?;
    Ok(HttpResponse::Ok().json(invoices))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/purchases")
            .route("", web::post().to(create_purchase))
            .route("", web::get().to(list_purchases))
            .route("/{id}", web::get().to(get_purchase)),
    );
}
