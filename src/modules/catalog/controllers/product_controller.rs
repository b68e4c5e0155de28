use actix_web::{web, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;

use crate::core::Result;
use crate::modules::catalog::models::{GstApplicability, ProductInput};
use crate::modules::catalog::services::ProductService;

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    /// "GST" or "NON-GST"
    pub gst: Option<GstApplicability>,
}

#[derive(Debug, Deserialize)]
pub struct StockAdjustment {
    pub delta: i32,
}

async fn create_product(
    service: web::Data<Arc<ProductService>>,
    input: web::Json<ProductInput>,
) -> Result<HttpResponse> {
    let product = service.create_product(input.into_inner()).await?;
    Ok(HttpResponse::Created().json(product))
}

async fn list_products(
    service: web::Data<Arc<ProductService>>,
    query: web::Query<ProductListQuery>,
) -> Result<HttpResponse> {
    let products = match &query.search {
        Some(term) => service.search_products(term).await?,
        None => {
            service
                .list_products(query.category.as_deref(), query.gst)
                .await?
        }
    };
    Ok(HttpResponse::Ok().json(products))
}

async fn get_product(
    service: web::Data<Arc<ProductService>>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let product = service.get_product(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

async fn update_product(
    service: web::Data<Arc<ProductService>>,
    path: web::Path<String>,
    input: web::Json<ProductInput>,
) -> Result<HttpResponse> {
    let product = service
        .update_product(&path.into_inner(), input.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(product))
}

async fn delete_product(
    service: web::Data<Arc<ProductService>>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    service.delete_product(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn adjust_stock(
    service: web::Data<Arc<ProductService>>,
    path: web::Path<String>,
    input: web::Json<StockAdjustment>,
) -> Result<HttpResponse> {
    let product = service.adjust_stock(&path.into_inner(), input.delta).await?;
    Ok(HttpResponse::Ok().json(product))
}

async fn low_stock(service: web::Data<Arc<ProductService>>) -> Result<HttpResponse> {
    let alerts = service.low_stock_report().await?;
    Ok(HttpResponse::Ok().json(alerts))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .route("", web::post().to(create_product))
            .route("", web::get().to(list_products))
            .route("/low-stock", web::get().to(low_stock))
            .route("/{id}", web::get().to(get_product))
            .route("/{id}", web::put().to(update_product))
            .route("/{id}", web::delete().to(delete_product))
            .route("/{id}/stock", web::post().to(adjust_stock)),
    );
}
