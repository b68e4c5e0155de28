use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::parties::models::PartyInput;
use crate::modules::parties::services::PartyService;

pub async fn create_customer(
    service: web::Data<Arc<PartyService>>,
    input: web::Json<PartyInput>,
) -> Result<HttpResponse, AppError> {
    let customer = service.create_customer(input.into_inner()).await?;
    Ok(HttpResponse::Created().json(customer))
}

pub async fn get_customer(
    service: web::Data<Arc<PartyService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let customer = service.get_customer(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(customer))
}

pub async fn list_customers(
    service: web::Data<Arc<PartyService>>,
) -> Result<HttpResponse, AppError> {
    let customers = service.list_customers().await?;
    Ok(HttpResponse::Ok().json(customers))
}

pub async fn update_customer(
    service: web::Data<Arc<PartyService>>,
    path: web::Path<String>,
    input: web::Json<PartyInput>,
) -> Result<HttpResponse, AppError> {
    let customer = service
        .update_customer(&path.into_inner(), input.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(customer))
}

pub async fn delete_customer(
    service: web::Data<Arc<PartyService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete_customer(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn create_supplier(
    service: web::Data<Arc<PartyService>>,
    input: web::Json<PartyInput>,
) -> Result<HttpResponse, AppError> {
    let supplier = service.create_supplier(input.into_inner()).await?;
    Ok(HttpResponse::Created().json(supplier))
}

pub async fn get_supplier(
    service: web::Data<Arc<PartyService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let supplier = service.get_supplier(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(supplier))
}

pub async fn list_suppliers(
    service: web::Data<Arc<PartyService>>,
) -> Result<HttpResponse, AppError> {
    let suppliers = service.list_suppliers().await?;
    Ok(HttpResponse::Ok().json(suppliers))
}

pub async fn update_supplier(
    service: web::Data<Arc<PartyService>>,
    path: web::Path<String>,
    input: web::Json<PartyInput>,
) -> Result<HttpResponse, AppError> {
    let supplier = service
        .update_supplier(&path.into_inner(), input.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(supplier))
}

pub async fn delete_supplier(
    service: web::Data<Arc<PartyService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete_supplier(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure party routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/customers")
            .route("", web::post().to(create_customer))
            .route("", web::get().to(list_customers))
            .route("/{id}", web::get().to(get_customer))
            .route("/{id}", web::put().to(update_customer))
            .route("/{id}", web::delete().to(delete_customer)),
    )
    .service(
        web::scope("/suppliers")
            .route("", web::post().to(create_supplier))
            .route("", web::get().to(list_suppliers))
            .route("/{id}", web::get().to(get_supplier))
            .route("/{id}", web::put().to(update_supplier))
            .route("/{id}", web::delete().to(delete_supplier)),
    );
}
