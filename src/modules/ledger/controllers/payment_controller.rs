use std::str::FromStr;
use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::ledger::models::PartyType;
use crate::modules::ledger::services::{AllocatePaymentRequest, PaymentService};

/// Record a payment and allocate it across the party's open entries
/// POST /payments
pub async fn allocate_payment(
    service: web::Data<Arc<PaymentService>>,
    request: web::Json<AllocatePaymentRequest>,
) -> Result<HttpResponse, AppError> {
    let result = service.allocate_payment(request.into_inner()).await?;

    Ok(HttpResponse::Created().json(result))
}

/// Open ledger entries for one party, oldest first
/// GET /ledger/{party_type}/{party_id}
pub async fn open_entries(
    service: web::Data<Arc<PaymentService>>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (party_type, party_id) = path.into_inner();
    let party_type = PartyType::from_str(&party_type).map_err(AppError::Validation)?;

    let entries = service.open_entries(&party_id, party_type).await?;

    Ok(HttpResponse::Ok().json(entries))
}

/// Outstanding credits across all parties of a type, with party names
/// GET /ledger/outstanding/{party_type}
pub async fn outstanding(
    service: web::Data<Arc<PaymentService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let party_type = PartyType::from_str(&path.into_inner()).map_err(AppError::Validation)?;

    let entries = service.outstanding(party_type).await?;

    Ok(HttpResponse::Ok().json(entries))
}

/// Configure ledger routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/payments", web::post().to(allocate_payment))
        .service(
            web::scope("/ledger")
                .route("/outstanding/{party_type}", web::get().to(outstanding))
                .route("/{party_type}/{party_id}", web::get().to(open_entries)),
        );
}
