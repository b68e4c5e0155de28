use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::catalog::repositories::ProductRepository;
use crate::modules::ledger::models::{CreditLedgerEntry, InvoiceType, PartyType};
use crate::modules::parties::models::Supplier;
use crate::modules::parties::repositories::PartyRepository;
use crate::modules::purchases::models::{PurchaseInvoice, PurchaseInvoiceInput, PurchaseItem};
use crate::modules::purchases::repositories::{PurchaseFilter, PurchaseRepository};

pub struct PurchaseService {
    repository: Arc<PurchaseRepository>,
    products: Arc<ProductRepository>,
    parties: Arc<PartyRepository>,
}

impl PurchaseService {
    pub fn new(
        repository: Arc<PurchaseRepository>,
        products: Arc<ProductRepository>,
        parties: Arc<PartyRepository>,
    ) -> Self {
        Self {
            repository,
            products,
            parties,
        }
    }

    /// Records a stock purchase. Stock goes up per line and an unpaid
    /// balance opens a supplier ledger entry, all atomically.
    pub async fn create_purchase(
        &self,
        input: PurchaseInvoiceInput,
    ) -> Result<(PurchaseInvoice, Vec<PurchaseItem>)> {
        if input.items.is_empty() {
            return Err(AppError::validation("Purchase must have at least one item"));
        }

        let supplier = require_supplier(
            self.parties.find_supplier(&input.supplier_id).await?,
            &input.supplier_id,
        )?;

        let purchase_id = uuid::Uuid::new_v4().to_string();
        let mut items = Vec::with_capacity(input.items.len());
        for item_input in input.items {
            let product = self.products.find_by_id(&item_input.product_id).await?;
            items.push(item_input.into_item(&purchase_id, &product.name, input.kind)?);
        }

        let purchase_date = input
            .purchase_date
            .unwrap_or_else(|| Utc::now().date_naive());
        let mut invoice = PurchaseInvoice::from_items(
            input.kind,
            (supplier.id, supplier.name),
            input.supplier_invoice_number,
            purchase_date,
            &items,
            input.amount_paid,
            input.payment_mode,
            input.notes,
        )?;
        invoice.id = purchase_id;

        let ledger_entry = if invoice.needs_ledger_entry() {
            Some(CreditLedgerEntry::new(
                invoice.supplier_id.clone(),
                PartyType::Supplier,
                invoice.id.clone(),
                InvoiceType::Purchase,
                invoice.grand_total,
                invoice.amount_paid,
                None,
            )?)
        } else {
            None
        };

        self.repository
            .create_purchase(&invoice, &items, ledger_entry.as_ref())
            .await?;

        info!(
            purchase_id = %invoice.id,
            purchase_number = %invoice.purchase_number,
            grand_total = %invoice.grand_total,
            credit = ledger_entry.is_some(),
            "Purchase recorded"
        );
        Ok((invoice, items))
    }

    pub async fn get_purchase(&self, id: &str) -> Result<(PurchaseInvoice, Vec<PurchaseItem>)> {
        self.repository.find_by_id(id).await
    }

    pub async fn list_purchases(&self, filter: PurchaseFilter) -> Result<Vec<PurchaseInvoice>> {
        self.repository.list(&filter).await
    }
}

/// Purchases are always against a supplier that exists on file.
fn require_supplier(found: Option<Supplier>, id: &str) -> Result<Supplier> {
    found.ok_or_else(|| AppError::not_found(format!("Supplier '{}'", id)))
}
