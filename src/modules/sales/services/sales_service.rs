use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::catalog::repositories::ProductRepository;
use crate::modules::ledger::models::{CreditLedgerEntry, InvoiceType, PartyType};
use crate::modules::parties::models::Customer;
use crate::modules::parties::repositories::PartyRepository;
use crate::modules::sales::models::{SalesInvoice, SalesInvoiceInput, SalesItem};
use crate::modules::sales::repositories::{SalesFilter, SalesRepository};

pub struct SalesService {
    repository: Arc<SalesRepository>,
    products: Arc<ProductRepository>,
    parties: Arc<PartyRepository>,
}

impl SalesService {
    pub fn new(
        repository: Arc<SalesRepository>,
        products: Arc<ProductRepository>,
        parties: Arc<PartyRepository>,
    ) -> Self {
        Self {
            repository,
            products,
            parties,
        }
    }

    /// Builds and persists a sale. Line amounts are computed from the
    /// request, stock is decremented per line, and an unpaid balance for
    /// a known customer opens a credit ledger entry, all atomically.
    pub async fn create_sale(
        &self,
        input: SalesInvoiceInput,
    ) -> Result<(SalesInvoice, Vec<SalesItem>)> {
        if input.items.is_empty() {
            return Err(AppError::validation("Invoice must have at least one item"));
        }

        let customer = match &input.customer_id {
            Some(id) => {
                let c = require_customer(self.parties.find_customer(id).await?, id)?;
                Some((c.id, c.name))
            }
            None => None,
        };

        let invoice_id = uuid::Uuid::new_v4().to_string();
        let mut items = Vec::with_capacity(input.items.len());
        for item_input in input.items {
            let product = self.products.find_by_id(&item_input.product_id).await?;
            if product.quantity_in_stock < item_input.quantity {
                return Err(AppError::conflict(format!(
                    "Insufficient stock for {}: have {}, need {}",
                    product.name, product.quantity_in_stock, item_input.quantity
                )));
            }
            items.push(item_input.into_item(&invoice_id, &product.name, input.gst_treatment)?);
        }

        let invoice_date = input
            .invoice_date
            .unwrap_or_else(|| Utc::now().date_naive());
        let mut invoice = SalesInvoice::from_items(
            customer,
            invoice_date,
            input.gst_treatment,
            &items,
            input.amount_paid,
            input.payment_mode,
            input.notes,
        )?;
        invoice.id = invoice_id;

        let ledger_entry = if invoice.needs_ledger_entry() {
            Some(CreditLedgerEntry::new(
                invoice.customer_id.clone().unwrap_or_default(),
                PartyType::Customer,
                invoice.id.clone(),
                InvoiceType::Sales,
                invoice.grand_total,
                invoice.amount_paid,
                None,
            )?)
        } else {
            None
        };

        self.repository
            .create_sale(&invoice, &items, ledger_entry.as_ref())
            .await?;

        info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            grand_total = %invoice.grand_total,
            credit = ledger_entry.is_some(),
            "Sale recorded"
        );
        Ok((invoice, items))
    }

    pub async fn get_sale(&self, id: &str) -> Result<(SalesInvoice, Vec<SalesItem>)> {
        self.repository.find_by_id(id).await
    }

    pub async fn list_sales(&self, filter: SalesFilter) -> Result<Vec<SalesInvoice>> {
        self.repository.list(&filter).await
    }
}

/// A sale referencing a customer id must resolve to a real customer.
fn require_customer(found: Option<Customer>, id: &str) -> Result<Customer> {
    found.ok_or_else(|| AppError::not_found(format!("Customer '{}'", id)))
}
