use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::mysql::MySqlPool;
use sqlx::FromRow;
use std::str::FromStr;

use crate::core::{AppError, PaymentMode, PaymentStatus, Result};
use crate::modules::catalog::repositories::ProductRepository;
use crate::modules::ledger::models::CreditLedgerEntry;
use crate::modules::ledger::repositories::LedgerRepository;
use crate::modules::purchases::models::{PurchaseInvoice, PurchaseItem, PurchaseKind};

#[derive(Debug, FromRow)]
struct PurchaseRow {
    id: String,
    purchase_number: String,
    kind: String,
    supplier_id: String,
    supplier_name: String,
    supplier_invoice_number: Option<String>,
    purchase_date: NaiveDate,
    subtotal: Decimal,
    gst_total: Decimal,
    grand_total: Decimal,
    amount_paid: Decimal,
    balance_due: Decimal,
    payment_mode: String,
    payment_status: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl PurchaseRow {
    fn into_invoice(self) -> Result<PurchaseInvoice> {
        Ok(PurchaseInvoice {
            kind: PurchaseKind::from_str(&self.kind).map_err(AppError::internal)?,
            payment_mode: PaymentMode::from_str(&self.payment_mode).map_err(AppError::internal)?,
            payment_status: PaymentStatus::from_str(&self.payment_status)
                .map_err(AppError::internal)?,
            id: self.id,
            purchase_number: self.purchase_number,
            supplier_id: self.supplier_id,
            supplier_name: self.supplier_name,
            supplier_invoice_number: self.supplier_invoice_number,
            purchase_date: self.purchase_date,
            subtotal: self.subtotal,
            gst_total: self.gst_total,
            grand_total: self.grand_total,
            amount_paid: self.amount_paid,
            balance_due: self.balance_due,
            notes: self.notes,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct PurchaseItemRow {
    id: String,
    purchase_id: String,
    product_id: String,
    product_name: String,
    quantity: i32,
    unit_cost: Decimal,
    gst_rate: Decimal,
    taxable_amount: Decimal,
    gst_amount: Decimal,
    line_total: Decimal,
}

impl PurchaseItemRow {
    fn into_item(self) -> PurchaseItem {
        PurchaseItem {
            id: self.id,
            purchase_id: self.purchase_id,
            product_id: self.product_id,
            product_name: self.product_name,
            quantity: self.quantity,
            unit_cost: self.unit_cost,
            gst_rate: self.gst_rate,
            taxable_amount: self.taxable_amount,
            gst_amount: self.gst_amount,
            line_total: self.line_total,
        }
    }
}

const PURCHASE_COLUMNS: &str = "id, purchase_number, kind, supplier_id, supplier_name, \
     supplier_invoice_number, purchase_date, subtotal, gst_total, grand_total, amount_paid, \
     balance_due, payment_mode, payment_status, notes, created_at";

#[derive(Debug, Default)]
pub struct PurchaseFilter {
    pub supplier_id: Option<String>,
    pub kind: Option<PurchaseKind>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    /// Matches against the purchase number
    pub search: Option<String>,
}

pub struct PurchaseRepository {
    pool: MySqlPool,
}

impl PurchaseRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Persists the purchase, its items, the stock increments, and any
    /// supplier ledger entry as one transaction.
    pub async fn create_purchase(
        &self,
        invoice: &PurchaseInvoice,
        items: &[PurchaseItem],
        ledger_entry: Option<&CreditLedgerEntry>,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO purchase_invoices (id, purchase_number, kind, supplier_id, \
             supplier_name, supplier_invoice_number, purchase_date, subtotal, gst_total, \
             grand_total, amount_paid, balance_due, payment_mode, payment_status, notes, \
             created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&invoice.id)
        .bind(&invoice.purchase_number)
        .bind(invoice.kind.to_string())
        .bind(&invoice.supplier_id)
        .bind(&invoice.supplier_name)
        .bind(&invoice.supplier_invoice_number)
        .bind(invoice.purchase_date)
        .bind(invoice.subtotal)
        .bind(invoice.gst_total)
        .bind(invoice.grand_total)
        .bind(invoice.amount_paid)
        .bind(invoice.balance_due)
        .bind(invoice.payment_mode.to_string())
        .bind(invoice.payment_status.to_string())
        .bind(&invoice.notes)
        .bind(invoice.created_at)
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                "INSERT INTO purchase_items (id, purchase_id, product_id, product_name, \
                 quantity, unit_cost, gst_rate, taxable_amount, gst_amount, line_total) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&item.id)
            .bind(&item.purchase_id)
            .bind(&item.product_id)
            .bind(&item.product_name)
            .bind(item.quantity)
            .bind(item.unit_cost)
            .bind(item.gst_rate)
            .bind(item.taxable_amount)
            .bind(item.gst_amount)
            .bind(item.line_total)
            .execute(&mut *tx)
            .await?;

            ProductRepository::adjust_stock_with_tx(&mut tx, &item.product_id, item.quantity)
                .await?;
        }

        if let Some(entry) = ledger_entry {
            LedgerRepository::insert_entry_with_tx(&mut tx, entry).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<(PurchaseInvoice, Vec<PurchaseItem>)> {
        let row = sqlx::query_as::<_, PurchaseRow>(&format!(
            "SELECT {} FROM purchase_invoices WHERE id = ?",
            PURCHASE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Purchase {} not found", id)))?;
        let invoice = row.into_invoice()?;

        let items = sqlx::query_as::<_, PurchaseItemRow>(
            "SELECT id, purchase_id, product_id, product_name, quantity, unit_cost, gst_rate, \
             taxable_amount, gst_amount, line_total \
             FROM purchase_items WHERE purchase_id = ?",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(PurchaseItemRow::into_item)
        .collect();

        Ok((invoice, items))
    }

    pub async fn list(&self, filter: &PurchaseFilter) -> Result<Vec<PurchaseInvoice>> {
        let mut sql = format!(
            "SELECT {} FROM purchase_invoices WHERE 1 = 1",
            PURCHASE_COLUMNS
        );
        if filter.supplier_id.is_some() {
            sql.push_str(" AND supplier_id = ?");
        }
        if filter.kind.is_some() {
            sql.push_str(" AND kind = ?");
        }
        if filter.from_date.is_some() {
            sql.push_str(" AND purchase_date >= ?");
        }
        if filter.to_date.is_some() {
            sql.push_str(" AND purchase_date <= ?");
        }
        if filter.search.is_some() {
            sql.push_str(" AND purchase_number LIKE ?");
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = sqlx::query_as::<_, PurchaseRow>(&sql);
        if let Some(supplier_id) = &filter.supplier_id {
            query = query.bind(supplier_id);
        }
        if let Some(kind) = &filter.kind {
            query = query.bind(kind.to_string());
        }
        if let Some(from) = filter.from_date {
            query = query.bind(from);
        }
        if let Some(to) = filter.to_date {
            query = query.bind(to);
        }
        if let Some(term) = &filter.search {
            query = query.bind(format!("%{}%", term));
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(PurchaseRow::into_invoice).collect()
    }
}
