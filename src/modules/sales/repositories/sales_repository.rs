use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::mysql::MySqlPool;
use sqlx::FromRow;
use std::str::FromStr;

use crate::core::{AppError, PaymentMode, PaymentStatus, Result};
use crate::modules::catalog::repositories::ProductRepository;
use crate::modules::ledger::models::CreditLedgerEntry;
use crate::modules::ledger::repositories::LedgerRepository;
use crate::modules::sales::models::{GstTreatment, SalesInvoice, SalesItem};

#[derive(Debug, FromRow)]
struct InvoiceRow {
    id: String,
    invoice_number: String,
    customer_id: Option<String>,
    customer_name: Option<String>,
    invoice_date: NaiveDate,
    gst_treatment: String,
    subtotal: Decimal,
    gst_total: Decimal,
    round_off: Decimal,
    grand_total: Decimal,
    amount_paid: Decimal,
    balance_due: Decimal,
    payment_mode: String,
    payment_status: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl InvoiceRow {
    fn into_invoice(self) -> Result<SalesInvoice> {
        Ok(SalesInvoice {
            gst_treatment: GstTreatment::from_str(&self.gst_treatment)
                .map_err(AppError::internal)?,
            payment_mode: PaymentMode::from_str(&self.payment_mode).map_err(AppError::internal)?,
            payment_status: PaymentStatus::from_str(&self.payment_status)
                .map_err(AppError::internal)?,
            id: self.id,
            invoice_number: self.invoice_number,
            customer_id: self.customer_id,
            customer_name: self.customer_name,
            invoice_date: self.invoice_date,
            subtotal: self.subtotal,
            gst_total: self.gst_total,
            round_off: self.round_off,
            grand_total: self.grand_total,
            amount_paid: self.amount_paid,
            balance_due: self.balance_due,
            notes: self.notes,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct ItemRow {
    id: String,
    invoice_id: String,
    product_id: String,
    product_name: String,
    quantity: i32,
    unit_price: Decimal,
    discount: Decimal,
    gst_rate: Decimal,
    taxable_amount: Decimal,
    gst_amount: Decimal,
    line_total: Decimal,
}

impl ItemRow {
    fn into_item(self) -> SalesItem {
        SalesItem {
            id: self.id,
            invoice_id: self.invoice_id,
            product_id: self.product_id,
            product_name: self.product_name,
            quantity: self.quantity,
            unit_price: self.unit_price,
            discount: self.discount,
            gst_rate: self.gst_rate,
            taxable_amount: self.taxable_amount,
            gst_amount: self.gst_amount,
            line_total: self.line_total,
        }
    }
}

const INVOICE_COLUMNS: &str = "id, invoice_number, customer_id, customer_name, invoice_date, \
     gst_treatment, subtotal, gst_total, round_off, grand_total, amount_paid, balance_due, \
     payment_mode, payment_status, notes, created_at";

/// List filters, all optional
#[derive(Debug, Default)]
pub struct SalesFilter {
    pub customer_id: Option<String>,
    pub payment_status: Option<PaymentStatus>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    /// Matches against the invoice number
    pub search: Option<String>,
}

pub struct SalesRepository {
    pool: MySqlPool,
}

impl SalesRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Persists the invoice, its items, the stock decrements, and any
    /// credit ledger entry as one transaction. A stock shortage on any
    /// line rolls the whole sale back.
    pub async fn create_sale(
        &self,
        invoice: &SalesInvoice,
        items: &[SalesItem],
        ledger_entry: Option<&CreditLedgerEntry>,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO sales_invoices (id, invoice_number, customer_id, customer_name, \
             invoice_date, gst_treatment, subtotal, gst_total, round_off, grand_total, \
             amount_paid, balance_due, payment_mode, payment_status, notes, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&invoice.id)
        .bind(&invoice.invoice_number)
        .bind(&invoice.customer_id)
        .bind(&invoice.customer_name)
        .bind(invoice.invoice_date)
        .bind(invoice.gst_treatment.to_string())
        .bind(invoice.subtotal)
        .bind(invoice.gst_total)
        .bind(invoice.round_off)
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
                "INSERT INTO sales_items (id, invoice_id, product_id, product_name, quantity, \
                 unit_price, discount, gst_rate, taxable_amount, gst_amount, line_total) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&item.id)
            .bind(&item.invoice_id)
            .bind(&item.product_id)
            .bind(&item.product_name)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.discount)
            .bind(item.gst_rate)
            .bind(item.taxable_amount)
            .bind(item.gst_amount)
            .bind(item.line_total)
            .execute(&mut *tx)
            .await?;

            ProductRepository::adjust_stock_with_tx(&mut tx, &item.product_id, -item.quantity)
                .await?;
        }

        if let Some(entry) = ledger_entry {
            LedgerRepository::insert_entry_with_tx(&mut tx, entry).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<(SalesInvoice, Vec<SalesItem>)> {
        let row = sqlx::query_as::<_, InvoiceRow>(&format!(
            "SELECT {} FROM sales_invoices WHERE id = ?",
            INVOICE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Invoice {} not found", id)))?;
        let invoice = row.into_invoice()?;

        let items = sqlx::query_as::<_, ItemRow>(
            "SELECT id, invoice_id, product_id, product_name, quantity, unit_price, discount, \
             gst_rate, taxable_amount, gst_amount, line_total \
             FROM sales_items WHERE invoice_id = ?",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(ItemRow::into_item)
        .collect();

        Ok((invoice, items))
    }

    pub async fn list(&self, filter: &SalesFilter) -> Result<Vec<SalesInvoice>> {
        let mut sql = format!(
            "SELECT {} FROM sales_invoices WHERE 1 = 1",
            INVOICE_COLUMNS
        );
        if filter.customer_id.is_some() {
            sql.push_str(" AND customer_id = ?");
        }
        if filter.payment_status.is_some() {
            sql.push_str(" AND payment_status = ?");
        }
        if filter.from_date.is_some() {
            sql.push_str(" AND invoice_date >= ?");
        }
        if filter.to_date.is_some() {
            sql.push_str(" AND invoice_date <= ?");
        }
        if filter.search.is_some() {
            sql.push_str(" AND invoice_number LIKE ?");
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = sqlx::query_as::<_, InvoiceRow>(&sql);
        if let Some(customer_id) = &filter.customer_id {
            query = query.bind(customer_id);
        }
        if let Some(status) = &filter.payment_status {
            query = query.bind(status.to_string());
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
        rows.into_iter().map(InvoiceRow::into_invoice).collect()
    }
}
