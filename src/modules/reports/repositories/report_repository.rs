use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::mysql::MySqlPool;
use sqlx::FromRow;

use crate::core::Result;
use crate::modules::ledger::models::PartyType;
use crate::modules::reports::models::{OutstandingRecord, SaleRecord, SoldItemRecord};

#[derive(Debug, FromRow)]
struct SaleRecordRow {
    invoice_id: String,
    invoice_date: NaiveDate,
    grand_total: Decimal,
    amount_paid: Decimal,
    payment_mode: String,
}

#[derive(Debug, FromRow)]
struct SoldItemRow {
    product_id: String,
    product_name: String,
    category: Option<String>,
    quantity: i32,
    line_total: Decimal,
}

#[derive(Debug, FromRow)]
struct OutstandingRecordRow {
    party_id: String,
    party_name: String,
    balance_amount: Decimal,
    opened_on: NaiveDate,
}

pub struct ReportRepository {
    pool: MySqlPool,
}

impl ReportRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn sales_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<SaleRecord>> {
        let rows = sqlx::query_as::<_, SaleRecordRow>(
            "SELECT id AS invoice_id, invoice_date, grand_total, amount_paid, payment_mode \
             FROM sales_invoices WHERE invoice_date BETWEEN ? AND ?",
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|r| SaleRecord {
                invoice_id: r.invoice_id,
                invoice_date: r.invoice_date,
                grand_total: r.grand_total,
                amount_paid: r.amount_paid,
                payment_mode: r.payment_mode,
            })
            .collect())
    }

    pub async fn sold_items_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<SoldItemRecord>> {
        let rows = sqlx::query_as::<_, SoldItemRow>(
            "SELECT si.product_id, si.product_name, p.category, si.quantity, si.line_total \
             FROM sales_items si \
             JOIN sales_invoices inv ON inv.id = si.invoice_id \
             LEFT JOIN products p ON p.id = si.product_id \
             WHERE inv.invoice_date BETWEEN ? AND ?",
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|r| SoldItemRecord {
                product_id: r.product_id,
                product_name: r.product_name,
                category: r.category,
                quantity: r.quantity,
                line_total: r.line_total,
            })
            .collect())
    }

    pub async fn open_balances(&self, party_type: PartyType) -> Result<Vec<OutstandingRecord>> {
        let party_table = match party_type {
            PartyType::Customer => "customers",
            PartyType::Supplier => "suppliers",
        };
        let sql = format!(
            "SELECT cl.party_id, p.name AS party_name, cl.balance_amount, \
             DATE(cl.created_at) AS opened_on \
             FROM credit_ledgers cl \
             JOIN {} p ON p.id = cl.party_id \
             WHERE cl.party_type = ? AND cl.balance_amount > 0",
            party_table
        );
        let rows = sqlx::query_as::<_, OutstandingRecordRow>(&sql)
            .bind(party_type.to_string())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| OutstandingRecord {
                party_id: r.party_id,
                party_name: r.party_name,
                balance_amount: r.balance_amount,
                opened_on: r.opened_on,
            })
            .collect())
    }
}
