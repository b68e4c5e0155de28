// MySQL-backed ledger store.
//
// The allocation write path holds row locks (SELECT ... FOR UPDATE) on every
// touched entry for the duration of the transaction and re-checks the
// balances read earlier, so two allocations against the same party cannot
// both apply to the same open balance.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, MySql, MySqlPool, Transaction};
use std::str::FromStr;

use super::LedgerStore;
use crate::core::{AppError, Result};
use crate::modules::ledger::models::{
    CreditLedgerEntry, CreditNote, InvoiceType, LedgerStatus, OutstandingEntry, PartyType,
    Payment, PaymentAllocation,
};

pub struct LedgerRepository {
    pool: MySqlPool,
}

impl LedgerRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Inserts a freshly opened ledger entry within an existing transaction.
    /// Used by the sales and purchase flows when a credit invoice is issued.
    pub async fn insert_entry_with_tx(
        tx: &mut Transaction<'_, MySql>,
        entry: &CreditLedgerEntry,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO credit_ledgers (
                id, party_id, party_type, invoice_id, invoice_type,
                total_amount, paid_amount, balance_amount, status,
                due_date, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.party_id)
        .bind(entry.party_type.to_string())
        .bind(&entry.invoice_id)
        .bind(entry.invoice_type.to_string())
        .bind(entry.total_amount)
        .bind(entry.paid_amount)
        .bind(entry.balance_amount)
        .bind(entry.status.to_string())
        .bind(entry.due_date)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::internal(format!("Failed to insert ledger entry: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl LedgerStore for LedgerRepository {
    async fn find_open_entries(
        &self,
        party_id: &str,
        party_type: PartyType,
    ) -> Result<Vec<CreditLedgerEntry>> {
        let rows = sqlx::query_as::<_, EntryRow>(
            r#"
            SELECT id, party_id, party_type, invoice_id, invoice_type,
                   total_amount, paid_amount, balance_amount, status,
                   due_date, created_at, updated_at
            FROM credit_ledgers
            WHERE party_id = ? AND party_type = ? AND balance_amount > 0
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(party_id)
        .bind(party_type.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to fetch ledger entries: {}", e)))?;

        rows.into_iter().map(EntryRow::into_entry).collect()
    }

    async fn find_outstanding(&self, party_type: PartyType) -> Result<Vec<OutstandingEntry>> {
        let party_table = match party_type {
            PartyType::Customer => "customers",
            PartyType::Supplier => "suppliers",
        };

        let sql = format!(
            r#"
            SELECT l.id, l.party_id, l.party_type, l.invoice_id, l.invoice_type,
                   l.total_amount, l.paid_amount, l.balance_amount, l.status,
                   l.due_date, l.created_at, l.updated_at,
                   p.name AS party_name
            FROM credit_ledgers l
            JOIN {} p ON p.id = l.party_id
            WHERE l.party_type = ? AND l.balance_amount > 0
            ORDER BY l.created_at DESC
            "#,
            party_table
        );

        let rows = sqlx::query_as::<_, OutstandingRow>(&sql)
            .bind(party_type.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::internal(format!("Failed to fetch outstanding entries: {}", e))
            })?;

        rows.into_iter()
            .map(|row| {
                Ok(OutstandingEntry {
                    party_name: row.party_name.clone(),
                    entry: row.entry.into_entry()?,
                })
            })
            .collect()
    }

    async fn commit_allocation(
        &self,
        payment: &Payment,
        entries: &[CreditLedgerEntry],
        allocations: &[PaymentAllocation],
        credit_note: Option<&CreditNote>,
    ) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start transaction: {}", e)))?;

        for entry in entries {
            let applied = allocations
                .iter()
                .find(|a| a.ledger_entry_id == entry.id)
                .map(|a| a.amount)
                .ok_or_else(|| {
                    AppError::internal(format!("Entry {} has no allocation record", entry.id))
                })?;

            // Lock the row and confirm nobody allocated against it since the
            // fetch. A mismatch means a concurrent allocation won; this one
            // rolls back and the caller may retry.
            let locked = sqlx::query_as::<_, BalanceRow>(
                "SELECT paid_amount, balance_amount FROM credit_ledgers WHERE id = ? FOR UPDATE",
            )
            .bind(&entry.id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| AppError::internal(format!("Failed to lock ledger entry: {}", e)))?
            .ok_or_else(|| AppError::not_found(format!("Ledger entry '{}'", entry.id)))?;

            let expected_prior_paid = entry.paid_amount - applied;
            let expected_prior_balance = entry.balance_amount + applied;
            if locked.paid_amount != expected_prior_paid
                || locked.balance_amount != expected_prior_balance
            {
                return Err(AppError::conflict(format!(
                    "Ledger entry {} was modified by a concurrent allocation",
                    entry.id
                )));
            }

            sqlx::query(
                r#"
                UPDATE credit_ledgers
                SET paid_amount = ?, balance_amount = ?, status = ?, updated_at = ?
                WHERE id = ?
                "#,
            )
            .bind(entry.paid_amount)
            .bind(entry.balance_amount)
            .bind(entry.status.to_string())
            .bind(entry.updated_at)
            .bind(&entry.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::internal(format!("Failed to update ledger entry: {}", e)))?;
        }

        sqlx::query(
            r#"
            INSERT INTO payments (
                id, party_id, party_type, amount, payment_date,
                payment_mode, reference_number, notes
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.party_id)
        .bind(payment.party_type.to_string())
        .bind(payment.amount)
        .bind(payment.payment_date)
        .bind(payment.payment_mode.to_string())
        .bind(&payment.reference_number)
        .bind(&payment.notes)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::conflict(format!(
                        "Payment reference '{}' was already recorded",
                        payment.reference_number
                    ));
                }
            }
            AppError::internal(format!("Failed to insert payment: {}", e))
        })?;

        for allocation in allocations {
            sqlx::query(
                r#"
                INSERT INTO payment_allocations (id, payment_id, ledger_entry_id, amount)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(&allocation.id)
            .bind(&allocation.payment_id)
            .bind(&allocation.ledger_entry_id)
            .bind(allocation.amount)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::internal(format!("Failed to insert allocation: {}", e)))?;
        }

        if let Some(note) = credit_note {
            sqlx::query(
                r#"
                INSERT INTO credit_notes (
                    id, party_id, party_type, amount, reference_number, notes, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&note.id)
            .bind(&note.party_id)
            .bind(note.party_type.to_string())
            .bind(note.amount)
            .bind(&note.reference_number)
            .bind(&note.notes)
            .bind(note.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::internal(format!("Failed to insert credit note: {}", e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::internal(format!("Failed to commit allocation: {}", e)))?;

        Ok(())
    }
}

// Helper structs for database mapping

#[derive(Debug, FromRow)]
struct EntryRow {
    id: String,
    party_id: String,
    party_type: String,
    invoice_id: String,
    invoice_type: String,
    total_amount: Decimal,
    paid_amount: Decimal,
    balance_amount: Decimal,
    status: String,
    due_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EntryRow {
    fn into_entry(self) -> Result<CreditLedgerEntry> {
        Ok(CreditLedgerEntry {
            id: self.id,
            party_id: self.party_id,
            party_type: PartyType::from_str(&self.party_type)
                .map_err(AppError::internal)?,
            invoice_id: self.invoice_id,
            invoice_type: InvoiceType::from_str(&self.invoice_type)
                .map_err(AppError::internal)?,
            total_amount: self.total_amount,
            paid_amount: self.paid_amount,
            balance_amount: self.balance_amount,
            status: LedgerStatus::from_str(&self.status).map_err(AppError::internal)?,
            due_date: self.due_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct OutstandingRow {
    #[sqlx(flatten)]
    entry: EntryRow,
    party_name: String,
}

#[derive(Debug, FromRow)]
struct BalanceRow {
    paid_amount: Decimal,
    balance_amount: Decimal,
}
