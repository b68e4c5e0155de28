// A credit-ledger entry tracks the unpaid balance of one invoice for one
// party. Entries are created when a credit invoice is issued and mutated
// only by the payment allocator until the balance reaches zero.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::core::{AppError, Result};

/// Which side of the counter a party sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyType {
    Customer,
    Supplier,
}

impl fmt::Display for PartyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartyType::Customer => write!(f, "customer"),
            PartyType::Supplier => write!(f, "supplier"),
        }
    }
}

impl FromStr for PartyType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "customer" => Ok(PartyType::Customer),
            "supplier" => Ok(PartyType::Supplier),
            _ => Err(format!("Invalid party type: {}", s)),
        }
    }
}

/// Kind of invoice a ledger entry originates from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceType {
    Sales,
    Purchase,
}

impl fmt::Display for InvoiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvoiceType::Sales => write!(f, "sales"),
            InvoiceType::Purchase => write!(f, "purchase"),
        }
    }
}

impl FromStr for InvoiceType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "sales" => Ok(InvoiceType::Sales),
            "purchase" => Ok(InvoiceType::Purchase),
            _ => Err(format!("Invalid invoice type: {}", s)),
        }
    }
}

/// Ledger entry lifecycle. `Closed` is terminal; closed entries are never
/// selected by the allocator again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerStatus {
    Open,
    Closed,
}

impl fmt::Display for LedgerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerStatus::Open => write!(f, "Open"),
            LedgerStatus::Closed => write!(f, "Closed"),
        }
    }
}

impl FromStr for LedgerStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Open" => Ok(LedgerStatus::Open),
            "Closed" => Ok(LedgerStatus::Closed),
            _ => Err(format!("Invalid ledger status: {}", s)),
        }
    }
}

/// One outstanding invoice balance owed by or to a party
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditLedgerEntry {
    pub id: String,
    pub party_id: String,
    pub party_type: PartyType,
    pub invoice_id: String,
    pub invoice_type: InvoiceType,
    /// Original invoice amount, fixed at creation
    pub total_amount: Decimal,
    /// Cumulative amount paid so far, monotonically non-decreasing
    pub paid_amount: Decimal,
    /// Always exactly `total_amount - paid_amount`, never negative
    pub balance_amount: Decimal,
    pub status: LedgerStatus,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CreditLedgerEntry {
    /// Opens a new entry for an unpaid (or partly paid) invoice
    pub fn new(
        party_id: String,
        party_type: PartyType,
        invoice_id: String,
        invoice_type: InvoiceType,
        total_amount: Decimal,
        paid_amount: Decimal,
        due_date: Option<NaiveDate>,
    ) -> Result<Self> {
        if party_id.trim().is_empty() {
            return Err(AppError::validation("Party ID cannot be empty"));
        }
        if total_amount <= Decimal::ZERO {
            return Err(AppError::validation(
                "Ledger entry total must be greater than zero",
            ));
        }
        if paid_amount < Decimal::ZERO || paid_amount > total_amount {
            return Err(AppError::validation(format!(
                "Paid amount {} is outside 0..={}",
                paid_amount, total_amount
            )));
        }

        let balance_amount = total_amount - paid_amount;
        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            party_id,
            party_type,
            invoice_id,
            invoice_type,
            total_amount,
            paid_amount,
            balance_amount,
            status: if balance_amount == Decimal::ZERO {
                LedgerStatus::Closed
            } else {
                LedgerStatus::Open
            },
            due_date,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_open(&self) -> bool {
        self.status == LedgerStatus::Open
    }

    /// Applies part of a payment to this entry. The caller guarantees
    /// `applied <= balance_amount`; anything else is a programming error in
    /// the allocator and is rejected here rather than driving the balance
    /// negative.
    pub fn apply_payment(&mut self, applied: Decimal) -> Result<()> {
        if applied <= Decimal::ZERO {
            return Err(AppError::internal(format!(
                "Applied amount must be positive, got {}",
                applied
            )));
        }
        if applied > self.balance_amount {
            return Err(AppError::internal(format!(
                "Applied {} exceeds balance {} on entry {}",
                applied, self.balance_amount, self.id
            )));
        }

        self.paid_amount += applied;
        self.balance_amount -= applied;
        self.status = if self.balance_amount == Decimal::ZERO {
            LedgerStatus::Closed
        } else {
            LedgerStatus::Open
        };
        self.updated_at = Utc::now();

        debug_assert!(self.check_invariants().is_ok());
        Ok(())
    }

    /// Verifies the arithmetic and status invariants of this entry
    pub fn check_invariants(&self) -> Result<()> {
        if self.balance_amount != self.total_amount - self.paid_amount {
            return Err(AppError::internal(format!(
                "Entry {}: balance {} != total {} - paid {}",
                self.id, self.balance_amount, self.total_amount, self.paid_amount
            )));
        }
        if self.balance_amount < Decimal::ZERO {
            return Err(AppError::internal(format!(
                "Entry {}: negative balance {}",
                self.id, self.balance_amount
            )));
        }
        let expected = if self.balance_amount == Decimal::ZERO {
            LedgerStatus::Closed
        } else {
            LedgerStatus::Open
        };
        if self.status != expected {
            return Err(AppError::internal(format!(
                "Entry {}: status {} does not match balance {}",
                self.id, self.status, self.balance_amount
            )));
        }
        Ok(())
    }
}

/// Open ledger entry joined with its party's name, for the outstanding
/// credits report
#[derive(Debug, Clone, Serialize)]
pub struct OutstandingEntry {
    #[serde(flatten)]
    pub entry: CreditLedgerEntry,
    pub party_name: String,
}
