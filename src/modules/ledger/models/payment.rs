use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ledger_entry::PartyType;
use crate::core::reference;
use crate::core::{money, AppError, PaymentMode, Result};

/// Record of a single payment event against a party's ledger. Created
/// together with its allocations in one allocator invocation and never
/// mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub party_id: String,
    pub party_type: PartyType,
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub payment_mode: PaymentMode,
    /// Generated, unique; safe retry handle for resubmission
    pub reference_number: String,
    pub notes: Option<String>,
}

impl Payment {
    pub fn new(
        party_id: String,
        party_type: PartyType,
        amount: Decimal,
        payment_mode: PaymentMode,
        notes: Option<String>,
    ) -> Result<Self> {
        if party_id.trim().is_empty() {
            return Err(AppError::validation("Party ID cannot be empty"));
        }
        money::require_positive(amount, "Payment amount")?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            party_id,
            party_type,
            amount,
            payment_date: Utc::now(),
            payment_mode,
            reference_number: reference::reference_number("PAY"),
            notes,
        })
    }
}

/// The portion of one payment applied to one ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentAllocation {
    pub id: String,
    pub payment_id: String,
    pub ledger_entry_id: String,
    pub amount: Decimal,
}

impl PaymentAllocation {
    pub fn new(payment_id: String, ledger_entry_id: String, amount: Decimal) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            payment_id,
            ledger_entry_id,
            amount,
        }
    }
}

/// Payment received in excess of a party's total outstanding balance,
/// held for future offset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditNote {
    pub id: String,
    pub party_id: String,
    pub party_type: PartyType,
    pub amount: Decimal,
    pub reference_number: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CreditNote {
    pub fn new(
        party_id: String,
        party_type: PartyType,
        amount: Decimal,
        notes: Option<String>,
    ) -> Result<Self> {
        money::require_positive(amount, "Credit note amount")?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            party_id,
            party_type,
            amount,
            reference_number: reference::reference_number("CN"),
            notes,
            created_at: Utc::now(),
        })
    }
}
