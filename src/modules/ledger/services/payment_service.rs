use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use super::payment_allocator::PaymentAllocator;
use crate::core::{money, AppError, PaymentMode, Result};
use crate::modules::ledger::models::{
    CreditLedgerEntry, CreditNote, OutstandingEntry, PartyType, Payment, PaymentAllocation,
};
use crate::modules::ledger::repositories::LedgerStore;

/// Request to apply one payment against a party's outstanding ledger
#[derive(Debug, Clone, Deserialize)]
pub struct AllocatePaymentRequest {
    pub party_id: String,
    pub party_type: PartyType,
    pub amount: Decimal,
    #[serde(default = "PaymentMode::default_payment_mode")]
    pub payment_mode: PaymentMode,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Result of a successful allocation
#[derive(Debug, Clone, Serialize)]
pub struct AllocationResult {
    pub payment: Payment,
    pub allocations: Vec<PaymentAllocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_note: Option<CreditNote>,
    /// Ledger entries touched by this payment, in allocation order,
    /// with their post-allocation state
    pub entries: Vec<CreditLedgerEntry>,
}

/// Orchestrates payment allocation against the ledger store.
///
/// Validation happens before any store access; the store's
/// `commit_allocation` makes the write path all-or-nothing, so a failure
/// partway through leaves no partial allocation visible.
pub struct PaymentService {
    store: Arc<dyn LedgerStore>,
}

impl PaymentService {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Applies a payment to the party's open entries, oldest first.
    ///
    /// # Errors
    /// * `InvalidAmount` - amount is zero or negative; rejected before any
    ///   store interaction
    /// * `NoOutstandingBalance` - the party has no open entries; no payment
    ///   row is created
    /// * `Conflict` / `Database` - the unit of work failed; nothing persists
    pub async fn allocate_payment(
        &self,
        request: AllocatePaymentRequest,
    ) -> Result<AllocationResult> {
        // Pre-checks, before the fetch
        if request.party_id.trim().is_empty() {
            return Err(AppError::validation("Party ID cannot be empty"));
        }
        money::require_positive(request.amount, "Payment amount")?;

        let mut entries = self
            .store
            .find_open_entries(&request.party_id, request.party_type)
            .await?;

        if entries.is_empty() {
            warn!(
                party_id = %request.party_id,
                party_type = %request.party_type,
                "Payment rejected: no outstanding balance"
            );
            return Err(AppError::NoOutstandingBalance(request.party_id));
        }

        let payment = Payment::new(
            request.party_id,
            request.party_type,
            request.amount,
            request.payment_mode,
            request.notes,
        )?;

        let outcome = PaymentAllocator::allocate(&payment, &mut entries)?;

        // Only entries that actually received part of the payment are
        // persisted and returned
        let touched: Vec<CreditLedgerEntry> = entries
            .into_iter()
            .filter(|e| outcome.allocations.iter().any(|a| a.ledger_entry_id == e.id))
            .collect();

        self.store
            .commit_allocation(
                &payment,
                &touched,
                &outcome.allocations,
                outcome.credit_note.as_ref(),
            )
            .await?;

        info!(
            payment_id = %payment.id,
            reference = %payment.reference_number,
            party_id = %payment.party_id,
            amount = %payment.amount,
            entries_touched = touched.len(),
            credit_note = outcome.credit_note.is_some(),
            "Payment allocated"
        );

        Ok(AllocationResult {
            payment,
            allocations: outcome.allocations,
            credit_note: outcome.credit_note,
            entries: touched,
        })
    }

    /// Open entries for one party, oldest first
    pub async fn open_entries(
        &self,
        party_id: &str,
        party_type: PartyType,
    ) -> Result<Vec<CreditLedgerEntry>> {
        self.store.find_open_entries(party_id, party_type).await
    }

    /// Outstanding credits across all parties of a type, joined with names
    pub async fn outstanding(&self, party_type: PartyType) -> Result<Vec<OutstandingEntry>> {
        self.store.find_outstanding(party_type).await
    }
}
