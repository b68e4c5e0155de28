//! In-memory `LedgerStore` for exercising the payment flow without MySQL.
//!
//! Mirrors the production store's atomicity contract: `commit_allocation`
//! either applies every change or none. Writes land on a staged copy of the
//! state and are swapped in only on success, so an injected failure leaves
//! the visible state untouched.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use bizflow::core::{AppError, Result};
use bizflow::modules::ledger::models::{
    CreditLedgerEntry, CreditNote, OutstandingEntry, PartyType, Payment, PaymentAllocation,
};
use bizflow::modules::ledger::repositories::LedgerStore;

#[derive(Default, Clone)]
struct LedgerState {
    entries: Vec<CreditLedgerEntry>,
    payments: Vec<Payment>,
    allocations: Vec<PaymentAllocation>,
    credit_notes: Vec<CreditNote>,
}

#[derive(Default)]
pub struct MemoryLedgerStore {
    state: Mutex<LedgerState>,
    fail_next_commit: AtomicBool,
    commit_count: AtomicUsize,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_entry(&self, entry: CreditLedgerEntry) {
        self.state.lock().unwrap().entries.push(entry);
    }

    /// The next `commit_allocation` call fails after staging its writes
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    pub fn commit_count(&self) -> usize {
        self.commit_count.load(Ordering::SeqCst)
    }

    pub fn entries(&self) -> Vec<CreditLedgerEntry> {
        self.state.lock().unwrap().entries.clone()
    }

    pub fn payments(&self) -> Vec<Payment> {
        self.state.lock().unwrap().payments.clone()
    }

    pub fn allocations(&self) -> Vec<PaymentAllocation> {
        self.state.lock().unwrap().allocations.clone()
    }

    pub fn credit_notes(&self) -> Vec<CreditNote> {
        self.state.lock().unwrap().credit_notes.clone()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn find_open_entries(
        &self,
        party_id: &str,
        party_type: PartyType,
    ) -> Result<Vec<CreditLedgerEntry>> {
        let state = self.state.lock().unwrap();
        let mut open: Vec<CreditLedgerEntry> = state
            .entries
            .iter()
            .filter(|e| {
                e.party_id == party_id
                    && e.party_type == party_type
                    && e.balance_amount > rust_decimal::Decimal::ZERO
            })
            .cloned()
            .collect();
        open.sort_by_key(|e| e.created_at);
        Ok(open)
    }

    async fn find_outstanding(&self, party_type: PartyType) -> Result<Vec<OutstandingEntry>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .entries
            .iter()
            .filter(|e| {
                e.party_type == party_type && e.balance_amount > rust_decimal::Decimal::ZERO
            })
            .map(|e| OutstandingEntry {
                entry: e.clone(),
                party_name: format!("party {}", e.party_id),
            })
            .collect())
    }

    async fn commit_allocation(
        &self,
        payment: &Payment,
        entries: &[CreditLedgerEntry],
        allocations: &[PaymentAllocation],
        credit_note: Option<&CreditNote>,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();

        // Stage every write on a copy, then swap
        let mut staged = state.clone();
        for updated in entries {
            let slot = staged
                .entries
                .iter_mut()
                .find(|e| e.id == updated.id)
                .ok_or_else(|| {
                    AppError::not_found(format!("Ledger entry {} not found", updated.id))
                })?;
            *slot = updated.clone();
        }
        staged.payments.push(payment.clone());
        staged.allocations.extend_from_slice(allocations);
        if let Some(note) = credit_note {
            staged.credit_notes.push(note.clone());
        }

        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(AppError::internal("injected commit failure"));
        }

        *state = staged;
        self.commit_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
