pub mod ledger_repository;

use async_trait::async_trait;

use crate::core::Result;
use crate::modules::ledger::models::{
    CreditLedgerEntry, CreditNote, OutstandingEntry, PartyType, Payment, PaymentAllocation,
};

pub use ledger_repository::LedgerRepository;

/// Persistence contract the payment allocator depends on.
///
/// `commit_allocation` is the atomic unit of work: either every ledger
/// update, the payment, its allocations, and the optional credit note
/// persist, or none of them do. The MySQL implementation backs this with a
/// transaction and row locks; tests substitute an in-memory store with the
/// same all-or-nothing behavior.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Open entries for one party, ascending by creation time (stable order)
    async fn find_open_entries(
        &self,
        party_id: &str,
        party_type: PartyType,
    ) -> Result<Vec<CreditLedgerEntry>>;

    /// Open entries for every party of a type, joined with the party name
    async fn find_outstanding(&self, party_type: PartyType) -> Result<Vec<OutstandingEntry>>;

    /// Persists one allocation as a single all-or-nothing unit
    async fn commit_allocation(
        &self,
        payment: &Payment,
        entries: &[CreditLedgerEntry],
        allocations: &[PaymentAllocation],
        credit_note: Option<&CreditNote>,
    ) -> Result<()>;
}
