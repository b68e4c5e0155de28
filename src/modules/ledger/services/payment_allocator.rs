use rust_decimal::Decimal;
use tracing::debug;

use crate::core::{AppError, Result};
use crate::modules::ledger::models::{CreditLedgerEntry, CreditNote, Payment, PaymentAllocation};

/// Distributes one payment across a party's open ledger entries,
/// oldest first.
///
/// This is the arithmetic core of the credit ledger: it operates on entries
/// already fetched into memory and performs no I/O. The service layer wraps
/// it in the store's atomic unit of work.
pub struct PaymentAllocator;

/// Everything one allocation produces: the mutated entries are updated in
/// place by `allocate`, the rows to append come back here.
#[derive(Debug, Clone)]
pub struct AllocationOutcome {
    pub allocations: Vec<PaymentAllocation>,
    pub credit_note: Option<CreditNote>,
}

impl PaymentAllocator {
    /// Applies `payment` to `entries` in non-decreasing `created_at` order.
    ///
    /// Entries are expected in fetch order (ascending `created_at`); a stable
    /// sort re-establishes that order without disturbing the tie-break for
    /// entries created at the same instant. Each touched entry gets one
    /// allocation record of the amount applied to it. Whatever remains after
    /// every entry is closed becomes a credit note for the party.
    ///
    /// # Errors
    /// * `NoOutstandingBalance` if no entry has an open balance
    /// * `Internal` if any entry arrives with broken invariants
    pub fn allocate(
        payment: &Payment,
        entries: &mut [CreditLedgerEntry],
    ) -> Result<AllocationOutcome> {
        for entry in entries.iter() {
            entry.check_invariants()?;
            if entry.party_id != payment.party_id {
                return Err(AppError::internal(format!(
                    "Entry {} belongs to party {}, not {}",
                    entry.id, entry.party_id, payment.party_id
                )));
            }
        }

        entries.sort_by_key(|e| e.created_at);

        let total_outstanding: Decimal = entries.iter().map(|e| e.balance_amount).sum();
        if total_outstanding <= Decimal::ZERO {
            return Err(AppError::NoOutstandingBalance(payment.party_id.clone()));
        }

        let mut remaining = payment.amount;
        let mut allocations = Vec::new();

        for entry in entries.iter_mut() {
            if remaining <= Decimal::ZERO {
                break;
            }
            if entry.balance_amount <= Decimal::ZERO {
                continue;
            }

            let applied = remaining.min(entry.balance_amount);
            entry.apply_payment(applied)?;
            allocations.push(PaymentAllocation::new(
                payment.id.clone(),
                entry.id.clone(),
                applied,
            ));
            remaining -= applied;

            debug!(
                entry_id = %entry.id,
                applied = %applied,
                balance = %entry.balance_amount,
                "Applied payment to ledger entry"
            );
        }

        // Overpayment is allowed; the excess is held as a credit note
        let credit_note = if remaining > Decimal::ZERO {
            Some(CreditNote::new(
                payment.party_id.clone(),
                payment.party_type,
                remaining,
                Some(format!(
                    "Overpayment on payment {}",
                    payment.reference_number
                )),
            )?)
        } else {
            None
        };

        let outcome = AllocationOutcome {
            allocations,
            credit_note,
        };
        debug_assert_eq!(outcome.allocated_total() + outcome.credit_total(), payment.amount);

        Ok(outcome)
    }
}

impl AllocationOutcome {
    pub fn allocated_total(&self) -> Decimal {
        self.allocations.iter().map(|a| a.amount).sum()
    }

    pub fn credit_total(&self) -> Decimal {
        self.credit_note
            .as_ref()
            .map(|n| n.amount)
            .unwrap_or(Decimal::ZERO)
    }
}
