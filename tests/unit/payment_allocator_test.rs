use chrono::{Duration, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use bizflow::core::{AppError, PaymentMode};
use bizflow::modules::ledger::models::{
    CreditLedgerEntry, InvoiceType, LedgerStatus, PartyType, Payment,
};
use bizflow::modules::ledger::services::PaymentAllocator;

fn entry(total: Decimal, age_days: i64) -> CreditLedgerEntry {
    let mut e = CreditLedgerEntry::new(
        "party-1".to_string(),
        PartyType::Customer,
        format!("inv-{}", age_days),
        InvoiceType::Sales,
        total,
        Decimal::ZERO,
        None,
    )
    .unwrap();
    e.created_at = Utc::now() - Duration::days(age_days);
    e
}

fn payment(amount: Decimal) -> Payment {
    Payment::new(
        "party-1".to_string(),
        PartyType::Customer,
        amount,
        PaymentMode::Cash,
        None,
    )
    .unwrap()
}

#[test]
fn exact_payment_closes_single_entry() {
    let mut entries = vec![entry(dec!(500), 1)];
    let outcome = PaymentAllocator::allocate(&payment(dec!(500)), &mut entries).unwrap();

    assert_eq!(outcome.allocations.len(), 1);
    assert_eq!(outcome.allocations[0].amount, dec!(500));
    assert!(outcome.credit_note.is_none());
    assert_eq!(entries[0].balance_amount, Decimal::ZERO);
    assert_eq!(entries[0].status, LedgerStatus::Closed);
}

#[test]
fn partial_payment_leaves_entry_open() {
    let mut entries = vec![entry(dec!(500), 1)];
    let outcome = PaymentAllocator::allocate(&payment(dec!(200)), &mut entries).unwrap();

    assert_eq!(outcome.allocations[0].amount, dec!(200));
    assert!(outcome.credit_note.is_none());
    assert_eq!(entries[0].paid_amount, dec!(200));
    assert_eq!(entries[0].balance_amount, dec!(300));
    assert_eq!(entries[0].status, LedgerStatus::Open);
}

#[test]
fn payment_spans_entries_oldest_first() {
    // Deliberately out of order: the allocator must sort by created_at
    let mut entries = vec![entry(dec!(300), 5), entry(dec!(400), 20), entry(dec!(200), 10)];
    let outcome = PaymentAllocator::allocate(&payment(dec!(550)), &mut entries).unwrap();

    // After sorting: 20 days old (400), 10 days old (200), 5 days old (300)
    assert_eq!(outcome.allocations.len(), 2);
    assert_eq!(outcome.allocations[0].amount, dec!(400));
    assert_eq!(outcome.allocations[1].amount, dec!(150));
    assert_eq!(outcome.allocated_total(), dec!(550));
    assert_eq!(entries[0].status, LedgerStatus::Closed);
    assert_eq!(entries[1].balance_amount, dec!(50));
    assert_eq!(entries[1].status, LedgerStatus::Open);
    assert_eq!(entries[2].balance_amount, dec!(300));
    assert!(outcome.credit_note.is_none());
}

#[test]
fn overpayment_becomes_credit_note() {
    let mut entries = vec![entry(dec!(300), 2), entry(dec!(200), 1)];
    let outcome = PaymentAllocator::allocate(&payment(dec!(700)), &mut entries).unwrap();

    assert_eq!(outcome.allocated_total(), dec!(500));
    let note = outcome.credit_note.expect("expected a credit note");
    assert_eq!(note.amount, dec!(200));
    assert!(note.reference_number.starts_with("CN-"));
    assert!(entries.iter().all(|e| e.status == LedgerStatus::Closed));
}

#[test]
fn no_open_balance_is_rejected() {
    let mut closed = entry(dec!(500), 1);
    closed.apply_payment(dec!(500)).unwrap();
    let mut entries = vec![closed];

    let result = PaymentAllocator::allocate(&payment(dec!(100)), &mut entries);
    assert!(matches!(result, Err(AppError::NoOutstandingBalance(_))));
    // Nothing was touched
    assert_eq!(entries[0].paid_amount, dec!(500));
}

#[test]
fn entry_from_another_party_is_rejected() {
    let mut foreign = entry(dec!(100), 1);
    foreign.party_id = "party-2".to_string();
    let mut entries = vec![foreign];

    let result = PaymentAllocator::allocate(&payment(dec!(50)), &mut entries);
    assert!(matches!(result, Err(AppError::Internal(_))));
}

#[test]
fn same_instant_entries_keep_fetch_order() {
    let now = Utc::now();
    let mut first = entry(dec!(100), 0);
    let mut second = entry(dec!(100), 0);
    first.created_at = now;
    second.created_at = now;
    let first_id = first.id.clone();

    let mut entries = vec![first, second];
    let outcome = PaymentAllocator::allocate(&payment(dec!(100)), &mut entries).unwrap();

    // Stable sort: the entry fetched first absorbs the payment
    assert_eq!(outcome.allocations.len(), 1);
    assert_eq!(outcome.allocations[0].ledger_entry_id, first_id);
}

#[test]
fn paisa_amounts_allocate_exactly() {
    let mut entries = vec![entry(dec!(33.33), 2), entry(dec!(66.67), 1)];
    let outcome = PaymentAllocator::allocate(&payment(dec!(100.00)), &mut entries).unwrap();

    assert_eq!(outcome.allocated_total(), dec!(100.00));
    assert!(outcome.credit_note.is_none());
    assert!(entries.iter().all(|e| e.balance_amount == Decimal::ZERO));
}

proptest! {
    /// Every paisa of the payment ends up either on an entry or in the
    /// credit note, never both, never lost.
    #[test]
    fn conservation_holds(
        totals in proptest::collection::vec(1u32..=100_000, 1..8),
        amount_paise in 1u64..=10_000_000,
    ) {
        let mut entries: Vec<CreditLedgerEntry> = totals
            .iter()
            .enumerate()
            .map(|(i, &t)| entry(Decimal::new(i64::from(t), 2), i as i64))
            .collect();
        let pay = payment(Decimal::new(amount_paise as i64, 2));
        let before: Decimal = entries.iter().map(|e| e.balance_amount).sum();

        let outcome = PaymentAllocator::allocate(&pay, &mut entries).unwrap();
        let after: Decimal = entries.iter().map(|e| e.balance_amount).sum();

        prop_assert_eq!(outcome.allocated_total() + outcome.credit_total(), pay.amount);
        prop_assert_eq!(before - after, outcome.allocated_total());
        for e in &entries {
            prop_assert!(e.balance_amount >= Decimal::ZERO);
            prop_assert_eq!(e.total_amount - e.paid_amount, e.balance_amount);
        }
    }

    /// A newer entry never receives money while an older one still has
    /// an open balance.
    #[test]
    fn oldest_first_ordering(
        totals in proptest::collection::vec(1u32..=10_000, 2..6),
        amount_paise in 1u64..=1_000_000,
    ) {
        let mut entries: Vec<CreditLedgerEntry> = totals
            .iter()
            .enumerate()
            .map(|(i, &t)| entry(Decimal::new(i64::from(t), 2), 100 - i as i64))
            .collect();
        let pay = payment(Decimal::new(amount_paise as i64, 2));

        PaymentAllocator::allocate(&pay, &mut entries).unwrap();

        // entries come back sorted oldest first; once we meet an entry
        // with a remaining balance, no later entry may have been paid
        let mut seen_open = false;
        for e in &entries {
            if seen_open {
                prop_assert_eq!(e.paid_amount, Decimal::ZERO);
            }
            if e.balance_amount > Decimal::ZERO {
                seen_open = true;
            }
        }
    }
}
