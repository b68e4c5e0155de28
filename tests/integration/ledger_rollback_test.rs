use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use bizflow::core::{AppError, PaymentMode};
use bizflow::modules::ledger::models::{
    CreditLedgerEntry, InvoiceType, LedgerStatus, PartyType,
};
use bizflow::modules::ledger::services::{AllocatePaymentRequest, PaymentService};

#[path = "../helpers/mod.rs"]
mod helpers;
use helpers::MemoryLedgerStore;

fn entry(total: Decimal, age_days: i64) -> CreditLedgerEntry {
    let mut e = CreditLedgerEntry::new(
        "cust-1".to_string(),
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

fn request(amount: Decimal) -> AllocatePaymentRequest {
    AllocatePaymentRequest {
        party_id: "cust-1".to_string(),
        party_type: PartyType::Customer,
        amount,
        payment_mode: PaymentMode::Online,
        notes: None,
    }
}

#[actix_web::test]
async fn failed_commit_leaves_ledger_untouched() {
    let store = Arc::new(MemoryLedgerStore::new());
    store.seed_entry(entry(dec!(300), 20));
    store.seed_entry(entry(dec!(500), 5));
    let service = PaymentService::new(store.clone());

    store.fail_next_commit();
    let result = service.allocate_payment(request(dec!(600))).await;
    assert!(matches!(result, Err(AppError::Internal(_))));

    // No partial state: balances, payments, allocations all as before
    let entries = store.entries();
    assert!(entries.iter().all(|e| e.paid_amount == Decimal::ZERO));
    assert!(entries.iter().all(|e| e.status == LedgerStatus::Open));
    assert_eq!(store.payments().len(), 0);
    assert_eq!(store.allocations().len(), 0);
    assert_eq!(store.commit_count(), 0);
}

#[actix_web::test]
async fn failed_overpayment_writes_no_credit_note() {
    let store = Arc::new(MemoryLedgerStore::new());
    store.seed_entry(entry(dec!(100), 3));
    let service = PaymentService::new(store.clone());

    store.fail_next_commit();
    let result = service.allocate_payment(request(dec!(250))).await;
    assert!(result.is_err());
    assert_eq!(store.credit_notes().len(), 0);
    assert_eq!(store.entries()[0].balance_amount, dec!(100));
}

#[actix_web::test]
async fn retry_after_failure_succeeds_cleanly() {
    let store = Arc::new(MemoryLedgerStore::new());
    store.seed_entry(entry(dec!(400), 10));
    let service = PaymentService::new(store.clone());

    store.fail_next_commit();
    assert!(service.allocate_payment(request(dec!(400))).await.is_err());

    // The ledger rolled back, so the same payment applies in full
    let result = service.allocate_payment(request(dec!(400))).await.unwrap();
    assert_eq!(result.allocations.len(), 1);
    assert_eq!(result.allocations[0].amount, dec!(400));

    let entries = store.entries();
    assert_eq!(entries[0].status, LedgerStatus::Closed);
    assert_eq!(store.payments().len(), 1);
    assert_eq!(store.commit_count(), 1);
}
