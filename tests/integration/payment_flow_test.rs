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

fn entry(party_id: &str, total: Decimal, age_days: i64) -> CreditLedgerEntry {
    let mut e = CreditLedgerEntry::new(
        party_id.to_string(),
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

fn request(party_id: &str, amount: Decimal) -> AllocatePaymentRequest {
    AllocatePaymentRequest {
        party_id: party_id.to_string(),
        party_type: PartyType::Customer,
        amount,
        payment_mode: PaymentMode::Cash,
        notes: None,
    }
}

fn service_with(entries: Vec<CreditLedgerEntry>) -> (PaymentService, Arc<MemoryLedgerStore>) {
    let store = Arc::new(MemoryLedgerStore::new());
    for e in entries {
        store.seed_entry(e);
    }
    (PaymentService::new(store.clone()), store)
}

#[actix_web::test]
async fn payment_settles_entries_oldest_first() {
    let (service, store) = service_with(vec![
        entry("cust-1", dec!(300), 30),
        entry("cust-1", dec!(500), 10),
        entry("cust-1", dec!(200), 60),
    ]);

    let result = service
        .allocate_payment(request("cust-1", dec!(450)))
        .await
        .unwrap();

    // 60-day entry (200) closes, 30-day entry (300) takes the rest
    assert_eq!(result.allocations.len(), 2);
    assert_eq!(result.allocations[0].amount, dec!(200));
    assert_eq!(result.allocations[1].amount, dec!(250));
    assert!(result.credit_note.is_none());
    assert!(result.payment.reference_number.starts_with("PAY-"));

    let entries = store.entries();
    let oldest = entries.iter().find(|e| e.total_amount == dec!(200)).unwrap();
    assert_eq!(oldest.status, LedgerStatus::Closed);
    let middle = entries.iter().find(|e| e.total_amount == dec!(300)).unwrap();
    assert_eq!(middle.balance_amount, dec!(50));
    let newest = entries.iter().find(|e| e.total_amount == dec!(500)).unwrap();
    assert_eq!(newest.balance_amount, dec!(500));
}

#[actix_web::test]
async fn overpayment_persists_a_credit_note() {
    let (service, store) = service_with(vec![entry("cust-1", dec!(400), 5)]);

    let result = service
        .allocate_payment(request("cust-1", dec!(1000)))
        .await
        .unwrap();

    let note = result.credit_note.expect("expected credit note");
    assert_eq!(note.amount, dec!(600));
    assert_eq!(store.credit_notes().len(), 1);
    assert_eq!(store.payments().len(), 1);
    assert!(store.entries().iter().all(|e| e.status == LedgerStatus::Closed));
}

#[actix_web::test]
async fn invalid_amount_never_reaches_the_store() {
    let (service, store) = service_with(vec![entry("cust-1", dec!(400), 5)]);

    let zero = service.allocate_payment(request("cust-1", dec!(0))).await;
    assert!(matches!(zero, Err(AppError::InvalidAmount(_))));

    let negative = service.allocate_payment(request("cust-1", dec!(-10))).await;
    assert!(matches!(negative, Err(AppError::InvalidAmount(_))));

    assert_eq!(store.payments().len(), 0);
    assert_eq!(store.commit_count(), 0);
}

#[actix_web::test]
async fn party_without_open_entries_is_rejected() {
    let (service, store) = service_with(vec![entry("cust-1", dec!(400), 5)]);

    let result = service.allocate_payment(request("cust-2", dec!(100))).await;
    assert!(matches!(result, Err(AppError::NoOutstandingBalance(_))));
    assert_eq!(store.payments().len(), 0);
}

#[actix_web::test]
async fn payments_only_touch_their_own_party() {
    let (service, store) = service_with(vec![
        entry("cust-1", dec!(300), 10),
        entry("cust-2", dec!(300), 20),
    ]);

    service
        .allocate_payment(request("cust-1", dec!(300)))
        .await
        .unwrap();

    let entries = store.entries();
    let other = entries.iter().find(|e| e.party_id == "cust-2").unwrap();
    assert_eq!(other.balance_amount, dec!(300));
    assert_eq!(other.status, LedgerStatus::Open);
}

#[actix_web::test]
async fn consecutive_payments_drain_the_ledger() {
    let (service, store) = service_with(vec![
        entry("cust-1", dec!(250), 10),
        entry("cust-1", dec!(250), 5),
    ]);

    service
        .allocate_payment(request("cust-1", dec!(200)))
        .await
        .unwrap();
    service
        .allocate_payment(request("cust-1", dec!(300)))
        .await
        .unwrap();

    assert!(store.entries().iter().all(|e| e.status == LedgerStatus::Closed));
    assert_eq!(store.commit_count(), 2);

    // Ledger is empty now, a third payment has nothing to settle
    let third = service.allocate_payment(request("cust-1", dec!(50))).await;
    assert!(matches!(third, Err(AppError::NoOutstandingBalance(_))));
}

#[actix_web::test]
async fn open_entries_come_back_oldest_first() {
    let (service, _store) = service_with(vec![
        entry("cust-1", dec!(100), 1),
        entry("cust-1", dec!(200), 50),
        entry("cust-1", dec!(300), 25),
    ]);

    let open = service
        .open_entries("cust-1", PartyType::Customer)
        .await
        .unwrap();
    assert_eq!(open.len(), 3);
    assert_eq!(open[0].total_amount, dec!(200));
    assert_eq!(open[1].total_amount, dec!(300));
    assert_eq!(open[2].total_amount, dec!(100));
}
