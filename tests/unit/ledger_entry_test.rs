use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use bizflow::core::AppError;
use bizflow::modules::ledger::models::{
    CreditLedgerEntry, InvoiceType, LedgerStatus, PartyType,
};

fn open_entry(total: Decimal, paid: Decimal) -> CreditLedgerEntry {
    CreditLedgerEntry::new(
        "cust-1".to_string(),
        PartyType::Customer,
        "inv-1".to_string(),
        InvoiceType::Sales,
        total,
        paid,
        None,
    )
    .unwrap()
}

#[test]
fn balance_is_total_minus_paid() {
    let e = open_entry(dec!(1000), dec!(250));
    assert_eq!(e.balance_amount, dec!(750));
    assert_eq!(e.status, LedgerStatus::Open);
    e.check_invariants().unwrap();
}

#[test]
fn fully_paid_entry_opens_closed() {
    let e = open_entry(dec!(1000), dec!(1000));
    assert_eq!(e.balance_amount, Decimal::ZERO);
    assert_eq!(e.status, LedgerStatus::Closed);
}

#[test]
fn zero_total_is_rejected() {
    let result = CreditLedgerEntry::new(
        "cust-1".to_string(),
        PartyType::Customer,
        "inv-1".to_string(),
        InvoiceType::Sales,
        Decimal::ZERO,
        Decimal::ZERO,
        None,
    );
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[test]
fn paid_above_total_is_rejected() {
    let result = CreditLedgerEntry::new(
        "cust-1".to_string(),
        PartyType::Customer,
        "inv-1".to_string(),
        InvoiceType::Sales,
        dec!(100),
        dec!(101),
        None,
    );
    assert!(result.is_err());
}

#[test]
fn apply_payment_closes_at_zero_balance() {
    let mut e = open_entry(dec!(300), dec!(0));
    e.apply_payment(dec!(100)).unwrap();
    assert_eq!(e.status, LedgerStatus::Open);
    e.apply_payment(dec!(200)).unwrap();
    assert_eq!(e.status, LedgerStatus::Closed);
    assert_eq!(e.paid_amount, dec!(300));
    e.check_invariants().unwrap();
}

#[test]
fn apply_payment_rejects_more_than_balance() {
    let mut e = open_entry(dec!(300), dec!(250));
    assert!(e.apply_payment(dec!(51)).is_err());
    // The entry is untouched after the rejection
    assert_eq!(e.paid_amount, dec!(250));
    assert_eq!(e.balance_amount, dec!(50));
}

#[test]
fn apply_payment_rejects_non_positive_amount() {
    let mut e = open_entry(dec!(300), dec!(0));
    assert!(e.apply_payment(Decimal::ZERO).is_err());
    assert!(e.apply_payment(dec!(-5)).is_err());
}

#[test]
fn invariant_check_catches_drift() {
    let mut e = open_entry(dec!(300), dec!(100));
    e.balance_amount = dec!(150);
    assert!(e.check_invariants().is_err());
}

#[test]
fn status_strings_round_trip() {
    assert_eq!(PartyType::Customer.to_string(), "customer");
    assert_eq!(PartyType::Supplier.to_string(), "supplier");
    assert_eq!("customer".parse::<PartyType>().unwrap(), PartyType::Customer);
    assert_eq!(InvoiceType::Purchase.to_string(), "purchase");
    assert_eq!("sales".parse::<InvoiceType>().unwrap(), InvoiceType::Sales);
    assert!("vendor".parse::<PartyType>().is_err());
}
