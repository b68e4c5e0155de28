use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use bizflow::core::{PaymentMode, PaymentStatus};
use bizflow::modules::purchases::models::{
    PurchaseInvoice, PurchaseItem, PurchaseItemInput, PurchaseKind,
};

fn line(qty: i32, cost: Decimal, rate: Decimal, kind: PurchaseKind) -> PurchaseItem {
    PurchaseItemInput {
        product_id: "prod-1".to_string(),
        quantity: qty,
        unit_cost: cost,
        gst_rate: rate,
    }
    .into_item("pur-1", "MDF Board", kind)
    .unwrap()
}

fn purchase(
    kind: PurchaseKind,
    items: &[PurchaseItem],
    paid: Decimal,
    mode: PaymentMode,
) -> PurchaseInvoice {
    PurchaseInvoice::from_items(
        kind,
        ("sup-1".to_string(), "Gupta Timber Mart".to_string()),
        Some("GT/2025/0412".to_string()),
        NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
        items,
        paid,
        mode,
        None,
    )
    .unwrap()
}

#[test]
fn gst_purchase_totals_include_tax() {
    let items = vec![
        line(10, dec!(100), dec!(18), PurchaseKind::Gst),
        line(5, dec!(200), dec!(12), PurchaseKind::Gst),
    ];
    let p = purchase(PurchaseKind::Gst, &items, dec!(0), PaymentMode::Credit);
    assert_eq!(p.subtotal, dec!(2000));
    assert_eq!(p.gst_total, dec!(300));
    assert_eq!(p.grand_total, dec!(2300));
}

#[test]
fn non_gst_purchase_has_zero_tax_regardless_of_rate() {
    let items = vec![line(10, dec!(100), dec!(18), PurchaseKind::NonGst)];
    let p = purchase(PurchaseKind::NonGst, &items, dec!(0), PaymentMode::Credit);
    assert_eq!(p.gst_total, Decimal::ZERO);
    assert_eq!(p.grand_total, dec!(1000));
}

#[test]
fn numbering_follows_purchase_kind() {
    let gst_items = vec![line(1, dec!(100), dec!(18), PurchaseKind::Gst)];
    let gst = purchase(PurchaseKind::Gst, &gst_items, dec!(0), PaymentMode::Cash);
    assert!(gst.purchase_number.starts_with("GP-"));

    let plain_items = vec![line(1, dec!(100), dec!(0), PurchaseKind::NonGst)];
    let plain = purchase(PurchaseKind::NonGst, &plain_items, dec!(0), PaymentMode::Cash);
    assert!(plain.purchase_number.starts_with("NGP-"));
}

#[test]
fn credit_purchase_ignores_stated_payment() {
    let items = vec![line(10, dec!(100), dec!(18), PurchaseKind::Gst)];
    let p = purchase(PurchaseKind::Gst, &items, dec!(1180), PaymentMode::Credit);
    assert_eq!(p.amount_paid, Decimal::ZERO);
    assert_eq!(p.balance_due, dec!(1180));
    assert_eq!(p.payment_status, PaymentStatus::Pending);
    assert!(p.needs_ledger_entry());
}

#[test]
fn settled_purchase_needs_no_ledger_entry() {
    let items = vec![line(10, dec!(100), dec!(18), PurchaseKind::Gst)];
    let p = purchase(PurchaseKind::Gst, &items, dec!(1180), PaymentMode::Online);
    assert_eq!(p.payment_status, PaymentStatus::Paid);
    assert_eq!(p.balance_due, Decimal::ZERO);
    assert!(!p.needs_ledger_entry());
}

#[test]
fn partly_paid_purchase_tracks_balance() {
    let items = vec![line(10, dec!(100), dec!(18), PurchaseKind::Gst)];
    let p = purchase(PurchaseKind::Gst, &items, dec!(500), PaymentMode::Cash);
    assert_eq!(p.payment_status, PaymentStatus::PartiallyPaid);
    assert_eq!(p.balance_due, dec!(680));
    assert!(p.needs_ledger_entry());
}

#[test]
fn zero_quantity_line_is_rejected() {
    let result = PurchaseItemInput {
        product_id: "prod-1".to_string(),
        quantity: 0,
        unit_cost: dec!(100),
        gst_rate: dec!(18),
    }
    .into_item("pur-1", "MDF Board", PurchaseKind::Gst);
    assert!(result.is_err());
}
