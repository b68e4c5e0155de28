use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use bizflow::core::{PaymentMode, PaymentStatus};
use bizflow::modules::sales::models::{
    GstTreatment, SalesInvoice, SalesItem, SalesItemInput,
};

fn line(
    qty: i32,
    price: Decimal,
    discount: Decimal,
    rate: Decimal,
    treatment: GstTreatment,
) -> SalesItem {
    SalesItemInput {
        product_id: "prod-1".to_string(),
        quantity: qty,
        unit_price: price,
        discount,
        gst_rate: rate,
    }
    .into_item("inv-1", "Laminate Sheet", treatment)
    .unwrap()
}

fn invoice(items: &[SalesItem], paid: Decimal, mode: PaymentMode) -> SalesInvoice {
    SalesInvoice::from_items(
        Some(("cust-1".to_string(), "Sharma Traders".to_string())),
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
        GstTreatment::Exclusive,
        items,
        paid,
        mode,
        None,
    )
    .unwrap()
}

#[test]
fn exclusive_gst_is_added_on_top() {
    let item = line(3, dec!(400), dec!(0), dec!(18), GstTreatment::Exclusive);
    assert_eq!(item.taxable_amount, dec!(1200));
    assert_eq!(item.gst_amount, dec!(216));
    assert_eq!(item.line_total, dec!(1416));
}

#[test]
fn inclusive_price_splits_tax_back_out() {
    let item = line(1, dec!(590), dec!(0), dec!(18), GstTreatment::Inclusive);
    assert_eq!(item.taxable_amount, dec!(500));
    assert_eq!(item.gst_amount, dec!(90));
    assert_eq!(item.line_total, dec!(590));
}

#[test]
fn discount_reduces_taxable_base() {
    let item = line(2, dec!(250), dec!(100), dec!(12), GstTreatment::Exclusive);
    assert_eq!(item.taxable_amount, dec!(400));
    assert_eq!(item.gst_amount, dec!(48));
}

#[test]
fn zero_rate_line_carries_no_tax() {
    let item = line(5, dec!(20), dec!(0), dec!(0), GstTreatment::Exclusive);
    assert_eq!(item.gst_amount, Decimal::ZERO);
    assert_eq!(item.line_total, dec!(100));
}

#[test]
fn grand_total_is_rounded_to_whole_rupees() {
    let items = vec![line(1, dec!(99.99), dec!(0), dec!(18), GstTreatment::Exclusive)];
    let inv = invoice(&items, dec!(0), PaymentMode::Credit);

    // 99.99 + 17.9982 = 117.9882, rounds to 118 with 0.0118 round-off
    assert_eq!(inv.grand_total, dec!(118));
    assert_eq!(inv.round_off, dec!(0.0118));
    assert_eq!(inv.grand_total, inv.subtotal + inv.gst_total + inv.round_off);
}

#[test]
fn status_and_balance_track_payment() {
    let items = vec![line(1, dec!(1000), dec!(0), dec!(0), GstTreatment::Exclusive)];

    let paid = invoice(&items, dec!(1000), PaymentMode::Cash);
    assert_eq!(paid.payment_status, PaymentStatus::Paid);
    assert_eq!(paid.balance_due, Decimal::ZERO);
    assert!(!paid.needs_ledger_entry());

    let partial = invoice(&items, dec!(400), PaymentMode::Online);
    assert_eq!(partial.payment_status, PaymentStatus::PartiallyPaid);
    assert_eq!(partial.balance_due, dec!(600));
    assert!(partial.needs_ledger_entry());

    let credit = invoice(&items, dec!(0), PaymentMode::Credit);
    assert_eq!(credit.payment_status, PaymentStatus::Pending);
    assert!(credit.needs_ledger_entry());
}

#[test]
fn walk_in_sale_never_opens_credit() {
    let items = vec![line(1, dec!(500), dec!(0), dec!(0), GstTreatment::Exclusive)];
    let inv = SalesInvoice::from_items(
        None,
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
        GstTreatment::Exclusive,
        &items,
        dec!(0),
        PaymentMode::Cash,
        None,
    )
    .unwrap();
    assert!(!inv.needs_ledger_entry());
}

#[test]
fn overpaying_an_invoice_is_rejected() {
    let items = vec![line(1, dec!(100), dec!(0), dec!(0), GstTreatment::Exclusive)];
    let result = SalesInvoice::from_items(
        None,
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
        GstTreatment::Exclusive,
        &items,
        dec!(150),
        PaymentMode::Cash,
        None,
    );
    assert!(result.is_err());
}

#[test]
fn empty_invoice_is_rejected() {
    let result = SalesInvoice::from_items(
        None,
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
        GstTreatment::Exclusive,
        &[],
        dec!(0),
        PaymentMode::Cash,
        None,
    );
    assert!(result.is_err());
}
