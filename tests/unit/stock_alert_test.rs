use rust_decimal_macros::dec;

use bizflow::modules::catalog::models::{
    GstApplicability, Product, ProductInput, StockAlert, StockSeverity,
};

fn product(stock: i32, reorder: Option<i32>) -> Product {
    ProductInput {
        sku: format!("SKU-{}", stock),
        name: "Veneer Sheet 8x4".to_string(),
        category: Some("Veneers".to_string()),
        description: None,
        price: dec!(850),
        cost_price: Some(dec!(600)),
        default_gst_rate: Some(dec!(18)),
        gst_applicability: GstApplicability::Gst,
        quantity_in_stock: stock,
        unit: "pcs".to_string(),
        reorder_level: reorder,
        barcode: None,
        size: Some("8x4".to_string()),
        thickness: None,
    }
    .into_product(dec!(18))
    .unwrap()
}

#[test]
fn out_of_stock_is_most_severe() {
    let alert = StockAlert::from_product(&product(0, Some(20))).unwrap();
    assert_eq!(alert.severity, StockSeverity::OutOfStock);
}

#[test]
fn half_of_reorder_level_or_less_is_very_low() {
    assert_eq!(
        product(10, Some(20)).stock_severity(),
        Some(StockSeverity::VeryLow)
    );
    assert_eq!(
        product(1, Some(20)).stock_severity(),
        Some(StockSeverity::VeryLow)
    );
}

#[test]
fn between_half_and_reorder_level_is_low() {
    assert_eq!(
        product(11, Some(20)).stock_severity(),
        Some(StockSeverity::Low)
    );
    assert_eq!(
        product(20, Some(20)).stock_severity(),
        Some(StockSeverity::Low)
    );
}

#[test]
fn above_reorder_level_raises_no_alert() {
    assert_eq!(product(21, Some(20)).stock_severity(), None);
    assert!(StockAlert::from_product(&product(21, Some(20))).is_none());
}

#[test]
fn products_without_reorder_level_never_alert() {
    assert_eq!(product(0, None).stock_severity(), None);
    assert!(StockAlert::from_product(&product(0, None)).is_none());
}

#[test]
fn odd_reorder_level_boundary() {
    // reorder 5: half rounds down, so 2 is very low and 3 is low
    assert_eq!(
        product(2, Some(5)).stock_severity(),
        Some(StockSeverity::VeryLow)
    );
    assert_eq!(
        product(3, Some(5)).stock_severity(),
        Some(StockSeverity::Low)
    );
}

#[test]
fn alert_carries_product_identity() {
    let p = product(4, Some(20));
    let alert = StockAlert::from_product(&p).unwrap();
    assert_eq!(alert.product_id, p.id);
    assert_eq!(alert.sku, p.sku);
    assert_eq!(alert.quantity_in_stock, 4);
    assert_eq!(alert.reorder_level, 20);
}
