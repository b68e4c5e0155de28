pub mod product;

pub use product::{GstApplicability, Product, ProductInput, StockAlert, StockSeverity};
