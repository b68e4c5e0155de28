//! BizFlow small-business billing and inventory backend
//!
//! Core pieces: GST sales and purchase invoicing, stock tracking, the
//! customer/supplier credit ledger with oldest-first payment allocation,
//! and sales analytics.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use modules::catalog;
pub use modules::ledger;
pub use modules::parties;
pub use modules::purchases;
pub use modules::reports;
pub use modules::sales;
