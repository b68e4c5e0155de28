pub mod catalog;
pub mod ledger;
pub mod parties;
pub mod purchases;
pub mod reports;
pub mod sales;
