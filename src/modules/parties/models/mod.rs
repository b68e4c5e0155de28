pub mod party;

pub use party::{validate_gstin, Customer, PartyInput, Supplier};
