pub mod ledger_entry;
pub mod payment;

pub use ledger_entry::{
    CreditLedgerEntry, InvoiceType, LedgerStatus, OutstandingEntry, PartyType,
};
pub use payment::{CreditNote, Payment, PaymentAllocation};
