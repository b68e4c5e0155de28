// Credit ledger module: FIFO payment allocation across open invoice
// balances, with overpayment held as credit notes.

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{CreditLedgerEntry, CreditNote, LedgerStatus, PartyType, Payment, PaymentAllocation};
pub use repositories::{LedgerRepository, LedgerStore};
pub use services::{AllocatePaymentRequest, AllocationResult, PaymentService};
