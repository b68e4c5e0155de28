pub mod purchase;

pub use purchase::{
    PurchaseInvoice, PurchaseInvoiceInput, PurchaseItem, PurchaseItemInput, PurchaseKind,
};
