pub mod invoice;

pub use invoice::{GstTreatment, SalesInvoice, SalesInvoiceInput, SalesItem, SalesItemInput};
