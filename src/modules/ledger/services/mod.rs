pub mod payment_allocator;
pub mod payment_service;

pub use payment_allocator::{AllocationOutcome, PaymentAllocator};
pub use payment_service::{AllocatePaymentRequest, AllocationResult, PaymentService};
