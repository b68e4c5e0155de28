pub mod error;
pub mod money;
pub mod reference;
pub mod terms;

pub use error::{AppError, Result};
pub use terms::{PaymentMode, PaymentStatus};
