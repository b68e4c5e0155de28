use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How an invoice or payment was settled. Shared by sales, purchases, and
/// the credit ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMode {
    Cash,
    Online,
    Credit,
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMode::Cash => write!(f, "Cash"),
            PaymentMode::Online => write!(f, "Online"),
            PaymentMode::Credit => write!(f, "Credit"),
        }
    }
}

impl PaymentMode {
    /// Serde default for request payloads that omit the mode
    pub fn default_payment_mode() -> Self {
        PaymentMode::Cash
    }
}

impl FromStr for PaymentMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Cash" => Ok(PaymentMode::Cash),
            "Online" => Ok(PaymentMode::Online),
            "Credit" => Ok(PaymentMode::Credit),
            _ => Err(format!("Invalid payment mode: {}", s)),
        }
    }
}

/// Settlement status of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Paid,
    #[serde(rename = "Partially Paid")]
    PartiallyPaid,
    Pending,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Paid => write!(f, "Paid"),
            PaymentStatus::PartiallyPaid => write!(f, "Partially Paid"),
            PaymentStatus::Pending => write!(f, "Pending"),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Paid" => Ok(PaymentStatus::Paid),
            "Partially Paid" => Ok(PaymentStatus::PartiallyPaid),
            "Pending" => Ok(PaymentStatus::Pending),
            _ => Err(format!("Invalid payment status: {}", s)),
        }
    }
}

impl PaymentStatus {
    /// Derives the status from how much of the grand total has been paid.
    /// Anything at or above the total counts as settled; overpayment is
    /// handled by the credit ledger, not the invoice row.
    pub fn derive(grand_total: rust_decimal::Decimal, amount_paid: rust_decimal::Decimal) -> Self {
        if amount_paid >= grand_total {
            PaymentStatus::Paid
        } else if amount_paid > rust_decimal::Decimal::ZERO {
            PaymentStatus::PartiallyPaid
        } else {
            PaymentStatus::Pending
        }
    }
}
