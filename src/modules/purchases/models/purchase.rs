use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::core::{money, reference, AppError, PaymentMode, PaymentStatus, Result};

/// GST purchases carry a tax invoice from a registered supplier;
/// non-GST purchases are plain bills with no tax component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PurchaseKind {
    Gst,
    NonGst,
}

impl PurchaseKind {
    pub fn number_prefix(&self) -> &'static str {
        match self {
            PurchaseKind::Gst => "GP",
            PurchaseKind::NonGst => "NGP",
        }
    }
}

impl fmt::Display for PurchaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PurchaseKind::Gst => write!(f, "gst"),
            PurchaseKind::NonGst => write!(f, "non-gst"),
        }
    }
}

impl FromStr for PurchaseKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "gst" => Ok(PurchaseKind::Gst),
            "non-gst" => Ok(PurchaseKind::NonGst),
            _ => Err(format!("Invalid purchase kind: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseItem {
    pub id: String,
    pub purchase_id: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i32,
    pub unit_cost: Decimal,
    pub gst_rate: Decimal,
    pub taxable_amount: Decimal,
    pub gst_amount: Decimal,
    pub line_total: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseItemInput {
    pub product_id: String,
    pub quantity: i32,
    pub unit_cost: Decimal,
    #[serde(default)]
    pub gst_rate: Decimal,
}

impl PurchaseItemInput {
    /// Non-GST purchases zero the tax component no matter what rate the
    /// request carries.
    pub fn into_item(
        self,
        purchase_id: &str,
        product_name: &str,
        kind: PurchaseKind,
    ) -> Result<PurchaseItem> {
        if self.quantity <= 0 {
            return Err(AppError::validation("Item quantity must be positive"));
        }
        money::require_non_negative(self.unit_cost, "Unit cost")?;
        money::require_non_negative(self.gst_rate, "GST rate")?;

        let taxable_amount = self.unit_cost * Decimal::from(self.quantity);
        let gst_rate = match kind {
            PurchaseKind::Gst => self.gst_rate,
            PurchaseKind::NonGst => Decimal::ZERO,
        };
        let gst_amount = taxable_amount * gst_rate / Decimal::from(100);

        Ok(PurchaseItem {
            id: Uuid::new_v4().to_string(),
            purchase_id: purchase_id.to_string(),
            product_id: self.product_id,
            product_name: product_name.to_string(),
            quantity: self.quantity,
            unit_cost: self.unit_cost,
            gst_rate,
            line_total: taxable_amount + gst_amount,
            taxable_amount,
            gst_amount,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseInvoice {
    pub id: String,
    /// GP-{year}-{millis} for GST purchases, NGP- otherwise
    pub purchase_number: String,
    pub kind: PurchaseKind,
    pub supplier_id: String,
    pub supplier_name: String,
    /// Supplier's own invoice number, free text
    pub supplier_invoice_number: Option<String>,
    pub purchase_date: NaiveDate,
    pub subtotal: Decimal,
    pub gst_total: Decimal,
    pub grand_total: Decimal,
    pub amount_paid: Decimal,
    pub balance_due: Decimal,
    pub payment_mode: PaymentMode,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseInvoiceInput {
    pub kind: PurchaseKind,
    pub supplier_id: String,
    #[serde(default)]
    pub supplier_invoice_number: Option<String>,
    #[serde(default)]
    pub purchase_date: Option<NaiveDate>,
    pub items: Vec<PurchaseItemInput>,
    pub amount_paid: Decimal,
    #[serde(default = "PaymentMode::default_payment_mode")]
    pub payment_mode: PaymentMode,
    #[serde(default)]
    pub notes: Option<String>,
}

impl PurchaseInvoice {
    pub fn from_items(
        kind: PurchaseKind,
        supplier: (String, String),
        supplier_invoice_number: Option<String>,
        purchase_date: NaiveDate,
        items: &[PurchaseItem],
        amount_paid: Decimal,
        payment_mode: PaymentMode,
        notes: Option<String>,
    ) -> Result<Self> {
        if items.is_empty() {
            return Err(AppError::validation("Purchase must have at least one item"));
        }
        money::require_non_negative(amount_paid, "Amount paid")?;

        let subtotal: Decimal = items.iter().map(|i| i.taxable_amount).sum();
        let gst_total: Decimal = items.iter().map(|i| i.gst_amount).sum();
        let grand_total = subtotal + gst_total;

        if amount_paid > grand_total {
            return Err(AppError::validation(
                "Amount paid cannot exceed the purchase total",
            ));
        }

        // Buying on credit means nothing changes hands yet
        let effective_paid = if payment_mode == PaymentMode::Credit {
            Decimal::ZERO
        } else {
            amount_paid
        };

        let (supplier_id, supplier_name) = supplier;
        Ok(PurchaseInvoice {
            id: Uuid::new_v4().to_string(),
            purchase_number: reference::document_number(kind.number_prefix()),
            kind,
            supplier_id,
            supplier_name,
            supplier_invoice_number,
            purchase_date,
            subtotal,
            gst_total,
            balance_due: grand_total - effective_paid,
            payment_status: PaymentStatus::derive(grand_total, effective_paid),
            grand_total,
            amount_paid: effective_paid,
            payment_mode,
            notes,
            created_at: Utc::now(),
        })
    }

    pub fn needs_ledger_entry(&self) -> bool {
        self.balance_due > Decimal::ZERO
    }
}
