use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::core::{money, reference, AppError, PaymentMode, PaymentStatus, Result};

/// Whether line prices already include GST
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GstTreatment {
    Exclusive,
    Inclusive,
}

impl fmt::Display for GstTreatment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GstTreatment::Exclusive => write!(f, "exclusive"),
            GstTreatment::Inclusive => write!(f, "inclusive"),
        }
    }
}

impl FromStr for GstTreatment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "exclusive" => Ok(GstTreatment::Exclusive),
            "inclusive" => Ok(GstTreatment::Inclusive),
            _ => Err(format!("Invalid GST treatment: {}", s)),
        }
    }
}

/// One invoice line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesItem {
    pub id: String,
    pub invoice_id: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount: Decimal,
    pub gst_rate: Decimal,
    /// Line amount excluding GST
    pub taxable_amount: Decimal,
    pub gst_amount: Decimal,
    /// Taxable amount plus GST
    pub line_total: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SalesItemInput {
    pub product_id: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    #[serde(default)]
    pub discount: Decimal,
    pub gst_rate: Decimal,
}

impl SalesItemInput {
    /// Computes line amounts. With exclusive treatment GST is added on
    /// top of the discounted line amount; with inclusive treatment the
    /// discounted amount already contains GST and is split back out.
    pub fn into_item(
        self,
        invoice_id: &str,
        product_name: &str,
        treatment: GstTreatment,
    ) -> Result<SalesItem> {
        if self.quantity <= 0 {
            return Err(AppError::validation("Item quantity must be positive"));
        }
        money::require_non_negative(self.unit_price, "Unit price")?;
        money::require_non_negative(self.discount, "Discount")?;
        money::require_non_negative(self.gst_rate, "GST rate")?;

        let gross = self.unit_price * Decimal::from(self.quantity) - self.discount;
        if gross < Decimal::ZERO {
            return Err(AppError::validation("Discount exceeds line amount"));
        }

        let hundred = Decimal::from(100);
        let (taxable_amount, gst_amount) = match treatment {
            GstTreatment::Exclusive => {
                let gst = gross * self.gst_rate / hundred;
                (gross, gst)
            }
            GstTreatment::Inclusive => {
                let taxable = gross * hundred / (hundred + self.gst_rate);
                (taxable, gross - taxable)
            }
        };

        Ok(SalesItem {
            id: Uuid::new_v4().to_string(),
            invoice_id: invoice_id.to_string(),
            product_id: self.product_id,
            product_name: product_name.to_string(),
            quantity: self.quantity,
            unit_price: self.unit_price,
            discount: self.discount,
            gst_rate: self.gst_rate,
            line_total: taxable_amount + gst_amount,
            taxable_amount,
            gst_amount,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesInvoice {
    pub id: String,
    /// Human-facing number, SB-{year}-{millis}
    pub invoice_number: String,
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub invoice_date: NaiveDate,
    pub gst_treatment: GstTreatment,
    pub subtotal: Decimal,
    pub gst_total: Decimal,
    pub round_off: Decimal,
    pub grand_total: Decimal,
    pub amount_paid: Decimal,
    pub balance_due: Decimal,
    pub payment_mode: PaymentMode,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SalesInvoiceInput {
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub invoice_date: Option<NaiveDate>,
    #[serde(default = "default_treatment")]
    pub gst_treatment: GstTreatment,
    pub items: Vec<SalesItemInput>,
    pub amount_paid: Decimal,
    #[serde(default = "PaymentMode::default_payment_mode")]
    pub payment_mode: PaymentMode,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_treatment() -> GstTreatment {
    GstTreatment::Exclusive
}

impl SalesInvoice {
    /// Totals an invoice from computed line items. The grand total is
    /// rounded to the nearest rupee with the difference recorded as
    /// round_off.
    pub fn from_items(
        customer: Option<(String, String)>,
        invoice_date: NaiveDate,
        gst_treatment: GstTreatment,
        items: &[SalesItem],
        amount_paid: Decimal,
        payment_mode: PaymentMode,
        notes: Option<String>,
    ) -> Result<Self> {
        if items.is_empty() {
            return Err(AppError::validation("Invoice must have at least one item"));
        }
        money::require_non_negative(amount_paid, "Amount paid")?;

        let subtotal: Decimal = items.iter().map(|i| i.taxable_amount).sum();
        let gst_total: Decimal = items.iter().map(|i| i.gst_amount).sum();
        let exact_total = subtotal + gst_total;
        let grand_total = exact_total.round_dp(0);
        let round_off = grand_total - exact_total;

        if amount_paid > grand_total {
            return Err(AppError::validation(
                "Amount paid cannot exceed the invoice total",
            ));
        }

        let (customer_id, customer_name) = match customer {
            Some((id, name)) => (Some(id), Some(name)),
            None => (None, None),
        };

        let payment_status = PaymentStatus::derive(grand_total, amount_paid);
        Ok(SalesInvoice {
            id: Uuid::new_v4().to_string(),
            invoice_number: reference::document_number("SB"),
            customer_id,
            customer_name,
            invoice_date,
            gst_treatment,
            subtotal,
            gst_total,
            round_off,
            balance_due: grand_total - amount_paid,
            grand_total,
            amount_paid,
            payment_mode,
            payment_status,
            notes,
            created_at: Utc::now(),
        })
    }

    /// Credit is extended only to known customers
    pub fn needs_ledger_entry(&self) -> bool {
        self.customer_id.is_some() && self.balance_due > Decimal::ZERO
    }
}
