use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::core::{money, AppError, Result};

/// Whether GST applies to a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GstApplicability {
    #[serde(rename = "GST")]
    Gst,
    #[serde(rename = "NON-GST")]
    NonGst,
}

impl fmt::Display for GstApplicability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GstApplicability::Gst => write!(f, "GST"),
            GstApplicability::NonGst => write!(f, "NON-GST"),
        }
    }
}

impl FromStr for GstApplicability {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "GST" => Ok(GstApplicability::Gst),
            "NON-GST" => Ok(GstApplicability::NonGst),
            _ => Err(format!("Invalid GST applicability: {}", s)),
        }
    }
}

/// A catalog product with stock tracking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    /// Unique stock-keeping unit, required
    pub sku: String,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Decimal,
    pub cost_price: Option<Decimal>,
    pub default_gst_rate: Decimal,
    pub gst_applicability: GstApplicability,
    pub quantity_in_stock: i32,
    pub unit: String,
    /// When set, stock at or below this level raises a restock alert
    pub reorder_level: Option<i32>,
    pub barcode: Option<String>,
    pub size: Option<String>,
    pub thickness: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub cost_price: Option<Decimal>,
    #[serde(default)]
    pub default_gst_rate: Option<Decimal>,
    pub gst_applicability: GstApplicability,
    #[serde(default)]
    pub quantity_in_stock: i32,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default)]
    pub reorder_level: Option<i32>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub thickness: Option<String>,
}

fn default_unit() -> String {
    "pcs".to_string()
}

impl ProductInput {
    /// Builds a product, filling the GST rate from the configured default
    /// when the form leaves it blank
    pub fn into_product(self, default_gst_rate: Decimal) -> Result<Product> {
        if self.sku.trim().is_empty() {
            return Err(AppError::validation("SKU cannot be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Product name cannot be empty"));
        }
        money::require_non_negative(self.price, "Price")?;
        if let Some(cost) = self.cost_price {
            money::require_non_negative(cost, "Cost price")?;
        }
        if self.quantity_in_stock < 0 {
            return Err(AppError::validation("Stock quantity cannot be negative"));
        }

        let gst_rate = match self.gst_applicability {
            GstApplicability::NonGst => Decimal::ZERO,
            GstApplicability::Gst => self.default_gst_rate.unwrap_or(default_gst_rate),
        };
        money::require_non_negative(gst_rate, "GST rate")?;

        let now = Utc::now();
        Ok(Product {
            id: Uuid::new_v4().to_string(),
            sku: self.sku.trim().to_string(),
            name: self.name.trim().to_string(),
            category: self.category.filter(|s| !s.trim().is_empty()),
            description: self.description,
            price: self.price,
            cost_price: self.cost_price,
            default_gst_rate: gst_rate,
            gst_applicability: self.gst_applicability,
            quantity_in_stock: self.quantity_in_stock,
            unit: self.unit,
            reorder_level: self.reorder_level,
            barcode: self.barcode.filter(|s| !s.trim().is_empty()),
            size: self.size,
            thickness: self.thickness,
            created_at: now,
            updated_at: now,
        })
    }
}

/// How urgently a low-stock product needs restocking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StockSeverity {
    OutOfStock,
    VeryLow,
    Low,
}

impl Product {
    /// A product is low on stock when it has a reorder level and current
    /// stock is at or below it
    pub fn is_low_stock(&self) -> bool {
        match self.reorder_level {
            Some(level) => self.quantity_in_stock <= level,
            None => false,
        }
    }

    /// Severity of a low-stock situation. Only meaningful when
    /// `is_low_stock()` holds.
    pub fn stock_severity(&self) -> Option<StockSeverity> {
        let level = self.reorder_level?;
        if self.quantity_in_stock > level {
            return None;
        }
        Some(if self.quantity_in_stock == 0 {
            StockSeverity::OutOfStock
        } else if self.quantity_in_stock * 2 <= level {
            StockSeverity::VeryLow
        } else {
            StockSeverity::Low
        })
    }

    /// Stock value at selling price
    pub fn stock_value(&self) -> Decimal {
        self.price * Decimal::from(self.quantity_in_stock)
    }
}

/// Low-stock report row
#[derive(Debug, Clone, Serialize)]
pub struct StockAlert {
    pub product_id: String,
    pub sku: String,
    pub name: String,
    pub quantity_in_stock: i32,
    pub reorder_level: i32,
    pub severity: StockSeverity,
}

impl StockAlert {
    pub fn from_product(product: &Product) -> Option<Self> {
        Some(Self {
            product_id: product.id.clone(),
            sku: product.sku.clone(),
            name: product.name.clone(),
            quantity_in_stock: product.quantity_in_stock,
            reorder_level: product.reorder_level?,
            severity: product.stock_severity()?,
        })
    }
}
