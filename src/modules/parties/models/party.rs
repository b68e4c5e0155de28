use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{AppError, Result};

/// A customer who buys on credit or cash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub gstin: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A supplier the shop purchases stock from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub gstin: Option<String>,
    /// Whether the supplier is GST-registered
    pub is_registered: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PartyInput {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub gstin: Option<String>,
    /// Only meaningful for suppliers
    #[serde(default)]
    pub is_registered: Option<bool>,
}

impl PartyInput {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Name cannot be empty"));
        }
        if self.name.len() > 200 {
            return Err(AppError::validation("Name cannot exceed 200 characters"));
        }
        if let Some(gstin) = self.gstin.as_deref().filter(|g| !g.is_empty()) {
            validate_gstin(gstin)?;
        }
        if let Some(email) = self.email.as_deref().filter(|e| !e.is_empty()) {
            if !email.contains('@') {
                return Err(AppError::validation(format!("Invalid email: {}", email)));
            }
        }
        Ok(())
    }

    /// Treats empty strings from the form as absent
    fn normalized(field: &Option<String>) -> Option<String> {
        field
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn into_customer(self) -> Result<Customer> {
        self.validate()?;
        let now = Utc::now();
        Ok(Customer {
            id: Uuid::new_v4().to_string(),
            name: self.name.trim().to_string(),
            phone: Self::normalized(&self.phone),
            email: Self::normalized(&self.email),
            address: Self::normalized(&self.address),
            gstin: Self::normalized(&self.gstin),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn into_supplier(self) -> Result<Supplier> {
        self.validate()?;
        let now = Utc::now();
        Ok(Supplier {
            id: Uuid::new_v4().to_string(),
            name: self.name.trim().to_string(),
            phone: Self::normalized(&self.phone),
            email: Self::normalized(&self.email),
            address: Self::normalized(&self.address),
            gstin: Self::normalized(&self.gstin),
            is_registered: self.is_registered.unwrap_or(false),
            created_at: now,
            updated_at: now,
        })
    }
}

/// GSTIN is 15 characters: 2-digit state code, 10-character PAN,
/// entity number, 'Z', check character. Only the shape is checked here.
pub fn validate_gstin(gstin: &str) -> Result<()> {
    if gstin.len() != 15 || !gstin.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::validation(format!(
            "GSTIN must be 15 alphanumeric characters, got '{}'",
            gstin
        )));
    }
    if !gstin[..2].chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::validation(
            "GSTIN must start with a 2-digit state code",
        ));
    }
    Ok(())
}
