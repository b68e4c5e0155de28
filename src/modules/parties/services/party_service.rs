use std::sync::Arc;
use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::parties::models::{Customer, PartyInput, Supplier};
use crate::modules::parties::repositories::PartyRepository;

/// Customer and supplier management
pub struct PartyService {
    repo: Arc<PartyRepository>,
}

impl PartyService {
    pub fn new(repo: Arc<PartyRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_customer(&self, input: PartyInput) -> Result<Customer> {
        let customer = input.into_customer()?;
        self.repo.create_customer(&customer).await?;
        info!(customer_id = %customer.id, name = %customer.name, "Customer created");
        Ok(customer)
    }

    pub async fn get_customer(&self, id: &str) -> Result<Customer> {
        self.repo
            .find_customer(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Customer '{}'", id)))
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>> {
        self.repo.list_customers().await
    }

    pub async fn update_customer(&self, id: &str, input: PartyInput) -> Result<Customer> {
        input.validate()?;
        let mut customer = self.get_customer(id).await?;
        customer.name = input.name.trim().to_string();
        customer.phone = input.phone.filter(|s| !s.trim().is_empty());
        customer.email = input.email.filter(|s| !s.trim().is_empty());
        customer.address = input.address.filter(|s| !s.trim().is_empty());
        customer.gstin = input.gstin.filter(|s| !s.trim().is_empty());
        self.repo.update_customer(&customer).await?;
        Ok(customer)
    }

    pub async fn delete_customer(&self, id: &str) -> Result<()> {
        self.repo.delete_customer(id).await
    }

    pub async fn create_supplier(&self, input: PartyInput) -> Result<Supplier> {
        let supplier = input.into_supplier()?;
        self.repo.create_supplier(&supplier).await?;
        info!(supplier_id = %supplier.id, name = %supplier.name, "Supplier created");
        Ok(supplier)
    }

    pub async fn get_supplier(&self, id: &str) -> Result<Supplier> {
        self.repo
            .find_supplier(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Supplier '{}'", id)))
    }

    pub async fn list_suppliers(&self) -> Result<Vec<Supplier>> {
        self.repo.list_suppliers().await
    }

    pub async fn update_supplier(&self, id: &str, input: PartyInput) -> Result<Supplier> {
        input.validate()?;
        let mut supplier = self.get_supplier(id).await?;
        supplier.name = input.name.trim().to_string();
        supplier.phone = input.phone.filter(|s| !s.trim().is_empty());
        supplier.email = input.email.filter(|s| !s.trim().is_empty());
        supplier.address = input.address.filter(|s| !s.trim().is_empty());
        supplier.gstin = input.gstin.filter(|s| !s.trim().is_empty());
        if let Some(flag) = input.is_registered {
            supplier.is_registered = flag;
        }
        self.repo.update_supplier(&supplier).await?;
        Ok(supplier)
    }

    pub async fn delete_supplier(&self, id: &str) -> Result<()> {
        self.repo.delete_supplier(id).await
    }
}
