use chrono::{DateTime, Utc};
use sqlx::{FromRow, MySqlPool};

use crate::core::{AppError, Result};
use crate::modules::parties::models::{Customer, Supplier};

/// MySQL CRUD for the customers and suppliers tables
pub struct PartyRepository {
    pool: MySqlPool,
}

impl PartyRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create_customer(&self, customer: &Customer) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO customers (id, name, phone, email, address, gstin, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.address)
        .bind(&customer.gstin)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to create customer: {}", e)))?;

        Ok(())
    }

    pub async fn find_customer(&self, id: &str) -> Result<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(
            "SELECT id, name, phone, email, address, gstin, created_at, updated_at FROM customers WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to fetch customer: {}", e)))?;

        Ok(row.map(CustomerRow::into_customer))
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            "SELECT id, name, phone, email, address, gstin, created_at, updated_at FROM customers ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to list customers: {}", e)))?;

        Ok(rows.into_iter().map(CustomerRow::into_customer).collect())
    }

    pub async fn update_customer(&self, customer: &Customer) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE customers
            SET name = ?, phone = ?, email = ?, address = ?, gstin = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.address)
        .bind(&customer.gstin)
        .bind(Utc::now())
        .bind(&customer.id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to update customer: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Customer '{}'", customer.id)));
        }
        Ok(())
    }

    pub async fn delete_customer(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM customers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::internal(format!("Failed to delete customer: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Customer '{}'", id)));
        }
        Ok(())
    }

    pub async fn create_supplier(&self, supplier: &Supplier) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO suppliers (id, name, phone, email, address, gstin, is_registered, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&supplier.id)
        .bind(&supplier.name)
        .bind(&supplier.phone)
        .bind(&supplier.email)
        .bind(&supplier.address)
        .bind(&supplier.gstin)
        .bind(supplier.is_registered)
        .bind(supplier.created_at)
        .bind(supplier.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to create supplier: {}", e)))?;

        Ok(())
    }

    pub async fn find_supplier(&self, id: &str) -> Result<Option<Supplier>> {
        let row = sqlx::query_as::<_, SupplierRow>(
            "SELECT id, name, phone, email, address, gstin, is_registered, created_at, updated_at FROM suppliers WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to fetch supplier: {}", e)))?;

        Ok(row.map(SupplierRow::into_supplier))
    }

    pub async fn list_suppliers(&self) -> Result<Vec<Supplier>> {
        let rows = sqlx::query_as::<_, SupplierRow>(
            "SELECT id, name, phone, email, address, gstin, is_registered, created_at, updated_at FROM suppliers ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to list suppliers: {}", e)))?;

        Ok(rows.into_iter().map(SupplierRow::into_supplier).collect())
    }

    pub async fn update_supplier(&self, supplier: &Supplier) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE suppliers
            SET name = ?, phone = ?, email = ?, address = ?, gstin = ?, is_registered = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&supplier.name)
        .bind(&supplier.phone)
        .bind(&supplier.email)
        .bind(&supplier.address)
        .bind(&supplier.gstin)
        .bind(supplier.is_registered)
        .bind(Utc::now())
        .bind(&supplier.id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to update supplier: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Supplier '{}'", supplier.id)));
        }
        Ok(())
    }

    pub async fn delete_supplier(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::internal(format!("Failed to delete supplier: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Supplier '{}'", id)));
        }
        Ok(())
    }
}

#[derive(Debug, FromRow)]
struct CustomerRow {
    id: String,
    name: String,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
    gstin: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CustomerRow {
    fn into_customer(self) -> Customer {
        Customer {
            id: self.id,
            name: self.name,
            phone: self.phone,
            email: self.email,
            address: self.address,
            gstin: self.gstin,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct SupplierRow {
    id: String,
    name: String,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
    gstin: Option<String>,
    is_registered: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SupplierRow {
    fn into_supplier(self) -> Supplier {
        Supplier {
            id: self.id,
            name: self.name,
            phone: self.phone,
            email: self.email,
            address: self.address,
            gstin: self.gstin,
            is_registered: self.is_registered,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
