use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::mysql::MySqlPool;
use sqlx::{FromRow, MySql, Transaction};
use std::str::FromStr;

use crate::core::{AppError, Result};
use crate::modules::catalog::models::{GstApplicability, Product};

#[derive(Debug, FromRow)]
struct ProductRow {
    id: String,
    sku: String,
    name: String,
    category: Option<String>,
    description: Option<String>,
    price: Decimal,
    cost_price: Option<Decimal>,
    default_gst_rate: Decimal,
    gst_applicability: String,
    quantity_in_stock: i32,
    unit: String,
    reorder_level: Option<i32>,
    barcode: Option<String>,
    size: Option<String>,
    thickness: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self) -> Result<Product> {
        Ok(Product {
            gst_applicability: GstApplicability::from_str(&self.gst_applicability)
                .map_err(AppError::internal)?,
            id: self.id,
            sku: self.sku,
            name: self.name,
            category: self.category,
            description: self.description,
            price: self.price,
            cost_price: self.cost_price,
            default_gst_rate: self.default_gst_rate,
            quantity_in_stock: self.quantity_in_stock,
            unit: self.unit,
            reorder_level: self.reorder_level,
            barcode: self.barcode,
            size: self.size,
            thickness: self.thickness,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const PRODUCT_COLUMNS: &str = "id, sku, name, category, description, price, cost_price, \
     default_gst_rate, gst_applicability, quantity_in_stock, unit, reorder_level, \
     barcode, size, thickness, created_at, updated_at";

pub struct ProductRepository {
    pool: MySqlPool,
}

impl ProductRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, product: &Product) -> Result<()> {
        sqlx::query(
            "INSERT INTO products (id, sku, name, category, description, price, cost_price, \
             default_gst_rate, gst_applicability, quantity_in_stock, unit, reorder_level, \
             barcode, size, thickness, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.category)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.cost_price)
        .bind(product.default_gst_rate)
        .bind(product.gst_applicability.to_string())
        .bind(product.quantity_in_stock)
        .bind(&product.unit)
        .bind(product.reorder_level)
        .bind(&product.barcode)
        .bind(&product.size)
        .bind(&product.thickness)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::conflict(format!("Product with SKU {} already exists", product.sku))
            }
            _ => AppError::Database(e),
        })?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Product> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE id = ?",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {} not found", id)))?;
        row.into_product()
    }

    pub async fn list(
        &self,
        category: Option<&str>,
        applicability: Option<GstApplicability>,
    ) -> Result<Vec<Product>> {
        let mut sql = format!("SELECT {} FROM products WHERE 1=1", PRODUCT_COLUMNS);
        if category.is_some() {
            sql.push_str(" AND category = ?");
        }
        if applicability.is_some() {
            sql.push_str(" AND gst_applicability = ?");
        }
        sql.push_str(" ORDER BY name ASC");

        let mut query = sqlx::query_as::<_, ProductRow>(&sql);
        if let Some(cat) = category {
            query = query.bind(cat.to_string());
        }
        if let Some(app) = applicability {
            query = query.bind(app.to_string());
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(ProductRow::into_product).collect()
    }

    /// Matches name, SKU, or barcode. Barcode lookups are exact so a
    /// scanner hit resolves to a single product.
    pub async fn search(&self, term: &str) -> Result<Vec<Product>> {
        let like = format!("%{}%", term);
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products \
             WHERE name LIKE ? OR sku LIKE ? OR barcode = ? \
             ORDER BY name ASC",
            PRODUCT_COLUMNS
        ))
        .bind(&like)
        .bind(&like)
        .bind(term)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(ProductRow::into_product).collect()
    }

    pub async fn update(&self, product: &Product) -> Result<()> {
        let result = sqlx::query(
            "UPDATE products SET sku = ?, name = ?, category = ?, description = ?, price = ?, \
             cost_price = ?, default_gst_rate = ?, gst_applicability = ?, quantity_in_stock = ?, \
             unit = ?, reorder_level = ?, barcode = ?, size = ?, thickness = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.category)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.cost_price)
        .bind(product.default_gst_rate)
        .bind(product.gst_applicability.to_string())
        .bind(product.quantity_in_stock)
        .bind(&product.unit)
        .bind(product.reorder_level)
        .bind(&product.barcode)
        .bind(&product.size)
        .bind(&product.thickness)
        .bind(Utc::now())
        .bind(&product.id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Product {} not found",
                product.id
            )));
        }
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Product {} not found", id)));
        }
        Ok(())
    }

    /// Adjusts stock by a signed delta inside an existing transaction.
    /// The row is locked first so concurrent sales cannot both pass the
    /// availability check.
    pub async fn adjust_stock_with_tx(
        tx: &mut Transaction<'_, MySql>,
        product_id: &str,
        delta: i32,
    ) -> Result<i32> {
        #[derive(FromRow)]
        struct StockRow {
            name: String,
            quantity_in_stock: i32,
        }

        let row = sqlx::query_as::<_, StockRow>(
            "SELECT name, quantity_in_stock FROM products WHERE id = ? FOR UPDATE",
        )
        .bind(product_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {} not found", product_id)))?;

        let new_quantity = row.quantity_in_stock + delta;
        if new_quantity < 0 {
            return Err(AppError::conflict(format!(
                "Insufficient stock for {}: have {}, need {}",
                row.name,
                row.quantity_in_stock,
                delta.unsigned_abs()
            )));
        }

        sqlx::query("UPDATE products SET quantity_in_stock = ?, updated_at = ? WHERE id = ?")
            .bind(new_quantity)
            .bind(Utc::now())
            .bind(product_id)
            .execute(&mut **tx)
            .await?;

        Ok(new_quantity)
    }

    /// Manual stock correction outside a sale or purchase
    pub async fn adjust_stock(&self, product_id: &str, delta: i32) -> Result<i32> {
        let mut tx = self.pool.begin().await?;
        let new_quantity = Self::adjust_stock_with_tx(&mut tx, product_id, delta).await?;
        tx.commit().await?;
        Ok(new_quantity)
    }

    /// Total retail value of everything on the shelf
    pub async fn stock_value(&self) -> Result<Decimal> {
        #[derive(FromRow)]
        struct ValueRow {
            total: Decimal,
        }

        let row = sqlx::query_as::<_, ValueRow>(
            "SELECT COALESCE(SUM(price * quantity_in_stock), 0) AS total FROM products",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(row.total)
    }

    /// All products at or below their reorder level, emptiest first
    pub async fn find_low_stock(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products \
             WHERE reorder_level IS NOT NULL AND quantity_in_stock <= reorder_level \
             ORDER BY quantity_in_stock ASC, name ASC",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(ProductRow::into_product).collect()
    }
}
