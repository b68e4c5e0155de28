use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

use crate::core::Result;
use crate::modules::catalog::models::{GstApplicability, Product, ProductInput, StockAlert};
use crate::modules::catalog::repositories::ProductRepository;

pub struct ProductService {
    repository: Arc<ProductRepository>,
    default_gst_rate: Decimal,
}

impl ProductService {
    pub fn new(repository: Arc<ProductRepository>, default_gst_rate: Decimal) -> Self {
        Self {
            repository,
            default_gst_rate,
        }
    }

    pub async fn create_product(&self, input: ProductInput) -> Result<Product> {
        let product = input.into_product(self.default_gst_rate)?;
        self.repository.create(&product).await?;
        info!(
            product_id = %product.id,
            sku = %product.sku,
            "Product created"
        );
        Ok(product)
    }

    pub async fn get_product(&self, id: &str) -> Result<Product> {
        self.repository.find_by_id(id).await
    }

    pub async fn list_products(
        &self,
        category: Option<&str>,
        applicability: Option<GstApplicability>,
    ) -> Result<Vec<Product>> {
        self.repository.list(category, applicability).await
    }

    pub async fn search_products(&self, term: &str) -> Result<Vec<Product>> {
        if term.trim().is_empty() {
            return self.repository.list(None, None).await;
        }
        self.repository.search(term.trim()).await
    }

    pub async fn adjust_stock(&self, id: &str, delta: i32) -> Result<Product> {
        let new_quantity = self.repository.adjust_stock(id, delta).await?;
        info!(product_id = %id, delta, new_quantity, "Stock adjusted");
        self.repository.find_by_id(id).await
    }

    pub async fn update_product(&self, id: &str, input: ProductInput) -> Result<Product> {
        let existing = self.repository.find_by_id(id).await?;
        let mut product = input.into_product(self.default_gst_rate)?;
        product.id = existing.id;
        product.created_at = existing.created_at;
        self.repository.update(&product).await?;
        Ok(product)
    }

    pub async fn delete_product(&self, id: &str) -> Result<()> {
        self.repository.delete(id).await?;
        info!(product_id = %id, "Product deleted");
        Ok(())
    }

    /// Products needing restock, with severity
    pub async fn low_stock_report(&self) -> Result<Vec<StockAlert>> {
        let products = self.repository.find_low_stock().await?;
        Ok(products
            .iter()
            .filter_map(StockAlert::from_product)
            .collect())
    }
}
