use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

use crate::core::Result;
use crate::modules::catalog::repositories::ProductRepository;
use crate::modules::ledger::models::PartyType;
use crate::modules::reports::models::{
    self, CategoryRevenue, DailyRevenue, PartyOutstanding, PaymentModeCount, ProductSales,
    SalesSummary,
};
use crate::modules::reports::repositories::ReportRepository;

const TOP_PRODUCTS_LIMIT: usize = 10;

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub today: SalesSummary,
    pub period: SalesSummary,
    pub revenue_by_day: Vec<DailyRevenue>,
    pub top_products: Vec<ProductSales>,
    pub category_revenue: Vec<CategoryRevenue>,
    pub payment_modes: Vec<PaymentModeCount>,
    pub customer_outstanding: Vec<PartyOutstanding>,
    pub outstanding_total: Decimal,
    pub outstanding_parties: usize,
    pub stock_value: Decimal,
    pub low_stock_count: usize,
}

pub struct ReportService {
    repository: Arc<ReportRepository>,
    products: Arc<ProductRepository>,
    window_days: i64,
}

impl ReportService {
    pub fn new(
        repository: Arc<ReportRepository>,
        products: Arc<ProductRepository>,
        window_days: i64,
    ) -> Self {
        Self {
            repository,
            products,
            window_days,
        }
    }

    fn default_window(&self) -> (NaiveDate, NaiveDate) {
        let today = Utc::now().date_naive();
        (today - Duration::days(self.window_days - 1), today)
    }

    fn resolve_window(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> (NaiveDate, NaiveDate) {
        let (default_from, default_to) = self.default_window();
        (from.unwrap_or(default_from), to.unwrap_or(default_to))
    }

    pub async fn revenue_by_day(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<DailyRevenue>> {
        let (from, to) = self.resolve_window(from, to);
        let sales = self.repository.sales_between(from, to).await?;
        Ok(models::revenue_by_day(&sales))
    }

    pub async fn top_products(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<ProductSales>> {
        let (from, to) = self.resolve_window(from, to);
        let items = self.repository.sold_items_between(from, to).await?;
        Ok(models::top_products(&items, TOP_PRODUCTS_LIMIT))
    }

    pub async fn category_revenue(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<CategoryRevenue>> {
        let (from, to) = self.resolve_window(from, to);
        let items = self.repository.sold_items_between(from, to).await?;
        Ok(models::category_revenue(&items))
    }

    pub async fn outstanding(&self, party_type: PartyType) -> Result<Vec<PartyOutstanding>> {
        let entries = self.repository.open_balances(party_type).await?;
        Ok(models::outstanding_by_party(&entries))
    }

    /// Everything the dashboard shows in one response
    pub async fn dashboard(&self) -> Result<DashboardSummary> {
        let (from, to) = self.default_window();
        let sales = self.repository.sales_between(from, to).await?;
        let items = self.repository.sold_items_between(from, to).await?;
        let outstanding = self.repository.open_balances(PartyType::Customer).await?;
        let stock_value = self.products.stock_value().await?;
        let low_stock_count = self.products.find_low_stock().await?.len();

        let today = Utc::now().date_naive();
        let todays_sales: Vec<_> = sales
            .iter()
            .filter(|s| s.invoice_date == today)
            .cloned()
            .collect();

        let customer_outstanding = models::outstanding_by_party(&outstanding);
        let outstanding_total = customer_outstanding
            .iter()
            .map(|p| p.total_outstanding)
            .sum();
        let outstanding_parties = customer_outstanding.len();

        Ok(DashboardSummary {
            today: models::sales_summary(&todays_sales),
            period: models::sales_summary(&sales),
            revenue_by_day: models::revenue_by_day(&sales),
            top_products: models::top_products(&items, TOP_PRODUCTS_LIMIT),
            category_revenue: models::category_revenue(&items),
            payment_modes: models::payment_mode_breakdown(&sales),
            customer_outstanding,
            outstanding_total,
            outstanding_parties,
            stock_value,
            low_stock_count,
        })
    }
}
