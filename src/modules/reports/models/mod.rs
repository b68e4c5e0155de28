pub mod analytics;

pub use analytics::{
    category_revenue, outstanding_by_party, payment_mode_breakdown, revenue_by_day, sales_summary,
    top_products, CategoryRevenue, DailyRevenue, OutstandingRecord, PartyOutstanding,
    PaymentModeCount, ProductSales, SaleRecord, SalesSummary, SoldItemRecord,
};
