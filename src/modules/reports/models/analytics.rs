use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// Minimal slice of a sale used by the aggregations
#[derive(Debug, Clone)]
pub struct SaleRecord {
    pub invoice_id: String,
    pub invoice_date: NaiveDate,
    pub grand_total: Decimal,
    pub amount_paid: Decimal,
    pub payment_mode: String,
}

/// Minimal slice of a sold line item
#[derive(Debug, Clone)]
pub struct SoldItemRecord {
    pub product_id: String,
    pub product_name: String,
    pub category: Option<String>,
    pub quantity: i32,
    pub line_total: Decimal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue: Decimal,
    pub invoice_count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductSales {
    pub product_id: String,
    pub product_name: String,
    pub quantity_sold: i32,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryRevenue {
    pub category: String,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PaymentModeCount {
    pub payment_mode: String,
    pub invoice_count: usize,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct SalesSummary {
    pub total_revenue: Decimal,
    pub total_collected: Decimal,
    pub total_outstanding: Decimal,
    pub invoice_count: usize,
    pub average_sale: Decimal,
}

/// Minimal slice of an open ledger entry
#[derive(Debug, Clone)]
pub struct OutstandingRecord {
    pub party_id: String,
    pub party_name: String,
    pub balance_amount: Decimal,
    pub opened_on: NaiveDate,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PartyOutstanding {
    pub party_id: String,
    pub party_name: String,
    pub total_outstanding: Decimal,
    pub open_entries: usize,
    /// Date of the oldest unsettled entry
    pub oldest_entry: NaiveDate,
}

/// Open balances grouped per party, largest debt first
pub fn outstanding_by_party(entries: &[OutstandingRecord]) -> Vec<PartyOutstanding> {
    let mut by_party: HashMap<&str, PartyOutstanding> = HashMap::new();
    for entry in entries {
        by_party
            .entry(&entry.party_id)
            .and_modify(|p| {
                p.total_outstanding += entry.balance_amount;
                p.open_entries += 1;
                if entry.opened_on < p.oldest_entry {
                    p.oldest_entry = entry.opened_on;
                }
            })
            .or_insert_with(|| PartyOutstanding {
                party_id: entry.party_id.clone(),
                party_name: entry.party_name.clone(),
                total_outstanding: entry.balance_amount,
                open_entries: 1,
                oldest_entry: entry.opened_on,
            });
    }
    let mut parties: Vec<PartyOutstanding> = by_party.into_values().collect();
    parties.sort_by(|a, b| {
        b.total_outstanding
            .cmp(&a.total_outstanding)
            .then(a.party_name.cmp(&b.party_name))
    });
    parties
}

/// Revenue per calendar day, ascending by date. Days with no sales are
/// absent rather than zero-filled.
pub fn revenue_by_day(sales: &[SaleRecord]) -> Vec<DailyRevenue> {
    let mut by_day: HashMap<NaiveDate, (Decimal, usize)> = HashMap::new();
    for sale in sales {
        let entry = by_day.entry(sale.invoice_date).or_default();
        entry.0 += sale.grand_total;
        entry.1 += 1;
    }
    let mut days: Vec<DailyRevenue> = by_day
        .into_iter()
        .map(|(date, (revenue, invoice_count))| DailyRevenue {
            date,
            revenue,
            invoice_count,
        })
        .collect();
    days.sort_by_key(|d| d.date);
    days
}

/// Best sellers by revenue, ties broken by quantity then name
pub fn top_products(items: &[SoldItemRecord], limit: usize) -> Vec<ProductSales> {
    let mut by_product: HashMap<&str, ProductSales> = HashMap::new();
    for item in items {
        by_product
            .entry(&item.product_id)
            .and_modify(|p| {
                p.quantity_sold += item.quantity;
                p.revenue += item.line_total;
            })
            .or_insert_with(|| ProductSales {
                product_id: item.product_id.clone(),
                product_name: item.product_name.clone(),
                quantity_sold: item.quantity,
                revenue: item.line_total,
            });
    }
    let mut products: Vec<ProductSales> = by_product.into_values().collect();
    products.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then(b.quantity_sold.cmp(&a.quantity_sold))
            .then(a.product_name.cmp(&b.product_name))
    });
    products.truncate(limit);
    products
}

/// Revenue grouped by product category. Items without a category land
/// under "Uncategorized".
pub fn category_revenue(items: &[SoldItemRecord]) -> Vec<CategoryRevenue> {
    let mut by_category: HashMap<String, Decimal> = HashMap::new();
    for item in items {
        let category = item
            .category
            .clone()
            .unwrap_or_else(|| "Uncategorized".to_string());
        *by_category.entry(category).or_default() += item.line_total;
    }
    let mut categories: Vec<CategoryRevenue> = by_category
        .into_iter()
        .map(|(category, revenue)| CategoryRevenue { category, revenue })
        .collect();
    categories.sort_by(|a, b| b.revenue.cmp(&a.revenue).then(a.category.cmp(&b.category)));
    categories
}

/// How customers paid, largest share first
pub fn payment_mode_breakdown(sales: &[SaleRecord]) -> Vec<PaymentModeCount> {
    let mut by_mode: HashMap<&str, (usize, Decimal)> = HashMap::new();
    for sale in sales {
        let entry = by_mode.entry(&sale.payment_mode).or_default();
        entry.0 += 1;
        entry.1 += sale.grand_total;
    }
    let mut modes: Vec<PaymentModeCount> = by_mode
        .into_iter()
        .map(|(payment_mode, (invoice_count, amount))| PaymentModeCount {
            payment_mode: payment_mode.to_string(),
            invoice_count,
            amount,
        })
        .collect();
    modes.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then(a.payment_mode.cmp(&b.payment_mode))
    });
    modes
}

/// Headline numbers for a period
pub fn sales_summary(sales: &[SaleRecord]) -> SalesSummary {
    let total_revenue: Decimal = sales.iter().map(|s| s.grand_total).sum();
    let total_collected: Decimal = sales.iter().map(|s| s.amount_paid).sum();
    let invoice_count = sales.len();
    let average_sale = if invoice_count == 0 {
        Decimal::ZERO
    } else {
        total_revenue / Decimal::from(invoice_count as u64)
    };
    SalesSummary {
        total_revenue,
        total_collected,
        total_outstanding: total_revenue - total_collected,
        invoice_count,
        average_sale,
    }
}
