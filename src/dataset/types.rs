use crate::time::{Month, Week};
use serde::{Deserialize, Serialize};

/// One physical location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub store_id: String,
    pub store_name: String,
    pub brand: String,
}

/// Monthly profit-and-loss line for one store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyFinancials {
    pub store_id: String,
    pub brand: String,
    pub month: Month,
    pub net_sales: f64,
    /// Food cost as a percentage of sales (34.0 = 34%)
    pub food_cost_pct: f64,
    /// Labor cost as a percentage of sales
    pub labor_cost_pct: f64,
    pub avg_check: f64,
    pub transactions: u64,
}

/// Actual-vs-ideal usage for one item in one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPurchase {
    pub store_id: String,
    pub week: Week,
    pub item: String,
    /// Units over (positive) or under (negative) ideal usage
    pub variance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuMixEntry {
    pub store_id: String,
    pub brand: String,
    pub month: Month,
    pub menu_category: String,
    pub sales: f64,
}

impl MenuMixEntry {
    pub fn is_beverage(&self) -> bool {
        self.menu_category.to_lowercase().contains("beverage")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaypartSales {
    pub store_id: String,
    pub month: Month,
    pub breakfast_sales: f64,
    pub lunch_sales: f64,
    pub dinner_sales: f64,
    pub late_night_sales: f64,
}

/// Raw rows for the five tables, before validation and indexing.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub stores: Vec<Store>,
    pub financials: Vec<MonthlyFinancials>,
    pub purchases: Vec<WeeklyPurchase>,
    pub menu_mix: Vec<MenuMixEntry>,
    pub dayparts: Vec<DaypartSales>,
}
