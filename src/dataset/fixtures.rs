//! Small two-brand dataset shared by unit tests.

use super::{Dataset, DaypartSales, MenuMixEntry, MonthlyFinancials, Store, Tables, WeeklyPurchase};
use crate::time::{Month, Week};
use chrono::NaiveDate;

pub fn month(year: i32, m: u32) -> Month {
    Month::new(year, m).unwrap()
}

fn week(year: i32, m: u32, d: u32) -> Week {
    Week::starting(NaiveDate::from_ymd_opt(year, m, d).unwrap())
}

fn store(id: &str, name: &str, brand: &str) -> Store {
    Store {
        store_id: id.to_string(),
        store_name: name.to_string(),
        brand: brand.to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn pnl(
    id: &str,
    brand: &str,
    month: Month,
    net_sales: f64,
    food: f64,
    labor: f64,
    avg_check: f64,
    transactions: u64,
) -> MonthlyFinancials {
    MonthlyFinancials {
        store_id: id.to_string(),
        brand: brand.to_string(),
        month,
        net_sales,
        food_cost_pct: food,
        labor_cost_pct: labor,
        avg_check,
        transactions,
    }
}

fn purchase(id: &str, week: Week, item: &str, variance: f64) -> WeeklyPurchase {
    WeeklyPurchase {
        store_id: id.to_string(),
        week,
        item: item.to_string(),
        variance,
    }
}

fn mix(id: &str, brand: &str, month: Month, category: &str, sales: f64) -> MenuMixEntry {
    MenuMixEntry {
        store_id: id.to_string(),
        brand: brand.to_string(),
        month,
        menu_category: category.to_string(),
        sales,
    }
}

fn daypart(id: &str, month: Month, b: f64, l: f64, d: f64, n: f64) -> DaypartSales {
    DaypartSales {
        store_id: id.to_string(),
        month,
        breakfast_sales: b,
        lunch_sales: l,
        dinner_sales: d,
        late_night_sales: n,
    }
}

/// Burger Barn: S001 Downtown, S002 Airport, S003 Mall. Taco Town: S101 Eastside.
///
/// Latest month is March 2024 for every store. S001 sits above the food and labor
/// benchmarks, trails its brand on beverages and has overordering; S003 sells no
/// beverages; S002 has no daypart row for March.
pub fn sample_tables() -> Tables {
    let bb = "Burger Barn";
    let tt = "Taco Town";
    let feb = month(2024, 2);
    let mar = month(2024, 3);

    Tables {
        stores: vec![
            store("S001", "Downtown", bb),
            store("S002", "Airport", bb),
            store("S003", "Mall", bb),
            store("S101", "Eastside", tt),
        ],
        financials: vec![
            pnl("S001", bb, mar, 12000.0, 34.0, 31.5, 12.00, 1000),
            pnl("S001", bb, feb, 11000.0, 29.0, 27.0, 11.50, 956),
            pnl("S002", bb, mar, 18000.0, 28.5, 25.0, 13.50, 1333),
            pnl("S003", bb, mar, 15000.0, 30.0, 28.0, 12.50, 1200),
            pnl("S101", tt, mar, 20000.0, 27.0, 26.0, 9.75, 2051),
        ],
        purchases: vec![
            purchase("S001", week(2024, 2, 5), "Chicken", 100.0),
            purchase("S001", week(2024, 2, 12), "Beef Patty", 12.0),
            purchase("S001", week(2024, 2, 12), "Buns", 5.0),
            purchase("S001", week(2024, 2, 12), "Lettuce", 11.0),
            purchase("S001", week(2024, 2, 19), "Beef Patty", 15.0),
            purchase("S001", week(2024, 2, 19), "Cheese", 20.0),
            purchase("S001", week(2024, 2, 26), "Fries", 30.0),
            purchase("S001", week(2024, 2, 26), "Lettuce", 3.0),
            purchase("S001", week(2024, 3, 4), "Beef Patty", 8.0),
            purchase("S001", week(2024, 3, 4), "Cheese", 11.0),
            purchase("S001", week(2024, 3, 4), "Fries", -4.0),
            purchase("S002", week(2024, 3, 4), "Buns", 10.0),
            purchase("S002", week(2024, 3, 4), "Cheese", 2.5),
        ],
        menu_mix: vec![
            mix("S001", bb, feb, "Beverages", 2000.0),
            mix("S001", bb, feb, "Burgers", 9000.0),
            mix("S001", bb, mar, "Burgers", 8000.0),
            mix("S001", bb, mar, "Sides", 2500.0),
            mix("S001", bb, mar, "Beverages", 1500.0),
            mix("S002", bb, mar, "Burgers", 9600.0),
            mix("S002", bb, mar, "Sides", 3000.0),
            mix("S002", bb, mar, "Beverages", 3400.0),
            mix("S002", bb, mar, "Hot Beverage", 2000.0),
            mix("S003", bb, mar, "Burgers", 10000.0),
            mix("S003", bb, mar, "Sides", 5000.0),
            mix("S101", tt, mar, "Tacos", 15000.0),
            mix("S101", tt, mar, "Beverages", 5000.0),
        ],
        dayparts: vec![
            daypart("S001", mar, 1000.0, 3000.0, 2500.0, 200.0),
            daypart("S001", feb, 900.0, 2800.0, 2400.0, 150.0),
            daypart("S002", feb, 2000.0, 6000.0, 5000.0, 800.0),
            daypart("S003", mar, 1500.0, 5000.0, 4000.0, 500.0),
            daypart("S101", mar, 0.0, 8000.0, 9000.0, 3000.0),
        ],
    }
}

pub fn sample_dataset() -> Dataset {
    Dataset::new(sample_tables()).unwrap()
}
