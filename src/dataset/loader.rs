//! CSV loader for the franchise tables.
//!
//! Reads the five flat files with polars and converts each frame into typed rows.
//! Column names are matched case-insensitively; numeric cells may carry `$`, `%`
//! or thousands separators.

use super::{Dataset, DaypartSales, MenuMixEntry, MonthlyFinancials, Store, Tables, WeeklyPurchase};
use crate::error::{InsightError, Result};
use crate::time::{Month, Week};
use polars::prelude::*;
use std::path::Path;
use tracing::{debug, info};

pub const STORE_FILE: &str = "store_metadata.csv";
pub const PNL_FILE: &str = "monthly_pnl_data.csv";
pub const PURCHASE_FILE: &str = "weekly_purchase_data.csv";
pub const MENU_MIX_FILE: &str = "monthly_menu_mix.csv";
pub const DAYPART_FILE: &str = "monthly_daypart_sales.csv";

/// Load and validate all five tables from `dir`.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<Dataset> {
    let tables = read_tables(dir)?;
    Dataset::new(tables)
}

pub fn read_tables(dir: impl AsRef<Path>) -> Result<Tables> {
    let dir = dir.as_ref();
    info!("Loading franchise data from {}", dir.display());

    Ok(Tables {
        stores: read_stores(&read_csv(&dir.join(STORE_FILE))?)?,
        financials: read_financials(&read_csv(&dir.join(PNL_FILE))?)?,
        purchases: read_purchases(&read_csv(&dir.join(PURCHASE_FILE))?)?,
        menu_mix: read_menu_mix(&read_csv(&dir.join(MENU_MIX_FILE))?)?,
        dayparts: read_dayparts(&read_csv(&dir.join(DAYPART_FILE))?)?,
    })
}

fn read_csv(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(InsightError::Load(format!(
            "CSV file not found: {}",
            path.display()
        )));
    }

    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(1000))
        .finish()
        .map_err(|e| InsightError::Load(format!("Failed to scan {}: {}", path.display(), e)))?
        .collect()
        .map_err(|e| InsightError::Load(format!("Failed to load {}: {}", path.display(), e)))?;

    debug!("Loaded {} rows, {} columns from {}", df.height(), df.width(), path.display());
    Ok(df)
}

pub fn read_stores(df: &DataFrame) -> Result<Vec<Store>> {
    let ids = strings(df, "Store_ID")?;
    let names = strings(df, "Store_Name")?;
    let brands = strings(df, "Brand")?;

    Ok(ids
        .into_iter()
        .zip(names)
        .zip(brands)
        .map(|((store_id, store_name), brand)| Store {
            store_id,
            store_name,
            brand,
        })
        .collect())
}

pub fn read_financials(df: &DataFrame) -> Result<Vec<MonthlyFinancials>> {
    let ids = strings(df, "Store_ID")?;
    let brands = strings(df, "Brand")?;
    let months = month_column(df, "Month")?;
    let net_sales = floats(df, "Net_Sales")?;
    let food = floats(df, "Food_Cost_%")?;
    let labor = floats(df, "Labor_Cost_%")?;
    let avg_check = floats(df, "Avg_Check")?;
    let transactions = counts(df, "Transactions")?;

    let mut rows = Vec::with_capacity(ids.len());
    for (i, store_id) in ids.into_iter().enumerate() {
        rows.push(MonthlyFinancials {
            store_id,
            brand: brands[i].clone(),
            month: months[i],
            net_sales: net_sales[i],
            food_cost_pct: food[i],
            labor_cost_pct: labor[i],
            avg_check: avg_check[i],
            transactions: transactions[i],
        });
    }
    Ok(rows)
}

pub fn read_purchases(df: &DataFrame) -> Result<Vec<WeeklyPurchase>> {
    let ids = strings(df, "Store_ID")?;
    let weeks = strings(df, "Week")?
        .iter()
        .map(|w| Week::parse(w))
        .collect::<Result<Vec<_>>>()?;
    let items = strings(df, "Item")?;
    let variances = floats(df, "Variance")?;

    Ok(ids
        .into_iter()
        .zip(weeks)
        .zip(items)
        .zip(variances)
        .map(|(((store_id, week), item), variance)| WeeklyPurchase {
            store_id,
            week,
            item,
            variance,
        })
        .collect())
}

pub fn read_menu_mix(df: &DataFrame) -> Result<Vec<MenuMixEntry>> {
    let ids = strings(df, "Store_ID")?;
    let brands = strings(df, "Brand")?;
    let months = month_column(df, "Month")?;
    let categories = strings(df, "Menu_Category")?;
    let sales = floats(df, "Sales")?;

    let mut rows = Vec::with_capacity(ids.len());
    for (i, store_id) in ids.into_iter().enumerate() {
        rows.push(MenuMixEntry {
            store_id,
            brand: brands[i].clone(),
            month: months[i],
            menu_category: categories[i].clone(),
            sales: sales[i],
        });
    }
    Ok(rows)
}

pub fn read_dayparts(df: &DataFrame) -> Result<Vec<DaypartSales>> {
    let ids = strings(df, "Store_ID")?;
    let months = month_column(df, "Month")?;
    let breakfast = floats(df, "Breakfast_Sales")?;
    let lunch = floats(df, "Lunch_Sales")?;
    let dinner = floats(df, "Dinner_Sales")?;
    let late_night = floats(df, "Late_Night_Sales")?;

    let mut rows = Vec::with_capacity(ids.len());
    for (i, store_id) in ids.into_iter().enumerate() {
        rows.push(DaypartSales {
            store_id,
            month: months[i],
            breakfast_sales: breakfast[i],
            lunch_sales: lunch[i],
            dinner_sales: dinner[i],
            late_night_sales: late_night[i],
        });
    }
    Ok(rows)
}

/// Look up a column ignoring ASCII case.
fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    let actual = df
        .get_column_names()
        .into_iter()
        .find(|c| c.eq_ignore_ascii_case(name))
        .map(|c| c.to_string())
        .ok_or_else(|| InsightError::Load(format!("Missing column '{}'", name)))?;
    Ok(df.column(&actual)?)
}

fn null_cell(name: &str, row: usize) -> InsightError {
    InsightError::Load(format!("Empty value in column '{}' at row {}", name, row + 1))
}

fn strings(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let series = column(df, name)?.cast(&DataType::String)?;
    series
        .str()?
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            v.map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .ok_or_else(|| null_cell(name, i))
        })
        .collect()
}

fn floats(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let series = column(df, name)?;
    if series.dtype() == &DataType::String {
        return series
            .str()?
            .into_iter()
            .enumerate()
            .map(|(i, v)| {
                let raw = v.ok_or_else(|| null_cell(name, i))?;
                parse_number(raw).ok_or_else(|| {
                    InsightError::Load(format!(
                        "Non-numeric value '{}' in column '{}' at row {}",
                        raw,
                        name,
                        i + 1
                    ))
                })
            })
            .collect();
    }

    let series = series.cast(&DataType::Float64)?;
    series
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(i, v)| v.ok_or_else(|| null_cell(name, i)))
        .collect()
}

fn counts(df: &DataFrame, name: &str) -> Result<Vec<u64>> {
    floats(df, name)?
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            if v.is_finite() && v >= 0.0 {
                Ok(v.round() as u64)
            } else {
                Err(InsightError::Load(format!(
                    "Invalid count {} in column '{}' at row {}",
                    v,
                    name,
                    i + 1
                )))
            }
        })
        .collect()
}

fn month_column(df: &DataFrame, name: &str) -> Result<Vec<Month>> {
    strings(df, name)?.iter().map(|m| Month::parse(m)).collect()
}

/// Parse "1,234.50", "$12.00" or "34.0%" style cells.
fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | '%' | ','))
        .collect();
    cleaned.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
