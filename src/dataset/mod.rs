//! Dataset Store
//!
//! Read-only, validated, in-memory view of the five franchise tables, indexed by
//! store and period. A `Dataset` is built once (see [`loader`]) and then shared
//! behind an `Arc` for the life of the process; nothing in the engine mutates it.

pub mod loader;
pub mod types;

#[cfg(test)]
pub(crate) mod fixtures;

pub use types::{DaypartSales, MenuMixEntry, MonthlyFinancials, Store, Tables, WeeklyPurchase};

use crate::error::{InsightError, Result};
use crate::time::{Month, Week};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::info;

#[derive(Debug)]
pub struct Dataset {
    stores: BTreeMap<String, Store>,
    financials: HashMap<String, BTreeMap<Month, MonthlyFinancials>>,
    purchases: HashMap<String, Vec<WeeklyPurchase>>,
    menu_mix: HashMap<String, BTreeMap<Month, Vec<MenuMixEntry>>>,
    dayparts: HashMap<String, BTreeMap<Month, DaypartSales>>,
}

/// Row counts per table, for logging and the CLI banner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub stores: usize,
    pub financials: usize,
    pub purchases: usize,
    pub menu_mix: usize,
    pub dayparts: usize,
}

impl Dataset {
    /// Validate and index raw tables.
    pub fn new(tables: Tables) -> Result<Self> {
        let Tables {
            stores: store_rows,
            financials: financial_rows,
            purchases: purchase_rows,
            menu_mix: menu_mix_rows,
            dayparts: daypart_rows,
        } = tables;

        let mut stores = BTreeMap::new();
        for store in store_rows {
            if stores.contains_key(&store.store_id) {
                return Err(InsightError::InvalidDataset(format!(
                    "duplicate store_id '{}' in store metadata",
                    store.store_id
                )));
            }
            stores.insert(store.store_id.clone(), store);
        }

        let mut financials: HashMap<String, BTreeMap<Month, MonthlyFinancials>> = HashMap::new();
        for row in financial_rows {
            check_store(&stores, &row.store_id, "monthly P&L")?;
            check_brand(&stores, &row.store_id, &row.brand, "monthly P&L")?;
            let by_month = financials.entry(row.store_id.clone()).or_default();
            if by_month.contains_key(&row.month) {
                return Err(InsightError::InvalidDataset(format!(
                    "duplicate P&L row for store '{}' in {}",
                    row.store_id, row.month
                )));
            }
            by_month.insert(row.month, row);
        }

        let mut purchases: HashMap<String, Vec<WeeklyPurchase>> = HashMap::new();
        for row in purchase_rows {
            check_store(&stores, &row.store_id, "weekly purchases")?;
            purchases.entry(row.store_id.clone()).or_default().push(row);
        }
        for rows in purchases.values_mut() {
            rows.sort_by(|a, b| a.week.cmp(&b.week).then_with(|| a.item.cmp(&b.item)));
        }

        let mut menu_mix: HashMap<String, BTreeMap<Month, Vec<MenuMixEntry>>> = HashMap::new();
        for row in menu_mix_rows {
            check_store(&stores, &row.store_id, "menu mix")?;
            check_brand(&stores, &row.store_id, &row.brand, "menu mix")?;
            menu_mix
                .entry(row.store_id.clone())
                .or_default()
                .entry(row.month)
                .or_default()
                .push(row);
        }

        let mut dayparts: HashMap<String, BTreeMap<Month, DaypartSales>> = HashMap::new();
        for row in daypart_rows {
            check_store(&stores, &row.store_id, "daypart sales")?;
            let by_month = dayparts.entry(row.store_id.clone()).or_default();
            if by_month.contains_key(&row.month) {
                return Err(InsightError::InvalidDataset(format!(
                    "duplicate daypart row for store '{}' in {}",
                    row.store_id, row.month
                )));
            }
            by_month.insert(row.month, row);
        }

        let dataset = Self {
            stores,
            financials,
            purchases,
            menu_mix,
            dayparts,
        };
        let summary = dataset.summary();
        info!(
            stores = summary.stores,
            financials = summary.financials,
            purchases = summary.purchases,
            menu_mix = summary.menu_mix,
            dayparts = summary.dayparts,
            "Dataset validated"
        );
        Ok(dataset)
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            stores: self.stores.len(),
            financials: self.financials.values().map(BTreeMap::len).sum(),
            purchases: self.purchases.values().map(Vec::len).sum(),
            menu_mix: self
                .menu_mix
                .values()
                .flat_map(BTreeMap::values)
                .map(Vec::len)
                .sum(),
            dayparts: self.dayparts.values().map(BTreeMap::len).sum(),
        }
    }

    pub fn store(&self, store_id: &str) -> Option<&Store> {
        self.stores.get(store_id)
    }

    /// All stores, ordered by store id.
    pub fn stores(&self) -> impl Iterator<Item = &Store> {
        self.stores.values()
    }

    pub fn brand_stores<'a>(&'a self, brand: &'a str) -> impl Iterator<Item = &'a Store> + 'a {
        self.stores.values().filter(move |s| s.brand == brand)
    }

    /// Distinct brands, sorted.
    pub fn brands(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.stores.values().map(|s| s.brand.as_str()).collect();
        set.into_iter().collect()
    }

    /// P&L row for the store's most recent reported month.
    pub fn latest_financials(&self, store_id: &str) -> Option<&MonthlyFinancials> {
        self.financials
            .get(store_id)
            .and_then(|by_month| by_month.values().next_back())
    }

    pub fn financials_for(&self, store_id: &str, month: Month) -> Option<&MonthlyFinancials> {
        self.financials.get(store_id).and_then(|m| m.get(&month))
    }

    /// P&L rows for every store of `brand` reporting in `month`.
    pub fn brand_financials(&self, brand: &str, month: Month) -> Vec<&MonthlyFinancials> {
        self.brand_stores(brand)
            .filter_map(|s| self.financials_for(&s.store_id, month))
            .collect()
    }

    pub fn latest_menu_mix_month(&self, store_id: &str) -> Option<Month> {
        self.menu_mix
            .get(store_id)
            .and_then(|by_month| by_month.keys().next_back().copied())
    }

    pub fn menu_mix_for(&self, store_id: &str, month: Month) -> &[MenuMixEntry] {
        self.menu_mix
            .get(store_id)
            .and_then(|m| m.get(&month))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn daypart_for(&self, store_id: &str, month: Month) -> Option<&DaypartSales> {
        self.dayparts.get(store_id).and_then(|m| m.get(&month))
    }

    /// The `n` most recent distinct purchase weeks for the store, newest first.
    pub fn recent_weeks(&self, store_id: &str, n: usize) -> Vec<Week> {
        let weeks: BTreeSet<Week> = self
            .purchases
            .get(store_id)
            .map(|rows| rows.iter().map(|r| r.week).collect())
            .unwrap_or_default();
        weeks.into_iter().rev().take(n).collect()
    }

    /// Purchase rows falling in the store's `n` most recent distinct weeks.
    pub fn recent_purchases(&self, store_id: &str, n: usize) -> Vec<&WeeklyPurchase> {
        let weeks = self.recent_weeks(store_id, n);
        self.purchases
            .get(store_id)
            .map(|rows| rows.iter().filter(|r| weeks.contains(&r.week)).collect())
            .unwrap_or_default()
    }
}

fn check_store(stores: &BTreeMap<String, Store>, store_id: &str, table: &str) -> Result<()> {
    if stores.contains_key(store_id) {
        Ok(())
    } else {
        Err(InsightError::InvalidDataset(format!(
            "{} references unknown store_id '{}'",
            table, store_id
        )))
    }
}

fn check_brand(
    stores: &BTreeMap<String, Store>,
    store_id: &str,
    brand: &str,
    table: &str,
) -> Result<()> {
    match stores.get(store_id) {
        Some(store) if store.brand != brand => Err(InsightError::InvalidDataset(format!(
            "{} row for store '{}' has brand '{}' but the store belongs to '{}'",
            table, store_id, brand, store.brand
        ))),
        _ => Ok(()),
    }
}
