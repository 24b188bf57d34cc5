//! Metric resolvers
//!
//! One routine per [`Intent`]. Each pulls the store's most recent reporting month,
//! computes its metric or benchmark comparison, and returns a structured
//! [`Insight`] for the formatter. Resolvers only read from the [`Dataset`].

use crate::config::EngineConfig;
use crate::dataset::{Dataset, MenuMixEntry, MonthlyFinancials};
use crate::error::{InsightError, Result};
use crate::intent::Intent;
use crate::time::{Month, Week};
use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, instrument, warn};

lazy_static! {
    /// "$2", "$ 1.50", "$1,000"
    static ref DOLLAR_AMOUNT: Regex = Regex::new(r"\$\s*(\d{1,3}(?:,\d{3})+|\d+)(\.\d+)?").unwrap();
    /// "by 2", "by 0.75"; the unit group catches "by 10%" and "by 50 cents"
    static ref BY_AMOUNT: Regex =
        Regex::new(r"(?i)\bby\s+(\d+(?:\.\d+)?)\s*(%|percent\b|pct\b|cents?\b|¢)?").unwrap();
}

/// Structured result of one resolver.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Insight {
    FoodCost(BenchmarkInsight),
    Comparison(ComparisonInsight),
    AverageCheck(AverageCheckInsight),
    CheckIncrease(CheckIncreaseInsight),
    BeverageMix(BeverageMixInsight),
    TotalSales(SalesInsight),
    Transactions(TransactionsInsight),
    Daypart(DaypartInsight),
    Staffing(BenchmarkInsight),
    PurchaseVariance(PurchaseVarianceInsight),
    Unknown,
}

/// A percentage metric measured against a fixed brand target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkInsight {
    pub month: Month,
    pub value_pct: f64,
    pub benchmark_pct: f64,
    /// `value_pct - benchmark_pct`
    pub variance_pts: f64,
}

impl BenchmarkInsight {
    fn new(month: Month, value_pct: f64, benchmark_pct: f64) -> Self {
        Self {
            month,
            value_pct,
            benchmark_pct,
            variance_pts: value_pct - benchmark_pct,
        }
    }

    /// Over only when the gap survives rounding to the one decimal shown.
    pub fn is_over(&self) -> bool {
        (self.variance_pts * 10.0).round() > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonInsight {
    pub month: Month,
    pub brand: String,
    pub net_sales: f64,
    pub brand_avg_net_sales: f64,
    /// Stores of the brand reporting that month, including this one
    pub brand_store_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AverageCheckInsight {
    pub month: Month,
    pub avg_check: f64,
    pub transactions: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckIncreaseInsight {
    pub month: Month,
    pub increase: f64,
    pub avg_check: f64,
    pub transactions: u64,
    pub net_sales: f64,
    pub new_sales: f64,
    pub sales_gain: f64,
    pub ebitda_estimate: f64,
    pub flow_through: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeverageMixInsight {
    /// Latest menu-mix month for the store, if it reported any
    pub month: Option<Month>,
    pub brand: String,
    /// `None` when the store recorded no beverage sales
    pub share: Option<BeverageShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeverageShare {
    pub store_pct: f64,
    pub brand_pct: f64,
    pub gap_pts: f64,
    pub below_brand: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesInsight {
    pub month: Month,
    pub net_sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionsInsight {
    pub month: Month,
    pub transactions: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaypartInsight {
    pub month: Month,
    pub breakfast: f64,
    pub lunch: f64,
    pub dinner: f64,
    pub late_night: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseVarianceInsight {
    /// Weeks examined, newest first
    pub weeks: Vec<Week>,
    pub threshold: f64,
    /// Highest summed variance first
    pub items: Vec<OverorderedItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverorderedItem {
    pub item: String,
    pub total_variance: f64,
}

/// Extract the check increase from a scenario question.
///
/// Takes the first `$` amount, else a plain number after "by", else `default`.
/// Percentages, cents, zero, negative or unparsable amounts fall back to `default`.
pub fn parse_check_increase(question: &str, default: f64) -> f64 {
    let from_dollar = DOLLAR_AMOUNT.captures(question).map(|caps| {
        let whole = caps.get(1).map(|m| m.as_str().replace(',', "")).unwrap_or_default();
        let fraction = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        format!("{}{}", whole, fraction)
    });
    let raw = from_dollar.or_else(|| {
        BY_AMOUNT
            .captures(question)
            .filter(|caps| caps.get(2).is_none())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    });

    match raw.and_then(|r| r.parse::<f64>().ok()) {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => {
            debug!(default, "No usable check increase in question, using default");
            default
        }
    }
}

pub struct Resolver<'a> {
    dataset: &'a Dataset,
    config: &'a EngineConfig,
}

impl<'a> Resolver<'a> {
    pub fn new(dataset: &'a Dataset, config: &'a EngineConfig) -> Self {
        Self { dataset, config }
    }

    /// Run the resolver for `intent`. `question` is only read by the check-increase scenario.
    #[instrument(skip(self, question))]
    pub fn resolve(&self, intent: Intent, store_id: &str, question: &str) -> Result<Insight> {
        match intent {
            Intent::FoodCost => self.food_cost(store_id).map(Insight::FoodCost),
            Intent::Comparison => self.comparison(store_id).map(Insight::Comparison),
            Intent::AverageCheck => self.average_check(store_id).map(Insight::AverageCheck),
            Intent::CheckIncreaseScenario => self
                .check_increase(store_id, question)
                .map(Insight::CheckIncrease),
            Intent::BeverageMix => self.beverage_mix(store_id).map(Insight::BeverageMix),
            Intent::TotalSales => self.total_sales(store_id).map(Insight::TotalSales),
            Intent::Transactions => self.transactions(store_id).map(Insight::Transactions),
            Intent::Daypart => self.daypart(store_id).map(Insight::Daypart),
            Intent::Staffing => self.staffing(store_id).map(Insight::Staffing),
            Intent::PurchaseVariance => self
                .purchase_variance(store_id)
                .map(Insight::PurchaseVariance),
            Intent::Unknown => Ok(Insight::Unknown),
        }
    }

    /// Most recent P&L row; every resolver starts here.
    fn latest(&self, store_id: &str) -> Result<&'a MonthlyFinancials> {
        self.dataset
            .latest_financials(store_id)
            .ok_or_else(|| InsightError::missing(store_id, "no monthly P&L records"))
    }

    pub fn food_cost(&self, store_id: &str) -> Result<BenchmarkInsight> {
        let pnl = self.latest(store_id)?;
        Ok(BenchmarkInsight::new(
            pnl.month,
            pnl.food_cost_pct,
            self.config.food_cost_benchmark_pct,
        ))
    }

    pub fn comparison(&self, store_id: &str) -> Result<ComparisonInsight> {
        let pnl = self.latest(store_id)?;
        // includes the store itself, so never empty for a validated dataset
        let peers = self.dataset.brand_financials(&pnl.brand, pnl.month);
        let count = peers.len().max(1);
        let brand_avg = if peers.is_empty() {
            pnl.net_sales
        } else {
            peers.iter().map(|p| p.net_sales).sum::<f64>() / count as f64
        };

        Ok(ComparisonInsight {
            month: pnl.month,
            brand: pnl.brand.clone(),
            net_sales: pnl.net_sales,
            brand_avg_net_sales: brand_avg,
            brand_store_count: count,
        })
    }

    pub fn average_check(&self, store_id: &str) -> Result<AverageCheckInsight> {
        let pnl = self.latest(store_id)?;
        Ok(AverageCheckInsight {
            month: pnl.month,
            avg_check: pnl.avg_check,
            transactions: pnl.transactions,
        })
    }

    pub fn check_increase(&self, store_id: &str, question: &str) -> Result<CheckIncreaseInsight> {
        let pnl = self.latest(store_id)?;
        let increase = parse_check_increase(question, self.config.default_check_increase);
        let flow_through = self.config.ebitda_flow_through;

        let new_sales = (pnl.avg_check + increase) * pnl.transactions as f64;
        let sales_gain = new_sales - pnl.net_sales;
        let ebitda_estimate = sales_gain * flow_through;

        if ![new_sales, sales_gain, ebitda_estimate].iter().all(|v| v.is_finite()) {
            warn!(store_id, increase, "Check increase scenario produced a non-finite value");
            return Err(InsightError::Computation(format!(
                "check increase of {} for store {} is not computable",
                increase, store_id
            )));
        }

        Ok(CheckIncreaseInsight {
            month: pnl.month,
            increase,
            avg_check: pnl.avg_check,
            transactions: pnl.transactions,
            net_sales: pnl.net_sales,
            new_sales,
            sales_gain,
            ebitda_estimate,
            flow_through,
        })
    }

    pub fn beverage_mix(&self, store_id: &str) -> Result<BeverageMixInsight> {
        let pnl = self.latest(store_id)?;
        let brand = pnl.brand.clone();

        let Some(month) = self.dataset.latest_menu_mix_month(store_id) else {
            return Ok(BeverageMixInsight {
                month: None,
                brand,
                share: None,
            });
        };

        let rows = self.dataset.menu_mix_for(store_id, month);
        let has_beverages = rows.iter().any(MenuMixEntry::is_beverage);
        let (store_bev, store_total) = beverage_totals(rows);
        if !has_beverages || store_total <= 0.0 {
            debug!(store_id, %month, "No beverage sales recorded");
            return Ok(BeverageMixInsight {
                month: Some(month),
                brand,
                share: None,
            });
        }

        let per_store: Vec<(f64, f64)> = self
            .dataset
            .brand_stores(&brand)
            .map(|s| self.dataset.menu_mix_for(&s.store_id, month))
            .filter(|rows| !rows.is_empty())
            .map(beverage_totals)
            .collect();
        let n = per_store.len() as f64;
        let mean_bev = per_store.iter().map(|(b, _)| b).sum::<f64>() / n;
        let mean_total = per_store.iter().map(|(_, t)| t).sum::<f64>() / n;

        let store_pct = store_bev / store_total * 100.0;
        let brand_pct = if mean_total > 0.0 {
            mean_bev / mean_total * 100.0
        } else {
            store_pct
        };
        let gap_pts = store_pct - brand_pct;

        Ok(BeverageMixInsight {
            month: Some(month),
            brand,
            share: Some(BeverageShare {
                store_pct,
                brand_pct,
                gap_pts,
                below_brand: gap_pts < self.config.beverage_gap_alert_pts,
            }),
        })
    }

    pub fn total_sales(&self, store_id: &str) -> Result<SalesInsight> {
        let pnl = self.latest(store_id)?;
        Ok(SalesInsight {
            month: pnl.month,
            net_sales: pnl.net_sales,
        })
    }

    pub fn transactions(&self, store_id: &str) -> Result<TransactionsInsight> {
        let pnl = self.latest(store_id)?;
        Ok(TransactionsInsight {
            month: pnl.month,
            transactions: pnl.transactions,
        })
    }

    pub fn daypart(&self, store_id: &str) -> Result<DaypartInsight> {
        let pnl = self.latest(store_id)?;
        let row = self
            .dataset
            .daypart_for(store_id, pnl.month)
            .ok_or_else(|| {
                InsightError::missing(store_id, format!("no daypart sales for {}", pnl.month))
            })?;

        Ok(DaypartInsight {
            month: pnl.month,
            breakfast: row.breakfast_sales,
            lunch: row.lunch_sales,
            dinner: row.dinner_sales,
            late_night: row.late_night_sales,
        })
    }

    pub fn staffing(&self, store_id: &str) -> Result<BenchmarkInsight> {
        let pnl = self.latest(store_id)?;
        Ok(BenchmarkInsight::new(
            pnl.month,
            pnl.labor_cost_pct,
            self.config.labor_cost_benchmark_pct,
        ))
    }

    pub fn purchase_variance(&self, store_id: &str) -> Result<PurchaseVarianceInsight> {
        self.latest(store_id)?;
        let lookback = self.config.purchase_lookback_weeks;
        let threshold = self.config.overorder_variance_threshold;

        let weeks = self.dataset.recent_weeks(store_id, lookback);
        let items = self
            .dataset
            .recent_purchases(store_id, lookback)
            .into_iter()
            .filter(|p| p.variance > threshold)
            .map(|p| (p.item.clone(), p.variance))
            .into_grouping_map()
            .sum()
            .into_iter()
            .sorted_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
            .take(self.config.top_overordered_items)
            .map(|(item, total_variance)| OverorderedItem {
                item,
                total_variance,
            })
            .collect();

        Ok(PurchaseVarianceInsight {
            weeks,
            threshold,
            items,
        })
    }
}

/// (beverage sales, total sales) across one store-month of menu-mix rows.
fn beverage_totals(rows: &[MenuMixEntry]) -> (f64, f64) {
    rows.iter().fold((0.0, 0.0), |(bev, total), row| {
        let bev = if row.is_beverage() { bev + row.sales } else { bev };
        (bev, total + row.sales)
    })
}
