//! Engine configuration: brand benchmarks and analysis thresholds.
//!
//! Defaults reproduce the brand standards the advisor has always used. A JSON file
//! may override any subset of fields.

use crate::error::{InsightError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Brand food cost target, percent of sales
    pub food_cost_benchmark_pct: f64,
    /// Brand labor cost target, percent of sales
    pub labor_cost_benchmark_pct: f64,
    /// Share of incremental sales assumed to reach EBITDA
    pub ebitda_flow_through: f64,
    /// Check increase used when the question names no amount
    pub default_check_increase: f64,
    /// Weekly variance (units) above which an item counts as overordered
    pub overorder_variance_threshold: f64,
    pub purchase_lookback_weeks: usize,
    pub top_overordered_items: usize,
    /// Beverage share gap (store minus brand, in points) below which the store is flagged
    pub beverage_gap_alert_pts: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            food_cost_benchmark_pct: 30.0,
            labor_cost_benchmark_pct: 28.0,
            ebitda_flow_through: 0.40,
            default_check_increase: 1.00,
            overorder_variance_threshold: 10.0,
            purchase_lookback_weeks: 4,
            top_overordered_items: 3,
            beverage_gap_alert_pts: -1.0,
        }
    }
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            InsightError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            InsightError::Config(format!("Invalid config {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("food_cost_benchmark_pct", self.food_cost_benchmark_pct),
            ("labor_cost_benchmark_pct", self.labor_cost_benchmark_pct),
            ("ebitda_flow_through", self.ebitda_flow_through),
            ("default_check_increase", self.default_check_increase),
            ("overorder_variance_threshold", self.overorder_variance_threshold),
            ("beverage_gap_alert_pts", self.beverage_gap_alert_pts),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(InsightError::Config(format!("{} must be a finite number", name)));
            }
        }
        if self.default_check_increase <= 0.0 {
            return Err(InsightError::Config(
                "default_check_increase must be positive".to_string(),
            ));
        }
        if self.purchase_lookback_weeks == 0 || self.top_overordered_items == 0 {
            return Err(InsightError::Config(
                "purchase_lookback_weeks and top_overordered_items must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
