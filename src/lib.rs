//! Franchise insights: plain-English questions about a restaurant's monthly
//! financials, answered from local CSV data.

pub mod config;
pub mod dataset;
pub mod error;
pub mod formatter;
pub mod intent;
pub mod query_engine;
pub mod resolvers;
pub mod store_lookup;
pub mod time;

pub use config::EngineConfig;
pub use dataset::Dataset;
pub use error::{InsightError, Result};
pub use intent::{Intent, IntentClassifier};
pub use query_engine::{Answer, QueryEngine};
pub use resolvers::Insight;
