use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightError {
    /// No financial, daypart or other required record exists for the store/period.
    #[error("Missing data for store {store_id}: {what}")]
    MissingData { store_id: String, what: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A derived value could not be computed (non-finite arithmetic).
    #[error("Computation error: {0}")]
    Computation(String),

    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("Load error: {0}")]
    Load(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Polars error: {0}")]
    Polars(String),
}

impl InsightError {
    pub fn missing(store_id: impl Into<String>, what: impl Into<String>) -> Self {
        Self::MissingData {
            store_id: store_id.into(),
            what: what.into(),
        }
    }

    /// True for faults the caller should show as "data not available".
    pub fn is_missing_data(&self) -> bool {
        matches!(self, Self::MissingData { .. })
    }
}

impl From<polars::error::PolarsError> for InsightError {
    fn from(err: polars::error::PolarsError) -> Self {
        InsightError::Polars(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, InsightError>;
