//! Query engine: question in, answer text out.
//!
//! Classification, resolution and formatting run against an immutable dataset,
//! so one engine can be shared across threads and answers are deterministic.

use crate::config::EngineConfig;
use crate::dataset::Dataset;
use crate::error::{InsightError, Result};
use crate::formatter;
use crate::intent::{Intent, IntentClassifier};
use crate::resolvers::{Insight, Resolver};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, info_span, warn};
use uuid::Uuid;

pub const MAX_QUESTION_LEN: usize = 1000;

/// A fully resolved answer, kept structured for `--json` output.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub store_id: String,
    pub intent: Intent,
    /// None when the data needed for the intent is missing
    pub insight: Option<Insight>,
    pub text: String,
}

#[derive(Clone)]
pub struct QueryEngine {
    dataset: Arc<Dataset>,
    config: Arc<EngineConfig>,
    classifier: Arc<IntentClassifier>,
}

impl QueryEngine {
    pub fn new(dataset: Dataset, config: EngineConfig) -> Self {
        Self::from_shared(Arc::new(dataset), Arc::new(config))
    }

    pub fn from_shared(dataset: Arc<Dataset>, config: Arc<EngineConfig>) -> Self {
        Self {
            dataset,
            config,
            classifier: Arc::new(IntentClassifier::new()),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Answer a question for one store. Never fails: problems are reported as
    /// user-facing text.
    pub fn answer(&self, question: &str, store_id: &str) -> String {
        match self.try_answer(question, store_id) {
            Ok(answer) => answer.text,
            Err(err) => formatter::format_error(&err),
        }
    }

    /// Answer with the structured insight. Missing data and computation
    /// failures still produce an `Answer` whose text explains the problem; only
    /// invalid input is returned as an error.
    pub fn try_answer(&self, question: &str, store_id: &str) -> Result<Answer> {
        validate_question(question)?;

        let query_id = Uuid::new_v4();
        let span = info_span!("answer", %query_id, store_id);
        let _guard = span.enter();

        let intent = self.classifier.classify(question);
        info!(?intent, about = intent.description(), "Answering question");

        let outcome = if intent == Intent::Unknown {
            Ok(Insight::Unknown)
        } else {
            Resolver::new(&self.dataset, &self.config).resolve(intent, store_id, question)
        };
        let text = formatter::render(intent, &outcome);

        let insight = match outcome {
            Ok(insight) => Some(insight),
            Err(err) if err.is_missing_data() || matches!(err, InsightError::Computation(_)) => {
                warn!("{}", err);
                None
            }
            Err(err) => return Err(err),
        };

        Ok(Answer {
            store_id: store_id.to_string(),
            intent,
            insight,
            text,
        })
    }
}

fn validate_question(question: &str) -> Result<()> {
    if question.trim().is_empty() {
        return Err(InsightError::InvalidInput("Question cannot be empty".to_string()));
    }
    if question.chars().count() > MAX_QUESTION_LEN {
        return Err(InsightError::InvalidInput(format!(
            "Question too long (max {} characters)",
            MAX_QUESTION_LEN
        )));
    }
    Ok(())
}
