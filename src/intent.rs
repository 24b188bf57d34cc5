//! Intent classification.
//!
//! Questions are matched against an ordered list of phrase rules. The first rule
//! that matches wins, so priority is decided by list position and never by where
//! a phrase occurs in the question.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// The analytical routine a question asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    FoodCost,
    Comparison,
    AverageCheck,
    CheckIncreaseScenario,
    BeverageMix,
    TotalSales,
    Transactions,
    Daypart,
    Staffing,
    PurchaseVariance,
    Unknown,
}

impl Intent {
    pub fn description(&self) -> &'static str {
        match self {
            Self::FoodCost => "Food cost versus brand benchmark",
            Self::Comparison => "Net sales versus brand average",
            Self::AverageCheck => "Average check and transaction count",
            Self::CheckIncreaseScenario => "What-if on raising the average check",
            Self::BeverageMix => "Beverage share of sales versus brand",
            Self::TotalSales => "Net sales for the month",
            Self::Transactions => "Transaction count for the month",
            Self::Daypart => "Sales by daypart",
            Self::Staffing => "Labor cost versus benchmark",
            Self::PurchaseVariance => "Items ordered above ideal usage",
            Self::Unknown => "Unrecognized question",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One entry in the priority list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentRule {
    pub intent: Intent,
    /// At least one of these phrases must appear
    pub any_of: &'static [&'static str],
    /// None of these phrases may appear
    pub none_of: &'static [&'static str],
}

impl IntentRule {
    const fn new(intent: Intent, any_of: &'static [&'static str]) -> Self {
        Self {
            intent,
            any_of,
            none_of: &[],
        }
    }

    const fn excluding(self, none_of: &'static [&'static str]) -> Self {
        Self { none_of, ..self }
    }

    /// `question` must already be lowercased and whitespace-normalized.
    pub fn matches(&self, question: &str) -> bool {
        self.any_of.iter().any(|p| question.contains(p))
            && !self.none_of.iter().any(|p| question.contains(p))
    }
}

/// Priority-ordered rules, evaluated top to bottom.
pub static INTENT_RULES: [IntentRule; 10] = [
    IntentRule::new(Intent::FoodCost, &["food cost"]),
    IntentRule::new(Intent::Comparison, &["compare"]),
    IntentRule::new(Intent::CheckIncreaseScenario, &["increase my average check"]),
    IntentRule::new(Intent::AverageCheck, &["average check"]).excluding(&["increase"]),
    IntentRule::new(Intent::BeverageMix, &["beverage"]),
    IntentRule::new(Intent::TotalSales, &["total sales"]),
    IntentRule::new(Intent::Transactions, &["transactions"]),
    IntentRule::new(Intent::Daypart, &["daypart", "breakfast", "lunch", "dinner"]),
    IntentRule::new(Intent::Staffing, &["overstaffed", "labor"]),
    IntentRule::new(Intent::PurchaseVariance, &["overordering", "purchase variance"]),
];

/// Lowercase and collapse runs of whitespace.
pub fn normalize_question(question: &str) -> String {
    question
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub struct IntentClassifier {
    rules: &'static [IntentRule],
}

impl IntentClassifier {
    pub fn new() -> Self {
        Self {
            rules: &INTENT_RULES,
        }
    }

    pub fn rules(&self) -> &[IntentRule] {
        self.rules
    }

    pub fn classify(&self, question: &str) -> Intent {
        self.classify_with_rule(question).0
    }

    /// Returns the intent and the index of the rule that produced it.
    pub fn classify_with_rule(&self, question: &str) -> (Intent, Option<usize>) {
        let normalized = normalize_question(question);
        match self.rules.iter().position(|r| r.matches(&normalized)) {
            Some(idx) => {
                let intent = self.rules[idx].intent;
                debug!(rule = idx, ?intent, "Question classified");
                (intent, Some(idx))
            }
            None => {
                debug!("No intent rule matched");
                (Intent::Unknown, None)
            }
        }
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(q: &str) -> Intent {
        IntentClassifier::new().classify(q)
    }

    #[test]
    fn test_each_rule() {
        assert_eq!(classify("Why is my food cost high this month?"), Intent::FoodCost);
        assert_eq!(classify("Compare my sales to the brand"), Intent::Comparison);
        assert_eq!(classify("What if I increase my average check by $2?"), Intent::CheckIncreaseScenario);
        assert_eq!(classify("What is my average check?"), Intent::AverageCheck);
        assert_eq!(classify("How are beverage sales doing?"), Intent::BeverageMix);
        assert_eq!(classify("What were my total sales?"), Intent::TotalSales);
        assert_eq!(classify("How many transactions did we do?"), Intent::Transactions);
        assert_eq!(classify("Show me breakfast numbers"), Intent::Daypart);
        assert_eq!(classify("Am I overstaffed?"), Intent::Staffing);
        assert_eq!(classify("Is there any overordering?"), Intent::PurchaseVariance);
        assert_eq!(classify("Hello there"), Intent::Unknown);
    }

    #[test]
    fn test_increase_never_resolves_to_average_check() {
        let questions = [
            "average check increase ideas",
            "Should I increase prices to lift my average check?",
            "INCREASE MY AVERAGE CHECK by $3",
            "average check - how do I increase it",
        ];
        for q in questions {
            assert_ne!(classify(q), Intent::AverageCheck, "{}", q);
        }
        assert_eq!(classify("increase my average check"), Intent::CheckIncreaseScenario);
    }

    #[test]
    fn test_priority_is_by_rule_order_not_position() {
        // "labor" appears first in the text, but food cost has higher priority
        assert_eq!(classify("labor and food cost this month"), Intent::FoodCost);
        // beverage outranks dinner
        assert_eq!(classify("dinner beverage sales"), Intent::BeverageMix);
        assert_eq!(classify("compare my food cost"), Intent::FoodCost);
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        assert_eq!(classify("  FOOD\tCOST?  "), Intent::FoodCost);
        assert_eq!(classify("Total   Sales"), Intent::TotalSales);
    }

    #[test]
    fn test_rule_index_reported() {
        let classifier = IntentClassifier::new();
        assert_eq!(classifier.classify_with_rule("food cost"), (Intent::FoodCost, Some(0)));
        assert_eq!(classifier.classify_with_rule("weather"), (Intent::Unknown, None));
        assert_eq!(classifier.rules().len(), 10);
    }

    #[test]
    fn test_intent_description() {
        assert!(!Intent::FoodCost.description().is_empty());
        assert_eq!(Intent::Daypart.to_string(), "Daypart");
    }
}
