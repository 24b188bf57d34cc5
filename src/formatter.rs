//! Response formatter
//!
//! Turns resolver output into the sentences shown to the franchisee. Currency is
//! rendered with thousands separators and no cents (average check keeps cents),
//! percentages with one decimal, months as "March 2024".

use crate::error::{InsightError, Result};
use crate::intent::Intent;
use crate::resolvers::{
    AverageCheckInsight, BenchmarkInsight, BeverageMixInsight, CheckIncreaseInsight,
    ComparisonInsight, DaypartInsight, Insight, PurchaseVarianceInsight, SalesInsight,
    TransactionsInsight,
};

pub const FALLBACK_MESSAGE: &str = "I'm still learning to answer that question. Try asking about \
food cost, sales comparisons, average check, beverage mix, total sales, transactions, dayparts, \
staffing, or overordering.";

pub const UNABLE_TO_CALCULATE: &str =
    "I was unable to calculate that scenario with the data available for your store.";

/// Render the answer for `intent` from its resolver outcome.
pub fn render(intent: Intent, outcome: &Result<Insight>) -> String {
    if intent == Intent::Unknown {
        return FALLBACK_MESSAGE.to_string();
    }
    match outcome {
        Ok(insight) => format_insight(insight),
        Err(err) => format_error(err),
    }
}

pub fn format_insight(insight: &Insight) -> String {
    match insight {
        Insight::FoodCost(i) => food_cost(i),
        Insight::Comparison(i) => comparison(i),
        Insight::AverageCheck(i) => average_check(i),
        Insight::CheckIncrease(i) => check_increase(i),
        Insight::BeverageMix(i) => beverage_mix(i),
        Insight::TotalSales(i) => total_sales(i),
        Insight::Transactions(i) => transactions(i),
        Insight::Daypart(i) => daypart(i),
        Insight::Staffing(i) => staffing(i),
        Insight::PurchaseVariance(i) => purchase_variance(i),
        Insight::Unknown => FALLBACK_MESSAGE.to_string(),
    }
}

/// Message for a failed question. Missing data gets its own wording so the owner
/// can tell it apart from an unsupported question.
pub fn format_error(err: &InsightError) -> String {
    match err {
        InsightError::MissingData { store_id, what } => format!(
            "Sorry, data is not available for store {} ({}).",
            store_id, what
        ),
        InsightError::Computation(_) => UNABLE_TO_CALCULATE.to_string(),
        _ => FALLBACK_MESSAGE.to_string(),
    }
}

fn food_cost(i: &BenchmarkInsight) -> String {
    if i.is_over() {
        format!(
            "Your food cost for {} was {}, which is {} pts above the brand benchmark of {}. \
             Review high-usage items and variance in weekly purchases.",
            i.month,
            format_pct(i.value_pct),
            format_pts(i.variance_pts),
            format_pct(i.benchmark_pct)
        )
    } else {
        format!(
            "Your food cost for {} is under control at {}, within the brand benchmark of {}. Keep it up!",
            i.month,
            format_pct(i.value_pct),
            format_pct(i.benchmark_pct)
        )
    }
}

fn comparison(i: &ComparisonInsight) -> String {
    let diff = i.net_sales - i.brand_avg_net_sales;
    let position = if diff >= 0.0 { "above" } else { "below" };
    format!(
        "Your sales in {} were {}. The average for {} stores was {} across {} {}, \
         so you are {} {} the brand average.",
        i.month,
        format_currency(i.net_sales),
        i.brand,
        format_currency(i.brand_avg_net_sales),
        i.brand_store_count,
        if i.brand_store_count == 1 { "store" } else { "stores" },
        format_currency(diff.abs()),
        position
    )
}

fn average_check(i: &AverageCheckInsight) -> String {
    format!(
        "Your average check in {} was {} across {} transactions.",
        i.month,
        format_currency_cents(i.avg_check),
        format_count(i.transactions)
    )
}

fn check_increase(i: &CheckIncreaseInsight) -> String {
    format!(
        "Raising your average check by {} on {} volume ({} transactions) would bring monthly \
         sales to {}, a gain of {}. At a {:.0}% flow-through that adds about {} to EBITDA.",
        format_currency_cents(i.increase),
        i.month,
        format_count(i.transactions),
        format_currency(i.new_sales),
        format_currency(i.sales_gain),
        i.flow_through * 100.0,
        format_currency(i.ebitda_estimate)
    )
}

fn beverage_mix(i: &BeverageMixInsight) -> String {
    let (month, share) = match (&i.month, &i.share) {
        (Some(month), Some(share)) => (month, share),
        (Some(month), None) => {
            return format!("No beverage sales were recorded for your store in {}.", month)
        }
        (None, _) => return "No beverage sales have been recorded for your store.".to_string(),
    };

    let lead = format!(
        "Beverages were {} of your sales in {}, compared with a {} average of {}.",
        format_pct(share.store_pct),
        month,
        i.brand,
        format_pct(share.brand_pct)
    );
    if share.below_brand {
        format!(
            "{} That is {} pts below your brand; suggest drinks at order time and push combo upgrades.",
            lead,
            format_pts(share.gap_pts.abs())
        )
    } else {
        format!("{} Your beverage mix is in line with your brand.", lead)
    }
}

fn total_sales(i: &SalesInsight) -> String {
    format!(
        "Your total net sales for {} were {}.",
        i.month,
        format_currency(i.net_sales)
    )
}

fn transactions(i: &TransactionsInsight) -> String {
    format!(
        "You recorded {} transactions in {}.",
        format_count(i.transactions),
        i.month
    )
}

fn daypart(i: &DaypartInsight) -> String {
    [
        format!("Daypart sales for {}:", i.month),
        format!("- Breakfast: {}", format_currency(i.breakfast)),
        format!("- Lunch: {}", format_currency(i.lunch)),
        format!("- Dinner: {}", format_currency(i.dinner)),
        format!("- Late Night: {}", format_currency(i.late_night)),
    ]
    .join("\n")
}

fn staffing(i: &BenchmarkInsight) -> String {
    if i.is_over() {
        format!(
            "Your labor cost for {} was {}, which is {} pts above the {} benchmark. \
             You may be overstaffed; review schedules against your slower dayparts.",
            i.month,
            format_pct(i.value_pct),
            format_pts(i.variance_pts),
            format_pct(i.benchmark_pct)
        )
    } else {
        format!(
            "Your labor cost for {} was {}, within benchmark ({}).",
            i.month,
            format_pct(i.value_pct),
            format_pct(i.benchmark_pct)
        )
    }
}

fn purchase_variance(i: &PurchaseVarianceInsight) -> String {
    let window = match i.weeks.len() {
        0 => return "No purchase data to review, so no major overordering detected.".to_string(),
        1 => "the last week".to_string(),
        n => format!("the last {} weeks", n),
    };
    if i.items.is_empty() {
        return format!("No major overordering detected in {}.", window);
    }

    let mut lines = vec![format!("Top overordered items over {}:", window)];
    lines.extend(i.items.iter().map(|item| {
        format!("- {}: {:.1} units over ideal", item.item, item.total_variance)
    }));
    lines.join("\n")
}

/// "1234567" -> "1,234,567"
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// "$12,000", "-$350"
pub fn format_currency(value: f64) -> String {
    let rounded = value.abs().round() as u64;
    let sign = if value < 0.0 && rounded > 0 { "-" } else { "" };
    format!("{}${}", sign, group_thousands(rounded))
}

/// "$12.45"
pub fn format_currency_cents(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, group_thousands(cents / 100), cents % 100)
}

pub fn format_count(value: u64) -> String {
    group_thousands(value)
}

/// "34.0%"
pub fn format_pct(value: f64) -> String {
    format!("{:.1}%", value)
}

fn format_pts(value: f64) -> String {
    format!("{:.1}", value)
}
