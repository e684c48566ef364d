use crate::model::{
    month_index, DividendEvent, MonthlyStatistics, PaymentPattern, Prediction,
};
use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Months below this probability are never predicted.
pub const MIN_PROBABILITY: f64 = 0.6;

/// Day-of-month convention used when no finer date signal exists.
const PREDICTED_DAY: u32 = 15;

/// Candidates projected further out than this are skipped.
const MAX_HORIZON_DAYS: i64 = 365;

/// Picks the most probable upcoming month and projects a payment date.
/// Candidates are taken strictly in descending probability order (calendar
/// order on exact ties); a candidate is only rejected when its projected
/// date fails the horizon test, even if a closer lower-probability month
/// exists.
pub fn predict_next_payment(
    events: &[DividendEvent],
    stats: &MonthlyStatistics,
    pattern: PaymentPattern,
    now: DateTime<Utc>,
) -> Option<Prediction> {
    if events.is_empty() || stats.is_empty() {
        return None;
    }

    let mut candidates: Vec<_> = stats
        .iter()
        .filter(|s| s.probability >= MIN_PROBABILITY)
        .collect();
    if candidates.is_empty() {
        return None;
    }
    // Stable sort: equal probabilities keep calendar order.
    candidates.sort_by(|a, b| b.probability.total_cmp(&a.probability));

    let today = now.date_naive();
    for stat in candidates {
        let Some(month_idx) = month_index(stat.month) else {
            continue;
        };
        // The month's next occurrence: current year only when it is still
        // strictly ahead of the current month.
        let year = if month_idx as u32 > today.month0() {
            today.year()
        } else {
            today.year() + 1
        };
        let Some(predicted_date) = NaiveDate::from_ymd_opt(year, month_idx as u32 + 1, PREDICTED_DAY)
        else {
            continue;
        };
        if (predicted_date - today).num_days() > MAX_HORIZON_DAYS {
            continue;
        }

        return Some(Prediction {
            predicted_month: stat.month,
            predicted_date,
            probability: stat.probability,
            expected_value: stat.average_value,
            confidence_score: stat.confidence_score,
            based_on_pattern: pattern,
        });
    }

    None
}
