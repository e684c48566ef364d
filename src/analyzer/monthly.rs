use crate::model::{month_label, DividendEvent, MonthlyStatistic, MonthlyStatistics};
use crate::utils::{mean, median, population_std_dev};
use chrono::{DateTime, Datelike, Duration, Utc};
use std::collections::BTreeSet;

/// Per-calendar-month statistics over an optional trailing window of years.
/// The window cutoff is `now - 365 * years` days; events strictly before it
/// are ignored for this computation only. Months without events are omitted
/// entirely rather than reported as zero-probability rows.
pub fn monthly_statistics(
    events: &[DividendEvent],
    window_years: Option<u32>,
    now: DateTime<Utc>,
) -> MonthlyStatistics {
    let retained: Vec<&DividendEvent> = match window_years {
        Some(years) => {
            let cutoff = now.date_naive() - Duration::days(365 * i64::from(years));
            events.iter().filter(|e| e.payment_date >= cutoff).collect()
        }
        None => events.iter().collect(),
    };

    let mut buckets: [Vec<&DividendEvent>; 12] = std::array::from_fn(|_| Vec::new());
    let mut years_with_data = BTreeSet::new();
    for event in retained.iter().copied() {
        buckets[event.payment_date.month0() as usize].push(event);
        years_with_data.insert(event.payment_date.year());
    }

    let total_years = years_with_data.len();
    if total_years == 0 {
        return MonthlyStatistics::default();
    }

    let mut rows = Vec::new();
    for (idx, bucket) in buckets.iter().enumerate() {
        if bucket.is_empty() {
            continue;
        }

        let values: Vec<f64> = bucket.iter().map(|e| e.value).collect();
        let years_occurred: BTreeSet<i32> = bucket.iter().map(|e| e.payment_date.year()).collect();

        rows.push(MonthlyStatistic {
            month: month_label(idx),
            probability: years_occurred.len() as f64 / total_years as f64,
            average_value: mean(&values),
            median_value: median(&values),
            std_deviation: if values.len() > 1 {
                population_std_dev(&values)
            } else {
                0.0
            },
            occurrences: bucket.len(),
            years_occurred: years_occurred.into_iter().collect(),
            confidence_score: (bucket.len() as f64 / 3.0).min(1.0),
        });
    }

    MonthlyStatistics::new(rows)
}
