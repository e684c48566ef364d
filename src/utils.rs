// Utility functions
use chrono::NaiveDate;

/// Parses a `DD/MM/YYYY` date string, the external format used by the
/// provent payloads. Returns `None` on any malformed input.
pub fn parse_br_date(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%d/%m/%Y").ok()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by n, not n-1).
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_br_dates() {
        assert_eq!(
            parse_br_date("15/03/2023"),
            NaiveDate::from_ymd_opt(2023, 3, 15)
        );
        assert_eq!(
            parse_br_date(" 01/12/2024 "),
            NaiveDate::from_ymd_opt(2024, 12, 1)
        );
        assert_eq!(parse_br_date("2023-03-15"), None);
        assert_eq!(parse_br_date("31/02/2023"), None);
        assert_eq!(parse_br_date(""), None);
    }

    #[test]
    fn mean_of_empty_slice_is_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
    }

    #[test]
    fn population_std_dev_divides_by_n() {
        // Variance of [2, 4, 4, 4, 5, 5, 7, 9] is exactly 4.
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((population_std_dev(&values) - 2.0).abs() < 1e-12);
        assert_eq!(population_std_dev(&[3.5]), 0.0);
    }

    #[test]
    fn median_handles_even_and_odd_lengths() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(&[]), 0.0);
    }
}
