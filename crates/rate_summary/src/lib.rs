use chrono::NaiveDate;
use rate_model::{InvalidInputError, Sample, Series};
use serde::{Deserialize, Serialize};

pub mod resample;

pub use resample::resample_weekly;

/// Series longer than this are charted as weekly means.
pub const RESAMPLE_THRESHOLD: usize = 100;

const DAY_OFFSET: usize = 2;
const WEEK_OFFSET: usize = 7;
const MONTH_OFFSET: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extremum {
    pub rate: f64,
    pub date: NaiveDate,
}

/// Reference rates the percent changes are measured against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailingRates {
    pub day: f64,
    pub week: f64,
    pub month: f64,
    pub year: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentChanges {
    pub day: f64,
    pub week: f64,
    pub month: f64,
    pub year: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub highest: Extremum,
    pub lowest: Extremum,
    pub latest: f64,
    pub trailing: TrailingRates,
    pub change: PercentChanges,
    /// Display series, weekly means when `resampled` is set.
    pub chart: Vec<Sample>,
    pub resampled: bool,
}

/// `(new - old) / old * 100`, or 0 when `old` is 0.
pub fn percent_change(new: f64, old: f64) -> f64 {
    if old != 0.0 {
        (new - old) / old * 100.0
    } else {
        0.0
    }
}

/// Validates `samples` and summarizes them; nothing partial comes back on failure.
pub fn summarize(samples: Vec<Sample>) -> Result<Summary, InvalidInputError> {
    let series = Series::new(samples)?;
    Ok(summarize_series(&series))
}

pub fn summarize_series(series: &Series) -> Summary {
    let (highest, lowest) = extrema(series);
    let latest = series.latest().rate;
    let trailing = trailing(series);

    let change = PercentChanges {
        day: percent_change(latest, trailing.day),
        week: percent_change(latest, trailing.week),
        month: percent_change(latest, trailing.month),
        year: percent_change(latest, trailing.year),
    };

    let resampled = series.len() > RESAMPLE_THRESHOLD;
    let chart = if resampled {
        resample_weekly(series.samples())
    } else {
        series.samples().to_vec()
    };

    Summary {
        highest,
        lowest,
        latest,
        trailing,
        change,
        chart,
        resampled,
    }
}

/// Highest and lowest samples; the earliest one wins a tie.
fn extrema(series: &Series) -> (Extremum, Extremum) {
    let first = series.first();
    let mut highest = Extremum {
        rate: first.rate,
        date: first.date,
    };
    let mut lowest = highest;

    for sample in &series.samples()[1..] {
        if sample.rate > highest.rate {
            highest = Extremum {
                rate: sample.rate,
                date: sample.date,
            };
        }
        if sample.rate < lowest.rate {
            lowest = Extremum {
                rate: sample.rate,
                date: sample.date,
            };
        }
    }
    (highest, lowest)
}

/// Look-backs are positional: gaps in the dates are not compensated for.
pub fn trailing(series: &Series) -> TrailingRates {
    let samples = series.samples();
    let latest = series.latest().rate;
    let back = |offset: usize, min_len: usize| {
        if samples.len() > min_len {
            samples[samples.len() - offset].rate
        } else {
            latest
        }
    };

    TrailingRates {
        day: back(DAY_OFFSET, 1),
        week: back(WEEK_OFFSET, WEEK_OFFSET),
        month: back(MONTH_OFFSET, MONTH_OFFSET),
        year: series.first().rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn daily(start: &str, rates: impl IntoIterator<Item = f64>) -> Vec<Sample> {
        let start = date(start);
        rates
            .into_iter()
            .enumerate()
            .map(|(i, rate)| Sample::new(start + Days::new(i as u64), rate))
            .collect()
    }

    fn assert_close(left: f64, right: f64) {
        assert!((left - right).abs() < 1e-9, "{left} != {right}");
    }

    #[test]
    fn percent_change_pass() {
        assert_close(percent_change(1.1, 1.0), 10.0);
        assert_close(percent_change(0.9, 1.0), -10.0);
    }

    #[test]
    fn percent_change_same_value_is_zero() {
        for x in [0.5, 1.0, 123.456, -3.0] {
            assert_eq!(percent_change(x, x), 0.0);
        }
    }

    #[test]
    fn percent_change_zero_old_is_zero() {
        for x in [0.0, 1.0, -2.0, 1e9] {
            assert_eq!(percent_change(x, 0.0), 0.0);
        }
    }

    #[test]
    fn summarize_example_series() {
        let summary = summarize(vec![
            Sample::new(date("2023-01-01"), 1.00),
            Sample::new(date("2023-06-01"), 1.20),
            Sample::new(date("2023-12-31"), 0.90),
        ])
        .unwrap();

        assert_eq!(
            summary.highest,
            Extremum {
                rate: 1.20,
                date: date("2023-06-01")
            }
        );
        assert_eq!(
            summary.lowest,
            Extremum {
                rate: 0.90,
                date: date("2023-12-31")
            }
        );
        assert_eq!(summary.latest, 0.90);
        assert_close(summary.change.year, -10.0);
        assert_close(summary.change.day, percent_change(0.90, 1.20));
        assert!(!summary.resampled);
    }

    #[test]
    fn summarize_fail_empty() {
        assert_eq!(summarize(vec![]), Err(InvalidInputError::Empty));
    }

    #[test]
    fn summarize_fail_malformed_sample() {
        let result = summarize(daily("2023-01-01", [1.0, -1.0, 1.0]));
        assert!(matches!(
            result,
            Err(InvalidInputError::NonPositiveRate { .. })
        ));
    }

    #[test]
    fn summarize_single_sample() {
        let summary = summarize(daily("2023-01-01", [1.25])).unwrap();
        assert_eq!(
            summary.trailing,
            TrailingRates {
                day: 1.25,
                week: 1.25,
                month: 1.25,
                year: 1.25
            }
        );
        assert_eq!(
            summary.change,
            PercentChanges {
                day: 0.0,
                week: 0.0,
                month: 0.0,
                year: 0.0
            }
        );
        assert_eq!(summary.highest, summary.lowest);
    }

    #[test]
    fn extrema_bound_every_sample() {
        let rates = [1.3, 0.7, 2.2, 1.9, 0.4, 0.9, 2.1];
        let summary = summarize(daily("2023-03-01", rates)).unwrap();
        for rate in rates {
            assert!(summary.highest.rate >= rate);
            assert!(summary.lowest.rate <= rate);
        }
    }

    #[test]
    fn extrema_ties_resolve_to_earliest() {
        let summary = summarize(daily("2023-01-01", [1.0, 2.0, 0.5, 2.0, 0.5])).unwrap();
        assert_eq!(summary.highest.date, date("2023-01-02"));
        assert_eq!(summary.lowest.date, date("2023-01-03"));
    }

    #[test]
    fn trailing_windows_are_positional() {
        let rates: Vec<f64> = (1..=40i32).map(f64::from).collect();
        let summary = summarize(daily("2023-01-01", rates)).unwrap();
        assert_eq!(summary.trailing.day, 39.0);
        assert_eq!(summary.trailing.week, 34.0);
        assert_eq!(summary.trailing.month, 11.0);
        assert_eq!(summary.trailing.year, 1.0);
    }

    #[test]
    fn trailing_windows_fall_back_to_latest_when_short() {
        let summary = summarize(daily("2023-01-01", [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0])).unwrap();
        assert_eq!(summary.trailing.day, 6.0);
        assert_eq!(summary.trailing.week, 7.0);
        assert_eq!(summary.trailing.month, 7.0);
        assert_eq!(summary.change.week, 0.0);
    }

    #[test]
    fn trailing_windows_ignore_date_gaps() {
        let series = vec![
            Sample::new(date("2023-01-01"), 1.0),
            Sample::new(date("2023-03-01"), 2.0),
        ];
        let summary = summarize(series).unwrap();
        assert_eq!(summary.trailing.day, 1.0);
        assert_close(summary.change.day, 100.0);
    }

    #[test]
    fn chart_passes_through_short_series() {
        let samples = daily("2023-01-01", (0..50i32).map(|i| 1.0 + f64::from(i) / 100.0));
        let summary = summarize(samples.clone()).unwrap();
        assert!(!summary.resampled);
        assert_eq!(summary.chart, samples);
    }

    #[test]
    fn chart_resamples_year_to_weeks() {
        // 2023-01-01 is a Sunday, so the first week holds a single day
        let samples = daily("2023-01-01", (1..=365i32).map(f64::from));
        let summary = summarize(samples).unwrap();

        assert!(summary.resampled);
        assert!(summary.chart.len() <= 53);
        assert_eq!(summary.chart.len(), 53);
        assert_eq!(summary.chart[0], Sample::new(date("2023-01-01"), 1.0));
        assert_eq!(summary.chart[1], Sample::new(date("2023-01-08"), 5.0));
        assert_eq!(summary.chart[52], Sample::new(date("2023-12-31"), 362.0));
        assert!(summary.chart.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn chart_resample_threshold_is_exclusive() {
        let at = summarize(daily("2023-01-01", (0..100).map(|_| 1.0))).unwrap();
        let over = summarize(daily("2023-01-01", (0..101).map(|_| 1.0))).unwrap();
        assert!(!at.resampled);
        assert_eq!(at.chart.len(), 100);
        assert!(over.resampled);
    }

    #[test]
    fn summary_serializes() {
        let summary = summarize(daily("2023-01-01", [1.0])).unwrap();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["highest"]["date"], "2023-01-01");
        assert_eq!(json["change"]["year"], 0.0);
        assert_eq!(json["resampled"], false);
    }
}
