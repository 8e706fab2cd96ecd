use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod conversion;
pub mod currency;
pub mod error;
pub mod query;

pub use conversion::Conversion;
pub use currency::{Currency, SUPPORTED_CURRENCIES};
pub use error::InvalidInputError;
pub use query::HistoryQuery;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One daily rate between a fixed base/target pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub date: NaiveDate,
    pub rate: f64,
}

impl Sample {
    pub fn new(date: NaiveDate, rate: f64) -> Self {
        Sample { date, rate }
    }

    /// Builds a sample from a `YYYY-MM-DD` date string as vendors send it.
    pub fn parse(date: &str, rate: f64) -> Result<Self, InvalidInputError> {
        let date = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
            .map_err(|_| InvalidInputError::UnparseableDate(date.to_string()))?;
        Ok(Sample { date, rate })
    }

    fn validate(&self) -> Result<(), InvalidInputError> {
        if !self.rate.is_finite() || self.rate <= 0.0 {
            return Err(InvalidInputError::NonPositiveRate {
                date: self.date,
                rate: self.rate,
            });
        }
        Ok(())
    }
}

/// Non-empty run of samples, strictly ascending by date.
///
/// The only way in is [`Series::new`] (serde goes through it as well), so every
/// `Series` in hand already holds the invariants the summarizer relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Sample>", into = "Vec<Sample>")]
pub struct Series {
    samples: Vec<Sample>,
}

impl Series {
    pub fn new(samples: Vec<Sample>) -> Result<Self, InvalidInputError> {
        if samples.is_empty() {
            return Err(InvalidInputError::Empty);
        }

        let mut previous: Option<NaiveDate> = None;
        for sample in &samples {
            sample.validate()?;
            if let Some(previous) = previous {
                if sample.date <= previous {
                    return Err(InvalidInputError::OutOfOrder {
                        previous,
                        date: sample.date,
                    });
                }
            }
            previous = Some(sample.date);
        }

        Ok(Series { samples })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> &Sample {
        &self.samples[0]
    }

    pub fn latest(&self) -> &Sample {
        &self.samples[self.samples.len() - 1]
    }

    pub fn start_date(&self) -> NaiveDate {
        self.first().date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.latest().date
    }

    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }
}

impl TryFrom<Vec<Sample>> for Series {
    type Error = InvalidInputError;

    fn try_from(samples: Vec<Sample>) -> Result<Self, Self::Error> {
        Series::new(samples)
    }
}

impl From<Series> for Vec<Sample> {
    fn from(series: Series) -> Self {
        series.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn sample_parse_pass() {
        let sample = Sample::parse("2023-06-01", 1.2).unwrap();
        assert_eq!(sample.date, date("2023-06-01"));
        assert_eq!(sample.rate, 1.2);
    }

    #[test]
    fn sample_parse_fail_bad_date() {
        let result = Sample::parse("01/06/2023", 1.2);
        assert_eq!(
            result,
            Err(InvalidInputError::UnparseableDate("01/06/2023".to_string()))
        );
    }

    #[test]
    fn series_new_pass() {
        let series = Series::new(vec![
            Sample::new(date("2023-01-01"), 1.0),
            Sample::new(date("2023-01-02"), 1.1),
        ])
        .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.start_date(), date("2023-01-01"));
        assert_eq!(series.end_date(), date("2023-01-02"));
        assert_eq!(series.latest().rate, 1.1);
    }

    #[test]
    fn series_new_fail_empty() {
        assert_eq!(Series::new(vec![]), Err(InvalidInputError::Empty));
    }

    #[test]
    fn series_new_fail_non_positive_rate() {
        let result = Series::new(vec![
            Sample::new(date("2023-01-01"), 1.0),
            Sample::new(date("2023-01-02"), 0.0),
        ]);
        assert!(matches!(
            result,
            Err(InvalidInputError::NonPositiveRate { .. })
        ));
    }

    #[test]
    fn series_new_fail_nan_rate() {
        let result = Series::new(vec![Sample::new(date("2023-01-01"), f64::NAN)]);
        assert!(matches!(
            result,
            Err(InvalidInputError::NonPositiveRate { .. })
        ));
    }

    #[test]
    fn series_new_fail_duplicate_date() {
        let result = Series::new(vec![
            Sample::new(date("2023-01-01"), 1.0),
            Sample::new(date("2023-01-01"), 1.1),
        ]);
        assert_eq!(
            result,
            Err(InvalidInputError::OutOfOrder {
                previous: date("2023-01-01"),
                date: date("2023-01-01"),
            })
        );
    }

    #[test]
    fn series_new_fail_out_of_order() {
        let result = Series::new(vec![
            Sample::new(date("2023-01-02"), 1.0),
            Sample::new(date("2023-01-01"), 1.1),
        ]);
        assert!(matches!(result, Err(InvalidInputError::OutOfOrder { .. })));
    }

    #[test]
    fn series_serializes_as_array() {
        let series = Series::new(vec![Sample::new(date("2023-01-01"), 1.5)]).unwrap();
        let json = serde_json::to_value(&series).unwrap();
        assert_eq!(json, serde_json::json!([{"date": "2023-01-01", "rate": 1.5}]));
    }

    #[test]
    fn series_deserialize_revalidates() {
        let json = r#"[{"date": "2023-01-02", "rate": 1.0}, {"date": "2023-01-01", "rate": 1.0}]"#;
        let result: Result<Series, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
