use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::Currency;

const TRAILING_YEAR_DAYS: u64 = 365;

/// A history request for one pair over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub base: Currency,
    pub target: Currency,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl HistoryQuery {
    pub fn new(base: Currency, target: Currency, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        HistoryQuery {
            base,
            target,
            start_date,
            end_date,
        }
    }

    /// The 365 days ending on `today`.
    pub fn trailing_year(base: Currency, target: Currency, today: NaiveDate) -> Self {
        let start_date = today
            .checked_sub_days(Days::new(TRAILING_YEAR_DAYS))
            .unwrap_or(NaiveDate::MIN);
        HistoryQuery::new(base, target, start_date, today)
    }

    pub fn cache_key(&self) -> String {
        format!(
            "history:{}:{}:{}:{}",
            self.base,
            self.target,
            self.start_date.format("%Y-%m-%d"),
            self.end_date.format("%Y-%m-%d")
        )
    }

    /// Vendor quote key, e.g. `USDKES`.
    pub fn pair(&self) -> String {
        format!("{}{}", self.base, self.target)
    }
}
