use chrono::{Datelike, Days, NaiveDate};
use itertools::Itertools;
use rate_model::Sample;

/// Sunday closing the calendar week `date` falls in.
pub fn week_end(date: NaiveDate) -> NaiveDate {
    let days_to_sunday = 6 - u64::from(date.weekday().num_days_from_monday());
    date.checked_add_days(Days::new(days_to_sunday))
        .unwrap_or(date)
}

/// Weekly mean of `samples`, one point per week that has data, dated by the
/// week's closing Sunday.
///
/// `samples` must be ascending by date; weeks without samples are skipped
/// rather than emitted as gaps.
pub fn resample_weekly(samples: &[Sample]) -> Vec<Sample> {
    let weeks = samples.iter().chunk_by(|sample| week_end(sample.date));

    let mut out = Vec::new();
    for (week, group) in &weeks {
        let (sum, count) = group.fold((0.0, 0usize), |(sum, count), sample| {
            (sum + sample.rate, count + 1)
        });
        out.push(Sample::new(week, sum / count as f64));
    }
    out
}
