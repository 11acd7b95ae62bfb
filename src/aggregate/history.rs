//! Time bucketing and chart shapes
//!
//! Buckets are labelled by their last day:
//! - `Day` - the day itself
//! - `Week` - weeks end on Monday
//! - `Month` - last day of the calendar month
//! - `Year` - 31 December, rendered as `YYYY`
//!
//! Series are zero-filled from the first bucket up to the bucket holding
//! "today", so charts always run to the present.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Interval {
    Day,
    Week,
    Month,
    Year,
}

impl Interval {
    pub const ALL: [Interval; 4] = [Interval::Day, Interval::Week, Interval::Month, Interval::Year];

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Day => "DAY",
            Interval::Week => "WEEK",
            Interval::Month => "MONTH",
            Interval::Year => "YEAR",
        }
    }

    /// Last day of the bucket containing `date`
    pub fn bucket_end(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Interval::Day => date,
            Interval::Week => {
                let days_to_monday = (7 - date.weekday().num_days_from_monday()) % 7;
                date + Duration::days(days_to_monday as i64)
            }
            Interval::Month => last_day_of_month(date),
            Interval::Year => NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date),
        }
    }

    pub fn label(&self, bucket_end: NaiveDate) -> String {
        match self {
            Interval::Year => bucket_end.format("%Y").to_string(),
            _ => bucket_end.format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalParseError(pub String);

impl std::fmt::Display for IntervalParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let valid: Vec<&str> = Interval::ALL.iter().map(|i| i.as_str()).collect();
        write!(f, "Invalid interval: {}. Valid values are: {}", self.0, valid.join(", "))
    }
}

impl std::error::Error for IntervalParseError {}

impl FromStr for Interval {
    type Err = IntervalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DAY" => Ok(Interval::Day),
            "WEEK" => Ok(Interval::Week),
            "MONTH" => Ok(Interval::Month),
            "YEAR" => Ok(Interval::Year),
            _ => Err(IntervalParseError(s.to_string())),
        }
    }
}

fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .unwrap_or(date)
}

/// Every day from `start` to `end` inclusive
pub fn days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|day| *day <= end).collect()
}

/// Sum dated values into zero-filled buckets running up to `today`
///
/// Values dated after `today` still get their bucket.
pub fn bucketize<V>(points: &[(NaiveDate, V)], interval: Interval, today: NaiveDate) -> Vec<(NaiveDate, V)>
where
    V: AddAssign + Copy + Default,
{
    let Some(first) = points.iter().map(|(date, _)| *date).min() else {
        return Vec::new();
    };
    let last = points
        .iter()
        .map(|(date, _)| *date)
        .max()
        .map_or(today, |latest| latest.max(today));

    let mut buckets: Vec<(NaiveDate, V)> = Vec::new();
    let mut end = interval.bucket_end(first);
    let final_end = interval.bucket_end(last);
    while end <= final_end {
        buckets.push((end, V::default()));
        match end.succ_opt() {
            Some(next) => end = interval.bucket_end(next),
            None => break,
        }
    }

    for (date, value) in points {
        let target = interval.bucket_end(*date);
        // buckets are sorted and contiguous
        if let Ok(position) = buckets.binary_search_by_key(&target, |(end, _)| *end) {
            buckets[position].1 += *value;
        }
    }

    buckets
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartTitle {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: Vec<T>,
}

/// ECharts-style line chart
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chart<T = u64> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<ChartTitle>,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub series: Vec<Series<T>>,
}

impl<T> Chart<T> {
    pub fn line(categories: Vec<String>) -> Self {
        Self {
            title: None,
            x_axis: Axis {
                kind: "category",
                data: Some(categories),
            },
            y_axis: Axis {
                kind: "value",
                data: None,
            },
            series: Vec::new(),
        }
    }

    pub fn titled(mut self, text: impl Into<String>) -> Self {
        self.title = Some(ChartTitle { text: text.into() });
        self
    }

    pub fn with_series(mut self, name: Option<&str>, data: Vec<T>) -> Self {
        self.series.push(Series {
            name: name.map(str::to_string),
            kind: "line",
            data,
        });
        self
    }

    pub fn categories(&self) -> &[String] {
        self.x_axis.data.as_deref().unwrap_or_default()
    }
}

/// Single-series activity chart from bucketed counts
pub fn activity_chart(buckets: &[(NaiveDate, u64)], interval: Interval) -> Chart<u64> {
    let labels = buckets.iter().map(|(end, _)| interval.label(*end)).collect();
    let counts = buckets.iter().map(|(_, count)| *count).collect();

    Chart::line(labels)
        .titled(format!("Activity for {}", interval.as_str()))
        .with_series(None, counts)
}
