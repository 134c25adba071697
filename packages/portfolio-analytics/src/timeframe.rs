//! Analysis windows.
//!
//! A [`Timeframe`] is either the whole history of the portfolio or a bounded,
//! inclusive date range. [`TimeframePreset`] covers the dashboard shortcuts
//! (`1W`, `1M`, `3M`, `YTD`, `1Y`, `ALL`) and resolves them against a given day.

use crate::types::DailySnapshot;
use crate::{Error, Result};
use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Window over which period figures are computed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Timeframe {
    /// Entire history; returns are measured against cost basis.
    SinceInception,
    /// Inclusive date range; returns are measured against the window start.
    Bounded { start: NaiveDate, end: NaiveDate },
}

impl Timeframe {
    /// Create a bounded window, swapping the ends if they are reversed.
    pub fn bounded(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Timeframe::Bounded { start, end }
        } else {
            Timeframe::Bounded {
                start: end,
                end: start,
            }
        }
    }

    /// Bounded window spanning the first and last snapshot dates.
    ///
    /// Returns `None` when the series is empty or either endpoint date is unparsable.
    pub fn bounded_by(snapshots: &[DailySnapshot]) -> Option<Self> {
        let start = snapshots.first()?.parsed_date()?;
        let end = snapshots.last()?.parsed_date()?;
        Some(Self::bounded(start, end))
    }

    pub fn is_since_inception(&self) -> bool {
        matches!(self, Timeframe::SinceInception)
    }

    /// Whether `date` lies inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            Timeframe::SinceInception => true,
            Timeframe::Bounded { start, end } => date >= start && date <= end,
        }
    }

    /// First day of the window, if bounded.
    pub fn start(&self) -> Option<NaiveDate> {
        match *self {
            Timeframe::SinceInception => None,
            Timeframe::Bounded { start, .. } => Some(start),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timeframe::SinceInception => write!(f, "all"),
            Timeframe::Bounded { start, end } => write!(f, "{}..={}", start, end),
        }
    }
}

/// Dashboard timeframe shortcuts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TimeframePreset {
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "YTD")]
    YearToDate,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "ALL")]
    All,
}

impl TimeframePreset {
    pub const ALL_PRESETS: [TimeframePreset; 6] = [
        TimeframePreset::OneWeek,
        TimeframePreset::OneMonth,
        TimeframePreset::ThreeMonths,
        TimeframePreset::YearToDate,
        TimeframePreset::OneYear,
        TimeframePreset::All,
    ];

    /// Short code, e.g. `3M`.
    pub fn code(self) -> &'static str {
        match self {
            TimeframePreset::OneWeek => "1W",
            TimeframePreset::OneMonth => "1M",
            TimeframePreset::ThreeMonths => "3M",
            TimeframePreset::YearToDate => "YTD",
            TimeframePreset::OneYear => "1Y",
            TimeframePreset::All => "ALL",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            TimeframePreset::OneWeek => "Week",
            TimeframePreset::OneMonth => "Month",
            TimeframePreset::ThreeMonths => "Quarter",
            TimeframePreset::YearToDate => "YTD",
            TimeframePreset::OneYear => "Year",
            TimeframePreset::All => "All",
        }
    }

    /// Resolve the preset to a concrete window ending on `today`.
    ///
    /// Month arithmetic clamps to the last day of the target month
    /// (March 31st minus one month is February 29th in a leap year).
    pub fn to_timeframe(self, today: NaiveDate) -> Timeframe {
        let start = match self {
            TimeframePreset::All => return Timeframe::SinceInception,
            TimeframePreset::OneWeek => today - Duration::days(7),
            TimeframePreset::OneMonth => months_before(today, 1),
            TimeframePreset::ThreeMonths => months_before(today, 3),
            TimeframePreset::YearToDate => {
                NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today)
            }
            TimeframePreset::OneYear => months_before(today, 12),
        };

        Timeframe::bounded(start, today)
    }
}

fn months_before(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

impl fmt::Display for TimeframePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for TimeframePreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1w" | "r1w" => Ok(TimeframePreset::OneWeek),
            "1m" | "r1m" => Ok(TimeframePreset::OneMonth),
            "3m" | "r3m" => Ok(TimeframePreset::ThreeMonths),
            "ytd" => Ok(TimeframePreset::YearToDate),
            "1y" | "r1y" => Ok(TimeframePreset::OneYear),
            "all" => Ok(TimeframePreset::All),
            _ => Err(Error::UnsupportedTimeframe(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!("1W".parse::<TimeframePreset>().unwrap(), TimeframePreset::OneWeek);
        assert_eq!("ytd".parse::<TimeframePreset>().unwrap(), TimeframePreset::YearToDate);
        assert_eq!("r3m".parse::<TimeframePreset>().unwrap(), TimeframePreset::ThreeMonths);
        assert_eq!("ALL".parse::<TimeframePreset>().unwrap(), TimeframePreset::All);

        let err = "5Y".parse::<TimeframePreset>();
        assert!(matches!(err, Err(Error::UnsupportedTimeframe(_))));
    }

    #[test]
    fn test_calendar_period_codes_are_rejected() {
        // Calendar week/month/quarter/year windows are not rolling presets
        for code in ["w", "m", "q", "y", "Q"] {
            let err = code.parse::<TimeframePreset>();
            assert!(matches!(err, Err(Error::UnsupportedTimeframe(_))), "{code}");
        }
    }

    #[test]
    fn test_preset_code_round_trips_through_parse() {
        for preset in TimeframePreset::ALL_PRESETS {
            assert_eq!(preset.code().parse::<TimeframePreset>().unwrap(), preset);
        }
    }

    #[test]
    fn test_preset_to_timeframe() {
        let today = date(2024, 3, 31);

        assert_eq!(
            TimeframePreset::OneWeek.to_timeframe(today),
            Timeframe::bounded(date(2024, 3, 24), today)
        );
        // Clamped to the end of February in a leap year
        assert_eq!(
            TimeframePreset::OneMonth.to_timeframe(today),
            Timeframe::bounded(date(2024, 2, 29), today)
        );
        assert_eq!(
            TimeframePreset::ThreeMonths.to_timeframe(today),
            Timeframe::bounded(date(2023, 12, 31), today)
        );
        assert_eq!(
            TimeframePreset::YearToDate.to_timeframe(today),
            Timeframe::bounded(date(2024, 1, 1), today)
        );
        assert_eq!(
            TimeframePreset::OneYear.to_timeframe(today),
            Timeframe::bounded(date(2023, 3, 31), today)
        );
        assert_eq!(TimeframePreset::All.to_timeframe(today), Timeframe::SinceInception);
    }

    #[test]
    fn test_bounded_swaps_reversed_ends() {
        let tf = Timeframe::bounded(date(2024, 2, 1), date(2024, 1, 1));
        assert_eq!(tf.start(), Some(date(2024, 1, 1)));
        assert!(tf.contains(date(2024, 1, 15)));
        assert!(!tf.contains(date(2024, 2, 2)));
    }

    #[test]
    fn test_bounded_by_snapshots() {
        let snapshots = vec![
            DailySnapshot::new("2024-01-01", 1.0, 1.0, 0.0, 1.0),
            DailySnapshot::new("2024-01-31", 1.0, 1.0, 0.0, 1.0),
        ];
        assert_eq!(
            Timeframe::bounded_by(&snapshots),
            Some(Timeframe::bounded(date(2024, 1, 1), date(2024, 1, 31)))
        );

        assert_eq!(Timeframe::bounded_by(&[]), None);

        let broken = vec![DailySnapshot::new("??", 1.0, 1.0, 0.0, 1.0)];
        assert_eq!(Timeframe::bounded_by(&broken), None);
    }

    #[test]
    fn test_timeframe_serde_tagged() {
        let json = serde_json::to_value(Timeframe::SinceInception).unwrap();
        assert_eq!(json["kind"], "since_inception");

        let bounded: Timeframe = serde_json::from_str(
            r#"{"kind":"bounded","start":"2024-01-01","end":"2024-01-31"}"#,
        )
        .unwrap();
        assert_eq!(bounded, Timeframe::bounded(date(2024, 1, 1), date(2024, 1, 31)));
    }
}
