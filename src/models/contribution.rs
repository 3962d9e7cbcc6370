//! Contribution data structures.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Username;

/// Highest intensity bucket the upstream assigns.
pub const MAX_LEVEL: u8 = 4;

/// One calendar date's activity record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContributionDay {
    /// Calendar date, serialized as `YYYY-MM-DD`
    pub date: NaiveDate,

    /// Number of contributions recorded that day
    pub count: u64,

    /// Intensity bucket in `[0, 4]`
    pub level: u8,
}

impl ContributionDay {
    pub fn new(date: NaiveDate, count: u64, level: u8) -> Self {
        Self {
            date,
            count,
            level: level.min(MAX_LEVEL),
        }
    }
}

/// Output of the parser before the request envelope is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCalendar {
    /// Total declared in the page heading, if it could be read
    pub declared_total: Option<u64>,

    /// Days sorted ascending by date
    pub days: Vec<ContributionDay>,
}

impl ParsedCalendar {
    /// Sum of all parsed day counts, saturating at `u64::MAX`.
    pub fn summed_total(&self) -> u64 {
        self.days
            .iter()
            .fold(0u64, |total, day| total.saturating_add(day.count))
    }

    /// Declared total when present, otherwise the summed day counts.
    pub fn total(&self) -> u64 {
        self.declared_total.unwrap_or_else(|| self.summed_total())
    }
}

/// Successful response envelope for one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContributionResult {
    pub username: Username,
    pub total: u64,
    pub days: Vec<ContributionDay>,
    /// When this result was produced, not when upstream data changed
    pub updated_at: DateTime<Utc>,
}

impl ContributionResult {
    /// Build the envelope from a parsed calendar, stamping it with `updated_at`.
    pub fn from_parsed(
        username: Username,
        parsed: ParsedCalendar,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            username,
            total: parsed.total(),
            days: parsed.days,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(date: &str, count: u64) -> ContributionDay {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        ContributionDay::new(date, count, 1)
    }

    #[test]
    fn test_level_is_clamped() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(ContributionDay::new(date, 0, 9).level, MAX_LEVEL);
    }

    #[test]
    fn test_total_prefers_declared_value() {
        let parsed = ParsedCalendar {
            declared_total: Some(1234),
            days: vec![day("2024-03-01", 2), day("2024-03-02", 3)],
        };
        assert_eq!(parsed.total(), 1234);
    }

    #[test]
    fn test_total_falls_back_to_sum() {
        let parsed = ParsedCalendar {
            declared_total: None,
            days: vec![day("2024-03-01", 2), day("2024-03-02", 3)],
        };
        assert_eq!(parsed.total(), 5);
    }

    #[test]
    fn test_sum_saturates_on_huge_counts() {
        let parsed = ParsedCalendar {
            declared_total: None,
            days: vec![day("2024-03-01", u64::MAX), day("2024-03-02", 1)],
        };
        assert_eq!(parsed.summed_total(), u64::MAX);
        assert_eq!(parsed.total(), u64::MAX);
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let parsed = ParsedCalendar {
            declared_total: None,
            days: vec![day("2024-03-01", 5)],
        };
        let updated_at = DateTime::parse_from_rfc3339("2024-03-02T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let result =
            ContributionResult::from_parsed(Username::parse("octocat").unwrap(), parsed, updated_at);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["username"], "octocat");
        assert_eq!(json["total"], 5);
        assert_eq!(json["days"][0]["date"], "2024-03-01");
        assert_eq!(json["days"][0]["count"], 5);
        assert_eq!(json["days"][0]["level"], 1);
        assert_eq!(json["updatedAt"], "2024-03-02T10:00:00Z");
    }
}
