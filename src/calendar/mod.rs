// src/calendar/mod.rs

//! Week grid reconstruction for heatmap rendering.
//!
//! The parser only yields the dates upstream reported. Rendering needs a
//! rectangle: Sunday-aligned columns of seven days with every gap filled.
//! Synthetic days carry `placeholder = true` so they can be told apart from
//! real days that had no activity.

pub mod labels;

use std::array;
use std::collections::HashMap;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{ContributionDay, MAX_LEVEL};

/// One cell of the grid, real or synthetic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub count: u64,
    pub level: u8,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub placeholder: bool,
}

impl CalendarDay {
    fn real(day: &ContributionDay) -> Self {
        Self {
            date: day.date,
            count: day.count,
            level: day.level.min(MAX_LEVEL),
            placeholder: false,
        }
    }

    fn placeholder(date: NaiveDate) -> Self {
        Self {
            date,
            count: 0,
            level: 0,
            placeholder: true,
        }
    }
}

/// A Sunday-to-Saturday column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Week([CalendarDay; 7]);

impl Week {
    pub fn days(&self) -> &[CalendarDay; 7] {
        &self.0
    }
}

/// Month label placed above the column where the month begins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MonthMarker {
    pub week_index: usize,
    pub label: String,
}

/// Gap-free, Sunday-aligned grid of weeks.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct WeekGrid {
    weeks: Vec<Week>,
}

impl WeekGrid {
    /// Build the grid covering every date in `days`.
    ///
    /// The first column starts on the Sunday on or before the earliest date
    /// and the last column is padded through Saturday. An empty input gives
    /// an empty grid.
    pub fn from_days(days: &[ContributionDay]) -> Self {
        let (Some(first), Some(last)) = (
            days.iter().map(|d| d.date).min(),
            days.iter().map(|d| d.date).max(),
        ) else {
            return Self::default();
        };

        let by_date: HashMap<NaiveDate, &ContributionDay> =
            days.iter().map(|day| (day.date, day)).collect();

        let back = u64::from(first.weekday().num_days_from_sunday());
        let start = first.checked_sub_days(Days::new(back)).unwrap_or(first);

        let mut cells: Vec<CalendarDay> = start
            .iter_days()
            .take_while(|date| *date <= last)
            .map(|date| {
                by_date
                    .get(&date)
                    .map_or_else(|| CalendarDay::placeholder(date), |day| CalendarDay::real(day))
            })
            .collect();

        let short = (7 - cells.len() % 7) % 7;
        cells.extend(
            last.iter_days()
                .skip(1)
                .take(short)
                .map(CalendarDay::placeholder),
        );

        let weeks = cells
            .chunks_exact(7)
            .map(|chunk| Week(array::from_fn(|i| chunk[i])))
            .collect();
        Self { weeks }
    }

    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    /// Iterate every cell, column by column.
    pub fn cells(&self) -> impl Iterator<Item = &CalendarDay> {
        self.weeks.iter().flat_map(|week| week.0.iter())
    }

    /// Mark the first column holding the 1st of each month.
    ///
    /// Months are keyed by month of year, so a month seen at both ends of a
    /// year-long window is only labelled at its first occurrence.
    pub fn month_markers(&self) -> Vec<MonthMarker> {
        let mut seen = [false; 12];
        let mut markers = Vec::new();

        for (week_index, week) in self.weeks.iter().enumerate() {
            for day in &week.0 {
                if day.date.day() != 1 {
                    continue;
                }
                let month = day.date.month0() as usize;
                if seen[month] {
                    continue;
                }
                seen[month] = true;
                markers.push(MonthMarker {
                    week_index,
                    label: labels::MONTH_LABELS[month].to_string(),
                });
            }
        }
        markers
    }
}

/// A grid cell with its hover text and fill color resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CellView {
    #[serde(flatten)]
    pub day: CalendarDay,
    pub tooltip: String,
    pub color: String,
}

impl From<CalendarDay> for CellView {
    fn from(day: CalendarDay) -> Self {
        Self {
            tooltip: labels::tooltip(&day),
            color: labels::level_color(day.level).to_string(),
            day,
        }
    }
}

/// Everything a heatmap renderer needs in one document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarView {
    pub heading: String,
    pub total: u64,
    /// Row labels, Sunday first
    pub day_labels: Vec<String>,
    /// Fill colors from least to most active
    pub legend: Vec<String>,
    pub weeks: Vec<[CellView; 7]>,
    pub months: Vec<MonthMarker>,
}

impl CalendarView {
    pub fn new(total: u64, days: &[ContributionDay]) -> Self {
        let grid = WeekGrid::from_days(days);
        let months = grid.month_markers();
        let weeks = grid
            .weeks()
            .iter()
            .map(|week| (*week.days()).map(CellView::from))
            .collect();

        Self {
            heading: labels::heading(total),
            total,
            day_labels: labels::DAY_LABELS.iter().map(|l| l.to_string()).collect(),
            legend: labels::LEVEL_COLORS.iter().map(|c| c.to_string()).collect(),
            weeks,
            months,
        }
    }
}
