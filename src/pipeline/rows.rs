//! Row extractor: groups the flat plan table into weeks, then folds the weeks
//! into one [`DayActivity`] per scheduled weekday.

use chrono::{Datelike, NaiveDate};
use metrics::counter;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::common::constants::{
    ACTIVITY_LABEL, DAYS_PER_WEEK, MONTHS, PURPOSE_LABEL, REST_CELLS, SESSION_NOTES_LABEL, WEEK_LABEL,
};
use crate::domain::{DayActivity, TableRow, WeekContext};
use crate::pipeline::segment::segment;

static LABELLED_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+\s+\w+\s*-").expect("static pattern must compile"));
static COMPACT_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^week\s*\d").expect("static pattern must compile"));
/// `22 Dec - 28 Dec`
static WEEK_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})\s+(\w+)\s*-").expect("static pattern must compile"));
static WEEK_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)week\s+(\d+)").expect("static pattern must compile"));
static STRENGTH_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+and\s+.*strength.*").expect("static pattern must compile"));

/// Compact sheets put every activity row this wide (label columns plus seven days)
const COMPACT_ROW_WIDTH: usize = 9;

/// How the plan table marks its weeks and rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlanLayout {
    /// Week header, then `Activity`, `Purpose` and `Session notes` rows
    #[default]
    Labelled,
    /// `Week N` header followed by one row of `Type: description` cells
    Compact,
}

/// One week's rows, gathered before any parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekBlock {
    pub header: TableRow,
    /// Position of the header in the plan, starting at 1
    pub ordinal: usize,
    pub activity_row: Option<TableRow>,
    pub purpose_row: Option<TableRow>,
    pub session_notes_row: Option<TableRow>,
}

impl WeekBlock {
    fn new(header: TableRow, ordinal: usize) -> Self {
        Self {
            header,
            ordinal,
            activity_row: None,
            purpose_row: None,
            session_notes_row: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekGrouping {
    pub weeks: Vec<WeekBlock>,
    /// Plan rows that showed up before any week header
    pub orphan_rows: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub days: Vec<DayActivity>,
    /// Weeks whose header date could not be resolved
    pub skipped_weeks: usize,
    /// Orphan rows plus weeks without an activity row
    pub structural_gaps: usize,
}

#[derive(Debug, Clone)]
pub struct RowExtractor {
    layout: PlanLayout,
    today: NaiveDate,
}

impl RowExtractor {
    /// `today` anchors the year of every week header
    pub fn new(layout: PlanLayout, today: NaiveDate) -> Self {
        Self { layout, today }
    }

    pub fn layout(&self) -> PlanLayout {
        self.layout
    }

    fn is_header(&self, row: &TableRow) -> bool {
        let label = row.label();
        match self.layout {
            PlanLayout::Labelled => label.contains(WEEK_LABEL) && LABELLED_HEADER.is_match(row.raw_label()),
            PlanLayout::Compact => COMPACT_HEADER.is_match(&label),
        }
    }

    pub fn group_weeks(&self, rows: &[TableRow]) -> WeekGrouping {
        let mut grouping = WeekGrouping::default();

        for row in rows.iter().filter(|row| row.len() >= 2) {
            if self.is_header(row) {
                let ordinal = grouping.weeks.len() + 1;
                grouping.weeks.push(WeekBlock::new(row.clone(), ordinal));
                continue;
            }

            let label = row.label();
            let Some(week) = grouping.weeks.last_mut() else {
                if self.is_plan_row(row, &label) {
                    warn!(label = %label, "plan row before any week header, skipping");
                    grouping.orphan_rows += 1;
                }
                continue;
            };

            match self.layout {
                PlanLayout::Labelled => {
                    let slot = match label.as_str() {
                        ACTIVITY_LABEL => &mut week.activity_row,
                        PURPOSE_LABEL => &mut week.purpose_row,
                        SESSION_NOTES_LABEL => &mut week.session_notes_row,
                        _ => continue,
                    };
                    if slot.is_none() {
                        *slot = Some(row.clone());
                    }
                }
                PlanLayout::Compact => {
                    if week.activity_row.is_none() && row.len() >= COMPACT_ROW_WIDTH {
                        week.activity_row = Some(row.clone());
                    }
                }
            }
        }

        grouping
    }

    fn is_plan_row(&self, row: &TableRow, label: &str) -> bool {
        match self.layout {
            PlanLayout::Labelled => matches!(label, ACTIVITY_LABEL | PURPOSE_LABEL | SESSION_NOTES_LABEL),
            PlanLayout::Compact => row.len() >= COMPACT_ROW_WIDTH,
        }
    }

    /// Every scheduled, non-rest day in plan order
    pub fn extract(&self, rows: &[TableRow]) -> Extraction {
        let grouping = self.group_weeks(rows);
        let initial = Extraction {
            structural_gaps: grouping.orphan_rows,
            ..Default::default()
        };

        grouping.weeks.iter().fold(initial, |mut acc, week| {
            let Some(context) = self.week_context(week) else {
                warn!(header = week.header.raw_label(), "could not resolve week start date, skipping week");
                counter!("plan_weeks_skipped_total").increment(1);
                acc.skipped_weeks += 1;
                return acc;
            };
            let Some(activity_row) = &week.activity_row else {
                warn!(week = context.week_number, "week has no activity row");
                acc.structural_gaps += 1;
                return acc;
            };

            let days = self.week_days(&context, activity_row, week);
            debug!(week = context.week_number, start = %context.start_date, days = days.len(), "week extracted");
            acc.days.extend(days);
            acc
        })
    }

    fn week_context(&self, week: &WeekBlock) -> Option<WeekContext> {
        let header = week.header.raw_label();
        let start_date = parse_week_start(header, self.today)?;
        let week_number = match self.layout {
            PlanLayout::Labelled => parse_week_number(header).unwrap_or(week.ordinal as u32),
            PlanLayout::Compact => week.ordinal as u32,
        };
        Some(WeekContext {
            start_date,
            week_number,
            ordinal: week.ordinal,
        })
    }

    fn week_days(&self, context: &WeekContext, activity_row: &TableRow, week: &WeekBlock) -> Vec<DayActivity> {
        let purposes = week.purpose_row.as_ref().map(TableRow::day_cells);
        let notes = week.session_notes_row.as_ref().map(TableRow::day_cells);

        let mut days = Vec::with_capacity(DAYS_PER_WEEK);
        for (index, cell) in activity_row.day_cells().into_iter().enumerate() {
            if is_rest_cell(cell) {
                counter!("plan_days_skipped_total").increment(1);
                continue;
            }

            let purpose_text = purposes.map(|p| p[index].trim().to_string()).unwrap_or_default();
            let session_note_text = notes
                .map(|n| n[index].trim())
                .filter(|note| !note.is_empty())
                .map(str::to_string);

            let (name, summary) = match self.layout {
                PlanLayout::Labelled => (run_name(cell), None),
                PlanLayout::Compact => {
                    let (name, summary) = compact_parts(cell);
                    (name, Some(summary))
                }
            };

            days.push(DayActivity {
                date: context.day(index),
                week_number: context.week_number,
                name,
                raw_activity_text: cell.trim().to_string(),
                purpose_text,
                session_note_text,
                summary,
            });
        }
        days
    }
}

/// Monday of the week named in a header such as `Week 1\n22 Dec - 28 Dec`.
/// Early-year months seen late in the year belong to the following year.
pub fn parse_week_start(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let caps = WEEK_START.captures(text)?;
    let day: u32 = caps.get(1)?.as_str().parse().ok()?;
    let month_name: String = caps.get(2)?.as_str().to_lowercase().chars().take(3).collect();
    let month = MONTHS.iter().position(|m| *m == month_name)? as u32 + 1;

    let mut year = today.year();
    if month < today.month() && month <= 3 {
        year += 1;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn parse_week_number(text: &str) -> Option<u32> {
    WEEK_NUMBER
        .captures(text)
        .and_then(|caps| caps.get(1)?.as_str().parse().ok())
}

pub fn is_rest_cell(cell: &str) -> bool {
    let cell = cell.trim().to_lowercase();
    cell.is_empty() || REST_CELLS.contains(&cell.as_str())
}

/// The activity with any `... and ... strength` add-on removed
pub fn run_name(activity: &str) -> String {
    STRENGTH_SUFFIX.replace(activity, "").trim().to_string()
}

/// Name and summary of a compact cell. `Type: description` is named after the
/// type and summarised by the description; other cells by their first line and whole text.
fn compact_parts(cell: &str) -> (String, String) {
    let cell = cell.trim();
    match (segment(cell).title, cell.split_once(':')) {
        (Some(title), Some((_, description))) => (title, description.trim().to_string()),
        _ => {
            let first_line = cell.lines().next().unwrap_or_default().trim().to_string();
            (first_line, cell.to_string())
        }
    }
}
