//! Domain data shapes shared across layers: table rows in, workout events out,
//! and the structured workout steps in between.

use chrono::{Duration, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;

use crate::common::constants::{DAYS_PER_WEEK, FIRST_DAY_COLUMN, LABEL_COLUMN};

/// One row of the plan table, cells in sheet order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<String>,
}

impl TableRow {
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
        }
    }

    /// Raw label cell, untouched
    pub fn raw_label(&self) -> &str {
        self.cell(LABEL_COLUMN)
    }

    /// Lower-cased, trimmed label used for row-type checks
    pub fn label(&self) -> String {
        self.raw_label().trim().to_lowercase()
    }

    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }

    /// Monday..Sunday cells; missing trailing cells read as empty
    pub fn day_cells(&self) -> [&str; DAYS_PER_WEEK] {
        let mut days = [""; DAYS_PER_WEEK];
        for (i, day) in days.iter_mut().enumerate() {
            *day = self.cell(FIRST_DAY_COLUMN + i);
        }
        days
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// The week a day belongs to. Replaced, never mutated, when the next header shows up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekContext {
    /// Monday of the week as written in the header
    pub start_date: NaiveDate,
    pub week_number: u32,
    /// Position of the header in the plan, starting at 1
    pub ordinal: usize,
}

impl WeekContext {
    pub fn day(&self, day_index: usize) -> NaiveDate {
        self.start_date + Duration::days(day_index as i64)
    }

    pub fn end_date(&self) -> NaiveDate {
        self.day(DAYS_PER_WEEK - 1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date()
    }
}

/// A scheduled, non-rest day with everything the parser needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayActivity {
    pub date: NaiveDate,
    pub week_number: u32,
    /// Event name as it will appear on the calendar
    pub name: String,
    pub raw_activity_text: String,
    pub purpose_text: String,
    pub session_note_text: Option<String>,
    /// Compact layout only: the cell text after its `Type:` prefix, shown above the steps
    pub summary: Option<String>,
}

/// Heart-rate intensity bucket, Z1 easiest to Z5 hardest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Zone {
    Z1,
    Z2,
    Z3,
    Z4,
    Z5,
}

impl Zone {
    pub fn from_digit(digit: u32) -> Option<Self> {
        match digit {
            1 => Some(Zone::Z1),
            2 => Some(Zone::Z2),
            3 => Some(Zone::Z3),
            4 => Some(Zone::Z4),
            5 => Some(Zone::Z5),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Zone::Z1 => 1,
            Zone::Z2 => 2,
            Zone::Z3 => 3,
            Zone::Z4 => 4,
            Zone::Z5 => 5,
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Z{}", self.number())
    }
}

/// Work duration of one repetition, rendered `3m` or `1m15s`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkDuration {
    pub minutes: u32,
    pub seconds: u32,
}

impl WorkDuration {
    pub fn minutes(minutes: u32) -> Self {
        Self { minutes, seconds: 0 }
    }

    /// Accepts `M:SS`, a bare integer (minutes), `Nm` and `NmSs`.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim().to_lowercase();
        if let Some((mins, secs)) = token.split_once(':') {
            let minutes = mins.trim().parse().ok()?;
            let seconds = if secs.trim().is_empty() {
                0
            } else {
                secs.trim().parse().ok()?
            };
            return Some(Self { minutes, seconds });
        }
        if let Some((mins, rest)) = token.split_once('m') {
            let minutes = mins.parse().ok()?;
            let seconds = match rest.strip_suffix('s') {
                Some(secs) => secs.parse().ok()?,
                None if rest.is_empty() => 0,
                None => return None,
            };
            return Some(Self { minutes, seconds });
        }
        token.parse().ok().map(Self::minutes)
    }
}

impl fmt::Display for WorkDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.seconds > 0 {
            write!(f, "{}m{}s", self.minutes, self.seconds)
        } else {
            write!(f, "{}m", self.minutes)
        }
    }
}

/// Recovery between repetitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Recovery {
    Minutes(u32),
    Seconds(u32),
}

impl fmt::Display for Recovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recovery::Minutes(n) => write!(f, "{n}m"),
            Recovery::Seconds(n) => write!(f, "{n}s"),
        }
    }
}

/// How long a steady segment lasts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Extent {
    Minutes(u32),
    /// Short efforts written in seconds, rendered `75s`
    Seconds(u32),
    Kilometres(u32),
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extent::Minutes(n) => write!(f, "{n}m"),
            Extent::Seconds(n) => write!(f, "{n}s"),
            Extent::Kilometres(n) => write!(f, "{n}km"),
        }
    }
}

/// One canonical workout directive. Sequence order is execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StepSpec {
    /// `detail` attaches an explicit 10 minute Z2 segment
    Warmup { detail: bool },
    Cooldown { detail: bool },
    Steady { extent: Extent, zone: Zone },
    Intervals {
        reps: u32,
        work: WorkDuration,
        zone: Zone,
        recovery: Option<Recovery>,
    },
    /// Work always at Z5, recovery at Z1
    Strides {
        reps: u32,
        work_secs: u32,
        recovery_secs: u32,
    },
    /// Uphill at `zone`, jog back down for the same time at Z1
    Hills { reps: u32, minutes: u32, zone: Zone },
    Progression { segments: Vec<(u32, Zone)> },
    Literal { text: String },
}

impl StepSpec {
    pub fn is_warmup(&self) -> bool {
        matches!(self, StepSpec::Warmup { .. })
    }

    pub fn is_cooldown(&self) -> bool {
        matches!(self, StepSpec::Cooldown { .. })
    }

    pub fn steady_minutes(minutes: u32, zone: Zone) -> Self {
        StepSpec::Steady {
            extent: Extent::Minutes(minutes),
            zone,
        }
    }

    pub fn steady_km(km: u32, zone: Zone) -> Self {
        StepSpec::Steady {
            extent: Extent::Kilometres(km),
            zone,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventCategory {
    Race,
    Workout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActivityType {
    Run,
    WeightTraining,
}

/// Calendar event in the shape the intervals.icu bulk endpoint accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkoutEvent {
    #[serde(rename = "start_date_local", serialize_with = "serialize_local_midnight")]
    pub date: NaiveDate,
    pub category: EventCategory,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub name: String,
    pub description: String,
    /// Only used for `--week` filtering, never uploaded
    #[serde(skip)]
    pub week_number: u32,
}

impl WorkoutEvent {
    pub fn start_date_local(&self) -> String {
        format!("{}T00:00:00", self.date.format("%Y-%m-%d"))
    }
}

fn serialize_local_midnight<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{}T00:00:00", date.format("%Y-%m-%d")))
}
