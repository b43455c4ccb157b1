// Plan compilation: rows -> days -> steps -> events

pub mod classify;
pub mod matcher;
pub mod render;
pub mod rows;
pub mod segment;

use std::collections::BTreeSet;

use chrono::NaiveDate;
use metrics::counter;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::domain::{DayActivity, TableRow, WorkoutEvent};
use matcher::{NoteMatcher, ResolvedWorkout, StepSource};
use rows::{PlanLayout, RowExtractor};

/// Counters for one run over a plan table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanStats {
    pub weeks: usize,
    pub days: usize,
    pub events: usize,
    pub from_session_notes: usize,
    pub skipped_weeks: usize,
    pub structural_gaps: usize,
}

#[derive(Debug, Clone, Default)]
pub struct PlanRun {
    pub events: Vec<WorkoutEvent>,
    pub stats: PlanStats,
}

pub struct PlanPipeline {
    extractor: RowExtractor,
    matcher: NoteMatcher,
}

impl PlanPipeline {
    pub fn new(layout: PlanLayout, today: NaiveDate) -> Self {
        Self::with_matcher(RowExtractor::new(layout, today), NoteMatcher::default())
    }

    pub fn with_matcher(extractor: RowExtractor, matcher: NoteMatcher) -> Self {
        Self { extractor, matcher }
    }

    /// Compile every scheduled day of the plan into calendar events
    #[instrument(skip(self, rows), fields(layout = ?self.extractor.layout(), rows = rows.len()))]
    pub fn run(&self, rows: &[TableRow]) -> PlanRun {
        let extraction = self.extractor.extract(rows);

        let mut stats = PlanStats {
            weeks: extraction
                .days
                .iter()
                .map(|day| day.week_number)
                .collect::<BTreeSet<_>>()
                .len(),
            days: extraction.days.len(),
            skipped_weeks: extraction.skipped_weeks,
            structural_gaps: extraction.structural_gaps,
            ..Default::default()
        };

        let mut events = Vec::new();
        for day in &extraction.days {
            let (resolved, day_events) = self.compile_day(day);
            if resolved.source == StepSource::SessionNote {
                stats.from_session_notes += 1;
            }
            events.extend(day_events);
        }
        stats.events = events.len();
        counter!("plan_events_built_total").increment(events.len() as u64);

        info!(
            weeks = stats.weeks,
            days = stats.days,
            events = stats.events,
            from_session_notes = stats.from_session_notes,
            skipped_weeks = stats.skipped_weeks,
            "plan compiled"
        );
        PlanRun { events, stats }
    }

    /// Resolve and render a single day
    pub fn compile_day(&self, day: &DayActivity) -> (ResolvedWorkout, Vec<WorkoutEvent>) {
        let resolved = self.matcher.resolve(
            &day.raw_activity_text,
            &day.purpose_text,
            day.session_note_text.as_deref(),
        );
        debug!(date = %day.date, name = %day.name, source = ?resolved.source, steps = resolved.steps.len(), "day compiled");
        let events = render::build_events(day, &resolved);
        (resolved, events)
    }
}

/// Keep only the events of one plan week
pub fn filter_week(events: Vec<WorkoutEvent>, week: u32) -> Vec<WorkoutEvent> {
    events.into_iter().filter(|event| event.week_number == week).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ActivityType;

    fn row(cells: &[&str]) -> TableRow {
        TableRow::new(cells.iter().copied())
    }

    #[test]
    fn test_run_counts_and_sources() {
        let rows = vec![
            row(&["", "Week 1\n22 Dec - 28 Dec"]),
            row(&["", "Activity", "Recovery 30 mins", "8x3:00 (60s) Z4", "Easy 40 mins and strength"]),
            row(&["", "Purpose", "", "VO2max", ""]),
            row(&["", "Session notes", "", "Interval session:\n8x3min Z4\n60s rest", ""]),
        ];
        let run = PlanPipeline::new(PlanLayout::Labelled, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()).run(&rows);

        assert_eq!(run.stats.weeks, 1);
        assert_eq!(run.stats.days, 3);
        assert_eq!(run.stats.events, 4);
        assert_eq!(run.stats.from_session_notes, 1);
        assert_eq!(run.events[3].activity_type, ActivityType::WeightTraining);
        assert!(run.events[1].description.starts_with("Purpose: VO2max\n\nInterval session:"));
    }

    #[test]
    fn test_filter_week() {
        let rows = vec![
            row(&["", "Week 1\n22 Dec - 28 Dec"]),
            row(&["", "Activity", "Easy 30 mins"]),
            row(&["", "Week 2\n29 Dec - 4 Jan"]),
            row(&["", "Activity", "Easy 40 mins"]),
        ];
        let run = PlanPipeline::new(PlanLayout::Labelled, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()).run(&rows);
        let week_two = filter_week(run.events, 2);
        assert_eq!(week_two.len(), 1);
        assert_eq!(week_two[0].name, "Easy 40 mins");
    }
}
