//! Step-script renderer and event assembly.

use chrono::NaiveDate;

use crate::common::constants::{DETAIL_MINUTES, RACE_KEYWORD, STRENGTH_EVENT_NAME, STRENGTH_KEYWORD};
use crate::domain::{ActivityType, DayActivity, EventCategory, StepSpec, WorkoutEvent, Zone};
use crate::pipeline::classify::patterns::contains;
use crate::pipeline::matcher::ResolvedWorkout;

/// Lines for one step. Block steps start with an empty line so they stand apart.
pub fn step_lines(step: &StepSpec) -> Vec<String> {
    let detail = format!("{DETAIL_MINUTES}m {} HR", Zone::Z2);
    match step {
        StepSpec::Warmup { detail: false } => vec!["- Warmup".to_string()],
        StepSpec::Warmup { detail: true } => vec!["- Warmup".to_string(), format!("- {detail}")],
        StepSpec::Cooldown { detail: false } => vec!["- Cooldown".to_string()],
        StepSpec::Cooldown { detail: true } => vec![String::new(), format!("- Cooldown {detail}")],
        StepSpec::Steady { extent, zone } => vec![format!("- {extent} {zone} HR")],
        StepSpec::Intervals {
            reps,
            work,
            zone,
            recovery,
        } => {
            let mut lines = vec![
                String::new(),
                format!("Intervals {reps}x"),
                format!("- {work} {zone} HR"),
            ];
            if let Some(recovery) = recovery {
                lines.push(format!("- {recovery} {} HR Rest", Zone::Z1));
            }
            lines
        }
        StepSpec::Strides {
            reps,
            work_secs,
            recovery_secs,
        } => vec![
            String::new(),
            format!("Strides {reps}x"),
            format!("- {work_secs}s {} HR", Zone::Z5),
            format!("- {recovery_secs}s {} HR Recovery", Zone::Z1),
        ],
        StepSpec::Hills { reps, minutes, zone } => vec![
            String::new(),
            format!("Hills {reps}x"),
            format!("- {minutes}m {zone} HR Uphill"),
            format!("- {minutes}m {} HR jog back", Zone::Z1),
        ],
        StepSpec::Progression { segments } => segments
            .iter()
            .map(|(km, zone)| format!("- {km}km {zone} HR"))
            .collect(),
        StepSpec::Literal { text } => vec![format!("- {text}")],
    }
}

pub fn render_steps(steps: &[StepSpec]) -> String {
    steps.iter().flat_map(step_lines).collect::<Vec<_>>().join("\n")
}

/// Full event description: purpose, title, then the step script
pub fn render(title: Option<&str>, purpose: &str, steps: &[StepSpec]) -> String {
    let mut lines: Vec<String> = Vec::new();

    let purpose = purpose.trim();
    if !purpose.is_empty() {
        lines.push(format!("Purpose: {purpose}"));
        lines.push(String::new());
    }
    if let Some(title) = title {
        lines.push(format!("{title}:"));
        lines.push(String::new());
    }
    lines.push(render_steps(steps));

    lines.join("\n").trim_matches('\n').to_string()
}

pub fn render_event(
    date: NaiveDate,
    category: EventCategory,
    activity_type: ActivityType,
    name: &str,
    description: String,
) -> WorkoutEvent {
    WorkoutEvent {
        date,
        category,
        activity_type,
        name: name.to_string(),
        description,
        week_number: 0,
    }
}

/// At least one step besides the warmup and cooldown markers
pub fn has_work(steps: &[StepSpec]) -> bool {
    steps.iter().any(|step| !step.is_warmup() && !step.is_cooldown())
}

/// The run event for a day, plus a strength event when the cell asks for one.
/// Summarised days with nothing but markers produce no events.
pub fn build_events(day: &DayActivity, resolved: &ResolvedWorkout) -> Vec<WorkoutEvent> {
    if day.summary.is_some() && !has_work(&resolved.steps) {
        return Vec::new();
    }

    let category = if contains(&day.raw_activity_text, RACE_KEYWORD) {
        EventCategory::Race
    } else {
        EventCategory::Workout
    };

    let description = match &day.summary {
        Some(summary) => format!("{summary}\n{}", render(None, &day.purpose_text, &resolved.steps)),
        None => render(resolved.title.as_deref(), &day.purpose_text, &resolved.steps),
    };
    let mut events = vec![WorkoutEvent {
        week_number: day.week_number,
        ..render_event(day.date, category, ActivityType::Run, &day.name, description)
    }];

    if contains(&day.raw_activity_text, STRENGTH_KEYWORD) {
        let purpose = day.purpose_text.trim();
        let description = if purpose.is_empty() {
            String::new()
        } else {
            format!("Purpose: {purpose}")
        };
        events.push(WorkoutEvent {
            week_number: day.week_number,
            ..render_event(
                day.date,
                EventCategory::Workout,
                ActivityType::WeightTraining,
                STRENGTH_EVENT_NAME,
                description,
            )
        });
    }

    events
}
