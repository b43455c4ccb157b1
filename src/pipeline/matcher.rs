//! Note matcher: decides whether a day's session note or its schedule cell
//! provides the workout steps.

use serde::Serialize;
use tracing::debug;

use crate::common::constants::{
    HILL_KEYWORD, INCLUDING_KEYWORD, INTERVAL_KEYWORD, LONG_KEYWORD, LONG_RUN_KEYWORD, PROGRESSION_KEYWORD,
    RECOVERY_KEYWORD, VO2MAX_KEYWORD,
};
use crate::domain::StepSpec;
use crate::pipeline::classify::patterns::{contains, explicit_zone, has_interval_marker, keyword_zone};
use crate::pipeline::classify::{wrap_with_markers, ClassifyContext, RuleSet};
use crate::pipeline::rows::run_name;
use crate::pipeline::segment::segment;

/// Outcome of weighing a session note against the scheduled activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteDecision {
    /// Build the steps from the note; `forced_interval` marks the workout interval-type up front
    UseNote { forced_interval: bool },
    /// Build the steps from the activity cell, with the reason the note lost
    Ignore(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepSource {
    SessionNote,
    Activity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedWorkout {
    pub title: Option<String>,
    pub steps: Vec<StepSpec>,
    pub source: StepSource,
}

/// `x` together with `:` in the activity, or a vo2max purpose
pub fn is_interval_activity(activity: &str, purpose: &str) -> bool {
    let activity = activity.to_lowercase();
    (activity.contains('x') && activity.contains(':')) || contains(purpose, VO2MAX_KEYWORD)
}

/// Pure decision table; the first applicable clause wins.
pub fn decide(activity: &str, purpose: &str, note: Option<&str>) -> NoteDecision {
    let note = note.map(str::trim).filter(|n| !n.is_empty());
    let interval_activity = is_interval_activity(activity, purpose);
    let long_activity = contains(activity, LONG_KEYWORD) || contains(activity, INCLUDING_KEYWORD);

    if contains(activity, RECOVERY_KEYWORD) {
        return NoteDecision::Ignore("recovery runs use the schedule");
    }
    if contains(activity, HILL_KEYWORD) {
        return NoteDecision::Ignore("hill sessions use the schedule");
    }

    let Some(note) = note else {
        return NoteDecision::Ignore("no session note");
    };

    if contains(note, INTERVAL_KEYWORD) {
        return if interval_activity {
            NoteDecision::UseNote { forced_interval: true }
        } else {
            NoteDecision::Ignore("interval note on a non-interval day")
        };
    }
    if contains(note, LONG_RUN_KEYWORD) && long_activity {
        return NoteDecision::UseNote { forced_interval: false };
    }
    if contains(note, PROGRESSION_KEYWORD) && contains(activity, PROGRESSION_KEYWORD) {
        return NoteDecision::UseNote { forced_interval: false };
    }
    if contains(note, HILL_KEYWORD) {
        return NoteDecision::Ignore("hill note on a non-hill day");
    }
    if contains(note, LONG_RUN_KEYWORD) {
        return NoteDecision::Ignore("long run note on a short day");
    }

    NoteDecision::UseNote {
        forced_interval: interval_activity,
    }
}

/// Holds both rule orderings so they're built once per run
#[derive(Debug, Clone)]
pub struct NoteMatcher {
    note_rules: RuleSet,
    activity_rules: RuleSet,
}

impl Default for NoteMatcher {
    fn default() -> Self {
        Self::new(RuleSet::session_note(), RuleSet::activity())
    }
}

impl NoteMatcher {
    pub fn new(note_rules: RuleSet, activity_rules: RuleSet) -> Self {
        Self {
            note_rules,
            activity_rules,
        }
    }

    pub fn resolve(&self, activity: &str, purpose: &str, note: Option<&str>) -> ResolvedWorkout {
        match (decide(activity, purpose, note), note) {
            (NoteDecision::UseNote { forced_interval }, Some(note)) => {
                debug!(activity, forced_interval, "using session note");
                self.compile_note(note, purpose, forced_interval)
            }
            (NoteDecision::Ignore(reason), _) => {
                debug!(activity, reason, "deriving steps from activity");
                self.compile_activity(activity, purpose)
            }
            (NoteDecision::UseNote { .. }, None) => self.compile_activity(activity, purpose),
        }
    }

    /// Session-note path. Interval-type when forced, or the note itself reads like intervals.
    pub fn compile_note(&self, note: &str, purpose: &str, forced_interval: bool) -> ResolvedWorkout {
        let segmented = segment(note);
        let interval_type = forced_interval || has_interval_marker(note) || contains(note, INTERVAL_KEYWORD);

        let ctx = ClassifyContext {
            purpose: purpose.to_string(),
            interval_type,
            fallback_zone: None,
            activity_text: String::new(),
        };
        let steps = self.note_rules.classify(&segmented.blocks, &ctx);

        ResolvedWorkout {
            title: segmented.title,
            steps: wrap_with_markers(steps, interval_type),
            source: StepSource::SessionNote,
        }
    }

    /// Activity path: the run name is classified and always wrapped
    pub fn compile_activity(&self, activity: &str, purpose: &str) -> ResolvedWorkout {
        let name = run_name(activity);
        let segmented = segment(&name);
        let interval_type = is_interval_activity(activity, purpose);

        let fallback_zone = segmented
            .title
            .as_deref()
            .and_then(keyword_zone)
            .or_else(|| explicit_zone(purpose));
        let ctx = ClassifyContext {
            purpose: purpose.to_string(),
            interval_type,
            fallback_zone,
            activity_text: name.clone(),
        };
        let steps = self.activity_rules.classify(&segmented.blocks, &ctx);

        ResolvedWorkout {
            title: segmented.title,
            steps: wrap_with_markers(steps, interval_type),
            source: StepSource::Activity,
        }
    }
}
