//! Activity ordering, for the short imperative schedule cells
//! (`Long 80 mins + 8x5 mins Z3`, `8x3:00 (60s) Z4`, `Recovery 30 mins`).

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::note_rules::{distance, hills, literal, progression, strides, warmup_cooldown};
use super::patterns::{
    self, explicit_zone, find_minutes, find_recovery, interval_markers, interval_zone, steady_zone, strides_start,
};
use super::{Rule, RuleInput, RuleMatch};
use crate::common::constants::LONG_RUN_SET_RECOVERY_MINS;
use crate::domain::{Recovery, StepSpec, WorkDuration, Zone};

/// Interval set bolted onto a steady run: `+ 8x5 mins`, `& 3x10 min`, `inc. 4x8 mins`
static ADD_ON_SET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:[+&]|\band\b|\bwith\b|\binc\.?)\s*(\d+) ?x ?(\d+(?::\d{1,2})?)\s*(?:minutes|minute|mins|min)\b")
        .expect("static pattern must compile")
});

/// Any minute set, used once `inc.` has announced one (`inc. last 3x10 mins`)
static MINUTE_SET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+) ?x ?(\d+(?::\d{1,2})?)\s*(?:minutes|minute|mins|min)\b")
        .expect("static pattern must compile")
});

static INCLUDING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\binc\.").expect("static pattern must compile"));

pub fn rules() -> Vec<Rule> {
    vec![
        Rule::new("warmup_cooldown", warmup_cooldown),
        Rule::new("hills", hills),
        Rule::new("progression", progression),
        Rule::new("steady_with_add_ons", steady_with_add_ons),
        Rule::new("interval_session", interval_session),
        Rule::new("distance", distance),
        Rule::new("strides", strides),
        Rule::new("literal", literal),
    ]
}

/// One add-on set and its byte span in the block
struct AddOn {
    start: usize,
    end: usize,
    reps: u32,
    work: WorkDuration,
}

impl AddOn {
    fn from_captures(caps: &Captures<'_>, offset: usize) -> Option<Self> {
        let whole = caps.get(0)?;
        Some(Self {
            start: offset + whole.start(),
            end: offset + whole.end(),
            reps: caps.get(1)?.as_str().parse().ok()?,
            work: WorkDuration::parse(caps.get(2)?.as_str())?,
        })
    }
}

/// After `inc.` any minute set counts; elsewhere the set needs a joining word
fn add_on_sets(block: &str) -> Vec<AddOn> {
    match INCLUDING.find(block) {
        Some(inc) => MINUTE_SET
            .captures_iter(&block[inc.end()..])
            .filter_map(|caps| AddOn::from_captures(&caps, inc.end()))
            .collect(),
        None => ADD_ON_SET
            .captures_iter(block)
            .filter_map(|caps| AddOn::from_captures(&caps, 0))
            .collect(),
    }
}

fn steady_with_add_ons(input: &RuleInput<'_>) -> Option<RuleMatch> {
    let block = input.block;
    let add_ons = add_on_sets(block);
    let stride_at = strides_start(block);

    let head_end = [
        add_ons.first().map(|add_on| add_on.start),
        interval_markers(block).first().map(|marker| marker.start),
        stride_at,
    ]
    .into_iter()
    .flatten()
    .min()
    .unwrap_or(block.len());

    let head = &block[..head_end];
    let minutes = find_minutes(head)?;
    let mut steps = vec![StepSpec::steady_minutes(minutes, steady_zone(head, input.ctx.fallback_zone))];

    for (i, add_on) in add_ons.iter().enumerate() {
        let segment_end = add_ons
            .get(i + 1)
            .map(|next| next.start)
            .or_else(|| stride_at.filter(|&start| start > add_on.end))
            .unwrap_or(block.len());
        let segment = &block[add_on.start..segment_end];

        steps.push(StepSpec::Intervals {
            reps: add_on.reps,
            work: add_on.work,
            zone: interval_zone(segment, Zone::Z4),
            recovery: Some(find_recovery(segment).unwrap_or(Recovery::Minutes(LONG_RUN_SET_RECOVERY_MINS))),
        });
    }

    steps.extend(patterns::strides(block));
    Some(RuleMatch::steps(steps))
}

/// One interval set per marker; each marker reads its recovery and zone from
/// the text up to the next marker
fn interval_session(input: &RuleInput<'_>) -> Option<RuleMatch> {
    let block = input.block;
    let stride_at = strides_start(block);
    let markers: Vec<_> = interval_markers(block)
        .into_iter()
        .filter(|marker| stride_at.map_or(true, |start| marker.start < start))
        .collect();
    if markers.is_empty() {
        return None;
    }

    let mut steps = Vec::with_capacity(markers.len() + 1);
    for (i, marker) in markers.iter().enumerate() {
        let segment_end = markers
            .get(i + 1)
            .map(|next| next.start)
            .or(stride_at)
            .unwrap_or(block.len());
        let segment = &block[marker.start..segment_end];

        let zone = explicit_zone(segment)
            .or_else(|| explicit_zone(block))
            .unwrap_or_else(|| interval_zone(segment, Zone::Z4));

        steps.push(StepSpec::Intervals {
            reps: marker.reps,
            work: marker.work,
            zone,
            recovery: find_recovery(segment),
        });
    }

    if stride_at.is_some() {
        steps.extend(patterns::strides(block));
    }
    Some(RuleMatch::steps(steps))
}
