//! Session-note ordering. Several rules here are shared with the activity ordering.

use super::patterns::{
    self, bare_recovery, contains, find_directive_seconds, find_km, find_minutes, find_recovery, first_interval,
    has_digit, has_interval_marker, interval_zone, steady_zone, zone_progression,
};
use super::{Rule, RuleInput, RuleMatch};
use crate::common::constants::{HILL_KEYWORD, PROGRESSION_KEYWORD, STRIDES_KEYWORD};
use crate::domain::{Extent, StepSpec, Zone};

pub fn rules() -> Vec<Rule> {
    vec![
        Rule::new("warmup_cooldown", warmup_cooldown),
        Rule::new("multi_interval", multi_interval),
        Rule::new("interval", interval),
        Rule::new("timed", timed),
        Rule::new("distance", distance),
        Rule::new("hills", hills),
        Rule::new("strides", strides),
        Rule::new("progression", progression),
        Rule::new("literal", literal),
    ]
}

pub fn is_warmup_block(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("warmup") || lower.contains("warm up") || lower.contains("warm-up")
}

pub fn is_cooldown_block(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("cooldown") || lower.contains("cool down") || lower.contains("cool-down")
}

/// Interval sets proper; strides and hills have their own rules
fn is_repeat_block(text: &str) -> bool {
    has_interval_marker(text) && !contains(text, STRIDES_KEYWORD) && !contains(text, HILL_KEYWORD)
}

pub(super) fn warmup_cooldown(input: &RuleInput<'_>) -> Option<RuleMatch> {
    let detail = input.ctx.interval_type;
    if is_warmup_block(input.block) {
        return Some(RuleMatch::step(StepSpec::Warmup { detail }));
    }
    if is_cooldown_block(input.block) {
        return Some(RuleMatch::step(StepSpec::Cooldown { detail }));
    }
    None
}

/// Interval steps for one piece of text, reading the recovery from `next` when
/// the text has none. The flag reports whether `next` was used.
fn interval_steps(text: &str, next: Option<&str>) -> Option<(Vec<StepSpec>, bool)> {
    let marker = first_interval(text)?;

    let mut used_next = false;
    let recovery = find_recovery(text).or_else(|| {
        let next = next.filter(|n| !has_interval_marker(n) && !is_warmup_block(n) && !is_cooldown_block(n))?;
        let recovery = bare_recovery(next)?;
        used_next = true;
        Some(recovery)
    });

    let steps = match zone_progression(text) {
        Some(sets) => sets
            .into_iter()
            .map(|(reps, zone)| StepSpec::Intervals {
                reps,
                work: marker.work,
                zone,
                recovery,
            })
            .collect(),
        None => vec![StepSpec::Intervals {
            reps: marker.reps,
            work: marker.work,
            zone: interval_zone(text, Zone::Z4),
            recovery,
        }],
    };

    Some((steps, used_next))
}

/// `8x3min Z3 + 4x2min Z4` on one line; a bare recovery between sets belongs to the set before it
pub(super) fn multi_interval(input: &RuleInput<'_>) -> Option<RuleMatch> {
    if !input.block.contains('+') || !is_repeat_block(input.block) {
        return None;
    }

    let parts: Vec<&str> = input
        .block
        .split('+')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    let mut steps = Vec::new();
    let mut i = 0;
    while i < parts.len() {
        match interval_steps(parts[i], parts.get(i + 1).copied()) {
            Some((part_steps, used_next)) => {
                steps.extend(part_steps);
                i += if used_next { 2 } else { 1 };
            }
            None => i += 1,
        }
    }

    Some(RuleMatch::steps(steps))
}

pub(super) fn interval(input: &RuleInput<'_>) -> Option<RuleMatch> {
    if !is_repeat_block(input.block) {
        return None;
    }
    let (steps, used_next) = interval_steps(input.block, input.next)?;
    let matched = RuleMatch::steps(steps);
    Some(if used_next { matched.with_lookahead() } else { matched })
}

pub(super) fn timed(input: &RuleInput<'_>) -> Option<RuleMatch> {
    let block = input.block;
    if has_interval_marker(block) || contains(block, PROGRESSION_KEYWORD) {
        return None;
    }
    let extent = find_minutes(block)
        .map(Extent::Minutes)
        .or_else(|| find_directive_seconds(block).map(Extent::Seconds))?;
    let zone = steady_zone(block, input.ctx.fallback_zone);
    Some(RuleMatch::step(StepSpec::Steady { extent, zone }))
}

pub(super) fn distance(input: &RuleInput<'_>) -> Option<RuleMatch> {
    let block = input.block;
    if has_interval_marker(block) || contains(block, PROGRESSION_KEYWORD) {
        return None;
    }
    let km = find_km(block)?;
    let zone = steady_zone(block, input.ctx.fallback_zone);
    Some(RuleMatch::step(StepSpec::steady_km(km, zone)))
}

/// The keyword may sit in the block or in the activity title (`Hills: 10x1:30 Z4`)
fn mentions(input: &RuleInput<'_>, keyword: &str) -> bool {
    contains(input.block, keyword) || contains(&input.ctx.activity_text, keyword)
}

pub(super) fn hills(input: &RuleInput<'_>) -> Option<RuleMatch> {
    if !mentions(input, HILL_KEYWORD) {
        return None;
    }
    let marker = first_interval(input.block)?;
    Some(RuleMatch::step(StepSpec::Hills {
        reps: marker.reps,
        minutes: marker.work.minutes,
        zone: interval_zone(input.block, Zone::Z4),
    }))
}

pub(super) fn strides(input: &RuleInput<'_>) -> Option<RuleMatch> {
    patterns::strides(input.block).map(RuleMatch::step)
}

/// Total distance split into thirds at Z1, Z2, Z3
pub(super) fn progression(input: &RuleInput<'_>) -> Option<RuleMatch> {
    if !mentions(input, PROGRESSION_KEYWORD) {
        return None;
    }
    let segment = find_km(input.block)? / 3;
    if segment == 0 {
        return None;
    }
    Some(RuleMatch::step(StepSpec::Progression {
        segments: vec![(segment, Zone::Z1), (segment, Zone::Z2), (segment, Zone::Z3)],
    }))
}

/// Keep anything with a number in it; titles and prose are dropped
pub(super) fn literal(input: &RuleInput<'_>) -> Option<RuleMatch> {
    let text = input.block.trim();
    if has_digit(text) && !text.ends_with(':') {
        Some(RuleMatch::step(StepSpec::Literal {
            text: text.to_string(),
        }))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Recovery, WorkDuration};
    use crate::pipeline::classify::{ClassifyContext, RuleSet};

    fn classify(lines: &[&str], interval_type: bool) -> Vec<StepSpec> {
        let blocks: Vec<String> = lines.iter().map(|s| s.to_string()).collect();
        let ctx = ClassifyContext {
            interval_type,
            ..Default::default()
        };
        RuleSet::session_note().classify(&blocks, &ctx)
    }

    #[test]
    fn test_warmup_detail_follows_interval_type() {
        assert_eq!(classify(&["Warm up 15 min"], true), vec![StepSpec::Warmup { detail: true }]);
        assert_eq!(classify(&["Cool down easy"], false), vec![StepSpec::Cooldown { detail: false }]);
    }

    #[test]
    fn test_multi_interval_line() {
        let steps = classify(&["8x3min Z3 + 4x2min Z4"], true);
        assert_eq!(
            steps,
            vec![
                StepSpec::Intervals { reps: 8, work: WorkDuration::minutes(3), zone: Zone::Z3, recovery: None },
                StepSpec::Intervals { reps: 4, work: WorkDuration::minutes(2), zone: Zone::Z4, recovery: None },
            ]
        );
    }

    #[test]
    fn test_multi_interval_recovery_between_sets() {
        let steps = classify(&["8x3min Z3 + 60s rest + 4x2min Z4 + 90s rest"], true);
        assert_eq!(
            steps,
            vec![
                StepSpec::Intervals {
                    reps: 8,
                    work: WorkDuration::minutes(3),
                    zone: Zone::Z3,
                    recovery: Some(Recovery::Seconds(60)),
                },
                StepSpec::Intervals {
                    reps: 4,
                    work: WorkDuration::minutes(2),
                    zone: Zone::Z4,
                    recovery: Some(Recovery::Seconds(90)),
                },
            ]
        );
    }

    #[test]
    fn test_interval_with_inline_recovery_and_default_zone() {
        let steps = classify(&["5x1:30 with 90 sec jog"], true);
        assert_eq!(
            steps,
            vec![StepSpec::Intervals {
                reps: 5,
                work: WorkDuration { minutes: 1, seconds: 30 },
                zone: Zone::Z4,
                recovery: Some(Recovery::Seconds(90)),
            }]
        );
    }

    #[test]
    fn test_zone_progression_emits_two_sets() {
        let steps = classify(
            &["8x3min, first 4 reps in zone 3, final 4 reps in zone 4", "2 min jog recovery"],
            true,
        );
        assert_eq!(steps.len(), 2);
        assert_eq!(
            steps[0],
            StepSpec::Intervals {
                reps: 4,
                work: WorkDuration::minutes(3),
                zone: Zone::Z3,
                recovery: Some(Recovery::Minutes(2)),
            }
        );
        assert!(matches!(steps[1], StepSpec::Intervals { reps: 4, zone: Zone::Z4, .. }));
    }

    #[test]
    fn test_lookahead_skips_interval_lines() {
        let steps = classify(&["6x3min Z4", "4x1min Z5 with 2 min jog"], true);
        assert_eq!(steps.len(), 2);
        assert!(matches!(steps[0], StepSpec::Intervals { recovery: None, .. }));
        assert!(matches!(
            steps[1],
            StepSpec::Intervals { recovery: Some(Recovery::Minutes(2)), .. }
        ));
    }

    #[test]
    fn test_timed_keyword_beats_explicit_zone() {
        assert_eq!(
            classify(&["20 min tempo (zone 4)"], false),
            vec![StepSpec::steady_minutes(20, Zone::Z3)]
        );
        assert_eq!(
            classify(&["30 minutes Zone 2"], false),
            vec![StepSpec::steady_minutes(30, Zone::Z2)]
        );
    }

    #[test]
    fn test_distance_segment() {
        assert_eq!(classify(&["5km in Zone 1"], false), vec![StepSpec::steady_km(5, Zone::Z1)]);
        assert_eq!(classify(&["8 km"], false), vec![StepSpec::steady_km(8, Zone::Z2)]);
    }

    #[test]
    fn test_hills_and_strides_bypass_interval_rule() {
        assert_eq!(
            classify(&["8x1:30 hills Z4"], true),
            vec![StepSpec::Hills { reps: 8, minutes: 1, zone: Zone::Z4 }]
        );
        assert_eq!(
            classify(&["6x20 secs strides"], false),
            vec![StepSpec::Strides { reps: 6, work_secs: 20, recovery_secs: 50 }]
        );
    }

    #[test]
    fn test_leading_strides_keep_their_numbers() {
        assert_eq!(
            classify(&["Strides 6x20 sec"], false),
            vec![StepSpec::Strides { reps: 6, work_secs: 20, recovery_secs: 50 }]
        );
        assert_eq!(
            classify(&["Strides"], false),
            vec![StepSpec::Strides { reps: 4, work_secs: 10, recovery_secs: 50 }]
        );
    }

    #[test]
    fn test_seconds_directives_are_timed() {
        assert_eq!(
            classify(&["- 1m15s Z4 HR", "- 30s Z5 HR"], false),
            vec![
                StepSpec::Steady { extent: Extent::Seconds(75), zone: Zone::Z4 },
                StepSpec::Steady { extent: Extent::Seconds(30), zone: Zone::Z5 },
            ]
        );
    }

    #[test]
    fn test_progression_in_note() {
        assert_eq!(
            classify(&["12km progression"], false),
            vec![StepSpec::Progression {
                segments: vec![(4, Zone::Z1), (4, Zone::Z2), (4, Zone::Z3)],
            }]
        );
    }

    #[test]
    fn test_literal_and_dropped_lines() {
        let steps = classify(&["Main set:", "Focus on relaxed form", "Finish with 3 x hill sprint"], false);
        assert_eq!(
            steps,
            vec![StepSpec::Literal {
                text: "Finish with 3 x hill sprint".to_string(),
            }]
        );
    }
}
