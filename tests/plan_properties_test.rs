use plan_uploader::domain::{Extent, Recovery, StepSpec, WorkDuration, Zone};
use plan_uploader::pipeline::classify::{ClassifyContext, RuleSet};
use plan_uploader::pipeline::matcher::{NoteMatcher, StepSource};
use plan_uploader::pipeline::render::{render, render_steps};
use plan_uploader::pipeline::segment::segment;

fn bare_pair() -> Vec<StepSpec> {
    vec![StepSpec::Warmup { detail: false }, StepSpec::Cooldown { detail: false }]
}

#[test]
fn test_cells_without_digits_compile_to_bare_markers() {
    let matcher = NoteMatcher::default();
    for cell in ["Cross training", "Swim", "Yoga and mobility", "Parkrun"] {
        let resolved = matcher.resolve(cell, "", None);
        assert_eq!(resolved.steps, bare_pair(), "cell: {cell}");
    }
}

#[test]
fn test_easy_run_with_strides_segments_and_classifies() {
    let segmented = segment("Easy 50 mins + 4x10 secs strides");
    let steps = RuleSet::activity().classify(&segmented.blocks, &ClassifyContext::default());
    assert_eq!(
        steps,
        vec![
            StepSpec::steady_minutes(50, Zone::Z2),
            StepSpec::Strides { reps: 4, work_secs: 10, recovery_secs: 50 },
        ]
    );
}

#[test]
fn test_interval_session_is_wrapped() {
    let resolved = NoteMatcher::default().resolve("8x3:00 (60s) Z4", "", None);
    assert_eq!(resolved.source, StepSource::Activity);
    assert_eq!(
        resolved.steps,
        vec![
            StepSpec::Warmup { detail: true },
            StepSpec::Intervals {
                reps: 8,
                work: WorkDuration::minutes(3),
                zone: Zone::Z4,
                recovery: Some(Recovery::Seconds(60)),
            },
            StepSpec::Cooldown { detail: true },
        ]
    );
    assert_eq!(
        render(None, "", &resolved.steps),
        "- Warmup\n- 10m Z2 HR\n\nIntervals 8x\n- 3m Z4 HR\n- 60s Z1 HR Rest\n\n- Cooldown 10m Z2 HR"
    );
}

#[test]
fn test_progression_run_splits_into_thirds() {
    let resolved = NoteMatcher::default().resolve("15km progression run", "", None);
    assert_eq!(
        resolved.steps[1],
        StepSpec::Progression {
            segments: vec![(5, Zone::Z1), (5, Zone::Z2), (5, Zone::Z3)],
        }
    );
    assert_eq!(
        render_steps(&resolved.steps[1..2]),
        "- 5km Z1 HR\n- 5km Z2 HR\n- 5km Z3 HR"
    );
}

#[test]
fn test_recovery_run_ignores_interval_note() {
    let resolved = NoteMatcher::default().resolve("Recovery 30 mins", "", Some("Interval session: 6x4min Z4"));
    assert_eq!(resolved.source, StepSource::Activity);
    assert_eq!(resolved.title, None);
    assert_eq!(
        resolved.steps,
        vec![
            StepSpec::Warmup { detail: false },
            StepSpec::steady_minutes(30, Zone::Z1),
            StepSpec::Cooldown { detail: false },
        ]
    );
}

#[test]
fn test_rendered_steady_lines_round_trip() {
    let steps: Vec<StepSpec> = [Zone::Z1, Zone::Z2, Zone::Z3, Zone::Z4, Zone::Z5]
        .into_iter()
        .enumerate()
        .flat_map(|(i, zone)| {
            let n = (i as u32 + 1) * 7;
            [
                StepSpec::steady_minutes(n, zone),
                StepSpec::steady_km(n, zone),
                StepSpec::Steady {
                    extent: Extent::Seconds(n * 5),
                    zone,
                },
            ]
        })
        .collect();

    let lines: Vec<String> = render_steps(&steps).lines().map(str::to_string).collect();
    assert_eq!(lines.len(), steps.len());
    let reparsed = RuleSet::session_note().classify(&lines, &ClassifyContext::default());
    assert_eq!(reparsed, steps);
}

#[test]
fn test_interval_work_lines_keep_zone_and_duration() {
    for (work, zone, seconds) in [
        (WorkDuration { minutes: 1, seconds: 15 }, Zone::Z4, 75),
        (WorkDuration { minutes: 0, seconds: 30 }, Zone::Z5, 30),
    ] {
        let rendered = render_steps(&[StepSpec::Intervals {
            reps: 6,
            work,
            zone,
            recovery: None,
        }]);
        let work_line = rendered.lines().last().unwrap().to_string();
        let reparsed = RuleSet::session_note().classify(&[work_line], &ClassifyContext::default());
        assert_eq!(
            reparsed,
            vec![StepSpec::Steady {
                extent: Extent::Seconds(seconds),
                zone,
            }]
        );
    }
}

#[test]
fn test_work_durations_round_trip() {
    for (minutes, seconds) in [(0, 30), (1, 15), (3, 0), (12, 5), (90, 0)] {
        let work = WorkDuration { minutes, seconds };
        assert_eq!(WorkDuration::parse(&work.to_string()), Some(work));
    }
}
