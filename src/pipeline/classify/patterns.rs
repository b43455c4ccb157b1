//! Regex vocabulary shared by the rule tables: interval markers, zones,
//! recoveries, strides. Patterns are compiled once and matched case-insensitively.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::common::constants::{
    DEFAULT_STRIDE_RECOVERY_SECS, DEFAULT_STRIDE_REPS, DEFAULT_STRIDE_SECS, IMPLICIT_JOG_RECOVERY_MINS,
};
use crate::domain::{Recovery, StepSpec, WorkDuration, Zone};

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern must compile")
}

/// `<reps>x<duration>` where duration is `N` or `M:SS`, with the unit that follows.
/// `km` is captured only so distance repeats can be turned away.
static INTERVAL_MARKER: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?i)(\d+) ?x ?(\d+(?::\d{1,2})?)(?:\s*(minutes|minute|mins|min|seconds|second|secs|sec|s|km)\b)?")
});

/// `Zone 3`, `Zones 3-4`, `Z3`
static EXPLICIT_ZONE: Lazy<Regex> = Lazy::new(|| compile(r"(?i)\b(?:zones?\s*|z)(\d)\b"));

static MINUTES: Lazy<Regex> = Lazy::new(|| compile(r"(?i)(\d+)\s*(?:minutes|minute|mins|min)\b"));

/// A rendered directive such as `- 50m Z2 HR`
static DIRECTIVE_MINUTES: Lazy<Regex> = Lazy::new(|| compile(r"(?i)^-?\s*(\d+)m\s+z[1-5]\b"));

/// A rendered directive with seconds, `- 1m15s Z4 HR` or `- 30s Z5 HR`
static DIRECTIVE_SECONDS: Lazy<Regex> = Lazy::new(|| compile(r"(?i)^-?\s*(?:(\d+)m)?(\d+)s\s+z[1-5]\b"));

static KILOMETRES: Lazy<Regex> = Lazy::new(|| compile(r"(?i)(\d+)\s*km\b"));

const RECOVERY_UNITS: &str = "minutes|minute|mins|min|m|seconds|second|secs|sec|s";

/// `+ 60 sec rest`, `with 2 min jog`, `and 90s recovery`, `all with 1 min walk`
static RECOVERY_PHRASE: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"(?i)(?:\+|\bwith|\band)\s*(\d+)\s*({RECOVERY_UNITS})?\s*(?:jog|walk|recovery|rest)\b"
    ))
});

/// Recovery on its own line: `2 min jog recovery`
static BARE_RECOVERY: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"(?i)(\d+)\s*({RECOVERY_UNITS})?\s*(?:jog|walk|recovery|rest)\b"
    ))
});

/// `(60s)`, `(90)`, `(2 min)`; a unitless value is seconds
static PAREN_RECOVERY: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"(?i)\(\s*(\d+)\s*({RECOVERY_UNITS})?\s*(?:jog|walk|recovery|rest)?\s*\)"
    ))
});

static IMPLICIT_RECOVERY: Lazy<Regex> = Lazy::new(|| compile(r"(?i)jog recovery|steady jog"));

static ZONE_PROGRESSION: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?i)first\s+(\d+)\s+reps?\s+in\s+zone\s*(\d).*?final\s+(\d+)\s+reps?\s+in\s+zone\s*(\d)")
});

/// `& Strides 5x10sec + 50sec rest`
static STRIDES_EXPLICIT: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?i)(?:&|strides?)\s*(\d+) ?x ?(\d+)\s*(?:seconds|second|secs|sec|s)\s*\+\s*(\d+)\s*(?:seconds|second|secs|sec|s)\s*rest")
});

/// `4x10 secs strides`
static STRIDES_COUNTED: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)(\d+) ?x ?(\d+)\s*(?:seconds|second|secs|sec|s)\s*strides?\b"));

/// `Strides 6x20 sec`, `Strides: 6x20s`
static STRIDES_LEADING: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)strides?\s*:?\s*(\d+) ?x ?(\d+)\s*(?:seconds|second|secs|sec|s)\b"));

/// `+ strides`, `& strides`
static STRIDES_ADD_ON: Lazy<Regex> = Lazy::new(|| compile(r"(?i)[+&]\s*strides?\b"));

/// A block that starts with `strides`
static STRIDES_ALONE: Lazy<Regex> = Lazy::new(|| compile(r"(?i)^\s*strides?\b"));

/// Keyword table, evaluated in order; first hit wins.
static KEYWORD_ZONES: Lazy<Vec<(Regex, Zone)>> = Lazy::new(|| {
    [
        ("rest", Zone::Z1),
        ("recovery", Zone::Z1),
        ("jog", Zone::Z1),
        ("walk", Zone::Z1),
        ("easy", Zone::Z2),
        ("steady", Zone::Z2),
        ("moderate", Zone::Z2),
        ("tempo", Zone::Z3),
        ("threshold", Zone::Z3),
        ("marathon", Zone::Z3),
        ("hard", Zone::Z4),
        ("vo2max", Zone::Z4),
        ("fast", Zone::Z4),
        ("sprint", Zone::Z5),
    ]
    .into_iter()
    .map(|(word, zone)| (compile(&format!(r"(?i)\b{word}\b")), zone))
    .collect()
});

/// One `<reps>x<duration>` occurrence and where it sits in the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalMarker {
    pub reps: u32,
    pub work: WorkDuration,
    pub start: usize,
    pub end: usize,
    /// The duration was written in seconds (`10x30 sec`)
    pub in_seconds: bool,
}

fn marker_from(caps: &Captures<'_>) -> Option<IntervalMarker> {
    let whole = caps.get(0)?;
    let reps = caps.get(1)?.as_str().parse().ok()?;
    let token = caps.get(2)?.as_str();
    let unit = caps.get(3).map(|unit| unit.as_str().to_lowercase());
    if unit.as_deref() == Some("km") {
        return None;
    }
    let in_seconds = unit.map(|unit| unit.starts_with('s')).unwrap_or(false);
    let work = if in_seconds && !token.contains(':') {
        let secs: u32 = token.parse().ok()?;
        WorkDuration {
            minutes: secs / 60,
            seconds: secs % 60,
        }
    } else {
        WorkDuration::parse(token)?
    };
    Some(IntervalMarker {
        reps,
        work,
        start: whole.start(),
        end: whole.end(),
        in_seconds,
    })
}

pub fn has_interval_marker(text: &str) -> bool {
    INTERVAL_MARKER.is_match(text)
}

pub fn first_interval(text: &str) -> Option<IntervalMarker> {
    INTERVAL_MARKER.captures(text).and_then(|caps| marker_from(&caps))
}

pub fn interval_markers(text: &str) -> Vec<IntervalMarker> {
    INTERVAL_MARKER
        .captures_iter(text)
        .filter_map(|caps| marker_from(&caps))
        .collect()
}

pub fn contains(text: &str, needle: &str) -> bool {
    text.to_lowercase().contains(needle)
}

pub fn has_digit(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
}

pub fn explicit_zone(text: &str) -> Option<Zone> {
    EXPLICIT_ZONE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1)?.as_str().parse().ok())
        .find_map(Zone::from_digit)
}

pub fn keyword_zone(text: &str) -> Option<Zone> {
    KEYWORD_ZONES
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, zone)| *zone)
}

/// Work-interval zone: explicit token, then keywords on the work part only, then `default`.
pub fn interval_zone(text: &str, default: Zone) -> Zone {
    if let Some(zone) = explicit_zone(text) {
        return zone;
    }
    let work_only = strip_recovery(text);
    keyword_zone(&work_only).unwrap_or(default)
}

/// Steady-segment zone: keywords first, then the explicit token, then `fallback`, then Z2.
pub fn steady_zone(text: &str, fallback: Option<Zone>) -> Zone {
    keyword_zone(text)
        .or_else(|| explicit_zone(text))
        .or(fallback)
        .unwrap_or(Zone::Z2)
}

pub fn find_minutes(text: &str) -> Option<u32> {
    MINUTES
        .captures(text)
        .or_else(|| DIRECTIVE_MINUTES.captures(text.trim()))
        .and_then(|caps| caps.get(1)?.as_str().parse().ok())
}

/// Total seconds of a seconds-bearing directive line
pub fn find_directive_seconds(text: &str) -> Option<u32> {
    let caps = DIRECTIVE_SECONDS.captures(text.trim())?;
    let minutes: u32 = match caps.get(1) {
        Some(minutes) => minutes.as_str().parse().ok()?,
        None => 0,
    };
    let seconds: u32 = caps.get(2)?.as_str().parse().ok()?;
    Some(minutes * 60 + seconds)
}

pub fn find_km(text: &str) -> Option<u32> {
    KILOMETRES
        .captures(text)
        .and_then(|caps| caps.get(1)?.as_str().parse().ok())
}

fn recovery_from(caps: &Captures<'_>, unitless_is_seconds: bool) -> Option<Recovery> {
    let amount: u32 = caps.get(1)?.as_str().parse().ok()?;
    let seconds = match caps.get(2) {
        Some(unit) => unit.as_str().to_lowercase().starts_with('s'),
        None => unitless_is_seconds,
    };
    Some(if seconds {
        Recovery::Seconds(amount)
    } else {
        Recovery::Minutes(amount)
    })
}

/// Recovery written inside the block itself
pub fn find_recovery(text: &str) -> Option<Recovery> {
    if let Some(caps) = PAREN_RECOVERY.captures(text) {
        return recovery_from(&caps, true);
    }
    if let Some(caps) = RECOVERY_PHRASE.captures(text) {
        return recovery_from(&caps, false);
    }
    if IMPLICIT_RECOVERY.is_match(text) {
        return Some(Recovery::Minutes(IMPLICIT_JOG_RECOVERY_MINS));
    }
    None
}

/// Recovery phrase standing alone, as found on the line after an interval set
pub fn bare_recovery(text: &str) -> Option<Recovery> {
    BARE_RECOVERY
        .captures(text)
        .and_then(|caps| recovery_from(&caps, false))
}

/// Text with recovery phrases cut out, so `jog`/`rest` don't decide a work zone
pub fn strip_recovery(text: &str) -> String {
    let without_phrase = RECOVERY_PHRASE.replace_all(text, " ");
    PAREN_RECOVERY.replace_all(&without_phrase, " ").into_owned()
}

/// `first N reps in zone Z ... final M reps in zone W`
pub fn zone_progression(text: &str) -> Option<[(u32, Zone); 2]> {
    let caps = ZONE_PROGRESSION.captures(text)?;
    let number = |i: usize| -> Option<u32> { caps.get(i)?.as_str().parse().ok() };
    Some([
        (number(1)?, Zone::from_digit(number(2)?)?),
        (number(3)?, Zone::from_digit(number(4)?)?),
    ])
}

/// Strides in any of the three surface forms
pub fn strides(text: &str) -> Option<StepSpec> {
    if let Some(caps) = STRIDES_EXPLICIT.captures(text) {
        let number = |i: usize| -> Option<u32> { caps.get(i)?.as_str().parse().ok() };
        return Some(StepSpec::Strides {
            reps: number(1)?,
            work_secs: number(2)?,
            recovery_secs: number(3)?,
        });
    }
    if let Some(caps) = STRIDES_COUNTED.captures(text).or_else(|| STRIDES_LEADING.captures(text)) {
        let number = |i: usize| -> Option<u32> { caps.get(i)?.as_str().parse().ok() };
        return Some(StepSpec::Strides {
            reps: number(1)?,
            work_secs: number(2)?,
            recovery_secs: DEFAULT_STRIDE_RECOVERY_SECS,
        });
    }
    // defaults only when the block gives no numbers of its own
    if STRIDES_ADD_ON.is_match(text) || (STRIDES_ALONE.is_match(text) && !has_digit(text)) {
        return Some(StepSpec::Strides {
            reps: DEFAULT_STRIDE_REPS,
            work_secs: DEFAULT_STRIDE_SECS,
            recovery_secs: DEFAULT_STRIDE_RECOVERY_SECS,
        });
    }
    None
}

/// Byte offset where stride wording starts, if any
pub fn strides_start(text: &str) -> Option<usize> {
    [
        &*STRIDES_EXPLICIT,
        &*STRIDES_COUNTED,
        &*STRIDES_LEADING,
        &*STRIDES_ADD_ON,
        &*STRIDES_ALONE,
    ]
        .iter()
        .filter_map(|pattern| pattern.find(text).map(|m| m.start()))
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_marker_variants() {
        let marker = first_interval("8x3:00 (60s) Z4").unwrap();
        assert_eq!(marker.reps, 8);
        assert_eq!(marker.work, WorkDuration::minutes(3));

        let marker = first_interval("5x1:15 Z5").unwrap();
        assert_eq!(marker.work.to_string(), "1m15s");

        let marker = first_interval("6x4min Z4").unwrap();
        assert_eq!(marker.work, WorkDuration::minutes(4));
        assert!(!marker.in_seconds);

        let marker = first_interval("10x30 sec hard").unwrap();
        assert!(marker.in_seconds);
        assert_eq!(marker.work.to_string(), "0m30s");

        assert!(!has_interval_marker("Easy 50 mins"));

        // distance repeats are not timed intervals
        assert_eq!(first_interval("5x1km (90s)"), None);
        let markers = interval_markers("5x1km, 4x3:00");
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].reps, 4);
    }

    #[test]
    fn test_zone_precedence() {
        assert_eq!(explicit_zone("Zones 3-4"), Some(Zone::Z3));
        assert_eq!(explicit_zone("6x4min z4"), Some(Zone::Z4));
        assert_eq!(explicit_zone("Zone 9"), None);
        assert_eq!(keyword_zone("20 min easy"), Some(Zone::Z2));
        assert_eq!(keyword_zone("interest"), None);

        // recovery words don't leak into the work zone
        assert_eq!(interval_zone("6x3min hard with 2 min jog", Zone::Z4), Zone::Z4);
        assert_eq!(interval_zone("6x3min tempo with 2 min jog", Zone::Z4), Zone::Z3);
        assert_eq!(interval_zone("6x3min", Zone::Z4), Zone::Z4);

        assert_eq!(steady_zone("20 min tempo Zone 4", None), Zone::Z3);
        assert_eq!(steady_zone("5km Zone 1", Some(Zone::Z3)), Zone::Z1);
        assert_eq!(steady_zone("Long 80 mins", None), Zone::Z2);
        assert_eq!(steady_zone("Long 80 mins", Some(Zone::Z3)), Zone::Z3);
    }

    #[test]
    fn test_recovery_forms() {
        assert_eq!(find_recovery("8x3:00 (60s)"), Some(Recovery::Seconds(60)));
        assert_eq!(find_recovery("8x3:00 (90)"), Some(Recovery::Seconds(90)));
        assert_eq!(find_recovery("6x4min + 60 sec rest"), Some(Recovery::Seconds(60)));
        assert_eq!(find_recovery("6x4min with 2 min jog"), Some(Recovery::Minutes(2)));
        assert_eq!(find_recovery("5x5min all with 90 seconds walk"), Some(Recovery::Seconds(90)));
        assert_eq!(find_recovery("4x8min, steady jog between"), Some(Recovery::Minutes(2)));
        assert_eq!(find_recovery("6x4min Z4"), None);
        assert_eq!(bare_recovery("2 min jog recovery"), Some(Recovery::Minutes(2)));
    }

    #[test]
    fn test_minutes_and_km() {
        assert_eq!(find_minutes("Easy 50mins"), Some(50));
        assert_eq!(find_minutes("20 minutes steady"), Some(20));
        assert_eq!(find_minutes("- 45m Z2 HR"), Some(45));
        assert_eq!(find_minutes("400m repeats"), None);
        assert_eq!(find_minutes("- 1m15s Z4 HR"), None);
        assert_eq!(find_directive_seconds("- 1m15s Z4 HR"), Some(75));
        assert_eq!(find_directive_seconds("- 30s Z5 HR"), Some(30));
        assert_eq!(find_directive_seconds("30s rest"), None);
        assert_eq!(find_km("5 km in Zone 1"), Some(5));
        assert_eq!(find_km("15km progression run"), Some(15));
    }

    #[test]
    fn test_stride_forms() {
        assert_eq!(
            strides("& Strides 5x10sec + 50sec rest"),
            Some(StepSpec::Strides { reps: 5, work_secs: 10, recovery_secs: 50 })
        );
        assert_eq!(
            strides("Easy 50 mins + 6x20 secs strides"),
            Some(StepSpec::Strides { reps: 6, work_secs: 20, recovery_secs: 50 })
        );
        assert_eq!(
            strides("Easy 40 mins + strides"),
            Some(StepSpec::Strides { reps: 4, work_secs: 10, recovery_secs: 50 })
        );
        assert_eq!(
            strides("strides"),
            Some(StepSpec::Strides { reps: 4, work_secs: 10, recovery_secs: 50 })
        );
        assert_eq!(
            strides("Strides: 6x20s"),
            Some(StepSpec::Strides { reps: 6, work_secs: 20, recovery_secs: 50 })
        );
        // a leading keyword with unreadable numbers is not a default set
        assert_eq!(strides("Strides 6 reps"), None);
        assert_eq!(strides("Easy 40 mins"), None);
    }

    #[test]
    fn test_zone_progression() {
        let text = "8x3min, first 4 reps in zone 3, final 4 reps in zone 4";
        assert_eq!(zone_progression(text), Some([(4, Zone::Z3), (4, Zone::Z4)]));
        assert_eq!(zone_progression("8x3min zone 3"), None);
    }
}
