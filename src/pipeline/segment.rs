use once_cell::sync::Lazy;
use regex::Regex;

use crate::pipeline::classify::patterns::has_interval_marker;

/// `Long Run: ...`; the title may not start or end with a digit, so `8x3:00` never qualifies
static TITLE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([^:\d\s](?:[^:]*[^:\d\s])?)\s*:(?:\s+|$)").expect("static pattern must compile")
});

/// A cell split into ordered blocks, with its title pulled off the front
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmented {
    pub title: Option<String>,
    pub blocks: Vec<String>,
}

/// Split one cell into semantic blocks: newlines first, then `+` unless the
/// text carries an interval marker (where `+` belongs to a recovery annotation).
pub fn segment(text: &str) -> Segmented {
    let text = text.replace('\r', " ");

    let mut blocks: Vec<String> = if text.contains('\n') {
        split_non_blank(&text, '\n')
    } else if text.contains('+') && !has_interval_marker(&text) {
        split_non_blank(&text, '+')
    } else if text.trim().is_empty() {
        Vec::new()
    } else {
        vec![text.trim().to_string()]
    };

    let title = extract_title(&mut blocks);
    Segmented { title, blocks }
}

fn split_non_blank(text: &str, separator: char) -> Vec<String> {
    text.split(separator)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strip a leading `<Title>:` off the first block, dropping the block if nothing is left
fn extract_title(blocks: &mut Vec<String>) -> Option<String> {
    let first = blocks.first()?;
    let caps = TITLE_PREFIX.captures(first)?;
    let title = caps.get(1)?.as_str().trim().to_string();
    let rest = first[caps.get(0)?.end()..].trim().to_string();

    if rest.is_empty() {
        blocks.remove(0);
    } else {
        blocks[0] = rest;
    }
    Some(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newlines_win() {
        let seg = segment("Warm up 15 min\n\n6x4min Z4 + 2 min jog\r\nCool down 10 min");
        assert_eq!(
            seg.blocks,
            vec!["Warm up 15 min", "6x4min Z4 + 2 min jog", "Cool down 10 min"]
        );
        assert_eq!(seg.title, None);
    }

    #[test]
    fn test_plus_splits_without_interval_marker() {
        let seg = segment("50 min easy + 20 min tempo");
        assert_eq!(seg.blocks, vec!["50 min easy", "20 min tempo"]);
    }

    #[test]
    fn test_plus_kept_when_interval_marker_present() {
        let seg = segment("8x3 (+60s rest)");
        assert_eq!(seg.blocks, vec!["8x3 (+60s rest)"]);

        let seg = segment("Easy 50 mins + 4x10 secs strides");
        assert_eq!(seg.blocks, vec!["Easy 50 mins + 4x10 secs strides"]);
    }

    #[test]
    fn test_title_extraction() {
        let seg = segment("Interval session: 6x4min Z4");
        assert_eq!(seg.title.as_deref(), Some("Interval session"));
        assert_eq!(seg.blocks, vec!["6x4min Z4"]);

        let seg = segment("Long Run:\n20 min easy\n40 min steady");
        assert_eq!(seg.title.as_deref(), Some("Long Run"));
        assert_eq!(seg.blocks, vec!["20 min easy", "40 min steady"]);
    }

    #[test]
    fn test_times_are_not_titles() {
        let seg = segment("8x3:00 (60s) Z4");
        assert_eq!(seg.title, None);
        assert_eq!(seg.blocks, vec!["8x3:00 (60s) Z4"]);

        let seg = segment("Tempo 20:00 Z3");
        assert_eq!(seg.title, None);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(segment("   "), Segmented::default());
    }
}
