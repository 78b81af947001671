//! Annotated scripts with inline `[pause=SECONDS]` markers.

use std::time::Duration;

const PAUSE_MARKER: &str = "[pause=";

/// A piece of an annotated script.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Text(String),
    Pause(Duration),
}

/// Split `input` into text and pause segments.
///
/// Markers whose value is not a non-negative number stay in the text.
/// Whitespace around text segments is trimmed and empty ones are dropped.
pub fn parse_script(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut pending = String::new();
    let mut rest = input;

    while let Some(start) = rest.find(PAUSE_MARKER) {
        let after = &rest[start + PAUSE_MARKER.len()..];
        let pause = after
            .find(']')
            .and_then(|end| parse_seconds(&after[..end]).map(|duration| (duration, end)));

        match pause {
            Some((duration, end)) => {
                pending.push_str(&rest[..start]);
                flush_text(&mut pending, &mut segments);
                segments.push(Segment::Pause(duration));
                rest = &after[end + 1..];
            }
            None => {
                pending.push_str(&rest[..start + PAUSE_MARKER.len()]);
                rest = after;
            }
        }
    }

    pending.push_str(rest);
    flush_text(&mut pending, &mut segments);
    segments
}

fn parse_seconds(value: &str) -> Option<Duration> {
    let seconds: f64 = value.trim().parse().ok()?;
    Duration::try_from_secs_f64(seconds).ok()
}

fn flush_text(pending: &mut String, segments: &mut Vec<Segment>) {
    let text = pending.trim();
    if !text.is_empty() {
        segments.push(Segment::Text(text.to_string()));
    }
    pending.clear();
}
