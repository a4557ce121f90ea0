//! Rewrites human readable duration literals such as `1d 2h 3m 4s 500ms`.
//!
//! Every component is optional but they must appear in that order, separated
//! by optional whitespace. Each literal found in a text is summed into a
//! [`TimeDelta`] and replaced by whatever the caller's replacer renders; the
//! default renders the total number of milliseconds.

use std::ops::Range;

// used as the duration handed to replacers
use chrono::TimeDelta;
// so the pattern is only compiled once
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use tracing::trace;

use crate::error::{Result, TesseraError};

lazy_static! {
    // [364d] [23h] [59m] [59s] [999ms]
    static ref DURATION: Regex = Regex::new(
        r"(?:([0-9]{1,3})d)?\s*(?:([0-9]{1,2})h)?\s*(?:([0-9]{1,2})m)?\s*(?:([0-9]{1,2})s)?\s*(?:([0-9]{1,3})ms)?"
    ).unwrap();
}

const DAYS: usize = 1;
const HOURS: usize = 2;
const MINUTES: usize = 3;
const SECONDS: usize = 4;
const MILLISECONDS: usize = 5;

/// The default replacer: total milliseconds as a decimal integer.
pub fn milliseconds(duration: TimeDelta) -> String {
    duration.num_milliseconds().to_string()
}

/// Replaces every duration literal in `text` with its total milliseconds.
pub fn normalize(text: &str) -> String {
    normalize_with(text, milliseconds)
}

/// Replaces every duration literal in `text` with `replace(duration)`.
/// Text around the literals, including whitespace the pattern swallowed,
/// is copied through unchanged.
pub fn normalize_with<F>(text: &str, mut replace: F) -> String
where
    F: FnMut(TimeDelta) -> String,
{
    let mut normalized = String::with_capacity(text.len());
    let mut last_end = 0;
    for captures in DURATION.captures_iter(text) {
        let Some(whole) = captures.get(0) else { continue };
        // only the empty match right after a "ms" repaired by `span` can land here
        if whole.start() < last_end {
            continue;
        }
        normalized.push_str(&text[last_end..whole.start()]);
        last_end = whole.end();
        let literal = whole.as_str();
        let trimmed = literal.trim();
        if trimmed.is_empty() {
            normalized.push_str(literal);
            continue;
        }
        let (duration, end) = span(&captures, text);
        let leading = literal.len() - literal.trim_start().len();
        let trailing = leading + trimmed.len();
        trace!(literal = trimmed, ms = duration.num_milliseconds(), "normalized duration literal");
        normalized.push_str(&literal[..leading]);
        normalized.push_str(&replace(duration));
        normalized.push_str(&literal[trailing..]);
        last_end = last_end.max(end);
    }
    normalized.push_str(&text[last_end..]);
    normalized
}

/// Like [`normalize_with`] but only rewrites the byte `range` of `text`.
/// A range that is reversed, too long or not on character boundaries fails
/// with [`TesseraError::OutOfRange`].
pub fn normalize_range<F>(text: &str, range: Range<usize>, replace: F) -> Result<String>
where
    F: FnMut(TimeDelta) -> String,
{
    let Some(section) = text.get(range.clone()) else {
        return Err(TesseraError::OutOfRange {
            position: range.end as i64,
            length: text.len(),
        });
    };
    Ok(format!(
        "{}{}{}",
        &text[..range.start],
        normalize_with(section, replace),
        &text[range.end..]
    ))
}

/// Parses a text consisting of exactly one duration literal.
pub fn parse_duration(text: &str) -> Option<TimeDelta> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let captures = DURATION.captures(trimmed)?;
    let (duration, end) = span(&captures, trimmed);
    if captures.get(0)?.start() != 0 || end != trimmed.len() {
        return None;
    }
    Some(duration)
}

// Sums the captured components and returns the byte offset where the literal ends.
fn span(captures: &Captures, text: &str) -> (TimeDelta, usize) {
    let part = |group: usize| {
        captures
            .get(group)
            .and_then(|m| m.as_str().parse::<i64>().ok())
            .unwrap_or(0)
    };
    let mut end = captures.get(0).map_or(0, |m| m.end());
    let mut minutes = part(MINUTES);
    let mut millis = part(MILLISECONDS);
    // "10ms" is matched as ten minutes followed by a stray "s"
    if captures.get(SECONDS).is_none() && captures.get(MILLISECONDS).is_none() {
        if let Some(m) = captures.get(MINUTES) {
            if text[m.end()..].starts_with("ms") {
                millis = minutes;
                minutes = 0;
                end = m.end() + 2;
            }
        }
    }
    let duration = TimeDelta::days(part(DAYS))
        + TimeDelta::hours(part(HOURS))
        + TimeDelta::minutes(minutes)
        + TimeDelta::seconds(part(SECONDS))
        + TimeDelta::milliseconds(millis);
    (duration, end)
}
