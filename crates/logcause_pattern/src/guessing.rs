//! Pattern-guessing heuristics.
//!
//! Guesses are ranked most specific first:
//!
//! 0. the fully literal regex (always present)
//! 1. a leading timestamp captured as one group, the rest literal
//! 2. the timestamp group plus every standalone digit run of the rest
//! 3. the timestamp group plus a `(.*)` group for the remainder
//!
//! Without a leading timestamp, guesses 2 and 3 fall back to digit-run
//! groups over the whole line and to `^(.*)$`.

use crate::config::GuessConfig;
use crate::pattern_match::PatternMatch;
use crate::translate::{RunClass, anchor, char_runs, create_date_regex, create_obvious_regex};

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Separators allowed between the parts of a timestamp.
const DATE_SEPARATORS: &str = "-/:., +";

const DIGIT_GROUP: &str = "([0-9]+)";

/// Proposes regexes for `line_text`, most specific first.
///
/// The result is never empty and every guess matches the whole line.
#[must_use]
pub fn guess_pattern_matches(line_text: &str, config: &GuessConfig) -> Vec<PatternMatch> {
    let mut candidates = vec![create_obvious_regex(line_text)];
    let date = if config.date_guesses {
        find_leading_date(line_text)
    } else {
        None
    };

    if let Some((start, end)) = date {
        let head = date_head(line_text, start, end);
        candidates.push(format!("{head}{}", create_obvious_regex(&line_text[end..])));
        if config.number_guesses && has_digits(&line_text[end..]) {
            candidates.push(format!("{head}{}", digit_groups_regex(&line_text[end..])));
        }
        if config.catch_all_guess {
            if let Some(tail) = catch_all_tail(&line_text[end..]) {
                candidates.push(format!("{head}{tail}"));
            }
        }
    } else {
        if config.number_guesses && has_digits(line_text) {
            candidates.push(digit_groups_regex(line_text));
        }
        if config.catch_all_guess && !line_text.is_empty() {
            candidates.push("(.*)".to_string());
        }
    }

    let mut guesses: Vec<PatternMatch> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let regex = anchor(&candidate);
        if guesses.iter().any(|g| g.pattern == regex) {
            continue;
        }
        match PatternMatch::from_regex(line_text, &regex) {
            Ok(guess) => guesses.push(guess),
            Err(err) => tracing::warn!(%regex, %err, "dropping guess that does not match its line"),
        }
        if guesses.len() >= config.max_guesses.max(1) {
            break;
        }
    }
    guesses
}

/// Literal prefix (an opening bracket, if any) followed by the date group.
fn date_head(line_text: &str, start: usize, end: usize) -> String {
    format!(
        "{}({})",
        create_obvious_regex(&line_text[..start]),
        create_date_regex(&line_text[start..end])
    )
}

fn has_digits(text: &str) -> bool {
    text.bytes().any(|b| b.is_ascii_digit())
}

/// Every digit run becomes a `([0-9]+)` group, everything else is literal.
fn digit_groups_regex(text: &str) -> String {
    char_runs(text)
        .into_iter()
        .map(|(class, start, end)| match class {
            RunClass::Digit => DIGIT_GROUP.to_string(),
            _ => create_obvious_regex(&text[start..end]),
        })
        .collect()
}

/// Keeps the separator right after the date literal and captures the rest.
fn catch_all_tail(rest: &str) -> Option<String> {
    let body_start = rest
        .char_indices()
        .find(|(_, c)| c.is_alphanumeric())
        .map_or(rest.len(), |(idx, _)| idx);
    if body_start == rest.len() {
        return None;
    }
    Some(format!("{}(.*)", create_obvious_regex(&rest[..body_start])))
}

fn is_calendar_word(word: &str) -> bool {
    let lower = word.to_ascii_lowercase();
    lower.len() >= 3
        && MONTHS
            .iter()
            .chain(WEEKDAYS.iter())
            .any(|name| name.starts_with(&lower))
}

/// Finds a timestamp at the start of the line, optionally after one
/// opening bracket. Returns its byte range.
///
/// A timestamp is a sequence of digit runs, month or weekday names, and a
/// `T` between digits, joined by short separators. It needs at least two
/// digit runs.
pub(crate) fn find_leading_date(line_text: &str) -> Option<(usize, usize)> {
    let runs = char_runs(line_text);
    let mut idx = 0;
    let mut start = 0;
    if let Some(&(RunClass::Other, _, end)) = runs.first() {
        if matches!(&line_text[..end], "[" | "(") {
            idx = 1;
            start = end;
        }
    }

    let mut digit_runs = 0;
    let mut date_end = None;
    let mut previous = None;
    for &(class, run_start, run_end) in &runs[idx..] {
        let text = &line_text[run_start..run_end];
        let accepted = match class {
            RunClass::Digit => {
                digit_runs += 1;
                true
            }
            RunClass::Alpha => {
                is_calendar_word(text) || (text == "T" && previous == Some(RunClass::Digit))
            }
            RunClass::Other => {
                let is_separator =
                    text.len() <= 2 && text.chars().all(|c| DATE_SEPARATORS.contains(c));
                if !is_separator {
                    break;
                }
                previous = Some(class);
                continue;
            }
        };
        if !accepted {
            break;
        }
        date_end = Some(run_end);
        previous = Some(class);
    }

    date_end
        .filter(|_| digit_runs >= 2)
        .map(|end| (start, end))
}
