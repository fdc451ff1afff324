//! Natural ordering: `link2 < link10`, case-insensitive text.

use std::cmp::Ordering;

/// One run of a natural sort key. Numbers order before text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum NaturalPart {
    /// Digit run without leading zeros, ordered by length then digits, so
    /// arbitrarily long numbers compare numerically.
    Number(usize, String),
    Text(String),
}

/// Splits `text` into digit and non-digit runs. Like the usual regex split,
/// the key always starts with a (possibly empty) text run.
#[must_use]
pub fn natural_key(text: &str) -> Vec<NaturalPart> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_digits = false;

    for ch in text.chars() {
        let is_digit = ch.is_ascii_digit();
        if is_digit != in_digits {
            parts.push(finish_run(&current, in_digits));
            current.clear();
            in_digits = is_digit;
        }
        current.push(ch);
    }
    parts.push(finish_run(&current, in_digits));
    parts
}

fn finish_run(run: &str, digits: bool) -> NaturalPart {
    if digits {
        let trimmed = run.trim_start_matches('0');
        NaturalPart::Number(trimmed.len(), trimmed.to_owned())
    } else {
        NaturalPart::Text(run.to_lowercase())
    }
}

#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a).cmp(&natural_key(b))
}

/// Sorts in natural order; equal keys keep their input order.
pub fn natural_sort<T: AsRef<str>>(items: &mut [T]) {
    items.sort_by_cached_key(|item| natural_key(item.as_ref()));
}

#[must_use]
pub fn natural_sorted<T: AsRef<str> + Clone>(items: &[T]) -> Vec<T> {
    let mut sorted = items.to_vec();
    natural_sort(&mut sorted);
    sorted
}

/// Component of a congestion level key such as `no1/hi`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum LevelPart {
    Known(u8),
    Other(String),
}

fn level_part(level: &str) -> LevelPart {
    match level {
        "no1" => LevelPart::Known(1),
        "no2" => LevelPart::Known(2),
        "no3" => LevelPart::Known(3),
        "lo" => LevelPart::Known(4),
        "me" => LevelPart::Known(5),
        "hi" => LevelPart::Known(6),
        other => LevelPart::Other(other.to_owned()),
    }
}

/// Orders `/`-separated congestion levels: `no1 < no2 < no3 < lo < me < hi`,
/// unknown levels after those, by text.
pub fn sort_congestion<T: AsRef<str>>(items: &mut [T]) {
    items.sort_by_cached_key(|item| {
        item.as_ref()
            .split('/')
            .map(level_part)
            .collect::<Vec<_>>()
    });
}
