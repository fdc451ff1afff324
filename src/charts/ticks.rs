//! Tick placement and labelling for one axis.

use tracing::warn;

use crate::error::FigureError;

use super::format::{default_decimals, format_default, format_printf};

/// Step mantissas tried by the automatic locator.
const NICE_STEPS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];
const MAX_INTERVALS: f64 = 9.0;
/// Relative slack when testing whether a tick lies inside the view.
const EDGE_TOLERANCE: f64 = 1e-9;
/// Upper bound on the minor ticks of one axis.
pub const MAX_MINOR_TICKS: usize = 1000;

/// Inputs of one axis, borrowed from the figure.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickRequest<'a> {
    pub explicit: Option<&'a [f64]>,
    pub labels: Option<&'a [String]>,
    pub format: Option<&'a str>,
    /// `-1` automatic, `0` none, `n > 0` evenly spaced.
    pub major_count: Option<i64>,
    /// Subdivisions per major interval; `1` or less means none.
    pub minor_count: Option<i64>,
    /// Positions suggested by histograms (x axis only).
    pub histogram: Option<&'a [f64]>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisTicks {
    pub major: Vec<f64>,
    pub labels: Vec<String>,
    pub minor: Vec<f64>,
}

/// Places and labels the ticks of an axis showing `lo..=hi`.
///
/// # Errors
///
/// Returns an error when the axis format string is invalid.
pub fn place_ticks(request: &TickRequest<'_>, lo: f64, hi: f64) -> Result<AxisTicks, FigureError> {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };

    let positions = match (request.explicit, request.major_count) {
        (Some(explicit), _) => explicit.to_vec(),
        (None, Some(count)) if count >= 0 => linear_ticks(lo, hi, count),
        _ => match request.histogram {
            Some(histogram) => histogram.to_vec(),
            None => nice_ticks(lo, hi),
        },
    };

    let texts = match (request.labels, request.format) {
        (Some(labels), _) => (0..positions.len())
            .map(|idx| labels.get(idx).cloned().unwrap_or_default())
            .collect(),
        (None, Some(format)) => positions
            .iter()
            .map(|&value| format_printf(format, value))
            .collect::<Result<Vec<_>, _>>()?,
        (None, None) => {
            let visible: Vec<f64> = positions
                .iter()
                .copied()
                .filter(|&value| inside(value, lo, hi))
                .collect();
            let decimals = default_decimals(&visible);
            positions
                .iter()
                .map(|&value| format_default(value, decimals))
                .collect()
        }
    };

    let (major, labels): (Vec<f64>, Vec<String>) = positions
        .into_iter()
        .zip(texts)
        .filter(|(value, _)| inside(*value, lo, hi))
        .unzip();
    let minor = minor_ticks(&major, request.minor_count.unwrap_or(1), lo, hi);
    Ok(AxisTicks {
        major,
        labels,
        minor,
    })
}

fn inside(value: f64, lo: f64, hi: f64) -> bool {
    let slack = (hi - lo).abs().max(f64::MIN_POSITIVE) * EDGE_TOLERANCE;
    value.is_finite() && value >= lo - slack && value <= hi + slack
}

/// `count` ticks spread evenly from `lo` to `hi`.
#[must_use]
pub fn linear_ticks(lo: f64, hi: f64, count: i64) -> Vec<f64> {
    match count {
        i64::MIN..=0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let intervals = count - 1;
            (0..count)
                .map(|i| lo + (hi - lo) * i as f64 / intervals as f64)
                .collect()
        }
    }
}

/// Round-number ticks: the smallest step `m × 10^k` (`m` from 1, 2, 2.5, 5, 10)
/// that covers the view in at most nine intervals.
#[must_use]
pub fn nice_ticks(lo: f64, hi: f64) -> Vec<f64> {
    let span = hi - lo;
    if !span.is_finite() || span <= 0.0 {
        return if lo.is_finite() { vec![lo] } else { Vec::new() };
    }
    let raw = span / MAX_INTERVALS;
    let scale = 10f64.powf(raw.log10().floor());
    for mantissa in NICE_STEPS {
        let step = mantissa * scale;
        let first = (lo / step - EDGE_TOLERANCE).ceil();
        let last = (hi / step + EDGE_TOLERANCE).floor();
        if last - first <= MAX_INTERVALS {
            return steps_between(first, last, step);
        }
    }
    let step = 10.0 * scale;
    steps_between(
        (lo / step - EDGE_TOLERANCE).ceil(),
        (hi / step + EDGE_TOLERANCE).floor(),
        step,
    )
}

fn steps_between(first: f64, last: f64, step: f64) -> Vec<f64> {
    let mut ticks = Vec::new();
    let mut index = first;
    while index <= last {
        // Rounding keeps 0.1 * 3 from printing as 0.30000000000000004.
        let value = index * step;
        let digits = (-step.log10().floor() + 1.0).clamp(0.0, 15.0);
        let factor = 10f64.powf(digits);
        ticks.push((value * factor).round() / factor);
        index += 1.0;
    }
    ticks
}

/// Minor ticks dividing every major interval into `count` parts, continued
/// past the first and last major tick up to the view limits.
///
/// Returns nothing, with a warning, when more than `MAX_MINOR_TICKS` would be
/// generated (for example closely spaced explicit ticks on a wide view).
#[must_use]
pub fn minor_ticks(major: &[f64], count: i64, lo: f64, hi: f64) -> Vec<f64> {
    let (Some(&first), Some(&second)) = (major.first(), major.get(1)) else {
        return Vec::new();
    };
    let [.., before_last, last] = major else {
        return Vec::new();
    };
    if count <= 1 {
        return Vec::new();
    }
    let leading_width = second - first;
    let trailing_width = last - before_last;
    let leading = intervals_to_cover(first - lo, leading_width);
    let trailing = intervals_to_cover(hi - last, trailing_width);
    let intervals = leading + trailing + (major.len() - 1) as f64;
    let requested = intervals * (count - 1) as f64;
    if !requested.is_finite() || requested > MAX_MINOR_TICKS as f64 {
        warn!(
            "Skipping minor ticks: {} subdivisions of {} intervals exceed {} ticks.",
            count, intervals, MAX_MINOR_TICKS
        );
        return Vec::new();
    }

    let parts = count as f64;
    let mut ticks = Vec::new();
    let mut push_interval = |a: f64, b: f64| {
        let step = (b - a) / parts;
        for k in 1..count {
            let value = a + step * k as f64;
            if inside(value, lo, hi) {
                ticks.push(value);
            }
        }
    };

    for k in 1..=leading as usize {
        let start = first - leading_width * k as f64;
        push_interval(start, start + leading_width);
    }
    for pair in major.windows(2) {
        if let [a, b] = pair {
            push_interval(*a, *b);
        }
    }
    for k in 0..trailing as usize {
        let start = last + trailing_width * k as f64;
        push_interval(start, start + trailing_width);
    }

    ticks.sort_by(f64::total_cmp);
    ticks
}

/// Whole intervals of `width` needed to span `gap`; none for a non-positive
/// gap or width.
fn intervals_to_cover(gap: f64, width: f64) -> f64 {
    if width > 0.0 && gap > 0.0 {
        (gap / width).ceil()
    } else {
        0.0
    }
}
