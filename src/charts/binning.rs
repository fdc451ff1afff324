//! Histogram bin selection.

use crate::figure::HistogramItem;

/// Bin counts tried, in order, when a histogram leaves binning to us.
const AUTO_BIN_COUNTS: [usize; 3] = [20, 10, 5];
const DEFAULT_BIN_WIDTH: f64 = 0.5;

/// Resolved bins of one histogram item.
#[derive(Debug, Clone, PartialEq)]
pub struct Binning {
    pub edges: Vec<f64>,
    /// Positions for x ticks: the bin centers of an integer-valued histogram,
    /// otherwise the edges.
    pub ticks: Vec<f64>,
    /// Set when `ticks` are the centers of shifted integer bins.
    pub centered: bool,
}

/// Counts values per bin. Bins are half-open except the last one, which also
/// takes values equal to the right edge; values outside are ignored.
#[must_use]
pub fn histogram_counts(values: &[f64], edges: &[f64]) -> Vec<usize> {
    let bins = edges.len().saturating_sub(1);
    let mut counts = vec![0usize; bins];
    let (Some(first), Some(last)) = (edges.first(), edges.last()) else {
        return counts;
    };
    for &value in values {
        if !(value >= *first && value <= *last) {
            continue;
        }
        let upper = edges.partition_point(|edge| *edge <= value);
        let index = upper.saturating_sub(1).min(bins.saturating_sub(1));
        if let Some(count) = counts.get_mut(index) {
            *count += 1;
        }
    }
    counts
}

/// `count` equal-width bins spanning the points. A zero-width range is
/// widened to one unit centered on the value.
#[must_use]
pub fn uniform_edges(points: &[f64], count: usize) -> Vec<f64> {
    let count = count.max(1);
    let (mut lo, mut hi) = min_max(points).unwrap_or((0.0, 1.0));
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let step = (hi - lo) / count as f64;
    (0..=count)
        .map(|i| if i == count { hi } else { lo + step * i as f64 })
        .collect()
}

/// Moves evenly spaced edges onto round numbers while keeping their count.
///
/// The span is rounded up to a power of ten, then halved and divided by five
/// while the result still covers it. The left edge snaps down to a multiple
/// of that span (or half of it) and the span grows in whole steps until it
/// reaches the last original edge.
#[must_use]
pub fn nice_bins(edges: &[f64]) -> Vec<f64> {
    let (Some(&first), Some(&last)) = (edges.first(), edges.last()) else {
        return edges.to_vec();
    };
    let span = last - first;
    if edges.len() < 3 || !span.is_finite() || span <= 0.0 {
        return edges.to_vec();
    }

    let mut nice_span = 10f64.powf(span.log10().ceil());
    if nice_span / 2.0 >= span {
        nice_span /= 2.0;
    }
    if nice_span / 5.0 >= span {
        nice_span /= 5.0;
    }

    let mut nice_left = nice_span * (first / nice_span).floor();
    if nice_left + nice_span / 2.0 < first {
        nice_left += nice_span / 2.0;
    }

    let mut final_span = nice_span;
    while nice_left + final_span < last {
        final_span += nice_span;
    }

    let intervals = (edges.len() - 1) as f64;
    (0..edges.len())
        .map(|i| nice_left + i as f64 * final_span / intervals)
        .collect()
}

/// Bin edges around the given centers: midpoints between neighbours, with
/// the outer edges half a step outside. A single center gets a bin of
/// `width`.
#[must_use]
pub fn edges_from_centers(centers: &[f64], width: f64) -> Vec<f64> {
    match centers {
        [] => vec![-width / 2.0, width / 2.0],
        [only] => vec![only - width / 2.0, only + width / 2.0],
        [first, second, ..] => {
            let mut edges = Vec::with_capacity(centers.len() + 1);
            edges.push(first - (second - first) / 2.0);
            for pair in centers.windows(2) {
                if let [a, b] = pair {
                    edges.push((a + b) / 2.0);
                }
            }
            if let [.., before_last, last] = centers {
                edges.push(last + (last - before_last) / 2.0);
            }
            edges
        }
    }
}

#[must_use]
pub fn bin_centers(edges: &[f64]) -> Vec<f64> {
    edges
        .windows(2)
        .filter_map(|pair| match pair {
            [a, b] => Some(a + (b - a) / 2.0),
            _ => None,
        })
        .collect()
}

/// Picks the bins of a histogram item.
#[must_use]
pub fn resolve_bins(item: &HistogramItem) -> Binning {
    if let Some(edges) = item.bins.as_ref().filter(|edges| edges.len() >= 2) {
        return Binning {
            edges: edges.clone(),
            ticks: edges.clone(),
            centered: false,
        };
    }

    let points = unique_sorted(item.x.all_values());
    let width = item.bin_width.unwrap_or(DEFAULT_BIN_WIDTH);
    let mut ticks = None;

    let centers = match item.bin_centers.as_ref() {
        Some(centers) => centers.clone(),
        None if points.is_empty() => Vec::new(),
        None => {
            let count = item.n_bins.unwrap_or_else(|| auto_bin_count(&points));
            let mut edges = nice_bins(&uniform_edges(&points, count));
            if let Some(shifted) = integer_shift(&points, &edges) {
                edges = shifted;
                ticks = Some(bin_centers(&edges));
            }
            bin_centers(&edges)
        }
    };
    let centers = if centers.is_empty() {
        vec![0.0]
    } else {
        centers
    };

    let mut edges = edges_from_centers(&centers, width);
    if let Some((lo, hi)) = min_max(&points) {
        if let Some(first) = edges.first_mut()
            && *first > lo
        {
            *first = lo;
        }
        if let Some(last) = edges.last_mut()
            && *last < hi
        {
            *last = hi;
        }
    }

    let centered = ticks.is_some();
    let ticks = ticks.unwrap_or_else(|| edges.clone());
    Binning {
        edges,
        ticks,
        centered,
    }
}

/// First candidate bin count that leaves no bin empty.
fn auto_bin_count(points: &[f64]) -> usize {
    AUTO_BIN_COUNTS
        .iter()
        .copied()
        .find(|&count| {
            histogram_counts(points, &uniform_edges(points, count))
                .iter()
                .all(|&height| height > 0)
        })
        .unwrap_or(5)
}

/// Integer data over a narrow range reads better with the bars centered on
/// the integers: shift the edges by half a bin when all points stay inside.
fn integer_shift(points: &[f64], edges: &[f64]) -> Option<Vec<f64>> {
    let (lo, hi) = min_max(points)?;
    let all_integers = points.iter().all(|p| p.fract() == 0.0);
    if !all_integers || hi - lo > edges.len() as f64 {
        return None;
    }
    let (first, second) = match edges {
        [first, second, ..] => (*first, *second),
        _ => return None,
    };
    let offset = (second - first) * 0.5;
    let shifted: Vec<f64> = edges.iter().map(|edge| edge + offset).collect();
    let (s_first, s_last) = (shifted.first()?, shifted.last()?);
    if points.iter().all(|p| p >= s_first && p <= s_last) {
        Some(shifted)
    } else {
        Some(edges.to_vec())
    }
}

fn unique_sorted(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut points: Vec<f64> = values.filter(|value| value.is_finite()).collect();
    points.sort_by(f64::total_cmp);
    points.dedup();
    points
}

pub(crate) fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|value| value.is_finite())
        .fold(None, |acc, value| match acc {
            None => Some((value, value)),
            Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::Samples;

    fn approx(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-9)
    }

    #[test]
    fn last_bin_is_closed() {
        let counts = histogram_counts(&[0.0, 1.0, 1.5, 2.0, 3.0], &[0.0, 1.0, 2.0]);
        assert_eq!(counts, vec![1, 3]);
    }

    #[test]
    fn degenerate_range_is_widened() {
        let edges = uniform_edges(&[3.0, 3.0], 2);
        assert!(approx(&edges, &[2.5, 3.0, 3.5]));
    }

    #[test]
    fn nice_bins_snap_to_round_numbers() {
        // span 8.6 rounds to 10; left 0.7 snaps down to 0.
        let nice = nice_bins(&[0.7, 2.85, 5.0, 7.15, 9.3]);
        assert!(approx(&nice, &[0.0, 2.5, 5.0, 7.5, 10.0]), "{:?}", nice);
    }

    #[test]
    fn nice_bins_use_half_span_left_edge() {
        // span 3 -> 5; left 12 snaps to 10.
        let nice = nice_bins(&[12.0, 13.5, 15.0]);
        assert!(approx(&nice, &[10.0, 12.5, 15.0]), "{:?}", nice);
    }

    #[test]
    fn nice_bins_keep_short_or_empty_input() {
        assert_eq!(nice_bins(&[1.0, 2.0]), vec![1.0, 2.0]);
        assert_eq!(nice_bins(&[2.0, 2.0, 2.0]), vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn edges_from_centers_extend_half_a_step() {
        assert!(approx(
            &edges_from_centers(&[1.0, 2.0, 4.0], 0.5),
            &[0.5, 1.5, 3.0, 5.0]
        ));
        assert!(approx(&edges_from_centers(&[3.0], 2.0), &[2.0, 4.0]));
    }

    #[test]
    fn explicit_bins_are_kept() {
        let item = HistogramItem {
            x: Samples::Single(vec![1.0, 2.0]),
            bins: Some(vec![0.0, 4.0, 8.0]),
            ..HistogramItem::default()
        };
        let binning = resolve_bins(&item);
        assert_eq!(binning.edges, vec![0.0, 4.0, 8.0]);
        assert_eq!(binning.ticks, binning.edges);
        assert!(!binning.centered);
    }

    #[test]
    fn integer_samples_shift_bins_by_half_a_step() {
        let item = HistogramItem {
            x: Samples::Single(vec![1.0, 2.0, 2.0, 3.0, 4.0]),
            n_bins: Some(4),
            ..HistogramItem::default()
        };
        let binning = resolve_bins(&item);
        // Nice edges 0, 1.25, .., 5 moved right by 0.625 still hold 1..4.
        assert!(
            approx(&binning.edges, &[0.625, 1.875, 3.125, 4.375, 5.625]),
            "{:?}",
            binning
        );
        assert!(approx(&binning.ticks, &[1.25, 2.5, 3.75, 5.0]), "{:?}", binning);
        assert!(binning.centered);
    }

    #[test]
    fn integer_samples_keep_edges_when_shift_drops_points() {
        let item = HistogramItem {
            x: Samples::Single(vec![1.0, 2.0, 3.0]),
            n_bins: Some(2),
            ..HistogramItem::default()
        };
        let binning = resolve_bins(&item);
        assert!(approx(&binning.edges, &[0.0, 2.5, 5.0]), "{:?}", binning);
        assert!(approx(&binning.ticks, &[1.25, 3.75]), "{:?}", binning);
    }

    #[test]
    fn bin_centers_override_automatic_bins() {
        let item = HistogramItem {
            x: Samples::Multi(vec![vec![2.0, 3.0], vec![8.0]]),
            bin_centers: Some(vec![2.0, 3.0, 4.0]),
            ..HistogramItem::default()
        };
        let binning = resolve_bins(&item);
        assert!(approx(&binning.edges, &[1.5, 2.5, 3.5, 8.0]), "{:?}", binning);
    }

    #[test]
    fn empty_histogram_gets_a_single_bin_at_zero() {
        let binning = resolve_bins(&HistogramItem::default());
        assert!(approx(&binning.edges, &[-0.25, 0.25]));
    }
}
