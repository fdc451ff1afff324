//! Box-and-whisker statistics.

/// Samples at or above this length are thinned before the statistics.
pub const RESAMPLE_THRESHOLD: usize = 1000;
const WHISKER_REACH: f64 = 1.5;

#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_lo: f64,
    pub whisker_hi: f64,
    pub outliers: Vec<f64>,
}

/// Sorts the samples and keeps every `round(len/1000 + 0.5)`-th value of long
/// lists.
#[must_use]
pub fn prepare_samples(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    if sorted.len() < RESAMPLE_THRESHOLD {
        return sorted;
    }
    let stride = (sorted.len() as f64 / RESAMPLE_THRESHOLD as f64 + 0.5).round();
    // At least 1.5, so the stride is a positive integer.
    let stride = stride.max(1.0) as usize;
    sorted.into_iter().step_by(stride).collect()
}

/// Percentile of sorted values with linear interpolation between ranks.
#[must_use]
pub fn percentile(sorted: &[f64], fraction: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let rank = fraction.clamp(0.0, 1.0) * last as f64;
    let below = rank.floor();
    let weight = rank - below;
    let lower = *sorted.get(below as usize)?;
    let upper = sorted.get(below as usize + 1).copied().unwrap_or(lower);
    Some(lower + (upper - lower) * weight)
}

/// Statistics of one sample list; `None` when it holds no finite value.
#[must_use]
pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    let sorted = prepare_samples(values);
    let q1 = percentile(&sorted, 0.25)?;
    let median = percentile(&sorted, 0.5)?;
    let q3 = percentile(&sorted, 0.75)?;
    let reach = WHISKER_REACH * (q3 - q1);
    let (lo_fence, hi_fence) = (q1 - reach, q3 + reach);

    let inside = sorted
        .iter()
        .copied()
        .filter(|v| *v >= lo_fence && *v <= hi_fence);
    let whisker_lo = inside.clone().next().unwrap_or(q1).min(q1);
    let whisker_hi = inside.last().unwrap_or(q3).max(q3);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < lo_fence || *v > hi_fence)
        .collect();

    Some(BoxStats {
        q1,
        median,
        q3,
        whisker_lo,
        whisker_hi,
        outliers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quartiles_interpolate_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&sorted, 0.25), Some(1.75));
        assert_eq!(percentile(&sorted, 0.5), Some(2.5));
        assert_eq!(percentile(&[], 0.5), None);
    }

    #[test]
    fn far_values_become_outliers() {
        let stats = box_stats(&[1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 50.0]);
        assert_eq!(
            stats,
            Some(BoxStats {
                q1: 2.0,
                median: 3.0,
                q3: 3.5,
                whisker_lo: 1.0,
                whisker_hi: 4.0,
                outliers: vec![50.0],
            })
        );
    }

    #[test]
    fn long_samples_are_thinned() {
        let values: Vec<f64> = (0..2500).map(f64::from).collect();
        // round(2.5 + 0.5) = 3
        let kept = prepare_samples(&values);
        assert_eq!(kept.len(), 834);
        assert_eq!(kept.get(1).copied(), Some(3.0));
        assert_eq!(prepare_samples(&[3.0, 1.0]), vec![1.0, 3.0]);
    }
}
