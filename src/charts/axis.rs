//! Plotters coordinate built from placed ticks, so the mesh draws exactly the
//! ticks and labels `place_ticks` chose.

use std::ops::Range;

use plotters::coord::ranged1d::{KeyPointHint, NoDefaultFormatting, Ranged, ValueFormatter};
use plotters::coord::types::RangedCoordf64;

use super::ticks::AxisTicks;

/// Linear axis over `lo..hi` whose bold key points are the major ticks and
/// whose light key points are the minor ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct TickAxis {
    lo: f64,
    hi: f64,
    major: Vec<f64>,
    minor: Vec<f64>,
    labels: Vec<String>,
}

impl TickAxis {
    /// `labels` pairs with `ticks.major`; missing labels format as empty.
    #[must_use]
    pub fn new((lo, hi): (f64, f64), ticks: &AxisTicks, labels: Vec<String>) -> Self {
        Self {
            lo,
            hi,
            major: ticks.major.clone(),
            minor: ticks.minor.clone(),
            labels,
        }
    }

    #[must_use]
    pub fn major(&self) -> &[f64] {
        &self.major
    }

    #[must_use]
    pub fn minor(&self) -> &[f64] {
        &self.minor
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Label of the major tick at exactly `value`.
    #[must_use]
    pub fn label_at(&self, value: f64) -> Option<&str> {
        self.major
            .iter()
            .position(|&tick| tick == value)
            .and_then(|idx| self.labels.get(idx))
            .map(String::as_str)
    }

    fn scale(&self) -> RangedCoordf64 {
        RangedCoordf64::from(self.lo..self.hi)
    }
}

impl Ranged for TickAxis {
    type FormatOption = NoDefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.scale().map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        if hint.max_num_points() == 0 {
            return Vec::new();
        }
        if hint.weight().allow_light_points() {
            self.minor.clone()
        } else {
            self.major.clone()
        }
    }

    fn range(&self) -> Range<f64> {
        self.lo..self.hi
    }
}

impl ValueFormatter<f64> for TickAxis {
    fn format(value: &f64) -> String {
        value.to_string()
    }

    fn format_ext(&self, value: &f64) -> String {
        self.label_at(*value)
            .map_or_else(|| Self::format(value), str::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use plotters::coord::ranged1d::{BoldPoints, LightPoints};

    use super::*;

    fn axis() -> TickAxis {
        let ticks = AxisTicks {
            major: vec![0.0, 5.0, 10.0],
            labels: vec!["0".to_owned(), "5".to_owned(), "10".to_owned()],
            minor: vec![2.5, 7.5],
        };
        let labels = ticks.labels.clone();
        TickAxis::new((0.0, 10.0), &ticks, labels)
    }

    #[test]
    fn bold_points_are_major_and_light_points_minor() {
        let axis = axis();
        assert_eq!(axis.key_points(BoldPoints(10)), vec![0.0, 5.0, 10.0]);
        assert_eq!(axis.key_points(LightPoints::new(10, 100)), vec![2.5, 7.5]);
        assert!(axis.key_points(BoldPoints(0)).is_empty());
    }

    #[test]
    fn labels_are_looked_up_by_position() {
        let axis = axis();
        assert_eq!(axis.format_ext(&5.0), "5");
        assert_eq!(axis.format_ext(&2.5), "2.5");
        assert_eq!(axis.label_at(7.5), None);
    }

    #[test]
    fn values_map_linearly_onto_pixels() {
        let axis = axis();
        assert_eq!(axis.map(&5.0, (0, 100)), 50);
        assert_eq!(axis.map(&10.0, (100, 0)), 0);
        assert_eq!(axis.range(), 0.0..10.0);
    }
}
