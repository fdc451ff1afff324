//! Item geometry in data coordinates, before any pixel mapping.

use plotters::style::RGBColor;
use tracing::warn;

use crate::error::FigureError;
use crate::figure::{
    BarItem, BoxplotItem, ColorChoice, DataEntry, Figure, HistogramItem, Hsv, HueWalk, Item, Label,
    LineItem, Palette, StackedItem, StemItem,
};

use super::binning::{histogram_counts, resolve_bins};
use super::boxplot::box_stats;
use super::legend::{Handle, LegendEntry};
use super::style::{Dash, LineStyle, MarkerShape};

const DEFAULT_LINE_WIDTH: f64 = 1.5;
const DEFAULT_STACKED_LINE_WIDTH: f64 = 0.0;
const DEFAULT_BOX_WIDTH: f64 = 0.5;
const DEFAULT_OUTLIER_MARKER: MarkerShape = MarkerShape::Plus;
/// Marker size in points.
pub const MARKER_SIZE: f64 = 6.0;
const BAR_SLOT: f64 = 0.8;
const BAR_EDGE_WIDTH: f64 = 1.0;
const GUIDE_WIDTH: f64 = 1.0;
const GUIDE_GRAY: f64 = 0.7;
const MEDIAN_GRAY: f64 = 0.5;
const AXIS_MARGIN: f64 = 0.05;

const BLACK: RGBColor = RGBColor(0, 0, 0);
const WHITE: RGBColor = RGBColor(255, 255, 255);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hatch {
    Forward,
    Backward,
}

impl Hatch {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.contains('/') {
            Some(Hatch::Forward)
        } else if raw.contains('\\') {
            Some(Hatch::Backward)
        } else {
            None
        }
    }
}

/// Line width in points and color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: RGBColor,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Line {
        points: Vec<(f64, f64)>,
        stroke: Stroke,
        dash: Dash,
    },
    Markers {
        points: Vec<(f64, f64)>,
        shape: MarkerShape,
        color: RGBColor,
    },
    Rect {
        corners: [(f64, f64); 2],
        fill: Option<RGBColor>,
        edge: Option<Stroke>,
        hatch: Option<Hatch>,
    },
    Polygon {
        points: Vec<(f64, f64)>,
        fill: RGBColor,
        edge: Option<Stroke>,
    },
}

/// Data extent of one axis. Sticky values are limits that get no margin
/// when they end up at the edge (bar and histogram baselines).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extent {
    bounds: Option<(f64, f64)>,
    sticky: Vec<f64>,
}

impl Extent {
    pub fn include(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.bounds = Some(match self.bounds {
            None => (value, value),
            Some((lo, hi)) => (lo.min(value), hi.max(value)),
        });
    }

    pub fn include_sticky(&mut self, value: f64) {
        self.include(value);
        if value.is_finite() {
            self.sticky.push(value);
        }
    }

    #[must_use]
    pub const fn bounds(&self) -> Option<(f64, f64)> {
        self.bounds
    }

    /// View limits: explicit limits win, the rest come from the data with a
    /// 5% margin on non-sticky sides.
    #[must_use]
    pub fn resolve(&self, explicit_lo: Option<f64>, explicit_hi: Option<f64>) -> (f64, f64) {
        let (mut lo, mut hi) = self.bounds.unwrap_or((0.0, 1.0));
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        } else {
            let margin = (hi - lo) * AXIS_MARGIN;
            if !self.sticky.contains(&lo) {
                lo -= margin;
            }
            if !self.sticky.contains(&hi) {
                hi += margin;
            }
        }
        let lo = explicit_lo.unwrap_or(lo);
        let hi = explicit_hi.unwrap_or(hi);
        if lo == hi { (lo - 0.5, hi + 0.5) } else { (lo, hi) }
    }
}

/// Everything drawn inside the axes, plus the legend entries in drawing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub marks: Vec<Mark>,
    pub legend: Vec<LegendEntry>,
    pub x_extent: Extent,
    pub y_extent: Extent,
    /// Tick positions for a histogram x axis: the centers of the last
    /// integer-valued histogram, else the edges of the first histogram.
    pub histogram_ticks: Option<Vec<f64>>,
    /// Outer edges of the last histogram.
    pub histogram_span: Option<(f64, f64)>,
    /// Set by line, stacked and bar items, which take the x axis back from
    /// histograms.
    pub histogram_axis_overridden: bool,
}

impl Scene {
    /// Lays out every recognized item of the figure.
    ///
    /// # Errors
    ///
    /// Returns an error when an item has inconsistent series lengths or too
    /// few explicit colors.
    pub fn build(figure: &Figure) -> Result<Self, FigureError> {
        let mut scene = Scene::default();
        let mut hues = HueWalk::default();
        let bar_count = figure
            .items()
            .filter(|item| matches!(item, Item::Bar(_)))
            .count();
        let mut bar_index = 0usize;

        for (index, entry) in figure.data.iter().enumerate() {
            let item = match entry {
                DataEntry::Plot(item) => item,
                DataEntry::Ignored { kind, .. } => {
                    warn!("Skipping item {} with unknown type '{}'.", index, kind);
                    continue;
                }
            };
            match item {
                Item::Line(line) => scene.add_line(index, line, &mut hues)?,
                Item::Bar(bar) => {
                    scene.add_bar(index, bar, (bar_index, bar_count), &mut hues)?;
                    bar_index += 1;
                }
                Item::Stacked(stacked) => scene.add_stacked(index, stacked, &mut hues)?,
                Item::Boxplot(boxplot) => scene.add_boxplot(index, boxplot)?,
                Item::Stem(stem) => scene.add_stem(index, stem, &mut hues)?,
                Item::Histogram(histogram) => scene.add_histogram(index, histogram, &mut hues)?,
            }
        }
        Ok(scene)
    }

    /// Histograms decide the x axis only when no line, stacked or bar item
    /// is present.
    #[must_use]
    pub fn histogram_axis(&self) -> bool {
        !self.histogram_axis_overridden && self.histogram_span.is_some()
    }

    #[must_use]
    pub fn x_range(&self, figure: &Figure) -> (f64, f64) {
        if self.histogram_axis()
            && let Some((lo, hi)) = self.histogram_span
        {
            let lo = figure.xmin.unwrap_or(lo);
            let hi = figure.xmax.unwrap_or(hi);
            if lo != hi {
                return (lo, hi);
            }
        }
        self.x_extent.resolve(figure.xmin, figure.xmax)
    }

    #[must_use]
    pub fn y_range(&self, figure: &Figure) -> (f64, f64) {
        self.y_extent.resolve(figure.ymin, figure.ymax)
    }

    fn include_points(&mut self, points: &[(f64, f64)]) {
        for &(x, y) in points {
            self.x_extent.include(x);
            self.y_extent.include(y);
        }
    }

    fn push_legend(&mut self, label: Option<&str>, handle: Handle) {
        if let Some(label) = label.filter(|label| !label.is_empty()) {
            self.legend.push(LegendEntry {
                label: Label::parse(label),
                handle,
            });
        }
    }

    fn add_line(&mut self, index: usize, line: &LineItem, hues: &mut HueWalk) -> Result<(), FigureError> {
        check_lengths(index, "line", line.x.len(), line.y.len())?;
        self.histogram_axis_overridden = true;
        let style = LineStyle::parse(line.pattern.as_deref().unwrap_or("-"));
        let color = hues.resolve(line.color).to_rgb();
        let width = line.line_width.unwrap_or(DEFAULT_LINE_WIDTH);
        let points: Vec<(f64, f64)> = line.x.iter().copied().zip(line.y.iter().copied()).collect();
        self.include_points(&points);

        if let Some(dash) = style.dash {
            self.marks.push(Mark::Line {
                points: points.clone(),
                stroke: Stroke { color, width },
                dash,
            });
        }
        if let Some(shape) = style.marker {
            self.marks.push(Mark::Markers {
                points,
                shape,
                color,
            });
        }
        self.push_legend(line.label.as_deref(), Handle::Line {
            color,
            width,
            dash: style.dash,
            marker: style.marker,
        });
        Ok(())
    }

    fn add_bar(
        &mut self,
        index: usize,
        bar: &BarItem,
        (slot, slots): (usize, usize),
        hues: &mut HueWalk,
    ) -> Result<(), FigureError> {
        check_lengths(index, "bar", bar.x.len(), bar.y.len())?;
        self.histogram_axis_overridden = true;
        let color = hues.resolve(bar.color).to_rgb();
        let hatch = bar.hatch.as_deref().and_then(Hatch::parse);
        let width = BAR_SLOT / slots.max(1) as f64;
        let offset = slot as f64 * width - width * slots as f64 / 2.0;

        for (&x, &y) in bar.x.iter().zip(&bar.y) {
            let left = x + offset;
            self.x_extent.include(left);
            self.x_extent.include(left + width);
            self.y_extent.include_sticky(0.0);
            self.y_extent.include(y);
            self.marks.push(Mark::Rect {
                corners: [(left, 0.0), (left + width, y)],
                fill: Some(color),
                edge: Some(Stroke {
                    color: WHITE,
                    width: BAR_EDGE_WIDTH,
                }),
                hatch,
            });
        }
        self.push_legend(bar.label.as_deref(), Handle::Patch { fill: color, hatch });
        Ok(())
    }

    fn add_stacked(
        &mut self,
        index: usize,
        stacked: &StackedItem,
        hues: &mut HueWalk,
    ) -> Result<(), FigureError> {
        for series in &stacked.y {
            check_lengths(index, "stacked", stacked.x.len(), series.len())?;
        }
        self.histogram_axis_overridden = true;
        let colors = palette_colors(index, "stacked", stacked.colors.as_ref(), stacked.y.len(), hues)?;
        let line_width = stacked.line_width.unwrap_or(DEFAULT_STACKED_LINE_WIDTH);

        let mut base = vec![0.0; stacked.x.len()];
        self.y_extent.include_sticky(0.0);
        for &x in &stacked.x {
            self.x_extent.include(x);
        }
        for (series_index, (series, color)) in stacked.y.iter().zip(colors).enumerate() {
            let top: Vec<f64> = base.iter().zip(series).map(|(b, y)| b + y).collect();
            let mut points: Vec<(f64, f64)> =
                stacked.x.iter().copied().zip(top.iter().copied()).collect();
            points.extend(stacked.x.iter().copied().zip(base.iter().copied()).rev());
            for &y in &top {
                self.y_extent.include(y);
            }
            self.marks.push(Mark::Polygon {
                points,
                fill: color,
                edge: (line_width > 0.0).then_some(Stroke {
                    color,
                    width: line_width,
                }),
            });
            let label = stacked
                .labels
                .as_ref()
                .and_then(|labels| labels.get(series_index))
                .map(String::as_str);
            self.push_legend(label, Handle::Patch {
                fill: color,
                hatch: None,
            });
            base = top;
        }
        Ok(())
    }

    fn add_boxplot(&mut self, index: usize, boxplot: &BoxplotItem) -> Result<(), FigureError> {
        let series = boxplot.x.series();
        let positions: Vec<f64> = match &boxplot.positions {
            Some(positions) => {
                check_lengths(index, "boxplot", series.len(), positions.len())?;
                positions.clone()
            }
            None => (1..=series.len()).map(|p| p as f64).collect(),
        };
        let width = boxplot.w.unwrap_or(DEFAULT_BOX_WIDTH);
        let line_width = boxplot.line_width.unwrap_or(DEFAULT_LINE_WIDTH);
        let stroke = |color: Option<Hsv>, fallback: RGBColor| Stroke {
            color: color.map_or(fallback, Hsv::to_rgb),
            width: line_width,
        };
        let box_stroke = stroke(boxplot.box_color, BLACK);
        let median_stroke = stroke(boxplot.median_color, Hsv::gray(MEDIAN_GRAY).to_rgb());
        let whisker_stroke = stroke(boxplot.whisker_color, BLACK);
        let cap_stroke = stroke(boxplot.cap_color, BLACK);
        let outlier_color = boxplot.outlier_color.map_or(BLACK, Hsv::to_rgb);
        let outlier_shape = boxplot
            .outlier_marker
            .as_deref()
            .and_then(|marker| marker.chars().next())
            .and_then(MarkerShape::from_char)
            .unwrap_or(DEFAULT_OUTLIER_MARKER);

        for (values, &position) in series.iter().zip(&positions) {
            let half = width / 2.0;
            self.x_extent.include(position - half);
            self.x_extent.include(position + half);
            let Some(stats) = box_stats(values) else {
                continue;
            };
            let (left, right) = (position - half, position + half);
            let cap = width / 4.0;
            let segment = |a: (f64, f64), b: (f64, f64), stroke: Stroke| Mark::Line {
                points: vec![a, b],
                stroke,
                dash: Dash::Solid,
            };

            self.marks.push(Mark::Rect {
                corners: [(left, stats.q1), (right, stats.q3)],
                fill: None,
                edge: Some(box_stroke),
                hatch: None,
            });
            self.marks.push(segment(
                (position, stats.q1),
                (position, stats.whisker_lo),
                whisker_stroke,
            ));
            self.marks.push(segment(
                (position, stats.q3),
                (position, stats.whisker_hi),
                whisker_stroke,
            ));
            for whisker in [stats.whisker_lo, stats.whisker_hi] {
                self.marks.push(segment(
                    (position - cap, whisker),
                    (position + cap, whisker),
                    cap_stroke,
                ));
            }
            self.marks.push(segment(
                (left, stats.median),
                (right, stats.median),
                median_stroke,
            ));
            self.y_extent.include(stats.whisker_lo);
            self.y_extent.include(stats.whisker_hi);
            if !stats.outliers.is_empty() {
                for &outlier in &stats.outliers {
                    self.y_extent.include(outlier);
                }
                self.marks.push(Mark::Markers {
                    points: stats.outliers.iter().map(|&v| (position, v)).collect(),
                    shape: outlier_shape,
                    color: outlier_color,
                });
            }
        }
        Ok(())
    }

    fn add_stem(&mut self, index: usize, stem: &StemItem, hues: &mut HueWalk) -> Result<(), FigureError> {
        check_lengths(index, "stem", stem.x.len(), stem.y.len())?;
        let line_style = LineStyle::parse(stem.line_format.as_deref().unwrap_or("-"));
        let marker_style = LineStyle::parse(stem.marker_format.as_deref().unwrap_or("o"));
        let color = hues.resolve(stem.color).to_rgb();
        let width = stem.line_width.unwrap_or(DEFAULT_LINE_WIDTH);
        let dash = line_style.dash.unwrap_or(Dash::Solid);

        let points: Vec<(f64, f64)> = stem.x.iter().copied().zip(stem.y.iter().copied()).collect();
        self.include_points(&points);
        self.y_extent.include(0.0);
        for &(x, y) in &points {
            self.marks.push(Mark::Line {
                points: vec![(x, 0.0), (x, y)],
                stroke: Stroke { color, width },
                dash,
            });
        }
        if let Some(shape) = marker_style.marker {
            self.marks.push(Mark::Markers {
                points,
                shape,
                color,
            });
        }
        self.push_legend(stem.label.as_deref(), Handle::Line {
            color,
            width,
            dash: Some(dash),
            marker: marker_style.marker,
        });
        Ok(())
    }

    fn add_histogram(
        &mut self,
        index: usize,
        histogram: &HistogramItem,
        hues: &mut HueWalk,
    ) -> Result<(), FigureError> {
        let binning = resolve_bins(histogram);
        let series = histogram.x.series();
        let colors = if histogram.x.is_multi() {
            palette_colors(index, "histogram", histogram.colors.as_ref(), series.len(), hues)?
        } else {
            let color = match &histogram.color {
                Some(ColorChoice::Explicit(hsv)) => *hsv,
                Some(ColorChoice::Named(_)) | None => hues.next_color(),
            };
            vec![color.to_rgb()]
        };

        let heights: Vec<Vec<usize>> = series
            .iter()
            .map(|values| histogram_counts(values, &binning.edges))
            .collect();
        let max_height = heights.iter().flatten().copied().max().unwrap_or(0) as f64;
        let count = series.len().max(1) as f64;

        for (bin, pair) in binning.edges.windows(2).enumerate() {
            let [lo, hi] = pair else {
                continue;
            };
            let width = (hi - lo) / count;
            for (series_index, (counts, color)) in heights.iter().zip(&colors).enumerate() {
                let height = counts.get(bin).copied().unwrap_or(0) as f64;
                let left = lo + width * series_index as f64;
                self.marks.push(Mark::Rect {
                    corners: [(left, 0.0), (left + width, height)],
                    fill: Some(*color),
                    edge: Some(Stroke {
                        color: WHITE,
                        width: BAR_EDGE_WIDTH,
                    }),
                    hatch: None,
                });
            }
        }
        // Guides reach twice the tallest bar and never widen the y axis.
        let guide = Stroke {
            color: Hsv::gray(GUIDE_GRAY).to_rgb(),
            width: GUIDE_WIDTH,
        };
        for &edge in &binning.edges {
            self.marks.push(Mark::Line {
                points: vec![(edge, 0.0), (edge, max_height * 2.0)],
                stroke: guide,
                dash: Dash::Dotted,
            });
        }

        if let (Some(&first), Some(&last)) = (binning.edges.first(), binning.edges.last()) {
            self.x_extent.include_sticky(first);
            self.x_extent.include_sticky(last);
            self.histogram_span = Some((first, last));
        }
        self.y_extent.include_sticky(0.0);
        self.y_extent.include(max_height);
        if binning.centered || self.histogram_ticks.is_none() {
            self.histogram_ticks = Some(binning.ticks.clone());
        }

        if histogram.x.is_multi() {
            for (series_index, color) in colors.iter().enumerate() {
                let label = histogram
                    .labels
                    .as_ref()
                    .and_then(|labels| labels.get(series_index))
                    .map(String::as_str);
                self.push_legend(label, Handle::Patch {
                    fill: *color,
                    hatch: None,
                });
            }
        } else if let Some(color) = colors.first() {
            self.push_legend(histogram.label.as_deref(), Handle::Patch {
                fill: *color,
                hatch: None,
            });
        }
        Ok(())
    }
}

fn check_lengths(index: usize, kind: &'static str, x_len: usize, y_len: usize) -> Result<(), FigureError> {
    if x_len == y_len {
        Ok(())
    } else {
        Err(FigureError::LengthMismatch {
            index,
            kind,
            x_len,
            y_len,
        })
    }
}

/// Colors of a multi-series item: `"auto"` (or nothing) walks the hues,
/// an explicit list must hold one color per series.
fn palette_colors(
    index: usize,
    kind: &'static str,
    palette: Option<&Palette>,
    series: usize,
    hues: &mut HueWalk,
) -> Result<Vec<RGBColor>, FigureError> {
    match palette {
        Some(Palette::Explicit(colors)) => {
            if colors.len() < series {
                return Err(FigureError::PaletteMismatch {
                    index,
                    kind,
                    count: colors.len(),
                    series,
                });
            }
            Ok(colors.iter().take(series).map(|hsv| hsv.to_rgb()).collect())
        }
        Some(Palette::Named(_)) | None => Ok((0..series).map(|_| hues.next_color().to_rgb()).collect()),
    }
}
