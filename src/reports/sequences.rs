//! Congestion probability per link sequence: one boxplot figure and one
//! histogram per graph.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::info;

use crate::error::{AppResult, ValidationError};
use crate::figure::{Figure, Grid, HistogramItem, Hsv, Palette, Samples};
use crate::ingest::{LinkSequence, SequenceLog, SequenceOrder, SeriesKind, read_sequence_log};

use super::output::{
    NEUTRAL_COLOR, NON_NEUTRAL_COLOR, ReportSettings, class_boxplot, guide_step, headroom,
    per_extension, prepare_output_dir, push_guides, separator,
};

const FILE_PREFIX: &str = "link-seq-cong-prob-all-";

/// Which values a sequence figure shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Graph {
    Truth,
    Inferred,
    /// Inferred minus true value.
    Delta,
    TruthSinglePath,
    ErrorPath1,
    ErrorPath2,
    ErrorExternal,
    ErrorInternal,
    ErrorInternal1,
    ErrorInternal2,
}

impl Graph {
    pub const DEFAULTS: [Graph; 2] = [Graph::Truth, Graph::Inferred];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Graph::Truth => "truth",
            Graph::Inferred => "inferred",
            Graph::Delta => "delta",
            Graph::TruthSinglePath => "truthSinglePath",
            Graph::ErrorPath1 => "errorPath1",
            Graph::ErrorPath2 => "errorPath2",
            Graph::ErrorExternal => "errorExternal",
            Graph::ErrorInternal => "errorInternal",
            Graph::ErrorInternal1 => "errorInternal1",
            Graph::ErrorInternal2 => "errorInternal2",
        }
    }

    const fn series(self) -> Option<SeriesKind> {
        match self {
            Graph::Truth => Some(SeriesKind::Truth),
            Graph::Inferred => Some(SeriesKind::Inferred),
            Graph::Delta => None,
            Graph::TruthSinglePath => Some(SeriesKind::TruthSinglePath),
            Graph::ErrorPath1 => Some(SeriesKind::ErrorPath1),
            Graph::ErrorPath2 => Some(SeriesKind::ErrorPath2),
            Graph::ErrorExternal => Some(SeriesKind::ErrorExternal),
            Graph::ErrorInternal => Some(SeriesKind::ErrorInternal),
            Graph::ErrorInternal1 => Some(SeriesKind::ErrorInternal1),
            Graph::ErrorInternal2 => Some(SeriesKind::ErrorInternal2),
        }
    }

    /// Error graphs are percentages in `[-100, 100]`.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(
            self,
            Graph::ErrorPath1
                | Graph::ErrorPath2
                | Graph::ErrorExternal
                | Graph::ErrorInternal
                | Graph::ErrorInternal1
                | Graph::ErrorInternal2
        )
    }

    const fn is_signed(self) -> bool {
        self.is_error() || matches!(self, Graph::Delta)
    }

    /// Values of one class of one sequence.
    #[must_use]
    pub fn samples(self, sequence: &LinkSequence, class: &str) -> Vec<f64> {
        match self.series() {
            Some(kind) => sequence.values(kind, class).to_vec(),
            None => sequence.delta(class),
        }
    }

    fn label(self) -> String {
        format!("Probability of congestion\n({}) [\\%]", self.name())
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Graph {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        [
            Graph::Truth,
            Graph::Inferred,
            Graph::Delta,
            Graph::TruthSinglePath,
            Graph::ErrorPath1,
            Graph::ErrorPath2,
            Graph::ErrorExternal,
            Graph::ErrorInternal,
            Graph::ErrorInternal1,
            Graph::ErrorInternal2,
        ]
        .into_iter()
        .find(|graph| graph.name().eq_ignore_ascii_case(value))
        .ok_or_else(|| ValidationError::UnknownGraph {
            value: value.to_owned(),
        })
    }
}

/// Inputs of the sequence report.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub order: SequenceOrder,
    pub remove_redundant: bool,
    pub graphs: Vec<Graph>,
}

/// Tick label of a sequence: its links, non-neutral ones starred.
fn sequence_label(log: &SequenceLog, sequence: &LinkSequence) -> String {
    let links: Vec<String> = sequence
        .links
        .iter()
        .map(|link| {
            if log.non_neutral_links.contains(link) {
                format!("{}*", link)
            } else {
                link.to_string()
            }
        })
        .collect();
    links.join(", ")
}

fn box_color(sequence: &LinkSequence) -> Hsv {
    if sequence.is_neutral() {
        NEUTRAL_COLOR
    } else {
        NON_NEUTRAL_COLOR
    }
}

/// Boxplot of every sequence, one box per class.
#[must_use]
pub fn sequence_boxplot(log: &SequenceLog, graph: Graph, ymax: f64) -> Figure {
    let count = log.sequences.len();
    let mut figure = Figure {
        x_label: "Link sequence".to_owned(),
        y_label: graph.label(),
        font_scale: Some(1.0),
        grid: Some(Grid::None),
        xmin: Some(0.5),
        xmax: Some(0.5 + count as f64),
        ymin: Some(-0.5),
        ymax: Some(ymax),
        minor_x_ticks: Some(0),
        major_x_ticks: Some(count as i64 + 2),
        no_legend: Some(serde_json::Value::from(1)),
        x_tick_rotation: Some(30.0),
        w: Some(2.0 + (count / 2) as f64),
        h: Some(3.0),
        ..Figure::default()
    };

    let mut ticks = vec![0.0];
    let mut labels = vec![String::new()];
    let spread = (f64::min(-10.0, -0.5), f64::max(110.0, ymax));
    for (index, sequence) in log.sequences.iter().enumerate() {
        let center = (index + 1) as f64;
        ticks.push(center);
        labels.push(sequence_label(log, sequence));
        let samples = sequence
            .class_names()
            .iter()
            .map(|class| graph.samples(sequence, class))
            .collect();
        figure.push(separator(center - 0.5, spread, Some(1.0)));
        figure.push(class_boxplot(samples, center, box_color(sequence)));
    }
    figure.x_ticks = Some(ticks);
    figure.x_tick_labels = Some(labels);

    let (start, step) = if graph.is_error() {
        (-100, 25)
    } else if graph.is_signed() {
        (-100, guide_step(ymax))
    } else {
        (0, guide_step(ymax))
    };
    push_guides(&mut figure, start, step, (0.5, 0.5 + count as f64));

    if graph.is_error() {
        figure.ymin = Some(-110.0);
        figure.ymax = Some(110.0);
    } else if graph.is_signed() {
        figure.ymin = Some(-ymax);
    }
    figure
}

/// Bin edges for probabilities up to `ymax`, coarser as it grows.
#[must_use]
pub fn probability_bins(ymax: f64) -> Vec<f64> {
    let (step, factor) = if ymax < 4.0 {
        (0.2, 5.0)
    } else if ymax < 10.0 {
        (0.5, 2.0)
    } else if ymax < 20.0 {
        (1.0, 1.0)
    } else if ymax < 40.0 {
        (2.0, 0.5)
    } else {
        (5.0, 0.2)
    };
    let count = (ymax * factor).ceil().max(0.0) as usize;
    (0..count).map(|index| step * index as f64).collect()
}

/// Histogram of neutral against non-neutral values.
#[must_use]
pub fn sequence_histogram(log: &SequenceLog, graph: Graph, ymax: f64) -> Figure {
    let mut neutral = Vec::new();
    let mut non_neutral = Vec::new();
    for sequence in &log.sequences {
        let target = if sequence.is_neutral() {
            &mut neutral
        } else {
            &mut non_neutral
        };
        for class in sequence.class_names() {
            target.extend(graph.samples(sequence, &class));
        }
    }

    let (bins, n_bins) = if graph.is_signed() {
        (None, Some(20))
    } else {
        (Some(probability_bins(ymax)), None)
    };
    let mut figure = Figure {
        x_label: graph.label(),
        y_label: "Frequency".to_owned(),
        font_scale: Some(1.0),
        grid: Some(Grid::None),
        no_legend: Some(serde_json::Value::from(1)),
        w: Some(14.0),
        h: Some(3.0),
        ..Figure::default()
    };
    figure.push(HistogramItem {
        x: Samples::Multi(vec![neutral, non_neutral]),
        bins,
        n_bins,
        colors: Some(Palette::Explicit(vec![NEUTRAL_COLOR, NON_NEUTRAL_COLOR])),
        ..HistogramItem::default()
    });
    figure
}

/// Every figure of the report, named inside `dir`.
#[must_use]
pub fn sequence_figures(
    log: &SequenceLog,
    graphs: &[Graph],
    dir: &Path,
    extensions: &[String],
) -> Vec<Figure> {
    let ymax = headroom(
        log.all_values(SeriesKind::Inferred)
            .chain(log.all_values(SeriesKind::Truth)),
        2.0,
    );
    let mut figures = Vec::new();
    for graph in graphs {
        let stem = format!("{}{}", FILE_PREFIX, graph.name());
        figures.extend(per_extension(
            &sequence_boxplot(log, *graph, ymax),
            dir,
            &stem,
            extensions,
        ));
    }
    for graph in graphs {
        let stem = format!("{}{}-histogram", FILE_PREFIX, graph.name());
        figures.extend(per_extension(
            &sequence_histogram(log, *graph, ymax),
            dir,
            &stem,
            extensions,
        ));
    }
    figures
}

/// Reads the sequence log and renders the report.
///
/// # Errors
///
/// Returns an error when the log cannot be read, the output directory cannot
/// be prepared, or a render fails.
pub async fn run_sequence_report(
    report: &SequenceReport,
    settings: &ReportSettings,
) -> AppResult<Vec<PathBuf>> {
    let mut log = read_sequence_log(&report.input).await?;
    info!(
        "Read {} link sequences of '{}'",
        log.sequences.len(),
        log.experiment
    );
    if report.remove_redundant {
        let removed = log.remove_redundant();
        info!("Removed {} redundant sequences", removed);
    }
    log.order(report.order);

    prepare_output_dir(&report.output).await?;
    let graphs = if report.graphs.is_empty() {
        Graph::DEFAULTS.to_vec()
    } else {
        report.graphs.clone()
    };
    let figures = sequence_figures(&log, &graphs, &report.output, &settings.extensions(&["png"]));
    settings.render_all(figures).await
}
