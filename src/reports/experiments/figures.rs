//! Charts of one grouped experiment set.

use std::path::Path;

use crate::figure::{BarItem, Figure, Grid, Hsv, LineItem};
use crate::ingest::{CONGESTION_THRESHOLD, Experiment};
use crate::reports::output::output_name;

use super::groups::{ExperimentGroup, GroupedExperiments};
use super::selectors::ChartKind;

const CLASS1_COLOR: Hsv = Hsv::new(0.667, 0.0, 0.4);
const LIGHT_BAR: Hsv = Hsv::gray(0.8);
const DARK_BAR: Hsv = Hsv::gray(0.4);
const LINE_COLOR: Hsv = Hsv::gray(0.0);
const NON_NEUTRALITY_COLOR: Hsv = Hsv::new(0.667, 1.0, 0.8);
const LINK_CAPACITY_MBPS: f64 = 100.0;

/// Default output extensions; a low resolution `-300.png` is always added.
pub const DEFAULT_EXTENSIONS: [&str; 2] = ["svg", "png"];

fn positions(count: usize) -> Vec<f64> {
    (1..=count).map(|index| index as f64).collect()
}

/// Value at `index` of the sorted per-path probabilities, 0 when missing.
fn ranked_path(values: &[f64], index: usize) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.get(index).copied().unwrap_or(0.0)
}

fn group_means<F>(groups: &[ExperimentGroup<'_>], value: F) -> Vec<f64>
where
    F: Fn(&Experiment) -> Option<f64> + Copy,
{
    groups.iter().map(|group| group.mean(value)).collect()
}

impl GroupedExperiments<'_> {
    fn base_figure(&self, y_label: &str, title: Option<String>) -> Figure {
        let count = self.groups.len();
        let mut labels = vec![String::new()];
        labels.extend(self.groups.iter().map(|group| group.value.clone()));
        labels.push(String::new());
        Figure {
            title,
            x_label: self.axis_title.to_owned(),
            y_label: y_label.to_owned(),
            font_scale: Some(1.0),
            grid: Some(Grid::None),
            xmin: Some(0.0),
            xmax: Some(count as f64 + 1.0),
            ymin: Some(0.0),
            minor_x_ticks: Some(0),
            major_x_ticks: Some(count as i64 + 2),
            x_tick_labels: Some(labels),
            ..Figure::default()
        }
    }

    fn x_span(&self) -> Vec<f64> {
        vec![0.0, self.groups.len() as f64 + 1.0]
    }

    fn file_stem(&self, metric: &str, suffix: &str) -> String {
        format!(
            "{}. stats {} - {}{}",
            self.selector.name(),
            metric,
            self.key.name(),
            suffix
        )
    }

    /// Hatched bars of every path's congestion probability, class 1 first.
    #[must_use]
    pub fn probability_chart(&self, title: Option<String>) -> Figure {
        let mut figure = self.base_figure("Probability of congestion (\\%)", title);
        figure.ymax = Some(100.0);
        let x = positions(self.groups.len());
        let (class1, class2) = self.path_counts();
        let classes = [
            (class1, "Path class 1", CLASS1_COLOR, true),
            (class2, "Path class 2", LIGHT_BAR, false),
        ];
        for (paths, label, color, first_class) in classes {
            for index in 0..paths {
                let y = self
                    .groups
                    .iter()
                    .map(|group| {
                        group.mean(|experiment| {
                            let values = if first_class {
                                &experiment.class1_per_path
                            } else {
                                &experiment.class2_per_path
                            };
                            Some(ranked_path(values, index))
                        })
                    })
                    .collect();
                figure.push(BarItem {
                    x: x.clone(),
                    y,
                    color: Some(color),
                    hatch: Some(if index == 0 { "/" } else { "\\" }.to_owned()),
                    label: Some(label.to_owned()),
                });
            }
        }
        figure
    }

    /// Peak and average emulator latency with the one-frame queuing delay.
    #[must_use]
    pub fn latency_chart(&self, title: Option<String>) -> Figure {
        let mut figure = self.base_figure("Processing delay (us)", title);
        let x = positions(self.groups.len());
        figure.push(BarItem {
            x: x.clone(),
            y: group_means(&self.groups, |experiment| {
                experiment.latency.map(|latency| latency.peak_us)
            }),
            color: Some(LIGHT_BAR),
            hatch: Some(String::new()),
            label: Some("Peak".to_owned()),
        });
        figure.push(BarItem {
            x,
            y: group_means(&self.groups, |experiment| {
                experiment.latency.map(|latency| latency.average_us)
            }),
            color: Some(DARK_BAR),
            hatch: Some(String::new()),
            label: Some("Average".to_owned()),
        });
        if let Some(delay) = self
            .experiments()
            .find_map(|experiment| experiment.queuing_delay_us)
        {
            figure.push(LineItem {
                x: self.x_span(),
                y: vec![delay, delay],
                pattern: Some("--".to_owned()),
                label: Some("Queuing delay of 1 frame".to_owned()),
                color: Some(LINE_COLOR),
                line_width: None,
            });
        }
        figure
    }

    /// Emulator throughput in and out against the link capacity.
    #[must_use]
    pub fn throughput_chart(&self, title: Option<String>) -> Figure {
        let mut figure = self.base_figure("Throughput (Mbps)", title);
        let x = positions(self.groups.len());
        figure.push(BarItem {
            x: x.clone(),
            y: group_means(&self.groups, |experiment| experiment.throughput_in),
            color: Some(LIGHT_BAR),
            hatch: Some(String::new()),
            label: Some("In".to_owned()),
        });
        figure.push(BarItem {
            x,
            y: group_means(&self.groups, |experiment| experiment.throughput_out),
            color: Some(DARK_BAR),
            hatch: Some(String::new()),
            label: Some("Out".to_owned()),
        });
        figure.push(LineItem {
            x: self.x_span(),
            y: vec![LINK_CAPACITY_MBPS, LINK_CAPACITY_MBPS],
            pattern: Some("--".to_owned()),
            label: Some(String::new()),
            color: Some(LINE_COLOR),
            line_width: None,
        });
        figure
    }

    #[must_use]
    pub fn non_neutrality_chart(&self, title: Option<String>) -> Figure {
        let mut figure = self.base_figure("Computed non-neutrality (0-100)", title);
        figure.ymax = Some(100.0);
        figure.no_legend = Some(serde_json::Value::from(1));
        figure.push(LineItem {
            x: positions(self.groups.len()),
            y: group_means(&self.groups, Experiment::non_neutrality),
            pattern: Some("-+".to_owned()),
            label: None,
            color: Some(NON_NEUTRALITY_COLOR),
            line_width: None,
        });
        figure
    }

    /// Every chart of the plot with its file stem.
    #[must_use]
    pub fn charts(&self, label: &str) -> Vec<(String, Figure)> {
        match self.selector.chart_kind() {
            ChartKind::Curves => {
                let title = format!("{} {}\\%", label, CONGESTION_THRESHOLD).trim().to_owned();
                vec![
                    (
                        self.file_stem("prob-cong-path", ""),
                        self.probability_chart(Some(title.clone())),
                    ),
                    (
                        self.file_stem("latency", "-latency"),
                        self.latency_chart(Some(title.clone())),
                    ),
                    (
                        self.file_stem("throughput", "-throughput"),
                        self.throughput_chart(Some(title)),
                    ),
                ]
            }
            ChartKind::NonNeutrality => {
                let title = Some(label.trim().to_owned()).filter(|title| !title.is_empty());
                vec![(
                    self.file_stem("non-neutrality", ""),
                    self.non_neutrality_chart(title),
                )]
            }
        }
    }
}

/// Copies of `figure` for every extension, PNGs at 8x6 inches and 100 dpi,
/// plus a `-300.png` copy at 50 dpi.
#[must_use]
pub fn experiment_variants(figure: &Figure, dir: &Path, stem: &str, extensions: &[String]) -> Vec<Figure> {
    let png = |file_name: String, dpi: u32| Figure {
        file_name,
        w: Some(8.0),
        h: Some(6.0),
        dpi: Some(dpi),
        ..figure.clone()
    };
    let mut variants: Vec<Figure> = extensions
        .iter()
        .map(|ext| {
            let file_name = output_name(dir, stem, ext);
            if ext.eq_ignore_ascii_case("png") {
                png(file_name, 100)
            } else {
                Figure {
                    file_name,
                    ..figure.clone()
                }
            }
        })
        .collect();
    variants.push(png(output_name(dir, &format!("{}-300", stem), "png"), 50));
    variants
}

/// All figures of a grouped experiment set, named inside `dir`.
#[must_use]
pub fn experiment_figures(
    grouped: &GroupedExperiments<'_>,
    label: &str,
    dir: &Path,
    extensions: &[String],
) -> Vec<Figure> {
    grouped
        .charts(label)
        .iter()
        .flat_map(|(stem, figure)| experiment_variants(figure, dir, stem, extensions))
        .collect()
}
