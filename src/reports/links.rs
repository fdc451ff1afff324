//! Congestion probability per link, one group of class boxes per link.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::AppResult;
use crate::figure::{Figure, Grid};
use crate::ingest::{LinkLog, read_link_log};

use super::output::{
    NEUTRAL_COLOR, NON_NEUTRAL_COLOR, ReportSettings, class_boxplot, guide_step, headroom,
    per_extension, prepare_output_dir, push_guides, separator,
};

const FILE_STEM: &str = "class-path-cong-probs-links";
const DEFAULT_EXTENSIONS: [&str; 2] = ["svg", "png"];

/// Inputs of the link report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReport {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Boxplot of every link with classes, in natural link order.
#[must_use]
pub fn link_boxplot(log: &LinkLog) -> Figure {
    let links = log.plotted_links();
    let count = links.len();
    let ymax = headroom(log.all_values(), 4.0);
    let ymin = -0.4;
    let mut figure = Figure {
        x_label: "Link".to_owned(),
        y_label: "Probability of congestion\n(truth) [\\%]".to_owned(),
        font_scale: Some(1.0),
        grid: Some(Grid::None),
        xmin: Some(0.5),
        xmax: Some(0.5 + count as f64),
        ymin: Some(ymin),
        ymax: Some(ymax),
        minor_x_ticks: Some(0),
        major_x_ticks: Some(count as i64 + 3),
        no_legend: Some(serde_json::Value::from(1)),
        x_tick_rotation: Some(30.0),
        w: Some(2.0 + (count / 2) as f64),
        h: Some(3.0),
        ..Figure::default()
    };

    let mut ticks = vec![0.0];
    let mut labels = vec![String::new()];
    let spread = (f64::min(-10.0, ymin), f64::max(110.0, ymax));
    for (index, link) in links.iter().enumerate() {
        let center = (index + 1) as f64;
        ticks.push(center);
        let (label, color) = if link.is_neutral() {
            (link.name.clone(), NEUTRAL_COLOR)
        } else {
            (format!("{}*", link.name), NON_NEUTRAL_COLOR)
        };
        labels.push(label);
        figure.push(class_boxplot(link.samples(), center, color));
        figure.push(separator(center - 0.5, spread, None));
    }
    figure.x_ticks = Some(ticks);
    figure.x_tick_labels = Some(labels);
    push_guides(&mut figure, 0, guide_step(ymax), (0.5, 0.5 + count as f64));
    figure
}

#[must_use]
pub fn link_figures(log: &LinkLog, dir: &Path, extensions: &[String]) -> Vec<Figure> {
    per_extension(&link_boxplot(log), dir, FILE_STEM, extensions)
}

/// Reads the link log and renders the report.
///
/// # Errors
///
/// Returns an error when the log cannot be read, the output directory cannot
/// be prepared, or a render fails.
pub async fn run_link_report(report: &LinkReport, settings: &ReportSettings) -> AppResult<Vec<PathBuf>> {
    let log = read_link_log(&report.input).await?;
    info!("Read {} links of '{}'", log.links.len(), log.experiment);
    prepare_output_dir(&report.output).await?;
    let figures = link_figures(&log, &report.output, &settings.extensions(&DEFAULT_EXTENSIONS));
    settings.render_all(figures).await
}
