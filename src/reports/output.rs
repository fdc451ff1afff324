use std::path::{Path, PathBuf};

use tracing::info;

use crate::charts::{RenderOptions, RenderQueue, clean_output_dir};
use crate::error::AppResult;
use crate::figure::{BoxplotItem, Figure, Hsv, LineItem, Samples, file_safe};

/// Box color of neutral sequences and links.
pub const NEUTRAL_COLOR: Hsv = Hsv::new(0.618, 0.75, 0.95);
/// Box color of non-neutral sequences and links.
pub const NON_NEUTRAL_COLOR: Hsv = Hsv::new(0.0, 0.75, 0.95);
const GUIDE_COLOR: Hsv = Hsv::new(0.0, 0.0, 0.7);
const BOX_WIDTH: f64 = 0.25;

/// How report figures are written.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSettings {
    pub render: RenderOptions,
    /// Renders running at once.
    pub jobs: usize,
    /// Write `<fileName>.json` beside every image.
    pub write_json: bool,
    /// Output extensions replacing a report's own.
    pub formats: Option<Vec<String>>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            jobs: default_jobs(),
            write_json: true,
            formats: None,
        }
    }
}

#[must_use]
pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
}

impl ReportSettings {
    #[must_use]
    pub fn extensions(&self, defaults: &[&str]) -> Vec<String> {
        match &self.formats {
            Some(formats) if !formats.is_empty() => formats.clone(),
            Some(_) | None => defaults.iter().map(|ext| (*ext).to_owned()).collect(),
        }
    }

    /// Renders `figures`, waiting for all of them.
    ///
    /// # Errors
    ///
    /// Returns the first render failure.
    pub async fn render_all(&self, figures: Vec<Figure>) -> AppResult<Vec<PathBuf>> {
        let mut queue = RenderQueue::new(self.render, self.jobs, self.write_json);
        for figure in figures {
            info!("Rendering {}", figure.file_name);
            queue.submit(figure);
        }
        queue.finish().await
    }
}

/// Output file name inside `dir`, with `\` and `%` replaced.
#[must_use]
pub fn output_name(dir: &Path, stem: &str, ext: &str) -> String {
    file_safe(&dir.join(format!("{}.{}", stem, ext)).to_string_lossy())
}

/// One copy of `figure` per extension.
#[must_use]
pub fn per_extension(figure: &Figure, dir: &Path, stem: &str, extensions: &[String]) -> Vec<Figure> {
    extensions
        .iter()
        .map(|ext| Figure {
            file_name: output_name(dir, stem, ext),
            ..figure.clone()
        })
        .collect()
}

/// Clears stale images from `dir`, creating it when missing.
///
/// # Errors
///
/// Returns an error when the directory cannot be prepared.
pub async fn prepare_output_dir(dir: &Path) -> AppResult<()> {
    info!("Cleaning up target directory ({})...", dir.display());
    let removed = clean_output_dir(dir).await?;
    if removed > 0 {
        info!("Removed {} stale files", removed);
    }
    Ok(())
}

/// Upper y limit: the largest value, at least `floor`, truncated to two
/// decimals plus half a percent.
#[must_use]
pub fn headroom<I>(values: I, floor: f64) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let max = values.into_iter().fold(floor, f64::max);
    (max * 100.0).trunc() / 100.0 + 0.5
}

/// Spacing of the horizontal guides for an axis reaching `ymax`.
#[must_use]
pub fn guide_step(ymax: f64) -> usize {
    if ymax < 8.0 {
        1
    } else if ymax < 16.0 {
        2
    } else if ymax < 40.0 {
        5
    } else {
        10
    }
}

/// Dotted horizontal guides from `start` to 100, drawn below everything
/// else.
pub fn push_guides(figure: &mut Figure, start: i32, step: usize, x: (f64, f64)) {
    for y in (start..=100).step_by(step.max(1)) {
        figure.push_front(LineItem {
            x: vec![x.0 - 10.0, x.1 + 10.0],
            y: vec![f64::from(y), f64::from(y)],
            pattern: Some(":".to_owned()),
            label: Some(String::new()),
            color: Some(GUIDE_COLOR),
            line_width: Some(1.0),
        });
    }
}

/// Dotted vertical line between two groups of boxes.
#[must_use]
pub fn separator(x: f64, y: (f64, f64), line_width: Option<f64>) -> LineItem {
    LineItem {
        x: vec![x, x],
        y: vec![y.0, y.1],
        pattern: Some(":".to_owned()),
        label: Some(String::new()),
        color: Some(GUIDE_COLOR),
        line_width,
    }
}

/// One narrow box per class, side by side around `center`.
#[must_use]
pub fn class_boxplot(samples: Vec<Vec<f64>>, center: f64, color: Hsv) -> BoxplotItem {
    let first = center - BOX_WIDTH / 2.0;
    let positions = (0..samples.len())
        .map(|index| first + index as f64 * BOX_WIDTH)
        .collect();
    BoxplotItem {
        x: Samples::Multi(samples),
        positions: Some(positions),
        w: Some(BOX_WIDTH),
        box_color: Some(color),
        median_color: Some(color),
        whisker_color: Some(color),
        cap_color: Some(color),
        outlier_color: Some(color),
        outlier_marker: Some("+".to_owned()),
        line_width: Some(1.0),
    }
}
