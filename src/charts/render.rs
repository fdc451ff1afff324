use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::{debug, info};

use crate::error::{AppError, AppResult, FigureError};
use crate::figure::{DEFAULT_DPI, Figure};

use super::draw::{ChartPlan, paint_figure};
use super::layout::FontSizes;
use super::scene::Scene;
use super::ticks::{AxisTicks, TickRequest, place_ticks};

/// Defaults applied to figures that leave them unset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub default_dpi: u32,
    pub default_font_scale: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            default_dpi: DEFAULT_DPI,
            default_font_scale: 1.0,
        }
    }
}

/// Extensions `OutputTarget::for_path` accepts.
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["png", "svg"];

/// Backend chosen from the output file extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Png(PathBuf),
    Svg(PathBuf),
}

impl OutputTarget {
    /// Maps `.png` to the bitmap backend and `.svg` to the SVG backend.
    ///
    /// # Errors
    ///
    /// Returns an error for any other extension, `.pdf` and `.eps` included.
    pub fn for_path(path: &Path) -> Result<Self, FigureError> {
        let ext = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => Ok(Self::Png(path.to_path_buf())),
            "svg" => Ok(Self::Svg(path.to_path_buf())),
            _ => Err(FigureError::UnsupportedFormat {
                path: path.to_path_buf(),
                ext,
            }),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Png(path) | Self::Svg(path) => path,
        }
    }
}

fn axis_ticks(
    explicit: Option<&Vec<f64>>,
    labels: Option<&Vec<String>>,
    format: Option<&String>,
    major_count: Option<i64>,
    minor_count: Option<i64>,
    histogram: Option<&[f64]>,
    (lo, hi): (f64, f64),
) -> Result<AxisTicks, FigureError> {
    let request = TickRequest {
        explicit: explicit.map(Vec::as_slice),
        labels: labels.map(Vec::as_slice),
        format: format.map(String::as_str),
        major_count,
        minor_count,
        histogram,
    };
    place_ticks(&request, lo, hi)
}

/// Renders one figure description to the file named by `fileName` and
/// returns that path.
///
/// # Errors
///
/// Returns an error when the figure has no file name, an unsupported
/// extension, inconsistent series, an invalid tick format, or when the
/// backend fails to draw or encode the image.
pub fn render_figure(figure: &Figure, options: &RenderOptions) -> AppResult<PathBuf> {
    if figure.file_name.is_empty() {
        return Err(FigureError::MissingFileName.into());
    }
    let target = OutputTarget::for_path(Path::new(&figure.file_name))?;
    info!("Rendering {}", target.path().display());

    let scene = Scene::build(figure)?;
    let x_range = scene.x_range(figure);
    let y_range = scene.y_range(figure);
    let histogram_ticks = if scene.histogram_axis() {
        scene.histogram_ticks.as_deref()
    } else {
        None
    };
    let x_ticks = axis_ticks(
        figure.x_ticks.as_ref(),
        figure.x_tick_labels.as_ref(),
        figure.x_format_str.as_ref(),
        figure.major_x_ticks,
        figure.minor_x_ticks,
        histogram_ticks,
        x_range,
    )?;
    let y_ticks = axis_ticks(
        figure.y_ticks.as_ref(),
        figure.y_tick_labels.as_ref(),
        figure.y_format_str.as_ref(),
        figure.major_y_ticks,
        figure.minor_y_ticks,
        None,
        y_range,
    )?;
    debug!(
        "x range {:?} with {} ticks, y range {:?} with {} ticks",
        x_range,
        x_ticks.major.len(),
        y_range,
        y_ticks.major.len()
    );

    let dpi = figure.dpi.unwrap_or(options.default_dpi).max(1);
    let size = figure.pixel_size(options.default_dpi);
    let fonts = FontSizes::new(
        figure.font_scale.unwrap_or(options.default_font_scale),
        dpi,
    );
    let plan = ChartPlan {
        figure,
        scene: &scene,
        x_ticks,
        y_ticks,
        x_range,
        y_range,
        size,
        dpi,
        fonts,
    };

    match &target {
        OutputTarget::Png(path) => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            paint_figure(&root, &plan)?;
            root.present()?;
        }
        OutputTarget::Svg(path) => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            paint_figure(&root, &plan).map_err(|source| AppError::PlottersSvg { source })?;
            root.present().map_err(|source| AppError::PlottersSvg { source })?;
        }
    }
    Ok(target.path().to_path_buf())
}
