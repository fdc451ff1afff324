//! Figure rendering: scene layout, ticks, legend and the plotters backends.
mod axis;
mod batch;
mod binning;
mod boxplot;
mod cleanup;
mod draw;
mod format;
mod layout;
mod legend;
mod render;
mod scene;
mod style;
mod ticks;

#[cfg(test)]
mod tests;

pub use batch::RenderQueue;
pub use binning::{
    Binning, bin_centers, edges_from_centers, histogram_counts, nice_bins, resolve_bins,
    uniform_edges,
};
pub use boxplot::{BoxStats, box_stats, percentile, prepare_samples};
pub use cleanup::{STALE_EXTENSIONS, clean_output_dir};
pub use format::format_printf;
pub use render::{OutputTarget, RenderOptions, SUPPORTED_EXTENSIONS, render_figure};
pub use scene::{Mark, Scene};
pub use ticks::{AxisTicks, TickRequest, place_ticks};
