//! Declarative figure descriptions and the JSON tools around them.
mod color;
mod demo;
mod io;
mod text;
mod types;

#[cfg(test)]
mod tests;

pub use color::{GOLDEN_HUE_STEP, Hsv, HueWalk};
pub use demo::{DEMO_FILE_NAME, demo_figure};
pub use io::{
    ToolOutput, invert_y, load_figure, prettify, sidecar_path, to_pretty_json, write_sidecar,
};
pub use text::{Label, file_safe, plain_text};
pub use types::{
    BarItem, BoxplotItem, ColorChoice, DEFAULT_DPI, DEFAULT_LEGEND_TITLE, DEFAULT_SIZE_INCHES,
    DataEntry, Figure, Grid, HistogramItem, Item, LineItem, Palette, Samples, StackedItem,
    StemItem,
};
