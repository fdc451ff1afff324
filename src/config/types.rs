use serde::Deserialize;

/// Values read from `congplot.toml` or `congplot.json`. Every key is
/// optional; CLI flags win over them.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Directory for report output when `--out` is not given.
    pub output_dir: Option<String>,
    pub dpi: Option<u32>,
    pub font_scale: Option<f64>,
    /// Output extensions of report figures.
    pub formats: Option<Vec<String>>,
    /// Maximum number of renders running at once.
    pub jobs: Option<usize>,
    /// Write the figure description beside every report image.
    pub write_json: Option<bool>,
    pub no_color: Option<bool>,
    pub verbose: Option<bool>,
}
