use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::reports::{Graph, PlotTarget};

use super::parsers::{
    parse_format, parse_graph, parse_plot_target, parse_positive_f64, parse_positive_u32,
    parse_positive_usize,
};
use super::types::{PositiveUsize, SortOrder};

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Render figure description files (the built-in example when none is given)
    Render(RenderArgs),
    /// Congestion probability per link sequence (boxplots and histograms)
    SeqCongProb(SequenceArgs),
    /// Congestion probability per link, one box per path class
    ClassPathCongProb(LinkArgs),
    /// Emulator experiment plots for a selector or a batch of them
    Experiments(ExperimentArgs),
    /// Write <name>-inverted.json with every y value replaced by 100 - y
    InvertY(JsonFileArgs),
    /// Write <name>-pretty.json with sorted keys and 4-space indentation
    Prettify(JsonFileArgs),
}

#[derive(Debug, Args, Clone, Default)]
pub struct RenderArgs {
    /// Figure description files (JSON)
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct SequenceArgs {
    /// Link sequence log
    #[arg(long = "in")]
    pub input: PathBuf,

    /// Output directory (defaults to the configured output dir)
    #[arg(long = "out")]
    pub output: Option<PathBuf>,

    /// Order of the sequences along the x axis
    #[arg(long = "sort", value_enum, default_value_t = SortOrder::Natural)]
    pub sort: SortOrder,

    /// Drop sequences whose links are a disjoint union of other sequences
    #[arg(long = "remove-redundant")]
    pub remove_redundant: bool,

    /// Graphs to draw (truth, inferred, delta, errorPath1, ...; comma separated)
    #[arg(long = "graphs", value_delimiter = ',', value_parser = parse_graph)]
    pub graphs: Vec<Graph>,
}

#[derive(Debug, Args, Clone)]
pub struct LinkArgs {
    /// Per-link congestion log
    #[arg(long = "in")]
    pub input: PathBuf,

    /// Output directory (defaults to the configured output dir)
    #[arg(long = "out")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ExperimentArgs {
    /// Plot selector (1, 1b, 2, 3, 4, 5, 5b, 7, 7b, 7b+, 8, 8b, 8b+, 9, 10, 11, 1-7) or batch (all, vary-qos, diff-rtt, ...)
    #[arg(long = "plot", value_parser = parse_plot_target)]
    pub plot: PlotTarget,

    /// Run directory (base directory for batches)
    #[arg(long = "in")]
    pub input: Option<PathBuf>,

    /// Output directory (defaults to plot<selector>)
    #[arg(long = "out")]
    pub output: Option<PathBuf>,

    /// Extra title text
    #[arg(long = "label", default_value = "")]
    pub label: String,
}

#[derive(Debug, Args, Clone)]
pub struct JsonFileArgs {
    /// JSON file
    pub file: PathBuf,
}

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Static charts from tab-separated network congestion experiment logs."
)]
pub struct CongplotArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to config file (TOML or JSON)
    #[arg(long = "config", global = true)]
    pub config: Option<String>,

    /// Directory for report output when --out is not given
    #[arg(long = "output-dir", global = true)]
    pub output_dir: Option<PathBuf>,

    /// Resolution of figures that set no dpi
    #[arg(long = "dpi", global = true, value_parser = parse_positive_u32)]
    pub dpi: Option<u32>,

    /// Font scale of figures that set no fontScale
    #[arg(long = "font-scale", global = true, value_parser = parse_positive_f64)]
    pub font_scale: Option<f64>,

    /// Output extensions of report figures (png, svg; repeatable)
    #[arg(long = "format", global = true, value_delimiter = ',', value_parser = parse_format)]
    pub formats: Vec<String>,

    /// Maximum number of renders running at once
    #[arg(long = "jobs", short = 'j', global = true, value_parser = parse_positive_usize)]
    pub jobs: Option<PositiveUsize>,

    /// Do not write <fileName>.json beside report images
    #[arg(long = "no-json", global = true)]
    pub no_json: bool,

    /// Enable debug logging
    #[arg(long = "verbose", short = 'v', global = true)]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
}
