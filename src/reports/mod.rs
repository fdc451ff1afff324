//! Report builders turning parsed logs into figure descriptions and renders.
mod experiments;
mod links;
mod output;
mod sequences;


pub use experiments::{
    ALL_PLOTS, BatchSelector, ChartKind, ExperimentGroup, ExperimentJob, ExperimentReport,
    GroupedExperiments, KeyOrder, PlotSelector, PlotTarget, batch_jobs, experiment_figures,
    experiment_variants, run_experiment_job, run_experiment_report, scan_selector, sweep_jobs,
};
pub use links::{LinkReport, link_boxplot, link_figures, run_link_report};
pub use output::{
    NEUTRAL_COLOR, NON_NEUTRAL_COLOR, ReportSettings, class_boxplot, default_jobs, guide_step,
    headroom, output_name, per_extension, prepare_output_dir, push_guides, separator,
};
pub use sequences::{
    Graph, SequenceReport, probability_bins, run_sequence_report, sequence_boxplot,
    sequence_figures, sequence_histogram,
};
