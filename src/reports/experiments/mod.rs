//! Emulator experiment plots: congestion probability per path, latency and
//! throughput per grouping attribute, or the computed non-neutrality.
mod batch;
mod figures;
mod groups;
mod selectors;

pub use batch::{
    ALL_PLOTS, ExperimentJob, ExperimentReport, batch_jobs, run_experiment_job,
    run_experiment_report, scan_selector, sweep_jobs,
};
pub use figures::{experiment_figures, experiment_variants};
pub use groups::{ExperimentGroup, GroupedExperiments};
pub use selectors::{BatchSelector, ChartKind, KeyOrder, PlotSelector, PlotTarget};
