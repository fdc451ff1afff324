use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::AppResult;
use crate::ingest::{load_experiments, natural_sort};
use crate::reports::output::{ReportSettings, prepare_output_dir};

use super::figures::{DEFAULT_EXTENSIONS, experiment_figures};
use super::groups::GroupedExperiments;
use super::selectors::{BatchSelector, PlotSelector, PlotTarget};

const QOS: [&str; 2] = ["policing", "shaping"];
const QOS_WITH_NEUTRAL: [&str; 3] = ["policing", "shaping", "neutral"];
const RTTS: [&str; 4] = ["50", "80", "120", "200"];
const ASYMMETRIC_RTTS: [&str; 2] = ["48-120", "120-48"];
const BUFFERS: [&str; 3] = ["large", "small", "medium"];
const SCALINGS: [&str; 2] = ["notscaled", "scaleddown"];
const TCP_MIXES: [&str; 2] = ["cubic-reno", "reno-cubic"];

/// Selectors run by `all`.
pub const ALL_PLOTS: [PlotSelector; 13] = [
    PlotSelector::Plot1,
    PlotSelector::Plot1b,
    PlotSelector::Plot2,
    PlotSelector::Plot3,
    PlotSelector::Plot4,
    PlotSelector::Plot5,
    PlotSelector::Plot5b,
    PlotSelector::Plot7,
    PlotSelector::Plot7b,
    PlotSelector::Plot7bPlus,
    PlotSelector::Plot8,
    PlotSelector::Plot8b,
    PlotSelector::Plot8bPlus,
];

/// Inputs of the experiment report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentReport {
    pub target: PlotTarget,
    /// Run directory of a single plot; base directory of a batch.
    pub input: Option<PathBuf>,
    /// Output directory of a single plot; ignored by batches.
    pub output: Option<PathBuf>,
    pub label: String,
}

/// One plot over one run directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentJob {
    pub selector: PlotSelector,
    pub input: PathBuf,
    pub output: PathBuf,
    pub label: String,
}

impl ExperimentJob {
    fn new(selector: PlotSelector, input: String, output: String, label: String) -> Self {
        Self {
            selector,
            input: PathBuf::from(input),
            output: PathBuf::from(output),
            label,
        }
    }

    fn under(self, base: &Path) -> Self {
        Self {
            input: base.join(&self.input),
            output: base.join(&self.output),
            ..self
        }
    }
}

fn capitalized(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn scaling_label(scaling: &str) -> &str {
    match scaling {
        "notscaled" => "not scaled",
        "scaleddown" => "scaled down",
        other => other,
    }
}

fn real_vs_shaping() -> Vec<ExperimentJob> {
    let runs = [
        (PlotSelector::Plot1, "plot1"),
        (PlotSelector::Plot7, "plot7"),
        (PlotSelector::Plot2, "plot2"),
        (PlotSelector::Plot2, "plot2-shaping"),
    ];
    let mut jobs = Vec::new();
    for (selector, prefix) in runs {
        for source in ["real", "emulator"] {
            jobs.push(ExperimentJob::new(
                selector,
                format!("{}-{}-data", prefix, source),
                format!("{}-{}", prefix, source),
                format!("({})", source),
            ));
        }
    }
    jobs
}

fn rtt_and_buffers() -> Vec<ExperimentJob> {
    let mut jobs = Vec::new();
    for qos in QOS {
        for rtt in RTTS {
            for buffers in BUFFERS {
                for scaling in SCALINGS {
                    jobs.push(ExperimentJob::new(
                        PlotSelector::Plot2,
                        format!("plot2-{}-data-rtt-{}-buffers-{}-{}", qos, rtt, buffers, scaling),
                        format!("plot2-{}-rtt-{}-buffers-{}-{}", qos, rtt, buffers, scaling),
                        format!(
                            "{}, RTT {}ms, {} buffers, {}",
                            capitalized(qos),
                            rtt,
                            buffers,
                            scaling_label(scaling)
                        ),
                    ));
                }
            }
        }
    }
    jobs
}

/// Asymmetric RTT sweeps; `tcps` lists the congestion control variants.
fn diff_rtt(tcps: &[&str], rtt_label: fn(&str) -> String) -> Vec<ExperimentJob> {
    let mut jobs = Vec::new();
    for qos in QOS_WITH_NEUTRAL {
        for rtt in ASYMMETRIC_RTTS {
            for buffers in BUFFERS {
                for scaling in SCALINGS {
                    for tcp in tcps {
                        jobs.push(ExperimentJob::new(
                            PlotSelector::Plot2,
                            format!(
                                "plot2-{}-data-rtt-{}-buffers-{}-{}-{}",
                                qos, rtt, buffers, scaling, tcp
                            ),
                            format!("plot2-{}-rtt-{}-buffers-{}-{}-{}", qos, rtt, buffers, scaling, tcp),
                            format!(
                                "{}, RTT {}, {} buffers, {}, TCP {}",
                                capitalized(qos),
                                rtt_label(rtt),
                                buffers,
                                scaling_label(scaling),
                                tcp
                            ),
                        ));
                    }
                }
            }
        }
    }
    jobs
}

fn diff_tcp() -> Vec<ExperimentJob> {
    let mut jobs = Vec::new();
    for tag in TCP_MIXES {
        for qos in QOS_WITH_NEUTRAL {
            for rtt in RTTS {
                for buffers in BUFFERS {
                    for scaling in SCALINGS {
                        jobs.push(ExperimentJob::new(
                            PlotSelector::Plot2,
                            format!(
                                "plot2-{}-data-rtt-{}-buffers-{}-{}-{}",
                                qos, rtt, buffers, scaling, tag
                            ),
                            format!("plot2-{}-rtt-{}-buffers-{}-{}-{}", qos, rtt, buffers, scaling, tag),
                            format!(
                                "{}, RTT {}ms, {} buffers, {}, {}",
                                capitalized(qos),
                                rtt,
                                buffers,
                                scaling_label(scaling),
                                tag
                            ),
                        ));
                    }
                }
            }
        }
    }
    jobs
}

/// Jobs of a fixed parameter sweep, relative to the base directory. Empty
/// for `all` and the directory scans.
#[must_use]
pub fn sweep_jobs(batch: BatchSelector) -> Vec<ExperimentJob> {
    match batch {
        BatchSelector::RealVsShaping => real_vs_shaping(),
        BatchSelector::VaryRttAndBuffers => rtt_and_buffers(),
        BatchSelector::DiffRtt => diff_rtt(&["cubic"], |rtt| {
            format!("{}(2) ms", rtt.replace('-', "(1)/"))
        }),
        BatchSelector::DiffRttTcp => {
            diff_rtt(&["cubic", "cubic-reno", "reno-cubic"], |rtt| format!("{}ms", rtt))
        }
        BatchSelector::DiffTcp => diff_tcp(),
        BatchSelector::All
        | BatchSelector::VaryQos
        | BatchSelector::VaryTransferSize
        | BatchSelector::VaryRtt
        | BatchSelector::VaryTcp
        | BatchSelector::VaryCongestion => Vec::new(),
    }
}

/// Selector applied to every directory a scan finds.
#[must_use]
pub const fn scan_selector(batch: BatchSelector) -> Option<PlotSelector> {
    match batch {
        BatchSelector::VaryQos => Some(PlotSelector::PolicingOrShaping),
        BatchSelector::VaryTransferSize => Some(PlotSelector::Plot2),
        BatchSelector::VaryRtt => Some(PlotSelector::Plot9),
        BatchSelector::VaryTcp => Some(PlotSelector::Plot10),
        BatchSelector::VaryCongestion => Some(PlotSelector::Plot11),
        BatchSelector::All
        | BatchSelector::RealVsShaping
        | BatchSelector::VaryRttAndBuffers
        | BatchSelector::DiffRtt
        | BatchSelector::DiffRttTcp
        | BatchSelector::DiffTcp => None,
    }
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|metadata| metadata.is_dir())
}

/// One job per directory of `base` whose name does not contain `image`.
async fn scan_jobs(base: &Path, selector: PlotSelector) -> AppResult<Vec<ExperimentJob>> {
    let mut names = Vec::new();
    let mut entries = tokio::fs::read_dir(base).await?;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.contains("image") {
            names.push(name);
        }
    }
    natural_sort(&mut names);
    Ok(names
        .into_iter()
        .map(|name| {
            let output = format!("image-{}", name);
            ExperimentJob::new(selector, name.clone(), output, name).under(base)
        })
        .collect())
}

/// Expands `batch` into the jobs to run below `base`.
///
/// # Errors
///
/// Returns an error when a scanned directory cannot be listed.
pub async fn batch_jobs(batch: BatchSelector, base: &Path) -> AppResult<Vec<ExperimentJob>> {
    if batch == BatchSelector::All {
        return Ok(ALL_PLOTS
            .into_iter()
            .map(|selector| ExperimentJob {
                selector,
                input: base.join(selector.default_input()),
                output: base.join(selector.default_output()),
                label: String::new(),
            })
            .collect());
    }
    if let Some(selector) = scan_selector(batch) {
        return scan_jobs(base, selector).await;
    }
    let mut jobs = Vec::new();
    for job in sweep_jobs(batch) {
        let job = job.under(base);
        if is_dir(&job.input).await {
            jobs.push(job);
        }
    }
    Ok(jobs)
}

/// Loads one run directory and renders its charts.
///
/// # Errors
///
/// Returns an error when the experiments cannot be loaded or grouped, the
/// output directory cannot be prepared, or a render fails.
pub async fn run_experiment_job(job: &ExperimentJob, settings: &ReportSettings) -> AppResult<Vec<PathBuf>> {
    info!("Input dir: {}", job.input.display());
    info!("Output dir: {}", job.output.display());
    let experiments = load_experiments(&job.input).await?;
    let grouped = GroupedExperiments::new(&experiments, job.selector)?;
    info!("Generating plot {}...", grouped.selector);
    prepare_output_dir(&job.output).await?;
    let figures = experiment_figures(
        &grouped,
        &job.label,
        &job.output,
        &settings.extensions(&DEFAULT_EXTENSIONS),
    );
    settings.render_all(figures).await
}

/// Runs a single plot or every job of a batch.
///
/// `all` logs failing plots and goes on; other batches stop at the first
/// failure.
///
/// # Errors
///
/// Returns the failure of a single plot or of a non-`all` batch job.
pub async fn run_experiment_report(
    report: &ExperimentReport,
    settings: &ReportSettings,
) -> AppResult<Vec<PathBuf>> {
    match report.target {
        PlotTarget::Single(selector) => {
            let job = ExperimentJob {
                selector,
                input: report
                    .input
                    .clone()
                    .unwrap_or_else(|| selector.default_input()),
                output: report
                    .output
                    .clone()
                    .unwrap_or_else(|| selector.default_output()),
                label: report.label.clone(),
            };
            run_experiment_job(&job, settings).await
        }
        PlotTarget::Batch(batch) => {
            let base = report.input.clone().unwrap_or_else(|| PathBuf::from("."));
            let jobs = batch_jobs(batch, &base).await?;
            info!("Running {} plots for '{}'", jobs.len(), batch.name());
            let mut written = Vec::new();
            for job in &jobs {
                match run_experiment_job(job, settings).await {
                    Ok(paths) => written.extend(paths),
                    Err(err) if batch == BatchSelector::All => {
                        warn!("Plot {} failed: {}", job.selector, err);
                    }
                    Err(err) => return Err(err),
                }
            }
            Ok(written)
        }
    }
}
