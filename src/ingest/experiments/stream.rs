use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::error::IngestError;

use super::collect::{RunLogs, collect_run_logs};
use super::measurements::{Latency, parse_latency_line, parse_throughput_line};
use super::tags::{TagAttributes, TagPatterns};

/// Congestion threshold whose per-path probabilities are plotted, as it
/// appears in the first column of the probability records.
pub const CONGESTION_THRESHOLD: &str = "0.001";

/// One experiment run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Experiment {
    pub tag: String,
    pub attributes: TagAttributes,
    pub latency: Option<Latency>,
    pub throughput_in: Option<f64>,
    pub throughput_out: Option<f64>,
    /// Class of every path, `0` or `1`.
    pub path_classes: Vec<i64>,
    /// Congestion probability of each path of class 1, in percent.
    pub class1_per_path: Vec<f64>,
    pub class2_per_path: Vec<f64>,
    /// Time to queue one frame at the bottleneck, in microseconds.
    pub queuing_delay_us: Option<f64>,
}

impl Experiment {
    /// Spread of the per-path congestion probabilities over both classes.
    #[must_use]
    pub fn non_neutrality(&self) -> Option<f64> {
        let values = self.class1_per_path.iter().chain(&self.class2_per_path);
        let (min, max) = values.fold(None, |range, value| match range {
            None => Some((*value, *value)),
            Some((min, max)) => Some((f64::min(min, *value), f64::max(max, *value))),
        })?;
        Some(max - min)
    }
}

struct Measurements {
    latencies: VecDeque<Latency>,
    throughput_in: VecDeque<f64>,
    throughput_out: VecDeque<f64>,
}

impl Measurements {
    fn parse(logs: &RunLogs) -> Result<Self, IngestError> {
        Ok(Self {
            latencies: logs
                .latency_lines
                .iter()
                .map(|line| parse_latency_line(line))
                .collect::<Result<_, _>>()?,
            throughput_in: logs
                .throughput_in_lines
                .iter()
                .map(|line| parse_throughput_line(line))
                .collect::<Result<_, _>>()?,
            throughput_out: logs
                .throughput_out_lines
                .iter()
                .map(|line| parse_throughput_line(line))
                .collect::<Result<_, _>>()?,
        })
    }
}

/// Builds experiments from collected run logs.
///
/// Every `Experiment` record takes the next latency and throughput values, in
/// run order. `Class` records set the path classes of the current experiment
/// and threshold records assign its per-path probabilities by class.
///
/// # Errors
///
/// Returns an error for malformed measurements, classes or probabilities,
/// and for `Class` records before the first experiment.
pub fn parse_experiments(logs: &RunLogs) -> Result<Vec<Experiment>, IngestError> {
    let patterns = TagPatterns::new()?;
    let mut measurements = Measurements::parse(logs)?;
    let mut experiments: Vec<Experiment> = Vec::new();
    let path = logs.source.as_path();

    for (index, line) in logs.data.lines().enumerate() {
        let line_no = index + 1;
        let tokens: Vec<&str> = line.split('\t').map(str::trim).collect();
        let Some((&first, fields)) = tokens.split_first() else {
            continue;
        };
        if first.is_empty() && fields.is_empty() {
            continue;
        }

        if first == "Experiment" {
            let tag = fields.first().copied().unwrap_or_default();
            debug!("Found experiment {}", tag);
            let attributes = patterns.attributes(tag);
            let experiment = Experiment {
                tag: tag.to_owned(),
                latency: measurements.latencies.pop_front(),
                throughput_in: measurements.throughput_in.pop_front(),
                throughput_out: measurements.throughput_out.pop_front(),
                queuing_delay_us: attributes.queuing_delay_us(),
                attributes,
                ..Experiment::default()
            };
            if experiment.latency.is_none()
                || experiment.throughput_in.is_none()
                || experiment.throughput_out.is_none()
            {
                warn!("Experiment '{}' is missing emulator measurements", tag);
            }
            experiments.push(experiment);
            continue;
        }

        if first == "Class" {
            let classes = fields
                .iter()
                .filter(|field| !field.is_empty())
                .map(|field| {
                    field.parse::<i64>().map_err(|err| IngestError::InvalidClass {
                        path: path.to_path_buf(),
                        line: line_no,
                        value: (*field).to_owned(),
                        source: err,
                    })
                })
                .collect::<Result<Vec<i64>, IngestError>>()?;
            let Some(experiment) = experiments.last_mut() else {
                return Err(IngestError::OutsideSection {
                    path: path.to_path_buf(),
                    line: line_no,
                    prefix: first.to_owned(),
                    section: "Experiment",
                });
            };
            experiment.path_classes = classes;
            continue;
        }

        if first == CONGESTION_THRESHOLD
            && let Some(experiment) = experiments.last_mut()
        {
            for (path_index, raw) in fields.iter().enumerate() {
                if raw.is_empty() {
                    continue;
                }
                let value = raw.parse::<f64>().map_err(|err| IngestError::InvalidNumber {
                    path: path.to_path_buf(),
                    line: line_no,
                    value: (*raw).to_owned(),
                    source: err,
                })?;
                match experiment.path_classes.get(path_index).copied() {
                    Some(0) => experiment.class1_per_path.push(value),
                    Some(1) => experiment.class2_per_path.push(value),
                    Some(other) => {
                        warn!("Path {} of '{}' has unknown class {}", path_index, experiment.tag, other);
                    }
                    None => {
                        warn!("Path {} of '{}' has no class", path_index, experiment.tag);
                    }
                }
            }
        }
    }
    Ok(experiments)
}

/// Collects the runs below `dir` and parses their experiments.
///
/// # Errors
///
/// Returns an error when the runs cannot be read, do not parse, or contain
/// no experiment.
pub async fn load_experiments(dir: &std::path::Path) -> Result<Vec<Experiment>, IngestError> {
    let logs = collect_run_logs(dir).await?;
    let experiments = parse_experiments(&logs)?;
    if experiments.is_empty() {
        return Err(IngestError::NoExperiments {
            path: dir.to_path_buf(),
        });
    }
    Ok(experiments)
}
