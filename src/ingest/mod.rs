//! Parsers for the tab-separated experiment logs.
mod experiments;
mod links;
mod natural;
mod sequences;


use std::path::Path;

use crate::error::IngestError;

pub use experiments::{
    CONGESTION_THRESHOLD, EMULATOR_LOG_FILE, Experiment, GroupKey, Latency, PATH_PROBS_FILE,
    RunLogs, TagAttributes, TagPatterns, collect_run_logs, emulator_lines, load_experiments,
    parse_experiments, parse_latency_line, parse_throughput_line,
};
pub use links::{LinkLog, LinkRecord, parse_link_log, read_link_log};
pub use natural::{NaturalPart, natural_cmp, natural_key, natural_sort, natural_sorted, sort_congestion};
pub use sequences::{
    ClassSeries, LinkSequence, SequenceLog, SequenceOrder, SeriesKind, parse_sequence_log,
    read_sequence_log, redundant_flags,
};

pub(crate) async fn read_text(path: &Path) -> Result<String, IngestError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|err| IngestError::Read {
            path: path.to_path_buf(),
            source: err,
        })
}

/// Parses the float fields of one record. Empty fields are skipped.
pub(crate) fn parse_values(
    path: &Path,
    line: usize,
    fields: &[&str],
) -> Result<Vec<f64>, IngestError> {
    fields
        .iter()
        .map(|field| field.trim())
        .filter(|field| !field.is_empty())
        .map(|field| {
            field.parse::<f64>().map_err(|err| IngestError::InvalidNumber {
                path: path.to_path_buf(),
                line,
                value: field.to_owned(),
                source: err,
            })
        })
        .collect()
}
