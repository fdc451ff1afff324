use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::IngestError;

/// Per-run file holding the per-path congestion probabilities.
pub const PATH_PROBS_FILE: &str = "path-congestion-probs.txt";
/// Per-run emulator log with latency and throughput counters.
pub const EMULATOR_LOG_FILE: &str = "emulator.out";

/// Everything the runs of one input directory contribute, in run order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunLogs {
    /// Input directory the runs were read from.
    pub source: PathBuf,
    /// Concatenated per-path probability files.
    pub data: String,
    pub latency_lines: Vec<String>,
    pub throughput_in_lines: Vec<String>,
    pub throughput_out_lines: Vec<String>,
}

impl RunLogs {
    /// Adds the measurement lines of one emulator log.
    pub fn push_emulator_log(&mut self, text: &str) {
        let (latency, received, sent) = emulator_lines(text);
        self.latency_lines.extend(latency);
        self.throughput_in_lines.extend(received);
        self.throughput_out_lines.extend(sent);
    }
}

/// Splits an emulator log into latency, received and sent lines.
///
/// Latency lines are the `Event delay` lines and the line after each, kept
/// when they mention `max` in any case and are not `Sync` counters.
#[must_use]
pub fn emulator_lines(text: &str) -> (Vec<String>, Vec<String>, Vec<String>) {
    let lines: Vec<&str> = text.lines().collect();
    let mut selected = vec![false; lines.len()];
    for (index, line) in lines.iter().enumerate() {
        if line.contains("Event delay") {
            for slot in selected.iter_mut().skip(index).take(2) {
                *slot = true;
            }
        }
    }
    let latency = lines
        .iter()
        .zip(&selected)
        .filter(|(line, selected)| {
            **selected && line.to_lowercase().contains("max") && !line.contains("Sync")
        })
        .map(|(line, _)| (*line).to_owned())
        .collect();
    let matching = |needle: &str| -> Vec<String> {
        lines
            .iter()
            .filter(|line| line.contains(needle))
            .map(|line| (*line).to_owned())
            .collect()
    };
    (
        latency,
        matching("Bits received per second"),
        matching("Bits sent per second"),
    )
}

async fn read_optional(path: &Path) -> Result<Option<String>, IngestError> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!("Skipping missing {}", path.display());
            Ok(None)
        }
        Err(err) => Err(IngestError::Read {
            path: path.to_path_buf(),
            source: err,
        }),
    }
}

/// Reads every run directory below `dir`, sorted by name. Runs missing one of
/// the files only contribute the other.
///
/// # Errors
///
/// Returns an error when `dir` does not exist or a file cannot be read.
pub async fn collect_run_logs(dir: &Path) -> Result<RunLogs, IngestError> {
    if !tokio::fs::try_exists(dir).await.unwrap_or(false) {
        return Err(IngestError::MissingDirectory {
            path: dir.to_path_buf(),
        });
    }
    let read_error = |err: std::io::Error| IngestError::Read {
        path: dir.to_path_buf(),
        source: err,
    };

    let mut runs = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await.map_err(read_error)?;
    while let Some(entry) = entries.next_entry().await.map_err(read_error)? {
        if entry.file_type().await.map_err(read_error)?.is_dir() {
            runs.push(entry.path());
        }
    }
    runs.sort();

    let mut logs = RunLogs {
        source: dir.to_path_buf(),
        ..RunLogs::default()
    };
    for run in &runs {
        debug!("Collecting {}", run.display());
        if let Some(data) = read_optional(&run.join(PATH_PROBS_FILE)).await? {
            logs.data.push_str(&data);
            if !data.ends_with('\n') {
                logs.data.push('\n');
            }
        }
        if let Some(emulator) = read_optional(&run.join(EMULATOR_LOG_FILE)).await? {
            logs.push_emulator_log(&emulator);
        }
    }
    Ok(logs)
}
