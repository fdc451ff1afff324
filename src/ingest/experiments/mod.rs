//! Experiment runs: per-run logs, emulator measurements and tag parameters.
mod collect;
mod measurements;
mod stream;
mod tags;

pub use collect::{EMULATOR_LOG_FILE, PATH_PROBS_FILE, RunLogs, collect_run_logs, emulator_lines};
pub use measurements::{Latency, parse_latency_line, parse_throughput_line};
pub use stream::{CONGESTION_THRESHOLD, Experiment, load_experiments, parse_experiments};
pub use tags::{GroupKey, TagAttributes, TagPatterns};
