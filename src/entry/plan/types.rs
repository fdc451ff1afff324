use std::path::PathBuf;

use crate::reports::{ExperimentReport, LinkReport, ReportSettings, SequenceReport};

/// Figures handed to `render`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(in crate::entry) enum RenderSource {
    /// The built-in example, written into `output_dir` when one is set.
    Demo { output_dir: Option<PathBuf> },
    Files(Vec<PathBuf>),
}

#[derive(Debug, Clone, PartialEq)]
pub(in crate::entry) enum RunPlan {
    Render {
        source: RenderSource,
        settings: ReportSettings,
    },
    Sequence {
        report: SequenceReport,
        settings: ReportSettings,
    },
    Links {
        report: LinkReport,
        settings: ReportSettings,
    },
    Experiments {
        report: ExperimentReport,
        settings: ReportSettings,
    },
    InvertY(PathBuf),
    Prettify(PathBuf),
}
