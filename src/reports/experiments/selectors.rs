use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::ingest::{Experiment, GroupKey};

/// One experiment plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlotSelector {
    Plot1,
    Plot1b,
    Plot2,
    Plot3,
    Plot4,
    Plot5,
    Plot5b,
    Plot7,
    Plot7b,
    Plot7bPlus,
    Plot8,
    Plot8b,
    Plot8bPlus,
    Plot9,
    Plot10,
    Plot11,
    /// `1` or `7`, whichever of policing and shaping varies.
    PolicingOrShaping,
}

/// What a plot draws per group value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Congestion probability, latency and throughput bars.
    Curves,
    /// Computed non-neutrality line.
    NonNeutrality,
}

/// Order of the group values along the x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrder {
    Natural,
    ReversedNatural,
    Congestion,
}

impl PlotSelector {
    pub const ALL: [PlotSelector; 17] = [
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
        PlotSelector::Plot9,
        PlotSelector::Plot10,
        PlotSelector::Plot11,
        PlotSelector::PolicingOrShaping,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            PlotSelector::Plot1 => "1",
            PlotSelector::Plot1b => "1b",
            PlotSelector::Plot2 => "2",
            PlotSelector::Plot3 => "3",
            PlotSelector::Plot4 => "4",
            PlotSelector::Plot5 => "5",
            PlotSelector::Plot5b => "5b",
            PlotSelector::Plot7 => "7",
            PlotSelector::Plot7b => "7b",
            PlotSelector::Plot7bPlus => "7b+",
            PlotSelector::Plot8 => "8",
            PlotSelector::Plot8b => "8b",
            PlotSelector::Plot8bPlus => "8b+",
            PlotSelector::Plot9 => "9",
            PlotSelector::Plot10 => "10",
            PlotSelector::Plot11 => "11",
            PlotSelector::PolicingOrShaping => "1-7",
        }
    }

    /// Plot whose data directory this plot reads by default.
    #[must_use]
    pub const fn data_source(self) -> &'static str {
        match self {
            PlotSelector::Plot5 => "1",
            PlotSelector::Plot5b => "1b",
            PlotSelector::Plot8 => "7",
            PlotSelector::Plot7bPlus | PlotSelector::Plot8b | PlotSelector::Plot8bPlus => "7b",
            PlotSelector::Plot1
            | PlotSelector::Plot1b
            | PlotSelector::Plot2
            | PlotSelector::Plot3
            | PlotSelector::Plot4
            | PlotSelector::Plot7
            | PlotSelector::Plot7b
            | PlotSelector::Plot9
            | PlotSelector::Plot10
            | PlotSelector::Plot11
            | PlotSelector::PolicingOrShaping => self.name(),
        }
    }

    #[must_use]
    pub fn default_input(self) -> PathBuf {
        PathBuf::from(format!("plot{}-data", self.data_source()))
    }

    #[must_use]
    pub fn default_output(self) -> PathBuf {
        PathBuf::from(format!("plot{}", self.name()))
    }

    /// Grouping attribute and its axis title. `None` until `1-7` is resolved.
    #[must_use]
    pub const fn grouping(self) -> Option<(GroupKey, &'static str)> {
        Some(match self {
            PlotSelector::Plot1
            | PlotSelector::Plot1b
            | PlotSelector::Plot5
            | PlotSelector::Plot5b => (GroupKey::Policing, "Policing"),
            PlotSelector::Plot2 => (GroupKey::TransferSize, "Transfer size"),
            PlotSelector::Plot3 => (GroupKey::LinkSpeed, "Bottleneck bandwidth"),
            PlotSelector::Plot4 => (GroupKey::NumFlows, "Total number of flows"),
            PlotSelector::Plot7 | PlotSelector::Plot7b | PlotSelector::Plot8 | PlotSelector::Plot8b => {
                (GroupKey::Shaping, "Shaping")
            }
            PlotSelector::Plot7bPlus | PlotSelector::Plot8bPlus => {
                (GroupKey::Shaping, "Shaping (cong. thresh. 0.25\\%)")
            }
            PlotSelector::Plot9 => (GroupKey::Rtt, "RTT"),
            PlotSelector::Plot10 => (GroupKey::Tcp, "TCP"),
            PlotSelector::Plot11 => (GroupKey::Congestion, "Congestion"),
            PlotSelector::PolicingOrShaping => return None,
        })
    }

    #[must_use]
    pub const fn chart_kind(self) -> ChartKind {
        match self {
            PlotSelector::Plot5
            | PlotSelector::Plot5b
            | PlotSelector::Plot8
            | PlotSelector::Plot8b
            | PlotSelector::Plot8bPlus => ChartKind::NonNeutrality,
            PlotSelector::Plot1
            | PlotSelector::Plot1b
            | PlotSelector::Plot2
            | PlotSelector::Plot3
            | PlotSelector::Plot4
            | PlotSelector::Plot7
            | PlotSelector::Plot7b
            | PlotSelector::Plot7bPlus
            | PlotSelector::Plot9
            | PlotSelector::Plot10
            | PlotSelector::Plot11
            | PlotSelector::PolicingOrShaping => ChartKind::Curves,
        }
    }

    #[must_use]
    pub const fn key_order(self) -> KeyOrder {
        match self {
            PlotSelector::Plot1 | PlotSelector::Plot1b | PlotSelector::Plot5 | PlotSelector::Plot5b => {
                KeyOrder::ReversedNatural
            }
            PlotSelector::Plot11 => KeyOrder::Congestion,
            PlotSelector::Plot2
            | PlotSelector::Plot3
            | PlotSelector::Plot4
            | PlotSelector::Plot7
            | PlotSelector::Plot7b
            | PlotSelector::Plot7bPlus
            | PlotSelector::Plot8
            | PlotSelector::Plot8b
            | PlotSelector::Plot8bPlus
            | PlotSelector::Plot9
            | PlotSelector::Plot10
            | PlotSelector::PolicingOrShaping => KeyOrder::Natural,
        }
    }

    /// Replaces `1-7` by `1` when policing varies across `experiments`, or by
    /// `7` when shaping does (shaping wins when both vary).
    ///
    /// # Errors
    ///
    /// Returns an error when neither varies.
    pub fn resolve(self, experiments: &[Experiment]) -> Result<PlotSelector, ValidationError> {
        if self != PlotSelector::PolicingOrShaping {
            return Ok(self);
        }
        let varies = |key: GroupKey| {
            experiments
                .iter()
                .map(|experiment| experiment.attributes.get(key))
                .collect::<BTreeSet<&str>>()
                .len()
                > 1
        };
        if varies(GroupKey::Shaping) {
            Ok(PlotSelector::Plot7)
        } else if varies(GroupKey::Policing) {
            Ok(PlotSelector::Plot1)
        } else {
            Err(ValidationError::AmbiguousQosSelector)
        }
    }
}

impl fmt::Display for PlotSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlotSelector {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        PlotSelector::ALL
            .into_iter()
            .find(|selector| selector.name() == value)
            .ok_or_else(|| ValidationError::UnknownPlotSelector {
                value: value.to_owned(),
            })
    }
}

/// Runs several plots over a fixed list or a directory sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchSelector {
    All,
    RealVsShaping,
    VaryRttAndBuffers,
    DiffRtt,
    DiffRttTcp,
    DiffTcp,
    VaryQos,
    VaryTransferSize,
    VaryRtt,
    VaryTcp,
    VaryCongestion,
}

impl BatchSelector {
    pub const ALL: [BatchSelector; 11] = [
        BatchSelector::All,
        BatchSelector::RealVsShaping,
        BatchSelector::VaryRttAndBuffers,
        BatchSelector::DiffRtt,
        BatchSelector::DiffRttTcp,
        BatchSelector::DiffTcp,
        BatchSelector::VaryQos,
        BatchSelector::VaryTransferSize,
        BatchSelector::VaryRtt,
        BatchSelector::VaryTcp,
        BatchSelector::VaryCongestion,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            BatchSelector::All => "all",
            BatchSelector::RealVsShaping => "real-vs-shaping",
            BatchSelector::VaryRttAndBuffers => "vary-rtt-and-buffers",
            BatchSelector::DiffRtt => "diff-rtt",
            BatchSelector::DiffRttTcp => "diff-rtt-tcp",
            BatchSelector::DiffTcp => "diff-tcp",
            BatchSelector::VaryQos => "vary-qos",
            BatchSelector::VaryTransferSize => "vary-transfer-size",
            BatchSelector::VaryRtt => "vary-rtt",
            BatchSelector::VaryTcp => "vary-tcp",
            BatchSelector::VaryCongestion => "vary-congestion",
        }
    }
}

/// A single plot or a batch of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlotTarget {
    Single(PlotSelector),
    Batch(BatchSelector),
}

impl FromStr for PlotTarget {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if let Ok(selector) = value.parse::<PlotSelector>() {
            return Ok(PlotTarget::Single(selector));
        }
        BatchSelector::ALL
            .into_iter()
            .find(|batch| batch.name() == value)
            .map(PlotTarget::Batch)
            .ok_or_else(|| ValidationError::UnknownPlotSelector {
                value: value.to_owned(),
            })
    }
}
