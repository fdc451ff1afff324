//! Link-sequence congestion log.
//!
//! Tab-separated records:
//!
//! ```text
//! Experiment	long-policing-1	interval	0.1
//! Non-neutral links	1	2
//! Link sequence	neutrality	neutral	links	2	4
//! Class	1	1.1256	1.22113
//! True class	1	1.0	1.1
//! ```
//!
//! Every class record belongs to the most recent `Link sequence`.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::debug;

use crate::error::IngestError;

use super::natural::{natural_key, natural_sorted};
use super::{parse_values, read_text};

const SEQUENCE_PREFIX: &str = "Link sequence";
const NEUTRAL: &str = "neutral";

/// Which measurement a class record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SeriesKind {
    Inferred,
    Truth,
    TruthSinglePath,
    ErrorPath1,
    ErrorPath2,
    ErrorExternal,
    ErrorInternal,
    ErrorInternal1,
    ErrorInternal2,
}

impl SeriesKind {
    pub const ALL: [SeriesKind; 9] = [
        SeriesKind::Inferred,
        SeriesKind::Truth,
        SeriesKind::TruthSinglePath,
        SeriesKind::ErrorPath1,
        SeriesKind::ErrorPath2,
        SeriesKind::ErrorExternal,
        SeriesKind::ErrorInternal,
        SeriesKind::ErrorInternal1,
        SeriesKind::ErrorInternal2,
    ];

    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            SeriesKind::Inferred => "Class",
            SeriesKind::Truth => "True class",
            SeriesKind::TruthSinglePath => "TrueSinglePath class",
            SeriesKind::ErrorPath1 => "ErrorPath1 class",
            SeriesKind::ErrorPath2 => "ErrorPath2 class",
            SeriesKind::ErrorExternal => "ErrorExternal class",
            SeriesKind::ErrorInternal => "ErrorInternal class",
            SeriesKind::ErrorInternal1 => "ErrorInternal1 class",
            SeriesKind::ErrorInternal2 => "ErrorInternal2 class",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.prefix() == prefix)
    }
}

/// Values per class name.
pub type ClassSeries = BTreeMap<String, Vec<f64>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkSequence {
    /// `neutral` or the kind of non-neutrality.
    pub kind: String,
    pub links: Vec<u32>,
    pub series: BTreeMap<SeriesKind, ClassSeries>,
}

impl LinkSequence {
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        self.kind == NEUTRAL
    }

    #[must_use]
    pub fn link_set(&self) -> BTreeSet<u32> {
        self.links.iter().copied().collect()
    }

    /// Class names of the inferred values, in natural order.
    #[must_use]
    pub fn class_names(&self) -> Vec<String> {
        let names: Vec<String> = self
            .series
            .get(&SeriesKind::Inferred)
            .map(|classes| classes.keys().cloned().collect())
            .unwrap_or_default();
        natural_sorted(&names)
    }

    #[must_use]
    pub fn values(&self, kind: SeriesKind, class: &str) -> &[f64] {
        self.series
            .get(&kind)
            .and_then(|classes| classes.get(class))
            .map_or(&[], Vec::as_slice)
    }

    /// Inferred minus true value, pairwise.
    #[must_use]
    pub fn delta(&self, class: &str) -> Vec<f64> {
        self.values(SeriesKind::Inferred, class)
            .iter()
            .zip(self.values(SeriesKind::Truth, class))
            .map(|(inferred, truth)| inferred - truth)
            .collect()
    }

    /// Spread of the per-class means of the inferred values.
    #[must_use]
    pub fn gap(&self) -> f64 {
        let means: Vec<f64> = self
            .class_names()
            .iter()
            .filter_map(|class| mean(self.values(SeriesKind::Inferred, class)))
            .collect();
        let max = means.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = means.iter().copied().fold(f64::INFINITY, f64::min);
        if means.is_empty() { 0.0 } else { max - min }
    }

    fn natural_label(&self) -> String {
        let mut links = self.links.clone();
        links.sort_unstable();
        let joined: Vec<String> = links.iter().map(u32::to_string).collect();
        format!("{} {}", links.len(), joined.join(" "))
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// How sequences are ordered on the x axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SequenceOrder {
    /// By link count, then by the naturally sorted links.
    #[default]
    Natural,
    /// By the spread of the per-class means, smallest first.
    Gap,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SequenceLog {
    pub experiment: String,
    pub interval: String,
    pub non_neutral_links: BTreeSet<u32>,
    pub sequences: Vec<LinkSequence>,
}

impl SequenceLog {
    /// Drops sequences whose links are a disjoint union of other
    /// sequences' links. Returns how many were dropped.
    pub fn remove_redundant(&mut self) -> usize {
        let sets: Vec<BTreeSet<u32>> = self.sequences.iter().map(LinkSequence::link_set).collect();
        let flags = redundant_flags(&sets);
        let before = self.sequences.len();
        let mut flags = flags.into_iter();
        self.sequences
            .retain(|_| !flags.next().unwrap_or(false));
        before - self.sequences.len()
    }

    pub fn order(&mut self, order: SequenceOrder) {
        match order {
            SequenceOrder::Natural => {
                self.sequences
                    .sort_by_cached_key(|sequence| natural_key(&sequence.natural_label()));
                for sequence in &mut self.sequences {
                    sequence.links.sort_unstable();
                }
            }
            SequenceOrder::Gap => {
                self.sequences
                    .sort_by(|a, b| a.gap().total_cmp(&b.gap()));
            }
        }
    }

    /// Every value of one kind, over all sequences and classes.
    pub fn all_values(&self, kind: SeriesKind) -> impl Iterator<Item = f64> + '_ {
        self.sequences
            .iter()
            .filter_map(move |sequence| sequence.series.get(&kind))
            .flat_map(|classes| classes.values().flatten().copied())
    }
}

/// For each set, whether it can be covered by a disjoint union of the other
/// sets.
#[must_use]
pub fn redundant_flags(sets: &[BTreeSet<u32>]) -> Vec<bool> {
    (0..sets.len())
        .map(|index| {
            let others: Vec<&BTreeSet<u32>> = sets
                .iter()
                .enumerate()
                .filter(|(other, set)| *other != index && !set.is_empty())
                .map(|(_, set)| set)
                .collect();
            sets.get(index)
                .is_some_and(|set| is_covered(set, &others))
        })
        .collect()
}

fn is_covered(remaining: &BTreeSet<u32>, others: &[&BTreeSet<u32>]) -> bool {
    if remaining.is_empty() {
        return true;
    }
    others.iter().any(|other| {
        other.is_subset(remaining) && is_covered(&(remaining - *other), others)
    })
}

/// Parses a link-sequence log. Unrecognized lines are ignored.
///
/// # Errors
///
/// Returns an error for class records before the first sequence, records
/// with missing fields, and values that are not numbers.
pub fn parse_sequence_log(path: &Path, text: &str) -> Result<SequenceLog, IngestError> {
    let mut log = SequenceLog::default();

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        if line.is_empty() {
            continue;
        }
        let tokens: Vec<&str> = line.split('\t').collect();
        let Some((&prefix, fields)) = tokens.split_first() else {
            continue;
        };
        let missing = || IngestError::MissingFields {
            path: path.to_path_buf(),
            line: line_no,
            prefix: prefix.to_owned(),
        };

        match prefix {
            "Experiment" => {
                log.experiment = fields.first().copied().unwrap_or_default().to_owned();
                log.interval = fields.get(2).copied().unwrap_or_default().to_owned();
            }
            "Non-neutral links" => {
                for link in parse_links(path, line_no, fields)? {
                    log.non_neutral_links.insert(link);
                }
            }
            SEQUENCE_PREFIX => {
                if fields.len() < 3 {
                    return Err(missing());
                }
                let kind = fields.get(1).copied().unwrap_or_default().to_owned();
                let links = parse_links(path, line_no, fields.get(3..).unwrap_or_default())?;
                debug!("Sequence {:?} ({})", links, kind);
                log.sequences.push(LinkSequence {
                    kind,
                    links,
                    series: BTreeMap::new(),
                });
            }
            other => {
                let Some(kind) = SeriesKind::from_prefix(other) else {
                    continue;
                };
                let Some((class, raw_values)) = fields.split_first() else {
                    return Err(missing());
                };
                let values = parse_values(path, line_no, raw_values)?;
                let Some(sequence) = log.sequences.last_mut() else {
                    return Err(IngestError::OutsideSection {
                        path: path.to_path_buf(),
                        line: line_no,
                        prefix: prefix.to_owned(),
                        section: SEQUENCE_PREFIX,
                    });
                };
                sequence
                    .series
                    .entry(kind)
                    .or_default()
                    .insert((*class).to_owned(), values);
            }
        }
    }
    Ok(log)
}

fn parse_links(path: &Path, line: usize, fields: &[&str]) -> Result<Vec<u32>, IngestError> {
    fields
        .iter()
        .flat_map(|field| field.split_whitespace())
        .map(|value| {
            value.parse::<u32>().map_err(|err| IngestError::InvalidLink {
                path: path.to_path_buf(),
                line,
                value: value.to_owned(),
                source: err,
            })
        })
        .collect()
}

/// Reads and parses a link-sequence log.
///
/// # Errors
///
/// Returns an error when the file cannot be read or does not parse.
pub async fn read_sequence_log(path: &Path) -> Result<SequenceLog, IngestError> {
    let text = read_text(path).await?;
    parse_sequence_log(path, &text)
}
