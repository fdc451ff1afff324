//! Per-link class log: `Experiment`, `Link <name> <type>` and
//! `Class <class> <float>...` records.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::error::IngestError;

use super::natural::{natural_key, natural_sorted};
use super::sequences::ClassSeries;
use super::{parse_values, read_text};

const LINK_PREFIX: &str = "Link";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkRecord {
    pub name: String,
    pub kind: String,
    pub classes: ClassSeries,
}

impl LinkRecord {
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        self.kind == "neutral"
    }

    /// Class values in natural class order.
    #[must_use]
    pub fn samples(&self) -> Vec<Vec<f64>> {
        let names: Vec<&String> = self.classes.keys().collect();
        natural_sorted(&names)
            .into_iter()
            .filter_map(|name| self.classes.get(name).cloned())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkLog {
    pub experiment: String,
    pub interval: String,
    /// Links in the order they first appear.
    pub links: Vec<LinkRecord>,
}

impl LinkLog {
    /// Links with at least one class, in natural name order.
    #[must_use]
    pub fn plotted_links(&self) -> Vec<&LinkRecord> {
        let mut links: Vec<&LinkRecord> = self
            .links
            .iter()
            .filter(|link| !link.classes.is_empty())
            .collect();
        links.sort_by_cached_key(|link| natural_key(&link.name));
        links
    }

    pub fn all_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.links
            .iter()
            .flat_map(|link| link.classes.values().flatten().copied())
    }
}

/// Parses a link/class log.
///
/// # Errors
///
/// Returns an error for `Class` records before the first `Link`, records with
/// missing fields, and values that are not numbers.
pub fn parse_link_log(path: &Path, text: &str) -> Result<LinkLog, IngestError> {
    let mut log = LinkLog::default();
    let mut current: Option<usize> = None;

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
            LINK_PREFIX => {
                let (Some(name), Some(kind)) = (fields.first(), fields.get(1)) else {
                    return Err(missing());
                };
                debug!("Link {} ({})", name, kind);
                // A repeated link starts over, keeping its first position.
                let record = LinkRecord {
                    name: (*name).to_owned(),
                    kind: (*kind).to_owned(),
                    classes: BTreeMap::new(),
                };
                let position = log.links.iter().position(|link| link.name == *name);
                current = Some(match position {
                    Some(position) => {
                        if let Some(slot) = log.links.get_mut(position) {
                            *slot = record;
                        }
                        position
                    }
                    None => {
                        log.links.push(record);
                        log.links.len() - 1
                    }
                });
            }
            "Class" => {
                let Some((class, raw_values)) = fields.split_first() else {
                    return Err(missing());
                };
                let values = parse_values(path, line_no, raw_values)?;
                let Some(link) = current.and_then(|position| log.links.get_mut(position)) else {
                    return Err(IngestError::OutsideSection {
                        path: path.to_path_buf(),
                        line: line_no,
                        prefix: prefix.to_owned(),
                        section: LINK_PREFIX,
                    });
                };
                link.classes.insert((*class).to_owned(), values);
            }
            _ => {}
        }
    }
    Ok(log)
}

/// Reads and parses a link/class log.
///
/// # Errors
///
/// Returns an error when the file cannot be read or does not parse.
pub async fn read_link_log(path: &Path) -> Result<LinkLog, IngestError> {
    let text = read_text(path).await?;
    parse_link_log(path, &text)
}
