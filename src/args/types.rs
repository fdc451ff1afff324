use std::num::NonZeroUsize;

use clap::ValueEnum;

use crate::error::ValidationError;
use crate::ingest::SequenceOrder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositiveUsize(NonZeroUsize);

impl PositiveUsize {
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl TryFrom<usize> for PositiveUsize {
    type Error = ValidationError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        NonZeroUsize::new(value)
            .map(PositiveUsize)
            .ok_or(ValidationError::ValueTooSmall { min: 1 })
    }
}

impl std::str::FromStr for PositiveUsize {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: usize = s
            .parse()
            .map_err(|err| ValidationError::InvalidNumber { source: err })?;
        PositiveUsize::try_from(value)
    }
}

impl From<PositiveUsize> for usize {
    fn from(value: PositiveUsize) -> Self {
        value.get()
    }
}

/// Order of the link sequences along the x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortOrder {
    /// Natural order of the sequence labels
    #[default]
    Natural,
    /// Increasing gap between the class means
    Gap,
}

impl From<SortOrder> for SequenceOrder {
    fn from(value: SortOrder) -> Self {
        match value {
            SortOrder::Natural => SequenceOrder::Natural,
            SortOrder::Gap => SequenceOrder::Gap,
        }
    }
}
