//! CLI argument types and parsing helpers.
mod cli;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod tests;

pub use cli::{
    Command, CongplotArgs, ExperimentArgs, JsonFileArgs, LinkArgs, RenderArgs, SequenceArgs,
};
pub use types::{PositiveUsize, SortOrder};
