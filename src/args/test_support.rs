use clap::Parser;

use crate::error::{AppError, AppResult};

use super::CongplotArgs;

pub(crate) fn parse_test_args<I, T>(args: I) -> AppResult<CongplotArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    CongplotArgs::try_parse_from(args).map_err(AppError::from)
}
