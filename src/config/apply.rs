use std::path::PathBuf;

use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::parsers::parse_format;
use crate::args::{CongplotArgs, PositiveUsize};
use crate::error::ConfigError;

use super::types::ConfigFile;

/// Applies configuration values to CLI arguments. Values given on the
/// command line are kept.
///
/// # Errors
///
/// Returns an error when a config value is out of range or names an
/// unsupported output format.
pub fn apply_config(
    args: &mut CongplotArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> Result<(), ConfigError> {
    if !is_cli(matches, "output_dir")
        && let Some(dir) = config.output_dir.as_deref()
    {
        args.output_dir = Some(PathBuf::from(dir));
    }

    if !is_cli(matches, "dpi")
        && let Some(dpi) = config.dpi
    {
        if dpi == 0 {
            return Err(ConfigError::FieldMustBePositive { field: "dpi" });
        }
        args.dpi = Some(dpi);
    }

    if !is_cli(matches, "font_scale")
        && let Some(scale) = config.font_scale
    {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ConfigError::FieldMustBePositive {
                field: "font_scale",
            });
        }
        args.font_scale = Some(scale);
    }

    if !is_cli(matches, "formats")
        && let Some(formats) = config.formats.as_ref()
    {
        let mut parsed = Vec::with_capacity(formats.len());
        for format in formats {
            let ext = parse_format(format).map_err(|_unsupported| ConfigError::UnsupportedFormat {
                ext: format.clone(),
            })?;
            parsed.push(ext);
        }
        args.formats = parsed;
    }

    if !is_cli(matches, "jobs")
        && let Some(jobs) = config.jobs
    {
        let jobs = PositiveUsize::try_from(jobs)
            .map_err(|_too_small| ConfigError::FieldMustBePositive { field: "jobs" })?;
        args.jobs = Some(jobs);
    }

    if !is_cli(matches, "no_json")
        && let Some(write_json) = config.write_json
    {
        args.no_json = !write_json;
    }

    if !is_cli(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }

    if !is_cli(matches, "verbose")
        && let Some(verbose) = config.verbose
    {
        args.verbose = verbose;
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}
