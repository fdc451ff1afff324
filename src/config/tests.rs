use clap::{CommandFactory, FromArgMatches};
use tempfile::tempdir;

use super::{apply_config, load_config_file, types::ConfigFile};
use crate::args::CongplotArgs;
use crate::error::{AppError, ConfigError};

fn parse_with_matches(raw: &[&str]) -> Result<(CongplotArgs, clap::ArgMatches), String> {
    let matches = CongplotArgs::command()
        .try_get_matches_from(raw)
        .map_err(|err| format!("parse failed: {}", err))?;
    let args = CongplotArgs::from_arg_matches(&matches)
        .map_err(|err| format!("from matches failed: {}", err))?;
    Ok((args, matches))
}

#[test]
fn parse_toml_config() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("congplot.toml");
    let content = r#"
output_dir = "plots"
dpi = 150
font_scale = 1.5
formats = ["png", "svg"]
jobs = 4
write_json = false
"#;
    std::fs::write(&path, content).map_err(|err| format!("write failed: {}", err))?;

    let config = load_config_file(&path).map_err(|err| err.to_string())?;
    if config.output_dir.as_deref() != Some("plots") || config.dpi != Some(150) {
        return Err(format!("Unexpected config {:?}", config));
    }
    if config.formats != Some(vec!["png".to_owned(), "svg".to_owned()]) {
        return Err("Unexpected formats".to_owned());
    }
    if config.write_json != Some(false) || config.jobs != Some(4) {
        return Err("Unexpected render settings".to_owned());
    }
    Ok(())
}

#[test]
fn parse_json_config() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("congplot.json");
    std::fs::write(&path, r#"{"verbose": true, "no_color": true}"#)
        .map_err(|err| format!("write failed: {}", err))?;

    let config = load_config_file(&path).map_err(|err| err.to_string())?;
    if config.verbose != Some(true) || config.no_color != Some(true) || config.dpi.is_some() {
        return Err(format!("Unexpected config {:?}", config));
    }
    Ok(())
}

#[test]
fn unknown_keys_and_extensions_are_rejected() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let toml_path = dir.path().join("congplot.toml");
    std::fs::write(&toml_path, "colour = true\n").map_err(|err| format!("write failed: {}", err))?;
    match load_config_file(&toml_path) {
        Err(AppError::Config(ConfigError::ParseToml { .. })) => {}
        Ok(_) | Err(_) => return Err("Expected a TOML parse error".to_owned()),
    }

    let yaml_path = dir.path().join("congplot.yaml");
    std::fs::write(&yaml_path, "dpi: 1\n").map_err(|err| format!("write failed: {}", err))?;
    match load_config_file(&yaml_path) {
        Err(AppError::Config(ConfigError::UnsupportedExtension { ext })) if ext == "yaml" => Ok(()),
        Ok(_) | Err(_) => Err("Expected an unsupported extension".to_owned()),
    }
}

#[test]
fn config_fills_unset_flags() -> Result<(), String> {
    let (mut args, matches) = parse_with_matches(&["congplot", "--dpi", "300"])?;
    let config = ConfigFile {
        output_dir: Some("plots".to_owned()),
        dpi: Some(72),
        font_scale: Some(2.0),
        formats: Some(vec!["SVG".to_owned()]),
        jobs: Some(2),
        write_json: Some(false),
        verbose: Some(true),
        ..ConfigFile::default()
    };
    apply_config(&mut args, &matches, &config).map_err(|err| err.to_string())?;

    if args.dpi != Some(300) {
        return Err("CLI dpi should win".to_owned());
    }
    if args.font_scale != Some(2.0) || args.formats != ["svg"] {
        return Err("Expected font scale and formats from config".to_owned());
    }
    if args.jobs.map(|jobs| jobs.get()) != Some(2) || !args.no_json || !args.verbose {
        return Err("Expected jobs, json and verbosity from config".to_owned());
    }
    if args.output_dir.as_deref() != Some(std::path::Path::new("plots")) {
        return Err("Expected the output dir from config".to_owned());
    }
    Ok(())
}

#[test]
fn invalid_config_values_are_rejected() -> Result<(), String> {
    let (mut args, matches) = parse_with_matches(&["congplot"])?;
    let bad_format = ConfigFile {
        formats: Some(vec!["gif".to_owned()]),
        ..ConfigFile::default()
    };
    match apply_config(&mut args, &matches, &bad_format) {
        Err(ConfigError::UnsupportedFormat { ext }) if ext == "gif" => {}
        Ok(()) | Err(_) => return Err("Expected an unsupported format".to_owned()),
    }

    let zero_jobs = ConfigFile {
        jobs: Some(0),
        ..ConfigFile::default()
    };
    match apply_config(&mut args, &matches, &zero_jobs) {
        Err(ConfigError::FieldMustBePositive { field: "jobs" }) => Ok(()),
        Ok(()) | Err(_) => Err("Expected jobs to be rejected".to_owned()),
    }
}
