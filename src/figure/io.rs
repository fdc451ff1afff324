use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};

use crate::error::FigureError;

use super::types::Figure;

const INDENT: &[u8] = b"    ";

/// Where a JSON tool put its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutput {
    Written(PathBuf),
    /// The derived name equals the input name; the caller prints the text.
    Printed(String),
}

/// Reads a figure description.
///
/// # Errors
///
/// Returns an error when the file cannot be read or is not a valid figure.
pub fn load_figure(path: &Path) -> Result<Figure, FigureError> {
    let content = read(path)?;
    serde_json::from_str(&content).map_err(|err| FigureError::Parse {
        path: path.to_path_buf(),
        source: err,
    })
}

/// Serializes a value with sorted keys and four-space indentation.
///
/// # Errors
///
/// Returns an error when the value cannot be represented as JSON.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    // `Value` maps are ordered, which sorts every object's keys.
    let value = serde_json::to_value(value)?;
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Path of the description written beside a rendered image.
#[must_use]
pub fn sidecar_path(file_name: &str) -> PathBuf {
    PathBuf::from(format!("{}.json", file_name))
}

/// Writes the description beside the image it describes.
///
/// # Errors
///
/// Returns an error when serialization or the write fails.
pub async fn write_sidecar(figure: &Figure) -> Result<PathBuf, FigureError> {
    if figure.file_name.is_empty() {
        return Err(FigureError::MissingFileName);
    }
    let path = sidecar_path(&figure.file_name);
    let json = to_pretty_json(figure).map_err(|err| FigureError::Encode {
        path: path.clone(),
        source: err,
    })?;
    tokio::fs::write(&path, json)
        .await
        .map_err(|err| FigureError::Write {
            path: path.clone(),
            source: err,
        })?;
    Ok(path)
}

/// Rewrites every numeric `y` list as `100 - y`.
///
/// The input is kept; the result goes to `<name>-inverted.json`.
///
/// # Errors
///
/// Returns an error when the input cannot be read, parsed, or the output
/// cannot be written.
pub fn invert_y(path: &Path) -> Result<ToolOutput, FigureError> {
    let mut value = read_json(path)?;
    if let Some(items) = value.get_mut("data").and_then(Value::as_array_mut) {
        for item in items {
            invert_item(item);
        }
    }
    emit(path, "-inverted.json", &value)
}

fn invert_item(item: &mut Value) {
    let Some(values) = item.get_mut("y").and_then(Value::as_array_mut) else {
        return;
    };
    if !values.iter().all(Value::is_number) {
        return;
    }
    for value in values.iter_mut() {
        if let Some(number) = value.as_f64() {
            *value = Value::from(100.0 - number);
        }
    }
}

/// Re-indents a JSON file with sorted keys into `<name>-pretty.json`.
///
/// # Errors
///
/// Returns an error when the input cannot be read, parsed, or the output
/// cannot be written.
pub fn prettify(path: &Path) -> Result<ToolOutput, FigureError> {
    let value = read_json(path)?;
    emit(path, "-pretty.json", &value)
}

fn emit(input: &Path, suffix: &str, value: &Value) -> Result<ToolOutput, FigureError> {
    let text = to_pretty_json(value).map_err(|err| FigureError::Encode {
        path: input.to_path_buf(),
        source: err,
    })?;
    let input_name = input.to_string_lossy();
    let output_name = input_name.replace(".json", suffix);
    if output_name == input_name {
        return Ok(ToolOutput::Printed(text));
    }
    let output = PathBuf::from(output_name);
    std::fs::write(&output, text).map_err(|err| FigureError::Write {
        path: output.clone(),
        source: err,
    })?;
    Ok(ToolOutput::Written(output))
}

fn read_json(path: &Path) -> Result<Value, FigureError> {
    let content = read(path)?;
    serde_json::from_str(&content).map_err(|err| FigureError::Parse {
        path: path.to_path_buf(),
        source: err,
    })
}

fn read(path: &Path) -> Result<String, FigureError> {
    std::fs::read_to_string(path).map_err(|err| FigureError::Read {
        path: path.to_path_buf(),
        source: err,
    })
}
