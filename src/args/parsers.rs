use super::types::PositiveUsize;
use crate::error::ValidationError;
use crate::reports::{Graph, PlotTarget};

pub(super) fn parse_positive_usize(s: &str) -> Result<PositiveUsize, ValidationError> {
    s.trim().parse::<PositiveUsize>()
}

pub(super) fn parse_positive_u32(s: &str) -> Result<u32, ValidationError> {
    let value: u32 = s
        .trim()
        .parse()
        .map_err(|err| ValidationError::InvalidNumber { source: err })?;
    if value == 0 {
        return Err(ValidationError::ValueTooSmall { min: 1 });
    }
    Ok(value)
}

pub(super) fn parse_positive_f64(s: &str) -> Result<f64, ValidationError> {
    match s.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        Ok(_) | Err(_) => Err(ValidationError::NotPositive {
            value: s.to_owned(),
        }),
    }
}

pub(super) fn parse_graph(s: &str) -> Result<Graph, ValidationError> {
    s.trim().parse()
}

pub(super) fn parse_plot_target(s: &str) -> Result<PlotTarget, ValidationError> {
    s.trim().parse()
}

/// Lower-cased extension without its leading dot.
pub(crate) fn parse_format(s: &str) -> Result<String, ValidationError> {
    let ext = s.trim().trim_start_matches('.').to_ascii_lowercase();
    if crate::charts::SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(ValidationError::UnsupportedFormat {
            value: s.to_owned(),
        })
    }
}
