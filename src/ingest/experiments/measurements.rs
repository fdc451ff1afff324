//! Emulator latency and throughput lines.

use crate::error::IngestError;

/// Per-experiment processing delay, in microseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Latency {
    pub peak_us: f64,
    pub average_us: f64,
}

fn unit_to_us(unit: &str, text: &str) -> Result<f64, IngestError> {
    Ok(match unit {
        // 1 ns = 0.001 us. Charts drawn with a 0.0001 factor show sub-microsecond
        // delays ten times too small.
        "ns" => 0.001,
        "us" => 1.0,
        "ms" => 1_000.0,
        "s" => 1_000_000.0,
        "m" => 60.0 * 1_000_000.0,
        "h" => 3_600.0 * 1_000_000.0,
        "d" => 86_400.0 * 1_000_000.0,
        other => {
            return Err(IngestError::InvalidDurationUnit {
                unit: other.to_owned(),
                value: text.to_owned(),
            });
        }
    })
}

fn malformed(text: &str) -> IngestError {
    IngestError::MalformedMeasurement {
        value: text.to_owned(),
    }
}

/// `10 us 292 ns` style durations.
fn parse_duration(text: &str) -> Result<f64, IngestError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() || tokens.len() % 2 != 0 {
        return Err(malformed(text));
    }
    let mut total = 0.0;
    for pair in tokens.chunks_exact(2) {
        let [amount, unit] = pair else {
            return Err(malformed(text));
        };
        let amount: f64 = amount.parse().map_err(|_parse| malformed(text))?;
        total += amount * unit_to_us(unit, text)?;
    }
    Ok(total)
}

/// `  0   0s   0m  98u 542n` style durations: seconds·10⁹ down to nanoseconds.
fn parse_legacy_duration(text: &str) -> Result<f64, IngestError> {
    const SCALES: [f64; 5] = [1.0e9, 1.0e6, 1.0e3, 1.0, 1.0e-3];
    let values = text
        .split_whitespace()
        .map(|word| {
            let digits: String = word.chars().filter(|ch| !ch.is_ascii_lowercase()).collect();
            digits.parse::<f64>().map_err(|_parse| malformed(text))
        })
        .collect::<Result<Vec<f64>, IngestError>>()?;
    if values.len() != SCALES.len() {
        return Err(malformed(text));
    }
    Ok(values.iter().zip(SCALES).map(|(value, scale)| value * scale).sum())
}

fn parse_current(line: &str) -> Result<Latency, IngestError> {
    let parts: Vec<&str> = line.split(',').collect();
    let (Some(max), Some(average)) = (parts.get(1), parts.get(2)) else {
        return Err(malformed(line));
    };
    Ok(Latency {
        peak_us: parse_duration(&max.replace(" Max", ""))?,
        average_us: parse_duration(&average.replace(" Average", ""))?,
    })
}

fn parse_legacy(line: &str) -> Result<Latency, IngestError> {
    let values = line.split(':').nth(1).ok_or_else(|| malformed(line))?;
    let parts: Vec<&str> = values.split(',').collect();
    let (Some(average), Some(max)) = (parts.first(), parts.get(1)) else {
        return Err(malformed(line));
    };
    Ok(Latency {
        peak_us: parse_legacy_duration(&max.replace("max", ""))?,
        average_us: parse_legacy_duration(&average.replace("avg", ""))?,
    })
}

/// Parses one latency line in either emulator format:
///
/// ```text
/// Min 0 ns, Max 10 us 292 ns, Average 549 ns:
/// Event delay: avg  0   0s   0m   0u 361n ,  max  0   0s   0m  98u 542n
/// ```
///
/// # Errors
///
/// Returns an error when neither format matches.
pub fn parse_latency_line(line: &str) -> Result<Latency, IngestError> {
    let mut chars = line.chars();
    chars.next_back();
    let trimmed = chars.as_str();
    match parse_current(trimmed) {
        Ok(latency) => Ok(latency),
        Err(current_err) => parse_legacy(trimmed).map_err(|_legacy| current_err),
    }
}

/// Parses `Bits received per second: 67.6772 Mbps` into Mbps.
///
/// # Errors
///
/// Returns an error when the value is missing or not a number.
pub fn parse_throughput_line(line: &str) -> Result<f64, IngestError> {
    line.split(':')
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|value| value.parse::<f64>().ok())
        .ok_or_else(|| malformed(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn current_format_sums_unit_pairs() -> Result<(), IngestError> {
        let latency = parse_latency_line("Min 0 ns, Max 10 us 292 ns, Average 549 ns:")?;
        if !close(latency.peak_us, 10.292) || !close(latency.average_us, 0.549) {
            return Err(IngestError::from(format!("Unexpected latency {:?}", latency)));
        }
        let latency = parse_latency_line("Min 0 ns, Max 1 ms, Average 2 s:")?;
        if !close(latency.peak_us, 1_000.0) || !close(latency.average_us, 2_000_000.0) {
            return Err(IngestError::from(format!("Unexpected latency {:?}", latency)));
        }
        Ok(())
    }

    #[test]
    fn legacy_format_is_accepted() -> Result<(), IngestError> {
        let latency = parse_latency_line(
            "Event delay: avg  0   0s   0m   0u 361n ,  max  0   0s   0m  98u 542n ",
        )?;
        if !close(latency.peak_us, 98.542) || !close(latency.average_us, 0.361) {
            return Err(IngestError::from(format!("Unexpected latency {:?}", latency)));
        }
        Ok(())
    }

    #[test]
    fn unknown_units_are_reported() -> Result<(), IngestError> {
        if let Err(IngestError::InvalidDurationUnit { unit, .. }) =
            parse_latency_line("Min 0 ns, Max 3 weeks, Average 1 ns:")
            && unit == "weeks"
        {
            return Ok(());
        }
        Err(IngestError::from("Expected an invalid unit error"))
    }

    #[test]
    fn throughput_reads_the_mbps_value() -> Result<(), IngestError> {
        let value = parse_throughput_line("Bits received per second: 67.6772 Mbps")?;
        if !close(value, 67.6772) {
            return Err(IngestError::from(format!("Unexpected throughput {}", value)));
        }
        if parse_throughput_line("Bits sent per second").is_ok() {
            return Err(IngestError::from("Expected a missing value to fail"));
        }
        Ok(())
    }
}
