//! printf-style number formatting for tick labels (`%2.1f`, `%d%%`, `%.3g`).

use crate::error::FigureError;

#[derive(Debug, Clone, Copy, Default)]
struct Spec {
    left: bool,
    zero: bool,
    plus: bool,
    space: bool,
    alternate: bool,
    width: usize,
    precision: Option<usize>,
    conversion: char,
}

/// Formats `value` with a C format string holding one conversion.
///
/// # Errors
///
/// Returns an error for an unterminated or unsupported conversion.
pub fn format_printf(format: &str, value: f64) -> Result<String, FigureError> {
    let invalid = || FigureError::InvalidFormatString {
        format: format.to_owned(),
    };
    let mut out = String::new();
    let mut chars = format.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        let mut spec = Spec::default();
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => spec.left = true,
                '0' => spec.zero = true,
                '+' => spec.plus = true,
                ' ' => spec.space = true,
                '#' => spec.alternate = true,
                _ => break,
            }
            chars.next();
        }
        spec.width = take_number(&mut chars).unwrap_or(0);
        if chars.peek() == Some(&'.') {
            chars.next();
            spec.precision = Some(take_number(&mut chars).unwrap_or(0));
        }
        // Length modifiers carry no meaning for f64.
        while matches!(chars.peek(), Some('l' | 'h' | 'L' | 'q' | 'j' | 'z' | 't')) {
            chars.next();
        }
        spec.conversion = chars.next().ok_or_else(invalid)?;
        if spec.conversion == '%' {
            out.push('%');
            continue;
        }
        let body = convert(&spec, value).ok_or_else(invalid)?;
        out.push_str(&pad(&spec, body));
    }
    Ok(out)
}

fn take_number<I>(chars: &mut std::iter::Peekable<I>) -> Option<usize>
where
    I: Iterator<Item = char>,
{
    let mut digits = String::new();
    while let Some(&ch) = chars.peek() {
        if !ch.is_ascii_digit() {
            break;
        }
        digits.push(ch);
        chars.next();
    }
    digits.parse().ok()
}

/// Converts the magnitude and sign; padding comes later.
fn convert(spec: &Spec, value: f64) -> Option<String> {
    let negative = value.is_sign_negative() && value != 0.0;
    let magnitude = value.abs();
    let digits = if !magnitude.is_finite() {
        let text = if magnitude.is_nan() { "nan" } else { "inf" };
        if spec.conversion.is_ascii_uppercase() {
            text.to_ascii_uppercase()
        } else {
            text.to_owned()
        }
    } else {
        match spec.conversion {
            'd' | 'i' | 'u' => format!("{:.0}", magnitude.trunc()),
            'f' | 'F' => format!("{:.*}", spec.precision.unwrap_or(6), magnitude),
            'e' | 'E' => exponential(
                magnitude,
                spec.precision.unwrap_or(6),
                spec.conversion == 'E',
            ),
            'g' | 'G' => general(magnitude, spec),
            _ => return None,
        }
    };
    let sign = if negative {
        "-"
    } else if spec.plus {
        "+"
    } else if spec.space {
        " "
    } else {
        ""
    };
    Some(format!("{}{}", sign, digits))
}

/// `d.ddde±XX` with at least two exponent digits.
fn exponential(magnitude: f64, precision: usize, upper: bool) -> String {
    let rendered = format!("{:.*e}", precision, magnitude);
    let (mantissa, exponent) = rendered.split_once('e').unwrap_or((&rendered, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let marker = if upper { 'E' } else { 'e' };
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{}{}{}{:02}", mantissa, marker, sign, exponent.abs())
}

fn general(magnitude: f64, spec: &Spec) -> String {
    let precision = match spec.precision {
        Some(0) => 1,
        Some(p) => p,
        None => 6,
    };
    let upper = spec.conversion == 'G';
    if magnitude == 0.0 {
        return trim_zeros(format!("{:.*}", precision.saturating_sub(1), 0.0), spec);
    }
    // The exponent after rounding to `precision` significant digits.
    let rounded = format!("{:.*e}", precision.saturating_sub(1), magnitude);
    let exponent: i64 = rounded
        .split_once('e')
        .and_then(|(_, exp)| exp.parse().ok())
        .unwrap_or(0);
    let p = i64::try_from(precision).unwrap_or(i64::MAX);
    if exponent >= -4 && exponent < p {
        let decimals = usize::try_from(p - 1 - exponent).unwrap_or(0);
        trim_zeros(format!("{:.*}", decimals, magnitude), spec)
    } else {
        let text = exponential(magnitude, precision.saturating_sub(1), upper);
        match text.split_once(if upper { 'E' } else { 'e' }) {
            Some((mantissa, exp)) => format!(
                "{}{}{}",
                trim_zeros(mantissa.to_owned(), spec),
                if upper { 'E' } else { 'e' },
                exp
            ),
            None => text,
        }
    }
}

fn trim_zeros(text: String, spec: &Spec) -> String {
    if spec.alternate || !text.contains('.') {
        return text;
    }
    text.trim_end_matches('0').trim_end_matches('.').to_owned()
}

fn pad(spec: &Spec, body: String) -> String {
    let len = body.chars().count();
    if len >= spec.width {
        return body;
    }
    let fill = spec.width - len;
    if spec.left {
        return format!("{}{}", body, " ".repeat(fill));
    }
    let numeric = body
        .trim_start_matches(['-', '+', ' '])
        .starts_with(|c: char| c.is_ascii_digit());
    if spec.zero && numeric {
        let sign_len = body.len() - body.trim_start_matches(['-', '+', ' ']).len();
        let (sign, digits) = body.split_at(sign_len);
        return format!("{}{}{}", sign, "0".repeat(fill), digits);
    }
    format!("{}{}", " ".repeat(fill), body)
}

/// Fewest decimals (up to six) that represent every tick exactly.
#[must_use]
pub fn default_decimals(ticks: &[f64]) -> usize {
    (0..=6)
        .find(|&decimals| {
            let scale = 10f64.powi(i32::try_from(decimals).unwrap_or(6));
            ticks.iter().all(|tick| {
                let scaled = tick * scale;
                (scaled - scaled.round()).abs() <= 1e-6 * scaled.abs().max(1.0)
            })
        })
        .unwrap_or(6)
}

/// Default label text: shared decimal count, no negative zero.
#[must_use]
pub fn format_default(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value);
    let is_zero = text
        .trim_start_matches('-')
        .chars()
        .all(|c| c == '0' || c == '.');
    if is_zero {
        text.trim_start_matches('-').to_owned()
    } else {
        text
    }
}
