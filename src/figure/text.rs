use plotters::style::RGBColor;

const TEXTCOLOR: &str = "\\textcolor[rgb]{";

/// Label text as drawn, with its color when the whole label is wrapped in a
/// single `\textcolor[rgb]{r,g,b}{...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub text: String,
    pub color: Option<RGBColor>,
}

impl Label {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let color = match parse_textcolor(raw.trim()) {
            Some((color, _, rest)) if rest.is_empty() => Some(color),
            Some(_) | None => None,
        };
        Self {
            text: plain_text(raw),
            color,
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }

    /// Number of line breaks, used for margin reservations.
    #[must_use]
    pub fn extra_lines(&self) -> usize {
        self.text.matches('\n').count()
    }
}

/// Strips the small LaTeX subset used in labels: `\%` and `\textcolor`.
#[must_use]
pub fn plain_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("\\%") {
            out.push('%');
            rest = after;
            continue;
        }
        if rest.starts_with(TEXTCOLOR)
            && let Some((_, body, after)) = parse_textcolor(rest)
        {
            out.push_str(&plain_text(body));
            rest = after;
            continue;
        }
        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            out.push(ch);
        }
        rest = chars.as_str();
    }
    out
}

/// Parses `\textcolor[rgb]{r,g,b}{body}` at the start of `input`, returning
/// the color, the body and the remaining input.
fn parse_textcolor(input: &str) -> Option<(RGBColor, &str, &str)> {
    let after_prefix = input.strip_prefix(TEXTCOLOR)?;
    let (spec, after_spec) = after_prefix.split_once('}')?;
    let body_start = after_spec.strip_prefix('{')?;
    let body_end = matching_brace(body_start)?;
    let body = body_start.get(..body_end)?;
    let rest = body_start.get(body_end + 1..)?;

    let mut channels = spec.split(',').map(|part| part.trim().parse::<f64>());
    let r = channels.next()?.ok()?;
    let g = channels.next()?.ok()?;
    let b = channels.next()?.ok()?;
    if channels.next().is_some() {
        return None;
    }
    Some((RGBColor(unit(r), unit(g), unit(b)), body, rest))
}

fn matching_brace(input: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, ch) in input.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' if depth == 0 => return Some(idx),
            '}' => depth -= 1,
            _ => {}
        }
    }
    None
}

fn unit(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Makes a string safe to use as a file name component the way reports name
/// their outputs: backslashes and percent signs become spaces.
#[must_use]
pub fn file_safe(name: &str) -> String {
    name.replace(['\\', '%'], " ")
}
