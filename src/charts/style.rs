//! Line format strings such as `o-`, `x--`, `b:` or `r+`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dash {
    Solid,
    Dashed,
    Dotted,
    DashDot,
}

impl Dash {
    /// Dash and gap lengths in units of the line width; `None` for solid.
    /// Dash-dot keeps its long dash and folds the dot into the gap.
    #[must_use]
    pub const fn dash_gap(self) -> Option<(f64, f64)> {
        match self {
            Dash::Solid => None,
            Dash::Dashed => Some((3.7, 1.6)),
            Dash::Dotted => Some((1.0, 1.65)),
            Dash::DashDot => Some((6.4, 4.2)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    Circle,
    Point,
    Plus,
    Cross,
    Square,
    TriangleUp,
    TriangleDown,
    Star,
    Diamond,
}

impl MarkerShape {
    #[must_use]
    pub const fn from_char(ch: char) -> Option<Self> {
        Some(match ch {
            'o' => MarkerShape::Circle,
            '.' => MarkerShape::Point,
            '+' => MarkerShape::Plus,
            'x' => MarkerShape::Cross,
            's' => MarkerShape::Square,
            '^' => MarkerShape::TriangleUp,
            'v' => MarkerShape::TriangleDown,
            '*' => MarkerShape::Star,
            'd' => MarkerShape::Diamond,
            _ => return None,
        })
    }
}

/// Parsed format string. A format naming only a marker draws no line; an
/// empty format draws a solid line. Color letters are accepted and skipped:
/// items always carry their own color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineStyle {
    pub dash: Option<Dash>,
    pub marker: Option<MarkerShape>,
}

impl LineStyle {
    #[must_use]
    pub fn parse(format: &str) -> Self {
        let mut dash = None;
        let mut marker = None;
        let mut rest = format.trim();
        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix("--") {
                dash = Some(Dash::Dashed);
                rest = after;
                continue;
            }
            if let Some(after) = rest.strip_prefix("-.") {
                dash = Some(Dash::DashDot);
                rest = after;
                continue;
            }
            let mut chars = rest.chars();
            let Some(ch) = chars.next() else {
                break;
            };
            match ch {
                '-' => dash = Some(Dash::Solid),
                ':' => dash = Some(Dash::Dotted),
                _ => {
                    if let Some(shape) = MarkerShape::from_char(ch) {
                        marker = Some(shape);
                    }
                }
            }
            rest = chars.as_str();
        }
        if dash.is_none() && marker.is_none() {
            dash = Some(Dash::Solid);
        }
        Self { dash, marker }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_and_dash_are_split() {
        let style = LineStyle::parse("x--");
        assert_eq!(style.marker, Some(MarkerShape::Cross));
        assert_eq!(style.dash, Some(Dash::Dashed));
    }

    #[test]
    fn marker_only_format_draws_no_line() {
        let style = LineStyle::parse("bo");
        assert_eq!(style.marker, Some(MarkerShape::Circle));
        assert_eq!(style.dash, None);
    }

    #[test]
    fn empty_format_is_a_solid_line() {
        let style = LineStyle::parse("");
        assert_eq!(style.dash, Some(Dash::Solid));
        assert_eq!(style.marker, None);
        assert_eq!(LineStyle::parse("-.").dash, Some(Dash::DashDot));
        assert_eq!(LineStyle::parse("-+").marker, Some(MarkerShape::Plus));
    }

    #[test]
    fn only_solid_lines_have_no_dashes() {
        assert_eq!(Dash::Solid.dash_gap(), None);
        for dash in [Dash::Dashed, Dash::Dotted, Dash::DashDot] {
            assert!(dash.dash_gap().is_some_and(|(on, off)| on > 0.0 && off > 0.0));
        }
    }
}
