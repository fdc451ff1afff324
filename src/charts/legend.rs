//! Legend entries and the sizes of the legend box.

use plotters::style::RGBColor;

use crate::figure::Label;

use super::layout::FontSizes;
use super::scene::Hatch;
use super::style::{Dash, MarkerShape};

/// Handle length in multiples of the item font size.
const HANDLE_LENGTH: f64 = 2.0;
/// Paddings in multiples of the item font size.
const BORDER_PAD: f64 = 0.4;
const HANDLE_TEXT_PAD: f64 = 0.8;

/// Sample drawn left of a legend label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Handle {
    Line {
        color: RGBColor,
        width: f64,
        dash: Option<Dash>,
        marker: Option<MarkerShape>,
    },
    Patch {
        fill: RGBColor,
        hatch: Option<Hatch>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: Label,
    pub handle: Handle,
}

/// Padding between the legend frame and its rows.
#[must_use]
pub fn legend_margin(fonts: &FontSizes) -> f64 {
    BORDER_PAD * fonts.legend_item
}

/// Room left of the labels for the handles, gap included.
#[must_use]
pub fn handle_area(fonts: &FontSizes) -> f64 {
    (HANDLE_LENGTH + HANDLE_TEXT_PAD) * fonts.legend_item
}

#[must_use]
pub fn handle_length(fonts: &FontSizes) -> f64 {
    HANDLE_LENGTH * fonts.legend_item
}

/// One text row per legend line: the title first when set, then one row per
/// entry with its label lines joined by spaces. Empty when there are no
/// entries.
#[must_use]
pub fn legend_rows(entries: &[LegendEntry], title: &str) -> Vec<String> {
    if entries.is_empty() {
        return Vec::new();
    }
    let title = Label::parse(title);
    let mut rows = Vec::with_capacity(entries.len() + 1);
    if !title.text.is_empty() {
        rows.push(title.lines().collect::<Vec<_>>().join(" "));
    }
    rows.extend(
        entries
            .iter()
            .map(|entry| entry.label.lines().collect::<Vec<_>>().join(" ")),
    );
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str) -> LegendEntry {
        LegendEntry {
            label: Label::parse(text),
            handle: Handle::Patch {
                fill: RGBColor(0, 0, 0),
                hatch: None,
            },
        }
    }

    #[test]
    fn no_entries_no_rows() {
        assert!(legend_rows(&[], "Legend").is_empty());
    }

    #[test]
    fn title_leads_and_label_lines_are_joined() {
        let rows = legend_rows(&[entry("Shaping\n10\\%"), entry("b")], "Load");
        assert_eq!(rows, vec!["Load".to_owned(), "Shaping 10%".to_owned(), "b".to_owned()]);
        assert_eq!(legend_rows(&[entry("a")], ""), vec!["a".to_owned()]);
    }

    #[test]
    fn handle_sizes_follow_the_item_font() {
        let fonts = FontSizes::new(1.0, 72);
        assert_eq!(handle_length(&fonts), 24.0);
        assert!((handle_area(&fonts) - 33.6).abs() < 1e-9);
        assert!((legend_margin(&fonts) - 4.8).abs() < 1e-9);
    }
}
