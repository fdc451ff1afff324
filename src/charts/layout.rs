//! Figure geometry: font sizes, margins and text anchors.

use crate::figure::Label;

const POINTS_PER_INCH: f64 = 72.0;
const TITLE_PT: f64 = 16.0;
const AXIS_LABEL_PT: f64 = 16.0;
const TICK_LABEL_PT: f64 = 14.0;
const LEGEND_ITEM_PT: f64 = 12.0;
/// Line height of axis labels in multiples of their font size.
const LINE_SPACING: f64 = 1.25;
const EDGE_PAD_INCHES: f64 = 0.25;
const MAJOR_TICK_PT: f64 = 3.5;
const MINOR_TICK_PT: f64 = 2.0;
/// Average glyph advance when no font is available to measure with.
const CHAR_WIDTH: f64 = 0.55;
const MIN_PLOT_PX: f64 = 10.0;

/// Text and tick sizes in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSizes {
    pub title: f64,
    pub axis_label: f64,
    pub tick_label: f64,
    pub legend_item: f64,
    pub px_per_point: f64,
}

impl FontSizes {
    #[must_use]
    pub fn new(font_scale: f64, dpi: u32) -> Self {
        let px_per_point = f64::from(dpi.max(1)) / POINTS_PER_INCH;
        let scaled = |points: f64| points * font_scale * px_per_point;
        Self {
            title: scaled(TITLE_PT),
            axis_label: scaled(AXIS_LABEL_PT),
            tick_label: scaled(TICK_LABEL_PT),
            legend_item: scaled(LEGEND_ITEM_PT),
            px_per_point,
        }
    }

    #[must_use]
    pub fn major_tick(&self) -> f64 {
        MAJOR_TICK_PT * self.px_per_point
    }

    #[must_use]
    pub fn minor_tick(&self) -> f64 {
        MINOR_TICK_PT * self.px_per_point
    }
}

/// Per-character size estimate, used when the backend cannot measure text.
#[must_use]
pub fn estimate_text(text: &str, px: f64) -> (f64, f64) {
    (text.chars().count() as f64 * CHAR_WIDTH * px, px)
}

/// Size of possibly multi-line text.
pub fn text_block<M>(text: &str, px: f64, measure: &M) -> (f64, f64)
where
    M: Fn(&str, f64) -> (f64, f64),
{
    let mut width = 0.0_f64;
    let mut lines = 0usize;
    for line in text.split('\n') {
        width = width.max(measure(line, px).0);
        lines += 1;
    }
    (width, px * LINE_SPACING * lines as f64)
}

/// Bounding box of a label rotated by `degrees`.
#[must_use]
pub fn rotated_size((width, height): (f64, f64), degrees: f64) -> (f64, f64) {
    let radians = degrees.to_radians();
    let (sin, cos) = (radians.sin().abs(), radians.cos().abs());
    (width * cos + height * sin, width * sin + height * cos)
}

/// Everything placement needs to know about the figure.
#[derive(Debug, Clone, Copy)]
pub struct LayoutRequest<'a> {
    pub size: (u32, u32),
    pub dpi: u32,
    pub title: Option<&'a str>,
    pub x_label: &'a Label,
    pub y_label: &'a Label,
    pub x_tick_labels: &'a [String],
    pub y_tick_labels: &'a [String],
    pub x_rotation: f64,
    pub y_rotation: f64,
}

/// Pixel room kept free on each side of the plotting area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margins {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

/// Margins plus the anchor points of the surrounding text.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureLayout {
    pub margins: Margins,
    pub title_at: (f64, f64),
    pub x_label_at: (f64, f64),
    pub y_label_at: (f64, f64),
}

fn to_px(value: f64) -> u32 {
    value.round().max(0.0) as u32
}

/// Reserves the margins around the axes.
///
/// The left margin holds the y label lines and the widest y tick label, the
/// bottom margin the x label lines and the tallest x tick label, the top the
/// title. A quarter inch is kept free on the right and on top.
pub fn plan_layout<M>(request: &LayoutRequest<'_>, fonts: &FontSizes, measure: &M) -> FigureLayout
where
    M: Fn(&str, f64) -> (f64, f64),
{
    let (width, height) = (f64::from(request.size.0), f64::from(request.size.1));
    let dpi = f64::from(request.dpi.max(1));
    let axis_line = fonts.axis_label * LINE_SPACING;
    let edge_pad = EDGE_PAD_INCHES * dpi;

    let widest_y_tick = request
        .y_tick_labels
        .iter()
        .map(|label| {
            let size = text_block(label, fonts.tick_label, measure);
            rotated_size(size, request.y_rotation).0
        })
        .fold(0.0, f64::max);
    let tallest_x_tick = request
        .x_tick_labels
        .iter()
        .map(|label| {
            let size = text_block(label, fonts.tick_label, measure);
            rotated_size(size, request.x_rotation).1
        })
        .fold(0.0, f64::max);

    let y_extra = request.y_label.extra_lines() as f64;
    let x_extra = request.x_label.extra_lines() as f64;
    let mut left = (2.0 + y_extra) * axis_line + widest_y_tick;
    let mut bottom = (1.75 + x_extra) * axis_line + tallest_x_tick;
    let title_room = match request.title {
        Some(title) if !title.is_empty() => fonts.title * 1.5,
        Some(_) | None => 0.0,
    };
    let mut top = edge_pad + title_room;
    let mut right = edge_pad;

    if width - left - right < MIN_PLOT_PX {
        left = (width - MIN_PLOT_PX).max(0.0) / 2.0;
        right = left;
    }
    if height - top - bottom < MIN_PLOT_PX {
        top = (height - MIN_PLOT_PX).max(0.0) / 2.0;
        bottom = top;
    }

    FigureLayout {
        title_at: (width / 2.0, edge_pad.min(top) / 2.0 + title_room / 2.0),
        x_label_at: (
            (left + width - right) / 2.0,
            height - (1.0 + 0.5 * x_extra) * fonts.axis_label,
        ),
        y_label_at: (
            (0.75 + 0.5 * y_extra) * axis_line,
            (top + height - bottom) / 2.0,
        ),
        margins: Margins {
            left: to_px(left),
            right: to_px(right),
            top: to_px(top),
            bottom: to_px(bottom),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request<'a>(
        x_label: &'a Label,
        y_label: &'a Label,
        y_ticks: &'a [String],
    ) -> LayoutRequest<'a> {
        LayoutRequest {
            size: (800, 600),
            dpi: 72,
            title: None,
            x_label,
            y_label,
            x_tick_labels: &[],
            y_tick_labels: y_ticks,
            x_rotation: 0.0,
            y_rotation: 0.0,
        }
    }

    #[test]
    fn fonts_scale_with_dpi_and_font_scale() {
        let fonts = FontSizes::new(1.5, 144);
        assert_eq!(fonts.axis_label, 48.0);
        assert_eq!(fonts.legend_item, 36.0);
    }

    #[test]
    fn margins_grow_with_label_lines_and_tick_width() {
        let fonts = FontSizes::new(1.0, 72);
        let one = Label::parse("y");
        let two = Label::parse("Probability\n(truth)");
        let x = Label::parse("x");
        let ticks = vec!["100".to_owned()];

        let base = plan_layout(&request(&x, &one, &[]), &fonts, &estimate_text);
        let taller = plan_layout(&request(&x, &two, &[]), &fonts, &estimate_text);
        let wider = plan_layout(&request(&x, &one, &ticks), &fonts, &estimate_text);

        assert_eq!(base.margins.left, 40);
        assert_eq!(taller.margins.left, 60);
        assert!(wider.margins.left > base.margins.left);
        assert_eq!(base.margins.right, 18);
        assert_eq!(base.margins.bottom, 35);
        assert_eq!(base.margins.top, 18);
    }

    #[test]
    fn tiny_figures_keep_a_minimal_plot_area() {
        let fonts = FontSizes::new(1.0, 72);
        let label = Label::parse("x");
        let mut small = request(&label, &label, &[]);
        small.size = (30, 30);
        let layout = plan_layout(&small, &fonts, &estimate_text);
        let margins = layout.margins;
        assert_eq!(margins.left + margins.right, 20);
        assert_eq!(margins.top + margins.bottom, 20);
    }

    #[test]
    fn rotation_swaps_extents() {
        let (w, h) = rotated_size((30.0, 10.0), 90.0);
        assert!((w - 10.0).abs() < 1e-9);
        assert!((h - 30.0).abs() < 1e-9);
    }
}
