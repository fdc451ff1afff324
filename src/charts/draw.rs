//! Figure painting on a plotters chart.
//!
//! The plot area is a `ChartContext` over two [`TickAxis`] coordinates, so the
//! grid, the axes, every series and the legend go through plotters. The
//! painter covers what plotters cannot lay out itself: rotated and multi-line
//! text and hatch fills.

use std::cell::Cell;
use std::ops::Range;

use plotters::coord::Shift;
use plotters::element::{DashedPathElement, Drawable, PointCollection};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_backend::{BackendCoord, DrawingErrorKind};
use tracing::warn;

use crate::figure::{Figure, Label, plain_text};

use super::axis::TickAxis;
use super::layout::{FigureLayout, FontSizes, LayoutRequest, plan_layout};
use super::legend::{Handle, handle_area, handle_length, legend_margin, legend_rows};
use super::scene::{Hatch, MARKER_SIZE, Mark, Scene};
use super::style::{Dash, MarkerShape};
use super::ticks::AxisTicks;

pub type PaintResult<DB> = Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<TickAxis, TickAxis>>;

const FONT_FAMILY: &str = "sans-serif";
const AXES_LINE_WIDTH: u32 = 1;
const GRID_GRAY: u8 = 176;
const HATCH_SPACING_PT: f64 = 12.0;
const HATCH_LINE_WIDTH: u32 = 1;
const TEXT_LINE_SPACING: f64 = 1.25;
/// Labels rotated at least this far are drawn with a font transform;
/// smaller angles are laid out glyph by glyph along a slanted baseline.
const QUARTER_TURN_THRESHOLD: f64 = 60.0;

fn round_px(value: f64) -> i32 {
    // Clamped to a range every backend accepts.
    value.round().clamp(-1.0e6, 1.0e6) as i32
}

fn to_backend((x, y): (f64, f64)) -> BackendCoord {
    (round_px(x), round_px(y))
}

fn stroke_px(width_px: f64) -> u32 {
    width_px.round().clamp(1.0, 1000.0) as u32
}

/// Pixel rectangle with `left <= right` and `top <= bottom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PixelRect {
    #[must_use]
    pub fn spanning(a: BackendCoord, b: BackendCoord) -> Self {
        Self {
            left: f64::from(a.0.min(b.0)),
            top: f64::from(a.1.min(b.1)),
            right: f64::from(a.0.max(b.0)),
            bottom: f64::from(a.1.max(b.1)),
        }
    }

    fn from_ranges((xs, ys): &(Range<i32>, Range<i32>)) -> Self {
        Self::spanning((xs.start, ys.start), (xs.end, ys.end))
    }

    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let rect = Self {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        };
        (rect.left < rect.right && rect.top < rect.bottom).then_some(rect)
    }
}

/// Hatch strokes over `rect`. The diagonals sit on a grid `spacing` pixels
/// apart shared by every rectangle, so neighbouring bars line up.
#[must_use]
pub fn hatch_segments(rect: &PixelRect, hatch: Hatch, spacing: f64) -> Vec<[(f64, f64); 2]> {
    if spacing <= 0.0 {
        return Vec::new();
    }
    let (lo, hi) = match hatch {
        Hatch::Forward => (rect.left + rect.top, rect.right + rect.bottom),
        Hatch::Backward => (rect.left - rect.bottom, rect.right - rect.top),
    };
    let first = (lo / spacing).ceil() as i64;
    let last = (hi / spacing).floor() as i64;
    (first..=last)
        .filter_map(|step| {
            let c = step as f64 * spacing;
            let (x0, x1, y_at): (f64, f64, fn(f64, f64) -> f64) = match hatch {
                // x + y = c
                Hatch::Forward => (
                    rect.left.max(c - rect.bottom),
                    rect.right.min(c - rect.top),
                    |c, x| c - x,
                ),
                // x - y = c
                Hatch::Backward => (
                    rect.left.max(c + rect.top),
                    rect.right.min(c + rect.bottom),
                    |c, x| x - c,
                ),
            };
            (x0 < x1).then(|| [(x0, y_at(c, x0)), (x1, y_at(c, x1))])
        })
        .collect()
}

/// Hatch strokes as one element, so they can be part of a legend handle.
struct HatchLines {
    points: Vec<BackendCoord>,
    style: ShapeStyle,
}

impl HatchLines {
    fn new(segments: &[[(f64, f64); 2]], style: ShapeStyle) -> Self {
        Self {
            points: segments
                .iter()
                .flat_map(|segment| segment.map(to_backend))
                .collect(),
            style,
        }
    }
}

impl<'a> PointCollection<'a, BackendCoord> for &'a HatchLines {
    type Point = &'a BackendCoord;
    type IntoIter = &'a [BackendCoord];

    fn point_iter(self) -> Self::IntoIter {
        &self.points
    }
}

impl<DB: DrawingBackend> Drawable<DB> for HatchLines {
    fn draw<I: Iterator<Item = BackendCoord>>(
        &self,
        mut points: I,
        backend: &mut DB,
        _parent_dim: (u32, u32),
    ) -> Result<(), DrawingErrorKind<DB::ErrorType>> {
        while let (Some(from), Some(to)) = (points.next(), points.next()) {
            backend.draw_line(from, to, &self.style)?;
        }
        Ok(())
    }
}

/// Outline of a filled marker around the origin, in units of the marker
/// radius. `None` for shapes drawn as circles or strokes.
#[must_use]
pub fn marker_outline(shape: MarkerShape) -> Option<Vec<(f64, f64)>> {
    match shape {
        MarkerShape::Square => Some(vec![(-0.85, -0.85), (0.85, -0.85), (0.85, 0.85), (-0.85, 0.85)]),
        MarkerShape::TriangleUp => Some(vec![(0.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]),
        MarkerShape::TriangleDown => Some(vec![(0.0, 1.0), (1.0, -1.0), (-1.0, -1.0)]),
        MarkerShape::Diamond => Some(vec![(0.0, -1.0), (0.6, 0.0), (0.0, 1.0), (-0.6, 0.0)]),
        MarkerShape::Star => Some(
            (0..10)
                .map(|k| {
                    let angle = std::f64::consts::PI * f64::from(k) / 5.0;
                    let radius = if k % 2 == 0 { 1.0 } else { 0.4 };
                    (radius * angle.sin(), -radius * angle.cos())
                })
                .collect(),
        ),
        MarkerShape::Circle | MarkerShape::Point | MarkerShape::Plus | MarkerShape::Cross => None,
    }
}

fn offset((x, y): BackendCoord, (dx, dy): BackendCoord) -> BackendCoord {
    (x + dx, y + dy)
}

/// Draws one marker centered on `center` with plotters' own shapes.
fn draw_marker<DB: DrawingBackend>(
    center: BackendCoord,
    shape: MarkerShape,
    color: RGBColor,
    radius: f64,
    backend: &mut DB,
    parent_dim: (u32, u32),
) -> Result<(), DrawingErrorKind<DB::ErrorType>> {
    let r = round_px(radius).max(1);
    let dot = |size: i32| Circle::new(center, size, color.filled());
    let arms = match shape {
        MarkerShape::Circle => return dot(r).draw(std::iter::once(center), backend, parent_dim),
        MarkerShape::Point => {
            return dot((r / 2).max(1)).draw(std::iter::once(center), backend, parent_dim);
        }
        MarkerShape::Plus => [[(-r, 0), (r, 0)], [(0, -r), (0, r)]],
        MarkerShape::Cross => {
            let d = round_px(radius * std::f64::consts::FRAC_1_SQRT_2).max(1);
            [[(-d, -d), (d, d)], [(-d, d), (d, -d)]]
        }
        MarkerShape::Square
        | MarkerShape::TriangleUp
        | MarkerShape::TriangleDown
        | MarkerShape::Star
        | MarkerShape::Diamond => {
            let corners = marker_outline(shape)
                .unwrap_or_default()
                .into_iter()
                .map(|(dx, dy)| offset(center, to_backend((dx * radius, dy * radius))));
            return Polygon::new(Vec::<BackendCoord>::new(), color.filled()).draw(
                corners,
                backend,
                parent_dim,
            );
        }
    };
    let path = PathElement::new(Vec::<BackendCoord>::new(), color.stroke_width(1));
    for [from, to] in arms {
        path.draw(
            [offset(center, from), offset(center, to)].into_iter(),
            backend,
            parent_dim,
        )?;
    }
    Ok(())
}

/// A data marker; `radius` is in pixels from the center to the tips.
struct Marker<C> {
    at: C,
    shape: MarkerShape,
    color: RGBColor,
    radius: f64,
}

impl<'a, C> PointCollection<'a, C> for &'a Marker<C> {
    type Point = &'a C;
    type IntoIter = std::iter::Once<&'a C>;

    fn point_iter(self) -> Self::IntoIter {
        std::iter::once(&self.at)
    }
}

impl<C, DB: DrawingBackend> Drawable<DB> for Marker<C> {
    fn draw<I: Iterator<Item = BackendCoord>>(
        &self,
        mut points: I,
        backend: &mut DB,
        parent_dim: (u32, u32),
    ) -> Result<(), DrawingErrorKind<DB::ErrorType>> {
        match points.next() {
            Some(center) => draw_marker(center, self.shape, self.color, self.radius, backend, parent_dim),
            None => Ok(()),
        }
    }
}

/// Pixel sizes of the legend handles.
#[derive(Debug, Clone, Copy)]
struct HandleSizes {
    length: i32,
    half_height: i32,
    px_per_point: f64,
    hatch_spacing: f64,
}

impl HandleSizes {
    fn new(fonts: &FontSizes) -> Self {
        Self {
            length: round_px(handle_length(fonts)),
            half_height: round_px(fonts.legend_item * 0.35).max(1),
            px_per_point: fonts.px_per_point,
            hatch_spacing: (HATCH_SPACING_PT * fonts.px_per_point).max(2.0),
        }
    }
}

/// Legend sample whose row starts at `at`, the left end of the handle.
struct LegendHandle {
    at: BackendCoord,
    handle: Handle,
    sizes: HandleSizes,
}

impl<'a> PointCollection<'a, BackendCoord> for &'a LegendHandle {
    type Point = &'a BackendCoord;
    type IntoIter = std::iter::Once<&'a BackendCoord>;

    fn point_iter(self) -> Self::IntoIter {
        std::iter::once(&self.at)
    }
}

impl<DB: DrawingBackend> Drawable<DB> for LegendHandle {
    fn draw<I: Iterator<Item = BackendCoord>>(
        &self,
        mut points: I,
        backend: &mut DB,
        parent_dim: (u32, u32),
    ) -> Result<(), DrawingErrorKind<DB::ErrorType>> {
        let Some(start) = points.next() else {
            return Ok(());
        };
        let sizes = self.sizes;
        let end = offset(start, (sizes.length, 0));
        match self.handle {
            Handle::Line {
                color,
                width,
                dash,
                marker,
            } => {
                let width_px = width * sizes.px_per_point;
                let style = color.stroke_width(stroke_px(width_px));
                match dash.filter(|_| width > 0.0).map(Dash::dash_gap) {
                    Some(Some((on, off))) => {
                        let unit = width_px.max(1.0);
                        DashedPathElement::new(
                            std::iter::empty::<BackendCoord>(),
                            stroke_px(on * unit),
                            stroke_px(off * unit),
                            style,
                        )
                        .draw([start, end].into_iter(), backend, parent_dim)?;
                    }
                    Some(None) => {
                        PathElement::new(Vec::<BackendCoord>::new(), style).draw(
                            [start, end].into_iter(),
                            backend,
                            parent_dim,
                        )?;
                    }
                    None => {}
                }
                if let Some(shape) = marker {
                    let center = offset(start, (sizes.length / 2, 0));
                    let radius = MARKER_SIZE / 2.0 * sizes.px_per_point;
                    draw_marker(center, shape, color, radius, backend, parent_dim)?;
                }
                Ok(())
            }
            Handle::Patch { fill, hatch } => {
                let top_left = offset(start, (0, -sizes.half_height));
                let bottom_right = offset(end, (0, sizes.half_height));
                Rectangle::new([(0, 0), (0, 0)], fill.filled()).draw(
                    [top_left, bottom_right].into_iter(),
                    backend,
                    parent_dim,
                )?;
                if let Some(hatch) = hatch {
                    let patch = PixelRect::spanning(top_left, bottom_right);
                    let lines = HatchLines::new(
                        &hatch_segments(&patch, hatch, sizes.hatch_spacing),
                        WHITE.stroke_width(HATCH_LINE_WIDTH),
                    );
                    lines.draw(lines.points.iter().copied(), backend, parent_dim)?;
                }
                Ok(())
            }
        }
    }
}

/// Draws text on the root area, tolerating missing fonts.
pub struct Painter<'a, DB: DrawingBackend> {
    area: &'a DrawingArea<DB, Shift>,
    fonts: FontSizes,
    font_warned: Cell<bool>,
}

impl<'a, DB: DrawingBackend> Painter<'a, DB> {
    #[must_use]
    pub const fn new(area: &'a DrawingArea<DB, Shift>, fonts: FontSizes) -> Self {
        Self {
            area,
            fonts,
            font_warned: Cell::new(false),
        }
    }

    /// Text extent in pixels; falls back to a per-character estimate.
    pub fn measure(&self, text: &str, px: f64) -> (f64, f64) {
        if text.is_empty() {
            return (0.0, px);
        }
        let style = TextStyle::from((FONT_FAMILY, px).into_font());
        match self.area.estimate_text_size(text, &style) {
            Ok((w, h)) => (f64::from(w), f64::from(h)),
            Err(_) => super::layout::estimate_text(text, px),
        }
    }

    /// `Ok(false)` when `result` failed for lack of a usable font.
    fn text_drawn(
        &self,
        result: PaintResult<DB>,
    ) -> Result<bool, DrawingAreaErrorKind<DB::ErrorType>> {
        match result {
            Err(DrawingAreaErrorKind::BackendError(DrawingErrorKind::FontError(err))) => {
                if !self.font_warned.replace(true) {
                    warn!("Text skipped, no usable font: {}", err);
                }
                Ok(false)
            }
            Err(err) => Err(err),
            Ok(()) => Ok(true),
        }
    }

    fn tolerate_fonts(&self, result: PaintResult<DB>) -> PaintResult<DB> {
        self.text_drawn(result).map(|_| ())
    }

    fn text_style(px: f64, color: RGBColor, pos: Pos) -> TextStyle<'static> {
        (FONT_FAMILY, px).into_font().color(&color).pos(pos)
    }

    /// One line of text anchored at `at`.
    pub fn text(
        &self,
        text: &str,
        at: (f64, f64),
        px: f64,
        color: RGBColor,
        pos: Pos,
    ) -> PaintResult<DB> {
        if text.is_empty() {
            return Ok(());
        }
        let style = Self::text_style(px, color, pos);
        let result = self
            .area
            .draw(&Text::new(text.to_owned(), to_backend(at), style));
        self.tolerate_fonts(result)
    }

    /// Text turned a quarter turn, with its rotated box's upper left corner
    /// at `corner`. `counter_clockwise` reads bottom to top.
    pub fn quarter_turn_text(
        &self,
        text: &str,
        corner: (f64, f64),
        px: f64,
        color: RGBColor,
        counter_clockwise: bool,
    ) -> PaintResult<DB> {
        if text.is_empty() {
            return Ok(());
        }
        let (w, h) = self.measure(text, px);
        let (anchor, transform) = if counter_clockwise {
            ((corner.0, corner.1 + w), FontTransform::Rotate270)
        } else {
            ((corner.0 + h, corner.1), FontTransform::Rotate90)
        };
        let style = Self::text_style(px, color, Pos::new(HPos::Left, VPos::Top)).transform(transform);
        let result = self
            .area
            .draw(&Text::new(text.to_owned(), to_backend(anchor), style));
        self.tolerate_fonts(result)
    }

    /// Glyph by glyph along a baseline leaving `start` at `degrees`
    /// (counter-clockwise).
    pub fn slanted_text(
        &self,
        text: &str,
        start: (f64, f64),
        degrees: f64,
        px: f64,
        color: RGBColor,
    ) -> PaintResult<DB> {
        let radians = degrees.to_radians();
        let (dx, dy) = (radians.cos(), -radians.sin());
        let mut advance = 0.0;
        let mut glyph = [0u8; 4];
        for ch in text.chars() {
            let glyph_text: &str = ch.encode_utf8(&mut glyph);
            let at = (start.0 + dx * advance, start.1 + dy * advance);
            self.text(
                glyph_text,
                at,
                px,
                color,
                Pos::new(HPos::Left, VPos::Bottom),
            )?;
            advance += self.measure(glyph_text, px).0;
        }
        Ok(())
    }
}

/// Everything needed to paint one figure.
#[derive(Debug, Clone)]
pub struct ChartPlan<'a> {
    pub figure: &'a Figure,
    pub scene: &'a Scene,
    pub x_ticks: AxisTicks,
    pub y_ticks: AxisTicks,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub size: (u32, u32),
    pub dpi: u32,
    pub fonts: FontSizes,
}

/// Tick labels plotters cannot place: rotated or spanning several lines.
fn needs_own_labels(labels: &[String], rotation: f64) -> bool {
    rotation != 0.0 || labels.iter().any(|label| label.contains('\n'))
}

/// Paints a whole figure: grid, marks, axes, labels, title and legend.
///
/// # Errors
///
/// Returns the backend error of the first failed drawing call. Missing fonts
/// are not an error: the text is skipped with a warning.
pub fn paint_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    plan: &ChartPlan<'_>,
) -> PaintResult<DB> {
    root.fill(&WHITE)?;
    let painter = Painter::new(root, plan.fonts);
    let figure = plan.figure;

    let x_label = Label::parse(&figure.x_label);
    let y_label = Label::parse(&figure.y_label);
    let title = figure.title.as_deref().map(Label::parse);
    let x_tick_labels: Vec<String> = plan.x_ticks.labels.iter().map(|l| plain_text(l)).collect();
    let y_tick_labels: Vec<String> = plan.y_ticks.labels.iter().map(|l| plain_text(l)).collect();
    let x_rotation = figure.x_tick_rotation.unwrap_or(0.0);
    let y_rotation = figure.y_tick_rotation.unwrap_or(0.0);

    let layout = plan_layout(
        &LayoutRequest {
            size: plan.size,
            dpi: plan.dpi,
            title: title.as_ref().map(|title| title.text.as_str()),
            x_label: &x_label,
            y_label: &y_label,
            x_tick_labels: &x_tick_labels,
            y_tick_labels: &y_tick_labels,
            x_rotation,
            y_rotation,
        },
        &plan.fonts,
        &|text: &str, px: f64| painter.measure(text, px),
    );
    let own_x_labels = needs_own_labels(&x_tick_labels, x_rotation);
    let own_y_labels = needs_own_labels(&y_tick_labels, 0.0);

    let margins = layout.margins;
    let mut chart = ChartBuilder::on(root)
        .margin_top(margins.top)
        .margin_right(margins.right)
        .x_label_area_size(margins.bottom)
        .y_label_area_size(margins.left)
        .build_cartesian_2d(
            TickAxis::new(plan.x_range, &plan.x_ticks, x_tick_labels),
            TickAxis::new(plan.y_range, &plan.y_ticks, y_tick_labels),
        )?;

    paint_grid(&mut chart, figure)?;
    for mark in &plan.scene.marks {
        paint_mark(&mut chart, root, &plan.fonts, mark)?;
    }
    let pixels = chart.plotting_area().get_pixel_range();
    mask_outside(root, &pixels)?;

    paint_axes(&mut chart, &painter, own_x_labels, own_y_labels)?;
    let (xs, ys) = &pixels;
    root.draw(&Rectangle::new(
        [(xs.start, ys.start), (xs.end, ys.end)],
        BLACK.stroke_width(AXES_LINE_WIDTH),
    ))?;
    if own_x_labels {
        paint_x_tick_labels(&chart, &painter, x_rotation, ys.end)?;
    }
    if own_y_labels {
        paint_y_tick_labels(&chart, &painter, xs.start)?;
    }
    paint_titles(&painter, &layout, &x_label, &y_label, title.as_ref())?;

    if !figure.legend_hidden() {
        paint_legend(&mut chart, &painter, plan)?;
    }
    Ok(())
}

fn paint_grid<DB: DrawingBackend>(chart: &mut Chart<'_, DB>, figure: &Figure) -> PaintResult<DB> {
    let Some(grid) = figure.grid else {
        return Ok(());
    };
    let gray = RGBColor(GRID_GRAY, GRID_GRAY, GRID_GRAY);
    let line = |shown: bool| {
        if shown {
            gray.stroke_width(1)
        } else {
            ShapeStyle::from(TRANSPARENT)
        }
    };
    chart
        .configure_mesh()
        .disable_axes()
        .bold_line_style(line(grid.major()))
        .light_line_style(line(grid.minor()))
        .draw()
}

fn paint_mark<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    root: &DrawingArea<DB, Shift>,
    fonts: &FontSizes,
    mark: &Mark,
) -> PaintResult<DB> {
    let px = |points: f64| points * fonts.px_per_point;
    match mark {
        Mark::Line {
            points,
            stroke,
            dash,
        } => {
            if stroke.width <= 0.0 || points.len() < 2 {
                return Ok(());
            }
            let width = px(stroke.width);
            let style = stroke.color.stroke_width(stroke_px(width));
            match dash.dash_gap() {
                None => {
                    chart.draw_series(LineSeries::new(points.iter().copied(), style))?;
                }
                Some((on, off)) => {
                    let unit = width.max(1.0);
                    chart.draw_series(DashedLineSeries::new(
                        points.iter().copied(),
                        stroke_px(on * unit),
                        stroke_px(off * unit),
                        style,
                    ))?;
                }
            }
            Ok(())
        }
        Mark::Markers {
            points,
            shape,
            color,
        } => {
            let radius = px(MARKER_SIZE / 2.0);
            chart.draw_series(
                points
                    .iter()
                    .map(|&at| Marker {
                        at,
                        shape: *shape,
                        color: *color,
                        radius,
                    }),
            )?;
            Ok(())
        }
        Mark::Rect {
            corners,
            fill,
            edge,
            hatch,
        } => {
            let [a, b] = *corners;
            if let Some(fill) = fill {
                chart.draw_series(std::iter::once(Rectangle::new([a, b], fill.filled())))?;
            }
            if let Some(hatch) = hatch {
                let color = edge.map_or(BLACK, |edge| edge.color);
                let bar = PixelRect::spanning(chart.backend_coord(&a), chart.backend_coord(&b));
                let plot = PixelRect::from_ranges(&chart.plotting_area().get_pixel_range());
                if let Some(visible) = bar.intersect(&plot) {
                    let spacing = px(HATCH_SPACING_PT).max(2.0);
                    let segments = hatch_segments(&visible, *hatch, spacing);
                    root.draw(&HatchLines::new(
                        &segments,
                        color.stroke_width(HATCH_LINE_WIDTH),
                    ))?;
                }
            }
            if let Some(edge) = edge.filter(|edge| edge.width > 0.0) {
                let style = edge.color.stroke_width(stroke_px(px(edge.width)));
                chart.draw_series(std::iter::once(Rectangle::new([a, b], style)))?;
            }
            Ok(())
        }
        Mark::Polygon {
            points,
            fill,
            edge,
        } => {
            chart.draw_series(std::iter::once(Polygon::new(points.clone(), fill.filled())))?;
            if let Some(edge) = edge.filter(|edge| edge.width > 0.0) {
                let mut outline = points.clone();
                if let Some(&first) = points.first() {
                    outline.push(first);
                }
                let style = edge.color.stroke_width(stroke_px(px(edge.width)));
                chart.draw_series(std::iter::once(PathElement::new(outline, style)))?;
            }
            Ok(())
        }
    }
}

/// Plotters does not clip series to the plotting area: whatever spilled into
/// the margins is painted over before the axes go in.
fn mask_outside<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    (xs, ys): &(Range<i32>, Range<i32>),
) -> PaintResult<DB> {
    let (width, height) = root.dim_in_pixel();
    let width = i32::try_from(width).unwrap_or(i32::MAX);
    let height = i32::try_from(height).unwrap_or(i32::MAX);
    let bands = [
        [(0, 0), (width, ys.start - 1)],
        [(0, ys.end), (width, height)],
        [(0, ys.start), (xs.start - 1, ys.end)],
        [(xs.end, ys.start), (width, ys.end)],
    ];
    for band in bands {
        root.draw(&Rectangle::new(band, WHITE.filled()))?;
    }
    Ok(())
}

fn paint_axes<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    painter: &Painter<'_, DB>,
    own_x_labels: bool,
    own_y_labels: bool,
) -> PaintResult<DB> {
    let fonts = painter.fonts;
    let tick = round_px(fonts.major_tick()).max(1);
    let blank = |_: &f64| String::new();
    let drawn = {
        let label_font = (FONT_FAMILY, fonts.tick_label).into_font();
        let mut mesh = chart.configure_mesh();
        mesh.disable_mesh()
            .axis_style(BLACK.stroke_width(AXES_LINE_WIDTH))
            .x_label_style(label_font.clone())
            .y_label_style(label_font)
            .set_all_tick_mark_size(tick);
        if own_x_labels {
            mesh.x_label_formatter(&blank);
        }
        if own_y_labels {
            mesh.y_label_formatter(&blank);
        }
        painter.text_drawn(mesh.draw())?
    };
    if !drawn {
        // Axis lines alone, then the major ticks the mesh dropped with the
        // labels.
        chart
            .configure_mesh()
            .disable_mesh()
            .axis_style(BLACK.stroke_width(AXES_LINE_WIDTH))
            .x_labels(0)
            .y_labels(0)
            .draw()?;
        let (x_major, y_major) = {
            let spec = chart.as_coord_spec();
            (spec.x_spec().major().to_vec(), spec.y_spec().major().to_vec())
        };
        paint_tick_marks(chart, painter.area, (x_major.as_slice(), y_major.as_slice()), tick)?;
    }
    let (x_minor, y_minor) = {
        let spec = chart.as_coord_spec();
        (spec.x_spec().minor().to_vec(), spec.y_spec().minor().to_vec())
    };
    paint_tick_marks(
        chart,
        painter.area,
        (x_minor.as_slice(), y_minor.as_slice()),
        round_px(fonts.minor_tick()).max(1),
    )
}

/// Outward tick marks on the bottom and left axes, matching the mesh's own.
fn paint_tick_marks<DB: DrawingBackend>(
    chart: &Chart<'_, DB>,
    root: &DrawingArea<DB, Shift>,
    (x_ticks, y_ticks): (&[f64], &[f64]),
    length: i32,
) -> PaintResult<DB> {
    let (xs, ys) = chart.plotting_area().get_pixel_range();
    let style = BLACK.stroke_width(AXES_LINE_WIDTH);
    for &x in x_ticks {
        let (px, _) = chart.backend_coord(&(x, 0.0));
        root.draw(&PathElement::new(vec![(px, ys.end), (px, ys.end + length)], style))?;
    }
    for &y in y_ticks {
        let (_, py) = chart.backend_coord(&(0.0, y));
        root.draw(&PathElement::new(
            vec![(xs.start - 1 - length, py), (xs.start - 1, py)],
            style,
        ))?;
    }
    Ok(())
}

/// Rotated labels end at their tick (positive angles) or start there
/// (negative angles).
fn paint_x_tick_labels<DB: DrawingBackend>(
    chart: &Chart<'_, DB>,
    painter: &Painter<'_, DB>,
    rotation: f64,
    axis_y: i32,
) -> PaintResult<DB> {
    let fonts = &painter.fonts;
    let px = fonts.tick_label;
    let top = f64::from(axis_y) + 2.0 * f64::from(round_px(fonts.major_tick()).max(1));
    let line_height = px * TEXT_LINE_SPACING;
    let axis = chart.as_coord_spec().x_spec();
    for (&tick, label) in axis.major().iter().zip(axis.labels()) {
        let x = f64::from(chart.backend_coord(&(tick, 0.0)).0);
        for (line_index, line) in label.split('\n').enumerate() {
            let shift = line_height * line_index as f64;
            if rotation == 0.0 {
                painter.text(
                    line,
                    (x, top + shift),
                    px,
                    BLACK,
                    Pos::new(HPos::Center, VPos::Top),
                )?;
                continue;
            }
            let (w, h) = painter.measure(line, px);
            if rotation.abs() >= QUARTER_TURN_THRESHOLD {
                let corner = if rotation > 0.0 {
                    (x - h - shift, top)
                } else {
                    (x + shift, top)
                };
                painter.quarter_turn_text(line, corner, px, BLACK, rotation > 0.0)?;
            } else {
                let radians = rotation.to_radians();
                let start = if rotation > 0.0 {
                    (x - w * radians.cos(), top + h + shift + w * radians.sin())
                } else {
                    (x, top + h + shift)
                };
                painter.slanted_text(line, start, rotation, px, BLACK)?;
            }
        }
    }
    Ok(())
}

fn paint_y_tick_labels<DB: DrawingBackend>(
    chart: &Chart<'_, DB>,
    painter: &Painter<'_, DB>,
    axis_x: i32,
) -> PaintResult<DB> {
    let fonts = &painter.fonts;
    let px = fonts.tick_label;
    let right = f64::from(axis_x) - 2.0 * f64::from(round_px(fonts.major_tick()).max(1));
    let line_height = px * TEXT_LINE_SPACING;
    let axis = chart.as_coord_spec().y_spec();
    for (&tick, label) in axis.major().iter().zip(axis.labels()) {
        let y = f64::from(chart.backend_coord(&(0.0, tick)).1);
        let lines: Vec<&str> = label.split('\n').collect();
        let first = y - line_height * (lines.len() as f64 - 1.0) / 2.0;
        for (line_index, line) in lines.into_iter().enumerate() {
            painter.text(
                line,
                (right, first + line_height * line_index as f64),
                px,
                BLACK,
                Pos::new(HPos::Right, VPos::Center),
            )?;
        }
    }
    Ok(())
}

fn label_color(label: &Label) -> RGBColor {
    label.color.unwrap_or(BLACK)
}

fn paint_titles<DB: DrawingBackend>(
    painter: &Painter<'_, DB>,
    layout: &FigureLayout,
    x_label: &Label,
    y_label: &Label,
    title: Option<&Label>,
) -> PaintResult<DB> {
    let fonts = &painter.fonts;
    let centered = Pos::new(HPos::Center, VPos::Center);
    let line_height = fonts.axis_label * TEXT_LINE_SPACING;

    let lines: Vec<&str> = x_label.lines().collect();
    let (cx, cy) = layout.x_label_at;
    let first = cy - line_height * (lines.len() as f64 - 1.0) / 2.0;
    for (index, line) in lines.into_iter().enumerate() {
        painter.text(
            line,
            (cx, first + line_height * index as f64),
            fonts.axis_label,
            label_color(x_label),
            centered,
        )?;
    }

    // Vertical label: the first line is the leftmost column.
    let lines: Vec<&str> = y_label.lines().collect();
    let (cx, cy) = layout.y_label_at;
    let first = cx - line_height * (lines.len() as f64 - 1.0) / 2.0;
    for (index, line) in lines.into_iter().enumerate() {
        let (w, h) = painter.measure(line, fonts.axis_label);
        let column = first + line_height * index as f64;
        painter.quarter_turn_text(
            line,
            (column - h / 2.0, cy - w / 2.0),
            fonts.axis_label,
            label_color(y_label),
            true,
        )?;
    }

    if let Some(title) = title {
        painter.text(
            &title.text,
            layout.title_at,
            fonts.title,
            label_color(title),
            centered,
        )?;
    }
    Ok(())
}

/// One label-only series per legend row, then the plotters series-label box
/// in the upper left corner of the axes.
fn paint_legend<'c, DB: DrawingBackend + 'c>(
    chart: &mut Chart<'c, DB>,
    painter: &Painter<'_, DB>,
    plan: &ChartPlan<'_>,
) -> PaintResult<DB> {
    let entries = &plan.scene.legend;
    let rows = legend_rows(entries, plan.figure.legend_title());
    if rows.is_empty() {
        return Ok(());
    }
    let fonts = &plan.fonts;
    let sizes = HandleSizes::new(fonts);
    let title_rows = rows.len() - entries.len();
    let mut rows = rows.into_iter();
    for title in rows.by_ref().take(title_rows) {
        chart
            .draw_series(std::iter::empty::<Rectangle<(f64, f64)>>())?
            .label(title);
    }
    for (entry, row) in entries.iter().zip(rows) {
        let handle = entry.handle;
        chart
            .draw_series(std::iter::empty::<Rectangle<(f64, f64)>>())?
            .label(row)
            .legend(move |at| LegendHandle { at, handle, sizes });
    }
    let result = chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .margin(round_px(legend_margin(fonts)))
        .legend_area_size(round_px(handle_area(fonts)))
        .label_font((FONT_FAMILY, fonts.legend_item).into_font())
        .background_style(WHITE.mix(0.5))
        .border_style(BLACK.mix(0.5))
        .draw();
    painter.tolerate_fonts(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: PixelRect = PixelRect {
        left: 0.0,
        top: 0.0,
        right: 10.0,
        bottom: 10.0,
    };

    #[test]
    fn forward_hatch_runs_bottom_left_to_top_right() {
        let segments = hatch_segments(&SQUARE, Hatch::Forward, 5.0);
        assert_eq!(segments, vec![
            [(0.0, 5.0), (5.0, 0.0)],
            [(0.0, 10.0), (10.0, 0.0)],
            [(5.0, 10.0), (10.0, 5.0)]
        ]);
    }

    #[test]
    fn backward_hatch_stays_inside_the_rectangle() {
        let segments = hatch_segments(&SQUARE, Hatch::Backward, 5.0);
        assert_eq!(segments.len(), 3);
        for [(x0, y0), (x1, y1)] in segments {
            assert!((x1 - x0 - (y1 - y0)).abs() < 1e-9);
            for (x, y) in [(x0, y0), (x1, y1)] {
                assert!((0.0..=10.0).contains(&x) && (0.0..=10.0).contains(&y));
            }
        }
        assert!(hatch_segments(&SQUARE, Hatch::Backward, 0.0).is_empty());
    }

    #[test]
    fn neighbouring_rectangles_share_the_hatch_grid() {
        let right = PixelRect {
            left: 10.0,
            ..SQUARE
        };
        let right = PixelRect {
            right: 20.0,
            ..right
        };
        let left = hatch_segments(&SQUARE, Hatch::Forward, 5.0);
        let next = hatch_segments(&right, Hatch::Forward, 5.0);
        let line_of = |[(x, y), _]: [(f64, f64); 2]| x + y;
        assert!(left.iter().all(|&s| line_of(s) % 5.0 == 0.0));
        assert!(next.iter().all(|&s| line_of(s) % 5.0 == 0.0));
    }

    #[test]
    fn rectangles_intersect_or_vanish() {
        let other = PixelRect::spanning((5, 5), (20, 20));
        assert_eq!(
            SQUARE.intersect(&other),
            Some(PixelRect {
                left: 5.0,
                top: 5.0,
                right: 10.0,
                bottom: 10.0,
            })
        );
        let far = PixelRect::spanning((30, 30), (40, 40));
        assert_eq!(SQUARE.intersect(&far), None);
    }

    #[test]
    fn filled_markers_have_outlines_within_their_radius() {
        for shape in [
            MarkerShape::Square,
            MarkerShape::TriangleUp,
            MarkerShape::TriangleDown,
            MarkerShape::Star,
            MarkerShape::Diamond,
        ] {
            let outline = marker_outline(shape).unwrap_or_default();
            assert!(outline.len() >= 3, "{:?}", shape);
            assert!(outline.iter().all(|(x, y)| x.abs() <= 1.0 && y.abs() <= 1.0));
        }
        assert_eq!(marker_outline(MarkerShape::Circle), None);
        assert_eq!(marker_outline(MarkerShape::Plus), None);
    }

    #[test]
    fn rotated_and_multi_line_labels_are_drawn_by_hand() {
        let plain = vec!["1".to_owned(), "2".to_owned()];
        let split = vec!["10\nMbps".to_owned()];
        assert!(!needs_own_labels(&plain, 0.0));
        assert!(needs_own_labels(&plain, 45.0));
        assert!(needs_own_labels(&split, 0.0));
    }
}
