use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::color::Hsv;

/// Default figure size in inches when `w`/`h` are not both given.
pub const DEFAULT_SIZE_INCHES: (f64, f64) = (8.0, 6.0);
pub const DEFAULT_DPI: u32 = 100;
pub const DEFAULT_LEGEND_TITLE: &str = "Legend";

/// Declarative figure description, read from and written to JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Figure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub x_label: String,
    #[serde(default)]
    pub y_label: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dpi: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<Grid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xmin: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xmax: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ymin: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ymax: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_format_str: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_format_str: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_ticks: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_ticks: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_tick_labels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_tick_labels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_x_ticks: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_y_ticks: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minor_x_ticks: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minor_y_ticks: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_tick_rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_tick_rotation: Option<f64>,
    /// Any value hides the legend; only presence matters.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "presence"
    )]
    pub no_legend: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend_title: Option<String>,
    #[serde(default)]
    pub data: Vec<DataEntry>,
}

fn presence<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl Figure {
    /// Pixel dimensions after applying the inch size and resolution.
    #[must_use]
    pub fn pixel_size(&self, default_dpi: u32) -> (u32, u32) {
        let (w, h) = self.size_inches();
        let dpi = f64::from(self.dpi.unwrap_or(default_dpi).max(1));
        (to_pixels(w * dpi), to_pixels(h * dpi))
    }

    #[must_use]
    pub fn size_inches(&self) -> (f64, f64) {
        match (self.w, self.h) {
            (Some(w), Some(h)) if w > 0.0 && h > 0.0 => (w, h),
            _ => DEFAULT_SIZE_INCHES,
        }
    }

    #[must_use]
    pub fn legend_hidden(&self) -> bool {
        self.no_legend.is_some()
    }

    #[must_use]
    pub fn legend_title(&self) -> &str {
        self.legend_title.as_deref().unwrap_or(DEFAULT_LEGEND_TITLE)
    }

    /// Items that will be drawn, in order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.data.iter().filter_map(|entry| match entry {
            DataEntry::Plot(item) => Some(item),
            DataEntry::Ignored { .. } => None,
        })
    }

    pub fn push(&mut self, item: impl Into<Item>) {
        self.data.push(DataEntry::Plot(item.into()));
    }

    pub fn push_front(&mut self, item: impl Into<Item>) {
        self.data.insert(0, DataEntry::Plot(item.into()));
    }
}

fn to_pixels(value: f64) -> u32 {
    if !value.is_finite() || value < 1.0 {
        return 1;
    }
    if value > f64::from(u32::MAX) {
        return u32::MAX;
    }
    // Bounded above, so the cast cannot truncate.
    value.round() as u32
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grid {
    #[default]
    #[serde(rename = "")]
    None,
    Major,
    Minor,
    Both,
}

impl Grid {
    #[must_use]
    pub const fn major(self) -> bool {
        matches!(self, Grid::Major | Grid::Both)
    }

    #[must_use]
    pub const fn minor(self) -> bool {
        matches!(self, Grid::Minor | Grid::Both)
    }
}

/// One element of `data`: a drawable item, or an entry whose `type` is not
/// recognized (for example `"-line"`, used to switch an item off).
#[derive(Debug, Clone, PartialEq)]
pub enum DataEntry {
    Plot(Item),
    Ignored { kind: String, raw: Value },
}

const KNOWN_KINDS: [&str; 6] = ["line", "bar", "stacked", "boxplot", "stem", "histogram"];

impl<'de> Deserialize<'de> for DataEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        let kind = raw
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        if KNOWN_KINDS.contains(&kind.as_str()) {
            let item = Item::deserialize(raw).map_err(D::Error::custom)?;
            return Ok(DataEntry::Plot(item));
        }
        Ok(DataEntry::Ignored { kind, raw })
    }
}

impl Serialize for DataEntry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DataEntry::Plot(item) => item.serialize(serializer),
            DataEntry::Ignored { raw, .. } => raw.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Item {
    Line(LineItem),
    Bar(BarItem),
    Stacked(StackedItem),
    Boxplot(BoxplotItem),
    Stem(StemItem),
    Histogram(HistogramItem),
}

impl Item {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Item::Line(_) => "line",
            Item::Bar(_) => "bar",
            Item::Stacked(_) => "stacked",
            Item::Boxplot(_) => "boxplot",
            Item::Stem(_) => "stem",
            Item::Histogram(_) => "histogram",
        }
    }
}

macro_rules! impl_into_item {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(impl From<$ty> for Item {
            fn from(item: $ty) -> Self {
                Item::$variant(item)
            }
        })*
    };
}

impl_into_item!(
    Line => LineItem,
    Bar => BarItem,
    Stacked => StackedItem,
    Boxplot => BoxplotItem,
    Stem => StemItem,
    Histogram => HistogramItem,
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default)]
    pub x: Vec<f64>,
    #[serde(default)]
    pub y: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Hsv>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarItem {
    #[serde(default)]
    pub x: Vec<f64>,
    #[serde(default)]
    pub y: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Hsv>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hatch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackedItem {
    #[serde(default)]
    pub x: Vec<f64>,
    #[serde(default)]
    pub y: Vec<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Palette>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxplotItem {
    #[serde(default)]
    pub x: Samples,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positions: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_color: Option<Hsv>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub median_color: Option<Hsv>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whisker_color: Option<Hsv>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_color: Option<Hsv>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outlier_color: Option<Hsv>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outlier_marker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StemItem {
    #[serde(default)]
    pub x: Vec<f64>,
    #[serde(default)]
    pub y: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Hsv>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramItem {
    #[serde(default)]
    pub x: Samples,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bins: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin_centers: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_bins: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Palette>,
}

/// A single sample list, or several of them (multi-boxplot, multi-histogram).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Samples {
    Single(Vec<f64>),
    Multi(Vec<Vec<f64>>),
}

impl Default for Samples {
    fn default() -> Self {
        Samples::Single(Vec::new())
    }
}

impl Samples {
    #[must_use]
    pub const fn is_multi(&self) -> bool {
        matches!(self, Samples::Multi(_))
    }

    /// Sample lists as slices, one per series.
    #[must_use]
    pub fn series(&self) -> Vec<&[f64]> {
        match self {
            Samples::Single(values) => vec![values.as_slice()],
            Samples::Multi(lists) => lists.iter().map(Vec::as_slice).collect(),
        }
    }

    pub fn all_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.series()
            .into_iter()
            .flat_map(|values| values.iter().copied())
    }
}

/// `"auto"` or one HSV triple per series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Palette {
    Explicit(Vec<Hsv>),
    Named(String),
}

impl Palette {
    #[must_use]
    pub fn auto() -> Self {
        Palette::Named("auto".to_owned())
    }
}

/// A single HSV triple or `"auto"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorChoice {
    Explicit(Hsv),
    Named(String),
}
