use std::path::Path;

use serde_json::Value;
use tempfile::tempdir;

use super::{
    DataEntry, Figure, GOLDEN_HUE_STEP, Grid, Hsv, HueWalk, Item, Label, LineItem, Samples,
    ToolOutput, file_safe, invert_y, plain_text, prettify, to_pretty_json, write_sidecar,
};
use crate::error::{AppError, AppResult};

const FIGURE_JSON: &str = r#"{
    "title": "Congestion",
    "xLabel": "Link",
    "yLabel": "Probability",
    "fileName": "out.png",
    "w": 4,
    "h": 3,
    "dpi": 50,
    "grid": "both",
    "noLegend": false,
    "majorXTicks": 0,
    "data": [
        {"type": "line", "x": [1, 2], "y": [3, 4], "pattern": "o-", "label": "a"},
        {"type": "-histogram", "x": [1, 2, 3]},
        {"type": "boxplot", "x": [[1, 2, 3], [4, 5]]}
    ]
}"#;

fn write_file(dir: &Path, name: &str, content: &str) -> AppResult<std::path::PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, content)
        .map_err(|err| AppError::figure(format!("write failed: {}", err)))?;
    Ok(path)
}

fn read_json(path: &Path) -> AppResult<Value> {
    let text = std::fs::read_to_string(path)
        .map_err(|err| AppError::figure(format!("read failed: {}", err)))?;
    Ok(serde_json::from_str(&text)?)
}

#[test]
fn figure_reads_camel_case_description() -> AppResult<()> {
    let figure: Figure = serde_json::from_str(FIGURE_JSON)?;
    if figure.x_label != "Link" || figure.file_name != "out.png" {
        return Err(AppError::figure("Expected labels and file name"));
    }
    if figure.grid != Some(Grid::Both) || figure.major_x_ticks != Some(0) {
        return Err(AppError::figure("Expected grid and tick settings"));
    }
    if !figure.legend_hidden() {
        return Err(AppError::figure("Expected noLegend presence to hide the legend"));
    }
    if figure.pixel_size(100) != (200, 150) {
        return Err(AppError::figure(format!(
            "Unexpected pixel size {:?}",
            figure.pixel_size(100)
        )));
    }
    if figure.items().count() != 2 {
        return Err(AppError::figure("Expected two drawable items"));
    }
    match figure.data.get(1) {
        Some(DataEntry::Ignored { kind, .. }) if kind == "-histogram" => {}
        Some(DataEntry::Ignored { .. } | DataEntry::Plot(_)) | None => {
            return Err(AppError::figure("Expected the disabled item to be kept aside"));
        }
    }
    if let Some(DataEntry::Plot(Item::Boxplot(boxplot))) = figure.data.get(2)
        && boxplot.x.is_multi()
        && boxplot.x.series().len() == 2
    {
        return Ok(());
    }
    Err(AppError::figure("Expected a multi-sample boxplot"))
}

#[test]
fn defaults_apply_when_size_is_partial() -> AppResult<()> {
    let figure: Figure = serde_json::from_str(r#"{"w": 4, "data": []}"#)?;
    if figure.pixel_size(100) != (800, 600) {
        return Err(AppError::figure("Expected the 8x6 inch default"));
    }
    if figure.legend_hidden() || figure.legend_title() != "Legend" {
        return Err(AppError::figure("Expected the default legend"));
    }
    Ok(())
}

#[test]
fn ignored_items_survive_serialization() -> AppResult<()> {
    let figure: Figure = serde_json::from_str(FIGURE_JSON)?;
    let value = serde_json::to_value(&figure)?;
    let kinds: Vec<&str> = value
        .get("data")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("type").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();
    if kinds != ["line", "-histogram", "boxplot"] {
        return Err(AppError::figure(format!("Unexpected kinds {:?}", kinds)));
    }
    let again: Figure = serde_json::from_value(value)?;
    if again != figure {
        return Err(AppError::figure("Expected the description to read back equal"));
    }
    Ok(())
}

#[test]
fn hsv_conversion_covers_sectors() {
    assert_eq!(Hsv::new(0.0, 1.0, 1.0).to_rgb(), plotters::style::RGBColor(255, 0, 0));
    assert_eq!(Hsv::new(1.0 / 3.0, 1.0, 1.0).to_rgb(), plotters::style::RGBColor(0, 255, 0));
    assert_eq!(Hsv::new(2.0 / 3.0, 1.0, 1.0).to_rgb(), plotters::style::RGBColor(0, 0, 255));
    assert_eq!(Hsv::gray(0.5).to_rgb(), plotters::style::RGBColor(128, 128, 128));
}

#[test]
fn hue_walk_steps_back_by_the_golden_ratio() {
    let mut walk = HueWalk::default();
    let first = walk.next_color();
    let second = walk.next_color();
    let third = walk.next_color();
    assert!((first.0 - GOLDEN_HUE_STEP).abs() < 1e-12);
    assert!(second.0.abs() < 1e-12);
    assert!((third.0 - (1.0 - GOLDEN_HUE_STEP)).abs() < 1e-12);
    assert_eq!((first.1, first.2), (0.75, 0.95));

    let explicit = Hsv::new(0.1, 0.2, 0.3);
    assert_eq!(walk.resolve(Some(explicit)), explicit);
}

#[test]
fn labels_strip_latex_and_keep_whole_label_color() {
    let colored = Label::parse("\\textcolor[rgb]{1,0,0}{Link 3}");
    assert_eq!(colored.text, "Link 3");
    assert_eq!(colored.color, Some(plotters::style::RGBColor(255, 0, 0)));

    let mixed = Label::parse("a \\textcolor[rgb]{0,0,1}{b} c");
    assert_eq!(mixed.text, "a b c");
    assert_eq!(mixed.color, None);

    assert_eq!(plain_text("50\\% loss"), "50% loss");
    assert_eq!(Label::parse("one\ntwo").extra_lines(), 1);
}

#[test]
fn file_safe_replaces_each_escape_character() {
    // The backslash and the percent sign each become a space, next to the
    // space already in the name.
    assert_eq!(file_safe("Shaping 10\\% load"), "Shaping 10   load");
    assert_eq!(file_safe("100%"), "100 ");
    assert_eq!(file_safe("plain"), "plain");
}

#[test]
fn pretty_json_sorts_keys_with_four_spaces() -> AppResult<()> {
    let value: Value = serde_json::from_str(r#"{"b": 1, "a": {"d": 2, "c": 3}}"#)?;
    let text = to_pretty_json(&value)?;
    let expected = "{\n    \"a\": {\n        \"c\": 3,\n        \"d\": 2\n    },\n    \"b\": 1\n}";
    if text != expected {
        return Err(AppError::figure(format!("Unexpected layout:\n{}", text)));
    }
    Ok(())
}

#[test]
fn invert_y_writes_sibling_file() -> AppResult<()> {
    let dir = tempdir().map_err(|err| AppError::figure(format!("tempdir failed: {}", err)))?;
    let input = write_file(
        dir.path(),
        "plot.json",
        r#"{"data": [{"type": "line", "x": [1, 2], "y": [10, 75.5]},
                     {"type": "stacked", "x": [1], "y": [[1], [2]]}]}"#,
    )?;
    let output = invert_y(&input)?;
    let expected = dir.path().join("plot-inverted.json");
    if output != ToolOutput::Written(expected.clone()) {
        return Err(AppError::figure(format!("Unexpected output {:?}", output)));
    }
    let value = read_json(&expected)?;
    let line_y = value.pointer("/data/0/y").cloned().unwrap_or(Value::Null);
    if line_y != serde_json::json!([90.0, 24.5]) {
        return Err(AppError::figure(format!("Unexpected inverted values {}", line_y)));
    }
    let stacked_y = value.pointer("/data/1/y").cloned().unwrap_or(Value::Null);
    if stacked_y != serde_json::json!([[1], [2]]) {
        return Err(AppError::figure("Expected nested series to stay untouched"));
    }
    if read_json(&input)?.pointer("/data/0/y") != Some(&serde_json::json!([10, 75.5])) {
        return Err(AppError::figure("Expected the input to stay untouched"));
    }
    Ok(())
}

#[test]
fn prettify_prints_when_name_cannot_change() -> AppResult<()> {
    let dir = tempdir().map_err(|err| AppError::figure(format!("tempdir failed: {}", err)))?;
    let input = write_file(dir.path(), "data.txt", r#"{"z": 1, "a": 2}"#)?;
    match prettify(&input)? {
        ToolOutput::Printed(text) if text.starts_with("{\n    \"a\": 2") => Ok(()),
        ToolOutput::Printed(_) | ToolOutput::Written(_) => {
            Err(AppError::figure("Expected the text to be returned for printing"))
        }
    }
}

#[test]
fn sidecar_is_written_beside_the_image() -> AppResult<()> {
    let dir = tempdir().map_err(|err| AppError::figure(format!("tempdir failed: {}", err)))?;
    let mut figure = Figure {
        file_name: dir.path().join("chart.png").to_string_lossy().into_owned(),
        ..Figure::default()
    };
    figure.push(LineItem {
        x: vec![1.0],
        y: vec![2.0],
        ..LineItem::default()
    });
    figure.push_front(super::HistogramItem {
        x: Samples::Single(vec![1.0]),
        ..super::HistogramItem::default()
    });

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::figure(format!("runtime build failed: {}", err)))?;
    let path = runtime.block_on(write_sidecar(&figure))?;
    if path != dir.path().join("chart.png.json") {
        return Err(AppError::figure(format!("Unexpected sidecar {}", path.display())));
    }
    let again: Figure = serde_json::from_value(read_json(&path)?)?;
    if again != figure {
        return Err(AppError::figure("Expected the sidecar to read back equal"));
    }
    Ok(())
}
