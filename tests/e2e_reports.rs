
use std::fs;
use std::path::Path;

use tempfile::tempdir;

use support_cli::{expect_success, run_congplot};

const SEQUENCE_LOG: &str = "Experiment\tlong-policing-1\tinterval\t0.1
Non-neutral links\t4

Link sequence\tneutrality\tneutral\tlinks\t1\t2
Class\t1\t1.5\t2.5\t3.0
Class\t2\t1.0\t1.25
True class\t1\t1.0\t2.0
True class\t2\t1.5
Link sequence\tneutrality\tpolicing\tlinks\t4
Class\t1\t0.5\t0.75
Class\t2\t12.0\t14.5
True class\t1\t0.25
True class\t2\t13.0
";

const LINK_LOG: &str = "Experiment\tlong-shaping-1\tinterval\t0.1
Link\t10\tneutral
Class\t1\t1.0\t2.0\t3.0
Class\t2\t1.5\t2.5
Link\t2\tshaping
Class\t1\t0.5
Class\t2\t9.0\t11.0
";

const FIGURE: &str = r#"{"fileName": "bars.svg", "title": "Bars", "data": [{"type": "line", "x": [1, 2, 3], "y": [10, 40, 25], "label": "Loss"}]}"#;

fn temp_workspace() -> Result<tempfile::TempDir, String> {
    tempdir().map_err(|err| format!("tempdir failed: {}", err))
}

fn write(path: &Path, content: &str) -> Result<(), String> {
    fs::write(path, content).map_err(|err| format!("write {} failed: {}", path.display(), err))
}

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|err| format!("read {} failed: {}", path.display(), err))
}

#[test]
fn e2e_sequence_report_writes_images_and_descriptions() -> Result<(), String> {
    let dir = temp_workspace()?;
    write(&dir.path().join("seq.txt"), SEQUENCE_LOG)?;

    let output = run_congplot(
        dir.path(),
        [
            "seq-cong-prob",
            "--in",
            "seq.txt",
            "--out",
            "plots",
            "--graphs",
            "truth,delta",
            "--format",
            "svg",
        ],
    )?;
    expect_success(&output)?;

    let plots = dir.path().join("plots");
    for name in [
        "link-seq-cong-prob-all-truth.svg",
        "link-seq-cong-prob-all-truth.svg.json",
        "link-seq-cong-prob-all-delta.svg",
        "link-seq-cong-prob-all-truth-histogram.svg",
        "link-seq-cong-prob-all-delta-histogram.svg.json",
    ] {
        if !plots.join(name).exists() {
            return Err(format!("Missing {}", name));
        }
    }

    let sidecar = read(&plots.join("link-seq-cong-prob-all-truth.svg.json"))?;
    let value: serde_json::Value =
        serde_json::from_str(&sidecar).map_err(|err| format!("sidecar parse failed: {}", err))?;
    let labels = value
        .get("xTickLabels")
        .and_then(serde_json::Value::as_array)
        .map(Vec::len);
    if labels != Some(3) {
        return Err(format!("Unexpected tick labels in {}", sidecar));
    }
    Ok(())
}

#[test]
fn e2e_link_report_honors_no_json() -> Result<(), String> {
    let dir = temp_workspace()?;
    write(&dir.path().join("links.txt"), LINK_LOG)?;

    let output = run_congplot(
        dir.path(),
        [
            "--output-dir",
            "out",
            "--format",
            "png",
            "--no-json",
            "class-path-cong-prob",
            "--in",
            "links.txt",
        ],
    )?;
    expect_success(&output)?;

    let out = dir.path().join("out");
    if !out.join("class-path-cong-probs-links.png").exists() {
        return Err("Missing the link boxplot".to_owned());
    }
    if out.join("class-path-cong-probs-links.png.json").exists() {
        return Err("Unexpected sidecar with --no-json".to_owned());
    }
    Ok(())
}

#[test]
fn e2e_render_and_json_tools() -> Result<(), String> {
    let dir = temp_workspace()?;
    write(&dir.path().join("bars.json"), FIGURE)?;

    let output = run_congplot(dir.path(), ["render", "bars.json"])?;
    expect_success(&output)?;
    if !dir.path().join("bars.svg").exists() || dir.path().join("bars.svg.json").exists() {
        return Err("Expected only the rendered image".to_owned());
    }

    let output = run_congplot(dir.path(), ["invert-y", "bars.json"])?;
    expect_success(&output)?;
    let inverted = read(&dir.path().join("bars-inverted.json"))?;
    let value: serde_json::Value =
        serde_json::from_str(&inverted).map_err(|err| format!("parse failed: {}", err))?;
    let ys: Option<Vec<f64>> = value
        .pointer("/data/0/y")
        .and_then(serde_json::Value::as_array)
        .map(|ys| ys.iter().filter_map(serde_json::Value::as_f64).collect());
    if ys != Some(vec![90.0, 60.0, 75.0]) {
        return Err(format!("Unexpected inverted values in {}", inverted));
    }

    let output = run_congplot(dir.path(), ["prettify", "bars.json"])?;
    expect_success(&output)?;
    let pretty = read(&dir.path().join("bars-pretty.json"))?;
    if !pretty.starts_with("{\n    \"data\": [") {
        return Err(format!("Unexpected layout:\n{}", pretty));
    }
    Ok(())
}

#[test]
fn e2e_demo_lands_in_the_output_dir() -> Result<(), String> {
    let dir = temp_workspace()?;
    let output = run_congplot(dir.path(), ["render", "--output-dir", "demo"])?;
    expect_success(&output)?;
    if !dir.path().join("demo").join("figure1.png").exists() {
        return Err("Missing the demo figure".to_owned());
    }
    Ok(())
}

#[test]
fn e2e_invalid_input_fails() -> Result<(), String> {
    let dir = temp_workspace()?;
    write(&dir.path().join("seq.txt"), "Class\t1\t1.0\n")?;
    let output = run_congplot(dir.path(), ["seq-cong-prob", "--in", "seq.txt"])?;
    if output.status.success() {
        return Err("Expected a class record outside a sequence to fail".to_owned());
    }
    Ok(())
}
