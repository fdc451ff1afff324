use std::future::Future;
use std::path::Path;

use tempfile::tempdir;

use super::{Mark, OutputTarget, RenderOptions, RenderQueue, Scene, render_figure};
use crate::error::{AppError, AppResult, FigureError};
use crate::figure::{
    BarItem, Figure, HistogramItem, LineItem, Samples, StackedItem, demo_figure, sidecar_path,
};

fn run_async_test<F>(future: F) -> AppResult<()>
where
    F: Future<Output = AppResult<()>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .map_err(|err| AppError::figure(format!("Failed to build runtime: {}", err)))?;
    runtime.block_on(future)
}

fn temp_dir() -> AppResult<tempfile::TempDir> {
    tempdir().map_err(|err| AppError::figure(format!("Failed to create temp dir: {}", err)))
}

fn file_in(dir: &Path, name: &str) -> String {
    dir.join(name).to_string_lossy().into_owned()
}

fn bar(x: Vec<f64>, y: Vec<f64>) -> BarItem {
    BarItem {
        x,
        y,
        ..BarItem::default()
    }
}

#[test]
fn bars_share_slots_around_their_x() -> AppResult<()> {
    let mut figure = Figure::default();
    figure.push(bar(vec![1.0], vec![3.0]));
    figure.push(bar(vec![1.0], vec![2.0]));
    let scene = Scene::build(&figure)?;

    let lefts: Vec<f64> = scene
        .marks
        .iter()
        .filter_map(|mark| match mark {
            Mark::Rect { corners, .. } => Some(corners[0].0),
            Mark::Line { .. } | Mark::Markers { .. } | Mark::Polygon { .. } => None,
        })
        .collect();
    if lefts.len() != 2 {
        return Err(AppError::figure(format!("Expected 2 bars, got {}", lefts.len())));
    }
    if (lefts[0] - 0.6).abs() > 1e-9 || (lefts[1] - 1.0).abs() > 1e-9 {
        return Err(AppError::figure(format!("Unexpected bar slots {:?}", lefts)));
    }
    let (lo, _) = scene.y_range(&figure);
    if lo != 0.0 {
        return Err(AppError::figure("Expected bars to keep the zero baseline"));
    }
    Ok(())
}

#[test]
fn disabled_items_are_skipped() -> AppResult<()> {
    let figure = demo_figure()?;
    let scene = Scene::build(&figure)?;
    let polygons = scene
        .marks
        .iter()
        .filter(|mark| matches!(mark, Mark::Polygon { .. }))
        .count();
    if polygons != 2 || scene.marks.len() != 2 {
        return Err(AppError::figure("Expected only the stacked series"));
    }
    if scene.legend.len() != 2 {
        return Err(AppError::figure("Expected one legend entry per stacked series"));
    }
    Ok(())
}

#[test]
fn stacked_series_accumulate() -> AppResult<()> {
    let mut figure = Figure::default();
    figure.push(StackedItem {
        x: vec![0.0, 1.0],
        y: vec![vec![1.0, 2.0], vec![3.0, 4.0]],
        ..StackedItem::default()
    });
    let scene = Scene::build(&figure)?;
    if scene.y_extent.bounds() != Some((0.0, 6.0)) {
        return Err(AppError::figure(format!(
            "Unexpected stacked extent {:?}",
            scene.y_extent.bounds()
        )));
    }
    Ok(())
}

#[test]
fn mismatched_lengths_are_rejected() -> AppResult<()> {
    let mut figure = Figure::default();
    figure.push(LineItem {
        x: vec![1.0, 2.0],
        y: vec![1.0],
        ..LineItem::default()
    });
    if let Err(FigureError::LengthMismatch {
        x_len: 2, y_len: 1, ..
    }) = Scene::build(&figure)
    {
        return Ok(());
    }
    Err(AppError::figure("Expected a length mismatch"))
}

#[test]
fn histograms_own_the_x_axis_until_a_line_appears() -> AppResult<()> {
    let mut figure = Figure::default();
    figure.push(HistogramItem {
        x: Samples::Single(vec![0.5, 1.5, 1.7, 2.5]),
        bins: Some(vec![0.0, 1.0, 2.0, 3.0]),
        ..HistogramItem::default()
    });
    let scene = Scene::build(&figure)?;
    if !scene.histogram_axis() || scene.x_range(&figure) != (0.0, 3.0) {
        return Err(AppError::figure("Expected the histogram edges as x range"));
    }
    if scene.histogram_ticks.as_deref() != Some(&[0.0, 1.0, 2.0, 3.0][..]) {
        return Err(AppError::figure("Expected ticks at the bin edges"));
    }

    figure.push(LineItem {
        x: vec![0.0, 10.0],
        y: vec![0.0, 1.0],
        ..LineItem::default()
    });
    let scene = Scene::build(&figure)?;
    if scene.histogram_axis() {
        return Err(AppError::figure("Expected the line to take the x axis back"));
    }
    Ok(())
}

fn explicit_histogram(edges: Vec<f64>) -> HistogramItem {
    HistogramItem {
        x: Samples::Single(vec![0.5, 1.5]),
        bins: Some(edges),
        ..HistogramItem::default()
    }
}

fn integer_histogram() -> HistogramItem {
    HistogramItem {
        x: Samples::Single(vec![1.0, 2.0, 2.0, 3.0, 4.0]),
        n_bins: Some(4),
        ..HistogramItem::default()
    }
}

#[test]
fn later_integer_histogram_sets_the_ticks() -> AppResult<()> {
    let centers = [1.25, 2.5, 3.75, 5.0];
    let close = |ticks: Option<&[f64]>, expected: &[f64]| {
        ticks.is_some_and(|ticks| {
            ticks.len() == expected.len()
                && ticks.iter().zip(expected).all(|(a, b)| (a - b).abs() < 1e-9)
        })
    };

    let mut figure = Figure::default();
    figure.push(explicit_histogram(vec![0.0, 1.0, 2.0]));
    figure.push(integer_histogram());
    let scene = Scene::build(&figure)?;
    if !close(scene.histogram_ticks.as_deref(), &centers[..]) {
        return Err(AppError::figure(format!(
            "Expected the centers of the integer histogram, got {:?}",
            scene.histogram_ticks
        )));
    }

    let mut figure = Figure::default();
    figure.push(integer_histogram());
    figure.push(explicit_histogram(vec![0.0, 1.0, 2.0]));
    let scene = Scene::build(&figure)?;
    if !close(scene.histogram_ticks.as_deref(), &centers[..]) {
        return Err(AppError::figure("Plain edges must not replace integer centers"));
    }

    let mut figure = Figure::default();
    figure.push(explicit_histogram(vec![0.0, 1.0, 2.0]));
    figure.push(explicit_histogram(vec![0.0, 2.0, 4.0]));
    let scene = Scene::build(&figure)?;
    if !close(scene.histogram_ticks.as_deref(), &[0.0, 1.0, 2.0][..]) {
        return Err(AppError::figure("Expected the edges of the first histogram"));
    }
    Ok(())
}

#[test]
fn output_target_follows_extension() -> AppResult<()> {
    let png = OutputTarget::for_path(Path::new("out/a.png"))?;
    let svg = OutputTarget::for_path(Path::new("out/a.SVG"))?;
    if png != OutputTarget::Png(Path::new("out/a.png").to_path_buf()) {
        return Err(AppError::figure("Expected a bitmap target"));
    }
    if svg != OutputTarget::Svg(Path::new("out/a.SVG").to_path_buf()) {
        return Err(AppError::figure("Expected an SVG target"));
    }
    for name in ["a.pdf", "a.eps", "a.gif"] {
        match OutputTarget::for_path(Path::new(name)) {
            Err(FigureError::UnsupportedFormat { .. }) => {}
            Ok(_) | Err(_) => {
                return Err(AppError::figure(format!("Expected {} to be rejected", name)));
            }
        }
    }
    Ok(())
}

#[test]
fn render_demo_figure_to_png() -> AppResult<()> {
    let dir = temp_dir()?;
    let mut figure = demo_figure()?;
    figure.file_name = file_in(dir.path(), "demo.png");
    let written = render_figure(&figure, &RenderOptions::default())?;
    if !written.exists() {
        return Err(AppError::figure("Expected the png to be written"));
    }
    Ok(())
}

fn styled_line_figure() -> Figure {
    let mut figure = Figure::default();
    figure.x_label = "Time".to_owned();
    figure.y_label = "Probability\n(truth)".to_owned();
    figure.title = Some("Title".to_owned());
    figure.x_tick_rotation = Some(45.0);
    figure.push(LineItem {
        x: vec![1.0, 2.0, 3.0],
        y: vec![3.0, 1.0, 2.0],
        pattern: Some("o--".to_owned()),
        label: Some("Curve".to_owned()),
        ..LineItem::default()
    });
    figure
}

#[test]
fn each_format_lands_at_the_requested_name() -> AppResult<()> {
    let dir = temp_dir()?;
    for name in ["line.png", "line.svg"] {
        let mut figure = styled_line_figure();
        figure.file_name = file_in(dir.path(), name);
        let written = render_figure(&figure, &RenderOptions::default())?;
        let on_disk = std::fs::metadata(dir.path().join(name))?;
        if written != dir.path().join(name) || on_disk.len() == 0 {
            return Err(AppError::figure(format!(
                "Unexpected output {}",
                written.display()
            )));
        }
    }
    let svg = std::fs::read_to_string(dir.path().join("line.svg"))?;
    if !svg.contains("<svg") {
        return Err(AppError::figure("Expected an SVG document"));
    }

    let mut figure = styled_line_figure();
    figure.file_name = file_in(dir.path(), "line.pdf");
    match render_figure(&figure, &RenderOptions::default()) {
        Err(AppError::Figure(FigureError::UnsupportedFormat { ext, .. })) if ext == "pdf" => {}
        Ok(_) | Err(_) => return Err(AppError::figure("Expected pdf to be rejected")),
    }
    if dir.path().join("line.pdf").exists() {
        return Err(AppError::figure("Expected nothing written for pdf"));
    }
    Ok(())
}

#[test]
fn two_formats_share_a_stem() -> AppResult<()> {
    run_async_test(async {
        let dir = temp_dir()?;
        let mut queue = RenderQueue::new(RenderOptions::default(), 2, false);
        for name in ["shared.png", "shared.svg"] {
            let mut figure = styled_line_figure();
            figure.file_name = file_in(dir.path(), name);
            queue.submit(figure);
        }
        let mut written = queue.finish().await?;
        written.sort();
        let expected = vec![dir.path().join("shared.png"), dir.path().join("shared.svg")];
        if written != expected || written.iter().any(|path| !path.exists()) {
            return Err(AppError::figure(format!("Unexpected outputs {:?}", written)));
        }
        Ok(())
    })
}

#[test]
fn render_without_file_name_fails() -> AppResult<()> {
    if let Err(AppError::Figure(FigureError::MissingFileName)) =
        render_figure(&Figure::default(), &RenderOptions::default())
    {
        return Ok(());
    }
    Err(AppError::figure("Expected a missing file name error"))
}

#[test]
fn render_queue_joins_all_renders() -> AppResult<()> {
    run_async_test(async {
        let dir = temp_dir()?;
        let mut queue = RenderQueue::new(RenderOptions::default(), 2, true);
        for name in ["a.png", "b.svg", "c.png"] {
            let mut figure = demo_figure()?;
            figure.file_name = file_in(dir.path(), name);
            queue.submit(figure);
        }
        if queue.len() != 3 {
            return Err(AppError::figure("Expected three queued renders"));
        }
        let written = queue.finish().await?;
        if written.len() != 3 || written.iter().any(|path| !path.exists()) {
            return Err(AppError::figure("Expected every render to finish"));
        }
        if !sidecar_path(&file_in(dir.path(), "a.png")).exists() {
            return Err(AppError::figure("Expected the JSON description"));
        }
        Ok(())
    })
}

#[test]
fn render_queue_reports_failures_after_joining() -> AppResult<()> {
    run_async_test(async {
        let dir = temp_dir()?;
        let mut queue = RenderQueue::new(RenderOptions::default(), 1, false);
        let mut bad = demo_figure()?;
        bad.file_name = file_in(dir.path(), "bad.gif");
        let mut good = demo_figure()?;
        good.file_name = file_in(dir.path(), "good.png");
        queue.submit(bad);
        queue.submit(good);
        if queue.finish().await.is_ok() {
            return Err(AppError::figure("Expected the unsupported format to fail"));
        }
        if !dir.path().join("good.png").exists() {
            return Err(AppError::figure("Expected the other render to complete"));
        }
        Ok(())
    })
}
