use std::path::{Path, PathBuf};

use tracing::info;

use crate::charts::RenderQueue;
use crate::error::{AppResult, FigureError};
use crate::figure::{DEMO_FILE_NAME, ToolOutput, demo_figure, invert_y, load_figure, prettify};
use crate::reports::{
    ReportSettings, run_experiment_report, run_link_report, run_sequence_report,
};

use super::types::{RenderSource, RunPlan};

pub(crate) async fn execute_plan(plan: RunPlan) -> AppResult<()> {
    match plan {
        RunPlan::Render { source, settings } => render(source, &settings).await,
        RunPlan::Sequence { report, settings } => {
            let written = run_sequence_report(&report, &settings).await?;
            report_written(&written);
            Ok(())
        }
        RunPlan::Links { report, settings } => {
            let written = run_link_report(&report, &settings).await?;
            report_written(&written);
            Ok(())
        }
        RunPlan::Experiments { report, settings } => {
            let written = run_experiment_report(&report, &settings).await?;
            report_written(&written);
            Ok(())
        }
        RunPlan::InvertY(path) => json_tool(&path, invert_y),
        RunPlan::Prettify(path) => json_tool(&path, prettify),
    }
}

async fn render(source: RenderSource, settings: &ReportSettings) -> AppResult<()> {
    let figures = match source {
        RenderSource::Demo { output_dir } => {
            let mut figure = demo_figure()?;
            if let Some(dir) = output_dir {
                tokio::fs::create_dir_all(&dir).await?;
                figure.file_name = dir.join(DEMO_FILE_NAME).to_string_lossy().into_owned();
            }
            vec![figure]
        }
        RenderSource::Files(files) => files
            .iter()
            .map(PathBuf::as_path)
            .map(load_figure)
            .collect::<Result<Vec<_>, FigureError>>()?,
    };

    // Input descriptions are never rewritten.
    let mut queue = RenderQueue::new(settings.render, settings.jobs, false);
    for figure in figures {
        info!("Rendering {}", figure.file_name);
        queue.submit(figure);
    }
    let written = queue.finish().await?;
    report_written(&written);
    Ok(())
}

fn json_tool<F>(path: &Path, tool: F) -> AppResult<()>
where
    F: Fn(&Path) -> Result<ToolOutput, FigureError>,
{
    match tool(path)? {
        ToolOutput::Written(output) => info!("Wrote {}", output.display()),
        ToolOutput::Printed(text) => println!("{}", text),
    }
    Ok(())
}

fn report_written(written: &[PathBuf]) {
    for path in written {
        info!("Wrote {}", path.display());
    }
    info!("{} images written", written.len());
}
