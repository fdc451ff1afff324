use std::path::{Path, PathBuf};

use crate::args::{Command, CongplotArgs, ExperimentArgs, LinkArgs, SequenceArgs};
use crate::charts::RenderOptions;
use crate::reports::{
    ExperimentReport, LinkReport, PlotTarget, ReportSettings, SequenceReport, default_jobs,
};

use super::types::{RenderSource, RunPlan};

pub(crate) fn build_plan(mut args: CongplotArgs) -> RunPlan {
    let settings = report_settings(&args);
    let output_dir = args.output_dir.take();

    let Some(command) = args.command.take() else {
        return RunPlan::Render {
            source: RenderSource::Demo { output_dir },
            settings,
        };
    };

    match command {
        Command::Render(render) => {
            let source = if render.files.is_empty() {
                RenderSource::Demo { output_dir }
            } else {
                RenderSource::Files(render.files)
            };
            RunPlan::Render { source, settings }
        }
        Command::SeqCongProb(seq) => RunPlan::Sequence {
            report: sequence_report(seq, output_dir.as_deref()),
            settings,
        },
        Command::ClassPathCongProb(links) => RunPlan::Links {
            report: link_report(links, output_dir.as_deref()),
            settings,
        },
        Command::Experiments(experiments) => RunPlan::Experiments {
            report: experiment_report(experiments, output_dir.as_deref()),
            settings,
        },
        Command::InvertY(file) => RunPlan::InvertY(file.file),
        Command::Prettify(file) => RunPlan::Prettify(file.file),
    }
}

fn report_settings(args: &CongplotArgs) -> ReportSettings {
    let defaults = RenderOptions::default();
    ReportSettings {
        render: RenderOptions {
            default_dpi: args.dpi.unwrap_or(defaults.default_dpi),
            default_font_scale: args.font_scale.unwrap_or(defaults.default_font_scale),
        },
        jobs: args.jobs.map_or_else(default_jobs, |jobs| jobs.get()),
        write_json: !args.no_json,
        formats: if args.formats.is_empty() {
            None
        } else {
            Some(args.formats.clone())
        },
    }
}

fn report_dir(output: Option<PathBuf>, output_dir: Option<&Path>) -> PathBuf {
    output
        .or_else(|| output_dir.map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn sequence_report(seq: SequenceArgs, output_dir: Option<&Path>) -> SequenceReport {
    SequenceReport {
        input: seq.input,
        output: report_dir(seq.output, output_dir),
        order: seq.sort.into(),
        remove_redundant: seq.remove_redundant,
        graphs: seq.graphs,
    }
}

fn link_report(links: LinkArgs, output_dir: Option<&Path>) -> LinkReport {
    LinkReport {
        input: links.input,
        output: report_dir(links.output, output_dir),
    }
}

fn experiment_report(experiments: ExperimentArgs, output_dir: Option<&Path>) -> ExperimentReport {
    let output = match (experiments.output, experiments.plot, output_dir) {
        (Some(output), _, _) => Some(output),
        (None, PlotTarget::Single(selector), Some(dir)) => Some(dir.join(selector.default_output())),
        (None, PlotTarget::Single(_) | PlotTarget::Batch(_), _) => None,
    };
    ExperimentReport {
        target: experiments.plot,
        input: experiments.input,
        output,
        label: experiments.label,
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use clap::Parser;

    use super::build_plan;
    use crate::args::CongplotArgs;
    use crate::entry::plan::types::{RenderSource, RunPlan};
    use crate::error::{AppError, AppResult};
    use crate::ingest::SequenceOrder;
    use crate::reports::{PlotSelector, PlotTarget};

    fn build_from(argv: &[&str]) -> AppResult<RunPlan> {
        let args = CongplotArgs::try_parse_from(argv)?;
        Ok(build_plan(args))
    }

    #[test]
    fn no_subcommand_renders_the_demo() -> AppResult<()> {
        let plan = build_from(&["congplot", "--verbose"])?;
        match plan {
            RunPlan::Render {
                source: RenderSource::Demo { output_dir: None },
                settings,
            } if settings.write_json => Ok(()),
            RunPlan::Render { .. }
            | RunPlan::Sequence { .. }
            | RunPlan::Links { .. }
            | RunPlan::Experiments { .. }
            | RunPlan::InvertY(_)
            | RunPlan::Prettify(_) => Err(AppError::validation("Expected the demo render")),
        }
    }

    #[test]
    fn render_files_are_kept_in_order() -> AppResult<()> {
        let plan = build_from(&["congplot", "render", "b.json", "a.json", "--no-json"])?;
        let RunPlan::Render {
            source: RenderSource::Files(files),
            settings,
        } = plan
        else {
            return Err(AppError::validation("Expected a file render"));
        };
        if files != [PathBuf::from("b.json"), PathBuf::from("a.json")] || settings.write_json {
            return Err(AppError::validation(format!("Unexpected render {:?}", files)));
        }
        Ok(())
    }

    #[test]
    fn reports_fall_back_to_the_output_dir() -> AppResult<()> {
        let plan = build_from(&[
            "congplot",
            "--output-dir",
            "plots",
            "seq-cong-prob",
            "--in",
            "seq.txt",
            "--sort",
            "gap",
        ])?;
        let RunPlan::Sequence { report, .. } = plan else {
            return Err(AppError::validation("Expected the sequence report"));
        };
        if report.output != Path::new("plots") || report.order != SequenceOrder::Gap {
            return Err(AppError::validation(format!("Unexpected report {:?}", report)));
        }

        let plan = build_from(&["congplot", "class-path-cong-prob", "--in", "links.txt"])?;
        let RunPlan::Links { report, .. } = plan else {
            return Err(AppError::validation("Expected the link report"));
        };
        if report.output != Path::new(".") {
            return Err(AppError::validation("Expected the working directory"));
        }
        Ok(())
    }

    #[test]
    fn single_plots_default_under_the_output_dir() -> AppResult<()> {
        let plan = build_from(&[
            "congplot",
            "--output-dir",
            "out",
            "experiments",
            "--plot",
            "7b",
        ])?;
        let RunPlan::Experiments { report, .. } = plan else {
            return Err(AppError::validation("Expected the experiment report"));
        };
        if report.target != PlotTarget::Single(PlotSelector::Plot7b)
            || report.output.as_deref() != Some(Path::new("out/plot7b"))
        {
            return Err(AppError::validation(format!("Unexpected report {:?}", report)));
        }
        Ok(())
    }

    #[test]
    fn settings_follow_global_flags() -> AppResult<()> {
        let plan = build_from(&[
            "congplot",
            "prettify",
            "f.json",
            "--dpi",
            "200",
            "--font-scale",
            "1.5",
            "--format",
            "svg",
            "-j",
            "2",
        ])?;
        let RunPlan::Prettify(file) = plan else {
            return Err(AppError::validation("Expected prettify"));
        };
        if file != Path::new("f.json") {
            return Err(AppError::validation("Expected the JSON file"));
        }

        let plan = build_from(&[
            "congplot",
            "--dpi",
            "200",
            "--font-scale",
            "1.5",
            "--format",
            "svg",
            "-j",
            "2",
        ])?;
        let RunPlan::Render { settings, .. } = plan else {
            return Err(AppError::validation("Expected the demo render"));
        };
        if settings.render.default_dpi != 200
            || settings.render.default_font_scale != 1.5
            || settings.jobs != 2
            || settings.formats != Some(vec!["svg".to_owned()])
        {
            return Err(AppError::validation(format!("Unexpected settings {:?}", settings)));
        }
        Ok(())
    }
}
