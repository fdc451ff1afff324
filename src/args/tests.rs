use std::path::Path;

use super::test_support::parse_test_args;
use super::{Command, SortOrder};
use crate::error::{AppError, AppResult};
use crate::reports::{BatchSelector, Graph, PlotSelector, PlotTarget};

#[test]
fn no_subcommand_parses_global_flags() -> AppResult<()> {
    let args = parse_test_args(["congplot", "--verbose", "--jobs", "3", "--no-color"])?;
    if args.command.is_some() {
        return Err(AppError::validation("Expected no subcommand"));
    }
    if !args.verbose || !args.no_color || args.jobs.map(|jobs| jobs.get()) != Some(3) {
        return Err(AppError::validation("Expected the global flags"));
    }
    Ok(())
}

#[test]
fn render_accepts_many_files() -> AppResult<()> {
    let args = parse_test_args(["congplot", "render", "a.json", "b.json"])?;
    let Some(Command::Render(render)) = args.command else {
        return Err(AppError::validation("Expected render"));
    };
    if render.files != [Path::new("a.json"), Path::new("b.json")] {
        return Err(AppError::validation(format!("Unexpected files {:?}", render.files)));
    }
    Ok(())
}

#[test]
fn sequence_options_parse() -> AppResult<()> {
    let args = parse_test_args([
        "congplot",
        "seq-cong-prob",
        "--in",
        "seq.txt",
        "--out",
        "plots",
        "--sort",
        "gap",
        "--remove-redundant",
        "--graphs",
        "delta,errorPath1",
    ])?;
    let Some(Command::SeqCongProb(seq)) = args.command else {
        return Err(AppError::validation("Expected seq-cong-prob"));
    };
    if seq.sort != SortOrder::Gap || !seq.remove_redundant {
        return Err(AppError::validation("Expected gap order and redundancy removal"));
    }
    if seq.graphs != [Graph::Delta, Graph::ErrorPath1] {
        return Err(AppError::validation(format!("Unexpected graphs {:?}", seq.graphs)));
    }
    if seq.output.as_deref() != Some(Path::new("plots")) {
        return Err(AppError::validation("Expected the output directory"));
    }
    Ok(())
}

#[test]
fn sequence_defaults_to_natural_order() -> AppResult<()> {
    let args = parse_test_args(["congplot", "seq-cong-prob", "--in", "seq.txt"])?;
    let Some(Command::SeqCongProb(seq)) = args.command else {
        return Err(AppError::validation("Expected seq-cong-prob"));
    };
    if seq.sort != SortOrder::Natural || !seq.graphs.is_empty() || seq.output.is_some() {
        return Err(AppError::validation("Unexpected sequence defaults"));
    }
    Ok(())
}

#[test]
fn experiments_take_selectors_and_batches() -> AppResult<()> {
    let args = parse_test_args(["congplot", "experiments", "--plot", "8b+", "--label", "(real)"])?;
    let Some(Command::Experiments(single)) = args.command else {
        return Err(AppError::validation("Expected experiments"));
    };
    if single.plot != PlotTarget::Single(PlotSelector::Plot8bPlus) || single.label != "(real)" {
        return Err(AppError::validation("Expected selector 8b+"));
    }

    let args = parse_test_args(["congplot", "experiments", "--plot", "diff-rtt"])?;
    let Some(Command::Experiments(batch)) = args.command else {
        return Err(AppError::validation("Expected experiments"));
    };
    if batch.plot != PlotTarget::Batch(BatchSelector::DiffRtt) {
        return Err(AppError::validation("Expected the diff-rtt batch"));
    }
    Ok(())
}

#[test]
fn invalid_values_are_rejected() -> AppResult<()> {
    let rejected = [
        vec!["congplot", "experiments", "--plot", "6"],
        vec!["congplot", "--jobs", "0"],
        vec!["congplot", "--dpi", "0"],
        vec!["congplot", "--font-scale", "-1"],
        vec!["congplot", "--format", "gif"],
        vec!["congplot", "seq-cong-prob", "--in", "x", "--graphs", "nope"],
    ];
    for args in rejected {
        if parse_test_args(args.clone()).is_ok() {
            return Err(AppError::validation(format!("Expected {:?} to fail", args)));
        }
    }
    Ok(())
}

#[test]
fn formats_are_normalized() -> AppResult<()> {
    let args = parse_test_args(["congplot", "--format", ".PNG,svg", "--format", "png"])?;
    if args.formats != ["png", "svg", "png"] {
        return Err(AppError::validation(format!("Unexpected formats {:?}", args.formats)));
    }
    for format in ["pdf", "eps"] {
        if parse_test_args(["congplot", "--format", format]).is_ok() {
            return Err(AppError::validation(format!("Expected {} to be rejected", format)));
        }
    }
    Ok(())
}

#[test]
fn global_flags_follow_subcommands() -> AppResult<()> {
    let args = parse_test_args(["congplot", "prettify", "figure.json", "--dpi", "300"])?;
    if args.dpi != Some(300) {
        return Err(AppError::validation("Expected the dpi after the subcommand"));
    }
    let Some(Command::Prettify(file)) = args.command else {
        return Err(AppError::validation("Expected prettify"));
    };
    if file.file != Path::new("figure.json") {
        return Err(AppError::validation("Expected the JSON file"));
    }
    Ok(())
}
