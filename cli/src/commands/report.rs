use std::time::{Duration, Instant};

use anyhow::bail;
use colored::*;
use tracing::Instrument;

use orchestrate_common::config::Config;
use orchestrate_common::fleet::operation::Operation;
use orchestrate_common::fleet::outcome::{BatchReport, ExecutionResult};
use orchestrate_common::fleet::selection::Selection;
use orchestrate_common::success;
use orchestrate_core::batch::BatchRunner;

use crate::commands::{SelectionArgs, fleet_service};
use crate::oprint;
use crate::terminal::{colors, format, print, spinner};

/// Resolves the selection, runs `operation` on every target and prints the outcome.
///
/// Fails when the selection resolves to nothing or when any target failed.
pub async fn run_batch(
    selection: &SelectionArgs,
    operation: &Operation,
    cfg: &Config,
) -> anyhow::Result<()> {
    let selection = Selection::from(selection);

    let span = spinner::batch_span(&operation.to_string());
    let runner = BatchRunner::from(cfg).with_progress(spinner::report_batch_progress(&span));
    let fleet = fleet_service(cfg, runner);

    let targets = fleet.resolve(&selection)?;
    spinner::set_batch_total(&span, targets.len());

    print::header(&format!("{} target(s)", targets.len()), cfg.quiet);
    if cfg.quiet == 0 {
        print::print_status(format!("{}", operation.to_string().color(colors::ACCENT)));
    }

    let start_time: Instant = Instant::now();
    let report: BatchReport = fleet.execute_on(targets, operation).instrument(span).await;

    batch_ends(&report, start_time.elapsed(), cfg);

    if !report.all_succeeded() {
        bail!("{} of {} target(s) failed", report.failed(), report.len());
    }
    Ok(())
}

fn batch_ends(report: &BatchReport, total_time: Duration, cfg: &Config) {
    if cfg.quiet > 0 {
        oprint!();
    }

    print::header("Results", cfg.quiet);
    print_results(report, cfg);
    print_summary(report, total_time, cfg);
}

fn print_results(report: &BatchReport, cfg: &Config) {
    if cfg.quiet > 1 {
        report.failures().for_each(print_failure_line);
        return;
    }
    for (idx, result) in report.results.iter().enumerate() {
        print_result_tree(result, idx);
        if idx + 1 != report.len() {
            oprint!();
        }
    }
}

fn print_result_tree(result: &ExecutionResult, idx: usize) {
    print::tree_head(idx, &result.target.to_string());
    print::as_tree_one_level(format::result_to_details(result));
    print::output_block(&result.output);
}

fn print_failure_line(result: &ExecutionResult) {
    if let Some(err) = &result.error {
        print::print_status(format!("{}: {}", result.target, err.to_string().red()));
    }
}

fn print_summary(report: &BatchReport, total_time: Duration, cfg: &Config) {
    let succeeded: ColoredString = format!("{} succeeded", report.succeeded()).bold().green();
    let failed: ColoredString = match report.failed() {
        0 => "0 failed".normal(),
        n => format!("{n} failed").bold().red(),
    };
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: &ColoredString = &format!("Batch Complete: {succeeded}, {failed} in {total_time}")
        .color(colors::TEXT_DEFAULT);

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(output);
        }
        _ => {
            oprint!();
            success!("{}", output)
        }
    }
}
