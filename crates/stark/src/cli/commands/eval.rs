//! Implementation of `stark eval`.

use std::process::ExitCode;

use comfy_table::Cell;
use stark_index::{
    EvalReport, evaluate,
    eval::{DEFAULT_EVAL_LIMIT, RECALL_CUTOFF},
    read_queries,
};

use crate::cli::{
    args::EvalCommand,
    context::CommandContext,
    output::{dim, number_cell, print_json, subheader, table},
};

/// Scores the index against a file of labeled queries.
pub fn run(ctx: &mut CommandContext, cmd: &EvalCommand) -> ExitCode {
    let queries = match read_queries(&cmd.file) {
        Ok(queries) => queries,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let limit = cmd.limit.unwrap_or(DEFAULT_EVAL_LIMIT);
    if limit < RECALL_CUTOFF {
        eprintln!(
            "{}",
            dim(&format!(
                "note: retrieving {limit} hits per query caps recall@{RECALL_CUTOFF}"
            ))
        );
    }

    let searcher = match ctx.searcher() {
        Ok(searcher) => searcher,
        Err(code) => return code,
    };
    let report = evaluate(&queries, |text| {
        Ok(searcher
            .search(text, limit)?
            .into_iter()
            .map(|hit| hit.node_id)
            .collect())
    });
    let report = match report {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: evaluation failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cmd.json {
        return print_json(&report);
    }
    print_report(&report);
    ExitCode::SUCCESS
}

/// Prints mean metrics as a table.
fn print_report(report: &EvalReport) {
    println!(
        "{} {}",
        subheader(&format!("Evaluated {} queries", report.evaluated)),
        dim(&format!("({} skipped without answers)", report.skipped))
    );
    let mean = &report.mean;
    let mut metrics = table(&["metric", "mean"]);
    for (name, value) in [
        ("hit@1", mean.hit_at_1),
        ("hit@5", mean.hit_at_5),
        ("recall@20", mean.recall_at_20),
        ("mrr", mean.mrr),
    ] {
        metrics.add_row(vec![Cell::new(name), number_cell(format!("{value:.4}"))]);
    }
    println!("{metrics}");
}
