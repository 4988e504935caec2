//! Implementation of `stark search`.

use std::process::ExitCode;

use serde::Serialize;
use stark_index::Hit;

use crate::cli::{
    args::SearchCommand,
    context::CommandContext,
    output::{dim, hits_table, print_json, subheader},
};

/// JSON output for a single query's results.
#[derive(Serialize)]
struct JsonQueryResults<'a> {
    /// The original query string.
    query: &'a str,
    /// Ranked hits.
    results: Vec<Hit>,
    /// Number of hits returned.
    total_matches: usize,
}

/// JSON output for `stark search`.
#[derive(Serialize)]
struct JsonSearchOutput<'a> {
    /// Results grouped by query.
    queries: Vec<JsonQueryResults<'a>>,
}

/// Runs each query against the index and prints the ranked products.
pub fn run(ctx: &mut CommandContext, cmd: &SearchCommand) -> ExitCode {
    let limit = cmd.limit.unwrap_or(ctx.config.search.limit);
    let searcher = match ctx.searcher() {
        Ok(searcher) => searcher,
        Err(code) => return code,
    };

    let mut results = Vec::with_capacity(cmd.queries.len());
    for query in &cmd.queries {
        match searcher.search(query, limit) {
            Ok(hits) => results.push(JsonQueryResults {
                query,
                total_matches: hits.len(),
                results: hits,
            }),
            Err(e) => {
                eprintln!("error: search failed for '{query}': {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    if cmd.json {
        return print_json(&JsonSearchOutput { queries: results });
    }

    let show_query = results.len() > 1;
    for (i, result) in results.iter().enumerate() {
        if show_query {
            if i > 0 {
                println!();
            }
            println!("{}", subheader(result.query));
        }
        if result.results.is_empty() {
            println!("{}", dim("No results."));
        } else {
            println!("{}", hits_table(&result.results));
        }
    }
    ExitCode::SUCCESS
}
