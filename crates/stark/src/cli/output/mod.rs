//! Rendering and JSON serialization for CLI output.

use std::{
    io::{self, IsTerminal},
    process::ExitCode,
};

use comfy_table::{Cell, CellAlignment, Table, presets::UTF8_FULL_CONDENSED};
use serde::Serialize;
use stark_highlight::Highlighter;
pub use stark_highlight::{dim, subheader, success, warning};
use stark_index::Hit;

/// Prints `value` as pretty JSON on stdout, highlighted when stdout is a terminal.
pub fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) if io::stdout().is_terminal() => {
            println!("{}", Highlighter::new().highlight_json(&json));
            ExitCode::SUCCESS
        }
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// A table with the shared CLI style and the given column headers.
pub fn table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(headers.iter().map(|h| Cell::new(*h)).collect::<Vec<_>>());
    table
}

/// A right-aligned numeric cell.
pub fn number_cell(value: impl ToString) -> Cell {
    Cell::new(value.to_string()).set_alignment(CellAlignment::Right)
}

/// Renders ranked search hits as a table.
pub fn hits_table(hits: &[Hit]) -> Table {
    let mut table = table(&["#", "node", "type", "title", "score"]);
    for (rank, hit) in hits.iter().enumerate() {
        table.add_row(vec![
            number_cell(rank + 1),
            number_cell(hit.node_id),
            Cell::new(&hit.node_type),
            Cell::new(&hit.title),
            number_cell(format!("{:.3}", hit.score)),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hits_render_in_rank_order() {
        let hits = vec![
            Hit {
                node_id: 7,
                node_type: "product".to_string(),
                title: "Dome Tent".to_string(),
                score: 2.5,
            },
            Hit {
                node_id: 2,
                node_type: "product".to_string(),
                title: "LED Lantern".to_string(),
                score: 0.25,
            },
        ];
        let rendered = hits_table(&hits).to_string();
        let tent = rendered.find("Dome Tent").unwrap();
        let lantern = rendered.find("LED Lantern").unwrap();
        assert!(tent < lantern);
        assert!(rendered.contains("2.500"));
        assert!(rendered.contains("0.250"));
    }

    #[test]
    fn empty_table_keeps_headers() {
        let rendered = hits_table(&[]).to_string();
        assert!(rendered.contains("title"));
        assert!(rendered.contains("score"));
    }
}
