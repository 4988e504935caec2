//! Terminal styling for stark.
//!
//! Highlights TOML and JSON for terminal output and provides the small set of ANSI styles
//! the CLI uses for section titles, warnings and dimmed detail.

#![warn(missing_docs)]

use syntect::{
    easy::HighlightLines,
    highlighting::Style,
    parsing::SyntaxSet,
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};
use two_face::{
    syntax::extra_newlines as extra_syntaxes,
    theme::{EmbeddedLazyThemeSet, EmbeddedThemeName, extra as extra_themes},
};

/// Formats the CLI can highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Syntax {
    /// `.stark.toml` contents.
    Toml,
    /// `--json` output.
    Json,
}

impl Syntax {
    /// File extension syntect knows the format by.
    fn extension(self) -> &'static str {
        match self {
            Self::Toml => "toml",
            Self::Json => "json",
        }
    }
}

/// Highlights configuration and JSON output with 24-bit terminal colors.
pub struct Highlighter {
    /// Syntax definitions; the two-face extras carry TOML.
    syntaxes: SyntaxSet,
    /// Embedded color themes.
    themes: EmbeddedLazyThemeSet,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Theme for every highlighted block.
    const THEME: EmbeddedThemeName = EmbeddedThemeName::Dracula;

    /// Loads the embedded syntaxes and themes.
    pub fn new() -> Self {
        Self {
            syntaxes: extra_syntaxes(),
            themes: extra_themes(),
        }
    }

    /// Highlights a TOML document.
    pub fn highlight_toml(&self, content: &str) -> String {
        self.highlight(content, Syntax::Toml)
    }

    /// Highlights pretty-printed JSON.
    pub fn highlight_json(&self, content: &str) -> String {
        self.highlight(content, Syntax::Json)
    }

    /// Highlights `content` line by line; lines that fail to highlight are kept plain.
    fn highlight(&self, content: &str, syntax: Syntax) -> String {
        let definition = self
            .syntaxes
            .find_syntax_by_extension(syntax.extension())
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());
        let mut lines = HighlightLines::new(definition, self.themes.get(Self::THEME));

        let mut output: String = LinesWithEndings::from(content)
            .map(|line| {
                let ranges: Vec<(Style, &str)> = lines
                    .highlight_line(line, &self.syntaxes)
                    .unwrap_or_else(|_| vec![(Style::default(), line)]);
                as_24_bit_terminal_escaped(&ranges, false)
            })
            .collect();
        output.push_str(colors::RESET);
        output
    }
}

/// ANSI escape codes used by the CLI styles.
pub mod colors {
    /// Bold.
    pub const BOLD: &str = "\x1b[1m";
    /// Green, for completed work.
    pub const GREEN: &str = "\x1b[32m";
    /// Yellow, for problems that do not stop a command.
    pub const YELLOW: &str = "\x1b[33m";
    /// Dim, for paths and secondary detail.
    pub const DIM: &str = "\x1b[2m";
    /// Clears all attributes.
    pub const RESET: &str = "\x1b[0m";
}

/// Wraps `text` in `code` and a reset.
fn paint(code: &str, text: &str) -> String {
    format!("{code}{text}{}", colors::RESET)
}

/// Section title in status and stats output.
pub fn subheader(text: &str) -> String {
    paint(colors::BOLD, text)
}

/// Secondary detail such as paths and notes.
pub fn dim(text: &str) -> String {
    paint(colors::DIM, text)
}

/// Completion message of a long-running command.
pub fn success(text: &str) -> String {
    paint(colors::GREEN, text)
}

/// A problem reported by `stark status`.
pub fn warning(text: &str) -> String {
    paint(colors::YELLOW, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlights_toml() {
        let hl = Highlighter::new();
        let output = hl.highlight_toml("[dataset]\nmax_entries = 25\n");
        assert!(output.contains("\x1b["));
        assert!(output.ends_with(colors::RESET));
        assert!(output.contains("max_entries"));
    }

    #[test]
    fn highlights_json() {
        let hl = Highlighter::new();
        let output = hl.highlight_json("{\"node_id\": 3}\n");
        assert!(output.contains("\x1b["));
        assert!(output.contains("node_id"));
    }

    #[test]
    fn empty_input_is_only_a_reset() {
        assert_eq!(Highlighter::new().highlight_json(""), colors::RESET);
    }

    #[test]
    fn styles_wrap_and_reset() {
        for styled in [subheader("s"), dim("d"), success("ok"), warning("w")] {
            assert!(styled.ends_with(colors::RESET));
        }
        assert_eq!(success("done"), "\x1b[32mdone\x1b[0m");
        assert!(warning("careful").starts_with(colors::YELLOW));
    }

    #[test]
    fn toml_and_json_syntaxes_available() {
        let syntaxes = extra_syntaxes();
        for syntax in [Syntax::Toml, Syntax::Json] {
            assert!(syntaxes.find_syntax_by_extension(syntax.extension()).is_some());
        }
    }
}
