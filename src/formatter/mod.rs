//! Output formatting for completion results
//!
//! - Plain text: one suggestion per line, optionally colored
//! - JSON: the suggestions plus the request details (fragment, end of
//!   input, exploration counters)

use nu_ansi_term::{Color, Style};
use serde_json::{Value, json};

use crate::config::{DisplayConfig, OutputFormat};
use crate::error::{AutosuggestError, Result};
use crate::grammar::GrammarModel;
use crate::suggest::CompletionReport;

/// Formatter for completion reports
pub struct Formatter {
    /// Output format type
    format_type: OutputFormat,

    /// Enable colored output
    use_colors: bool,
}

impl Formatter {
    /// Create a new formatter
    ///
    /// # Arguments
    /// * `format_type` - Output format type
    /// * `use_colors` - Enable colored output
    pub fn new(format_type: OutputFormat, use_colors: bool) -> Self {
        Self {
            format_type,
            use_colors,
        }
    }

    /// Create a formatter from display configuration
    pub fn from_config(config: &DisplayConfig) -> Self {
        Self::new(config.format, config.color_output)
    }

    /// Format a completion report according to the configured format
    ///
    /// # Arguments
    /// * `input` - The input the report was computed for
    /// * `report` - Completion report
    /// * `grammar` - Grammar used to name token kinds
    ///
    /// # Returns
    /// * `Result<String>` - Formatted output or error
    pub fn format(
        &self,
        input: &str,
        report: &CompletionReport,
        grammar: &dyn GrammarModel,
    ) -> Result<String> {
        match self.format_type {
            OutputFormat::Plain => Ok(self.format_plain(report, grammar)),
            OutputFormat::Json => self.format_json(input, report, grammar),
        }
    }

    fn format_plain(&self, report: &CompletionReport, grammar: &dyn GrammarModel) -> String {
        let mut lines: Vec<String> = report
            .suggestions
            .iter()
            .map(|suggestion| {
                let kind = grammar.display_name(suggestion.kind);
                if self.use_colors {
                    format!(
                        "{}  {}",
                        Color::Green.paint(&suggestion.text),
                        Style::new().dimmed().paint(kind)
                    )
                } else {
                    suggestion.text.clone()
                }
            })
            .collect();

        if report.accepts_end_of_input {
            lines.push(self.dim("<end of input>"));
        }
        if lines.is_empty() {
            lines.push(self.dim("(no suggestions)"));
        }
        lines.join("\n")
    }

    fn format_json(
        &self,
        input: &str,
        report: &CompletionReport,
        grammar: &dyn GrammarModel,
    ) -> Result<String> {
        let suggestions: Vec<Value> = report
            .suggestions
            .iter()
            .map(|s| json!({ "text": s.text, "kind": grammar.display_name(s.kind) }))
            .collect();

        let value = json!({
            "input": input,
            "partial": report.partial.as_ref().map(|p| json!({ "text": p.text, "start": p.start })),
            "suggestions": suggestions,
            "accepts_end_of_input": report.accepts_end_of_input,
            "stats": {
                "explored": report.stats.explored,
                "pruned_calls": report.stats.pruned_calls,
                "truncated": report.stats.truncated,
            },
        });

        serde_json::to_string_pretty(&value)
            .map_err(|e| AutosuggestError::Generic(format!("JSON serialization failed: {e}")))
    }

    /// Format an error for display
    pub fn format_error(&self, error: &AutosuggestError) -> String {
        match self.format_type {
            OutputFormat::Json => json!({ "error": error.to_string() }).to_string(),
            OutputFormat::Plain if self.use_colors => {
                format!("{}", Color::Red.paint(error.to_string()))
            }
            OutputFormat::Plain => error.to_string(),
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.use_colors {
            Style::new().dimmed().paint(text).to_string()
        } else {
            text.to_string()
        }
    }
}
