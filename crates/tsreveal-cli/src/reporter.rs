use colored::Colorize;

use tsreveal_common::{Diagnostic, DiagnosticCategory, LineMap};

/// Renders parse diagnostics of one file as
/// `file:line:col - error TSR1110: message`, followed by the source line.
pub struct Reporter<'a> {
    color: bool,
    source: &'a str,
    line_map: LineMap,
}

impl<'a> Reporter<'a> {
    pub fn new(color: bool, source: &'a str) -> Self {
        Reporter {
            color,
            source,
            line_map: LineMap::build(source),
        }
    }

    pub fn render(&self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for (index, diagnostic) in diagnostics.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(diagnostic));
        }
        out
    }

    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let (line, column) = self.position_for(diagnostic.start);
        let file = if diagnostic.file.is_empty() {
            "<unknown>"
        } else {
            diagnostic.file.as_str()
        };

        let mut output = format!(
            "{}:{}:{} - {} {}: {}",
            file,
            line,
            column,
            self.format_category(diagnostic.category),
            self.format_code(diagnostic.code),
            diagnostic.message_text
        );
        if let Some(snippet) = self.format_snippet(line, column, diagnostic.length) {
            output.push_str(&snippet);
        }
        output
    }

    /// The offending line with the span underlined:
    ///   2   type B = >;
    ///                ~
    fn format_snippet(&self, line: u32, column: u32, length: u32) -> Option<String> {
        let line_text = self.source.lines().nth(line.checked_sub(1)? as usize)?;
        let start = column.saturating_sub(1) as usize;
        let available = line_text.chars().count().saturating_sub(start);
        let width = (length as usize).clamp(1, available.max(1));
        let underline = format!("{}{}", " ".repeat(start), "~".repeat(width));
        let underline = if self.color {
            underline.red().to_string()
        } else {
            underline
        };
        Some(format!("\n  {line:>3}   {line_text}\n        {underline}"))
    }

    /// 1-based line and column.
    fn position_for(&self, offset: u32) -> (u32, u32) {
        let position = self.line_map.offset_to_position(offset, self.source);
        (position.line + 1, position.character + 1)
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = category.as_str();
        if !self.color {
            return label.to_string();
        }
        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        let label = format!("TSR{code}");
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}
