//! Terminal rendering of diagnostics.
//!
//! Output shape:
//!
//! ```text
//! error[E2001]: undefined variable `x`
//!   --> script.mgc:2:9
//!    |
//!  2 | println x;
//!    |         ^ not defined
//!    = note: ...
//! ```

use std::io::{self, Write};

use crate::span_utils::LineOffsetTable;
use crate::{Diagnostic, Label};

mod colors {
    pub const ERROR: &str = "\x1b[1;31m";
    pub const BOLD: &str = "\x1b[1m";
    pub const SECONDARY: &str = "\x1b[1;34m";
    pub const RESET: &str = "\x1b[0m";
}

/// Source text a diagnostic's spans point into.
pub struct SourceFile<'a> {
    pub name: &'a str,
    pub text: &'a str,
    lines: LineOffsetTable,
}

impl<'a> SourceFile<'a> {
    pub fn new(name: &'a str, text: &'a str) -> Self {
        SourceFile {
            name,
            text,
            lines: LineOffsetTable::build(text),
        }
    }
}

/// Writes diagnostics to a terminal-like sink, optionally with ANSI colors.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn new(writer: W, colors: bool) -> Self {
        TerminalEmitter { writer, colors }
    }

    pub fn emit(&mut self, diagnostic: &Diagnostic, source: &SourceFile<'_>) -> io::Result<()> {
        self.paint("error", colors::ERROR)?;
        self.paint(&format!("[{}]", diagnostic.code), colors::BOLD)?;
        writeln!(self.writer, ": {}", diagnostic.message)?;

        for label in &diagnostic.labels {
            self.emit_label(label, source)?;
        }
        for note in &diagnostic.notes {
            writeln!(self.writer, "   = note: {note}")?;
        }
        Ok(())
    }

    pub fn emit_all(&mut self, diagnostics: &[Diagnostic], source: &SourceFile<'_>) -> io::Result<()> {
        for diagnostic in diagnostics {
            self.emit(diagnostic, source)?;
        }
        self.writer.flush()
    }

    fn emit_label(&mut self, label: &Label, source: &SourceFile<'_>) -> io::Result<()> {
        let (line, col) = source.lines.offset_to_line_col(source.text, label.span.start);
        let marker = if label.is_primary { "-->" } else { ":::" };
        writeln!(self.writer, "  {marker} {}:{line}:{col}", source.name)?;

        let gutter = line.to_string();
        let pad = " ".repeat(gutter.len());
        let text = source.lines.line_text(source.text, line);
        writeln!(self.writer, " {pad} |")?;
        writeln!(self.writer, " {gutter} | {text}")?;

        let line_chars = text.chars().count();
        let start = (col as usize).saturating_sub(1).min(line_chars);
        let width = label
            .span
            .slice(source.text)
            .chars()
            .take_while(|&c| c != '\n')
            .count()
            .max(1);
        write!(self.writer, " {pad} | {}", " ".repeat(start))?;
        let color = if label.is_primary {
            colors::ERROR
        } else {
            colors::SECONDARY
        };
        let carets = if label.is_primary { "^" } else { "-" }.repeat(width);
        self.paint(&format!("{carets} {}", label.message), color)?;
        writeln!(self.writer)
    }

    fn paint(&mut self, text: &str, color: &str) -> io::Result<()> {
        if self.colors {
            write!(self.writer, "{color}{text}{}", colors::RESET)
        } else {
            write!(self.writer, "{text}")
        }
    }
}

/// Render diagnostics to a plain string without colors.
pub fn render(diagnostics: &[Diagnostic], source: &SourceFile<'_>) -> String {
    let mut out = Vec::new();
    let mut emitter = TerminalEmitter::new(&mut out, false);
    // Writing into a Vec cannot fail.
    let _ = emitter.emit_all(diagnostics, source);
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use mgc_ir::Span;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_excerpt_with_carets() {
        let text = "let a := 1;\nprintln b;\n";
        let source = SourceFile::new("demo.mgc", text);
        let diag = Diagnostic::error(ErrorCode::E2001)
            .with_message("undefined variable `b`")
            .with_label(Span::new(20, 21), "not defined");

        let expected = "\
error[E2001]: undefined variable `b`
  --> demo.mgc:2:9
   |
 2 | println b;
   |         ^ not defined
";
        assert_eq!(render(&[diag], &source), expected);
    }

    #[test]
    fn notes_follow_labels() {
        let source = SourceFile::new("<eval>", "f(1, 2)");
        let diag = Diagnostic::error(ErrorCode::E2004)
            .with_message("wrong number of arguments")
            .with_label(Span::new(0, 7), "called here")
            .with_note("`f` takes 1 argument");

        let out = render(&[diag], &source);
        assert!(out.contains("^^^^^^^ called here"));
        assert!(out.ends_with("   = note: `f` takes 1 argument\n"));
    }

    #[test]
    fn secondary_labels_use_dashes() {
        let text = "def f(x) { }\nf(1, 2);\n";
        let source = SourceFile::new("demo.mgc", text);
        let diag = Diagnostic::error(ErrorCode::E2004)
            .with_message("wrong number of arguments")
            .with_label(Span::new(13, 20), "called with 2")
            .with_secondary_label(Span::new(4, 5), "defined here");

        let expected = "\
error[E2004]: wrong number of arguments
  --> demo.mgc:2:1
   |
 2 | f(1, 2);
   | ^^^^^^^ called with 2
  ::: demo.mgc:1:5
   |
 1 | def f(x) { }
   |     - defined here
";
        assert_eq!(render(&[diag], &source), expected);
    }

    #[test]
    fn colors_wrap_error_header() {
        let source = SourceFile::new("<eval>", "x");
        let mut out = Vec::new();
        let mut emitter = TerminalEmitter::new(&mut out, true);
        let diag = Diagnostic::error(ErrorCode::E2001).with_message("undefined");
        emitter.emit(&diag, &source).unwrap_or_default();
        let text = String::from_utf8_lossy(&out);
        assert!(text.starts_with("\x1b[1;31merror"));
    }
}
