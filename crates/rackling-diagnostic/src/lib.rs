//! Diagnostic and error reporting for rackling.
//!
//! Lexical and structural errors carry spans and render through ariadne;
//! evaluation errors are plain values (see `rackling-eval`) because a datum
//! under evaluation no longer has a source position.

mod codes;
mod diagnostic;

pub use codes::ErrorCode;
pub use diagnostic::{Diagnostic, Label, Severity};

use ariadne::{ColorGenerator, Label as AriadneLabel, Report, ReportKind, Source};

/// Render a diagnostic to stderr.
pub fn emit(source: &str, filename: &str, diagnostic: &Diagnostic) {
    let kind = match diagnostic.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
    };

    let mut colors = ColorGenerator::new();
    let mut report = Report::build(kind, filename, diagnostic.span.start as usize)
        .with_message(&diagnostic.message)
        .with_code(diagnostic.code.as_str());

    for label in &diagnostic.labels {
        let color = colors.next();
        let ariadne_label = AriadneLabel::new((filename, label.span.range()))
            .with_message(&label.message)
            .with_color(color);
        report = report.with_label(ariadne_label);
    }

    if let Some(help) = &diagnostic.help {
        report = report.with_help(help);
    }

    let _ = report.finish().eprint((filename, Source::from(source)));
}
