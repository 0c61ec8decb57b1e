use std::io::Write;
use std::time::Duration;

use docudigest_core::{DocumentKind, MAX_INPUT_CHARS};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Spinner shown on stderr while a request is in flight.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Print a finished summary.
pub fn print_summary(
    w: &mut dyn Write,
    file_name: &str,
    summary: &str,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "Summary of".bold().green(), file_name.bold())?;
    } else {
        writeln!(w, "Summary of {}", file_name)?;
    }
    writeln!(w)?;
    writeln!(w, "{}", summary)?;
    Ok(())
}

/// Print an error message the way the upload page shows it.
pub fn print_error(w: &mut dyn Write, message: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "Error:".bold().red(), message.red())
    } else {
        writeln!(w, "Error: {}", message)
    }
}

/// Print the text a dry run would send to the summarizer.
pub fn print_extraction(
    w: &mut dyn Write,
    file_name: &str,
    kind: DocumentKind,
    text: &str,
    sent: &str,
    full: bool,
    color: ColorMode,
) -> std::io::Result<()> {
    let total = text.chars().count();
    let header = if total > MAX_INPUT_CHARS {
        format!(
            "{} characters extracted; only the first {} would be summarized",
            total, MAX_INPUT_CHARS
        )
    } else {
        format!("{} characters extracted; all would be summarized", total)
    };

    if color.enabled() {
        writeln!(w, "{} {} ({})", "DRY RUN:".bold().cyan(), file_name.bold(), kind)?;
        writeln!(w, "{}", header.dimmed())?;
    } else {
        writeln!(w, "DRY RUN: {} ({})", file_name, kind)?;
        writeln!(w, "{}", header)?;
    }
    writeln!(w)?;

    if full {
        writeln!(w, "{}", text)?;
    } else {
        writeln!(w, "{}", sent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> std::io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn plain_summary() {
        let out = render(|w| print_summary(w, "a.txt", "Short.", ColorMode(false)));
        assert_eq!(out, "Summary of a.txt\n\nShort.\n");
    }

    #[test]
    fn plain_error() {
        let out = render(|w| print_error(w, "Unsupported file type", ColorMode(false)));
        assert_eq!(out, "Error: Unsupported file type\n");
    }

    #[test]
    fn extraction_reports_truncation() {
        let text = "y".repeat(MAX_INPUT_CHARS + 1);
        let sent = &text[..MAX_INPUT_CHARS];
        let out = render(|w| {
            print_extraction(w, "big.txt", DocumentKind::Txt, &text, sent, false, ColorMode(false))
        });
        assert!(out.starts_with("DRY RUN: big.txt (TXT)\n"));
        assert!(out.contains("only the first 4000 would be summarized"));
        assert!(out.ends_with(&format!("{}\n", sent)));
    }

    #[test]
    fn extraction_short_text() {
        let out = render(|w| {
            print_extraction(w, "a.txt", DocumentKind::Txt, "hi", "hi", true, ColorMode(false))
        });
        assert!(out.contains("2 characters extracted; all would be summarized"));
    }
}
