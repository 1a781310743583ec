//! Console output for a sync run.

use std::io::IsTerminal;

use crate::pipeline::SyncReport;
use crate::types::{format_ball, DrawRecord};

const RED: &str = "\x1b[91m";
const BLUE: &str = "\x1b[94m";
const YELLOW: &str = "\x1b[93m";
const GREEN: &str = "\x1b[92m";
const WHITE: &str = "\x1b[97m";
const END: &str = "\x1b[0m";

/// ANSI palette, empty when stdout is not a terminal
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    /// Colors on a terminal unless NO_COLOR is set
    pub fn detect() -> Self {
        if std::env::var_os("NO_COLOR").is_some() {
            return Self::plain();
        }
        Self {
            enabled: std::io::stdout().is_terminal(),
        }
    }

    pub fn plain() -> Self {
        Self { enabled: false }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.enabled {
            format!("{}{}{}", color, text, END)
        } else {
            text.to_string()
        }
    }
}

/// One line per new draw, e.g.
/// `new draw 2024124 (2024年10月29日) numbers: 02 14 15 17 25 30 + 11`
pub fn draw_line(palette: Palette, record: &DrawRecord) -> String {
    format!(
        "{} {} {}{} {} {}",
        palette.paint(YELLOW, &format!("new draw {}", record.code)),
        palette.paint(GREEN, &format!("({})", record.date_display())),
        palette.paint(WHITE, "numbers: "),
        palette.paint(RED, &record.red_display()),
        palette.paint(WHITE, "+"),
        palette.paint(BLUE, &format_ball(record.blue)),
    )
}

/// Final summary line
pub fn summary_line(report: &SyncReport) -> String {
    if report.is_up_to_date() {
        return "No new draws, local workbook is already up to date".to_string();
    }

    let newest = report
        .newest()
        .map(|code| code.to_string())
        .unwrap_or_default();

    match (report.created, &report.previous_latest) {
        (false, Some(previous)) => format!(
            "Added {} draws (from {} to {})",
            report.added.len(),
            previous,
            newest
        ),
        _ => format!(
            "Created workbook with {} draws (latest {})",
            report.added.len(),
            newest
        ),
    }
}

/// Print the new draws and the summary
pub fn print_report(palette: Palette, report: &SyncReport) {
    if !report.is_up_to_date() {
        let lines: Vec<String> = report.added.iter().map(|r| draw_line(palette, r)).collect();
        let width = lines
            .iter()
            .map(|l| strip_ansi(l).chars().count())
            .max()
            .unwrap_or(0);
        let separator = "-".repeat(width);

        println!();
        println!("{}", "=".repeat(width));
        println!("{}", palette.paint(YELLOW, "New draws:"));
        println!("{}", separator);
        for line in &lines {
            println!("{}", line);
        }
        println!("{}", separator);
    }

    if report.rejected > 0 {
        println!("Skipped {} malformed draws", report.rejected);
    }
    println!("{}", summary_line(report));
    if !report.is_up_to_date() {
        println!("Workbook: {} ({} draws)", report.path.display(), report.total);
    }
}

fn strip_ansi(text: &str) -> String {
    [RED, BLUE, YELLOW, GREEN, WHITE, END]
        .iter()
        .fold(text.to_string(), |acc, code| acc.replace(code, ""))
}
