//! Rendering and JSON serialization for CLI output.

mod style;

use std::process::ExitCode;

use comfy_table::{Cell, CellAlignment, Table, presets::UTF8_FULL_CONDENSED};
use coursa_core::CourseView;
use serde::Serialize;

pub use style::{dim, header, subheader, success, warning};

/// Longest title shown in a table cell.
const MAX_TITLE_CHARS: usize = 60;

/// Prints a value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
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

/// Shortens text to `max` characters, marking the cut with an ellipsis.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Formats an optional number, or a dash.
fn number(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.precision$}"))
}

/// Viewer flags as a compact marker.
fn marker(view: &CourseView) -> String {
    let mut flags = String::new();
    if view.liked {
        flags.push('+');
    }
    if view.disliked {
        flags.push('-');
    }
    if view.view_count > 0 {
        flags.push_str(&format!("{}v", view.view_count));
    }
    flags
}

/// Renders courses as a table, numbered from `first_rank`.
pub fn course_table(views: &[CourseView], first_rank: usize) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        "#", "Title", "Platform", "Category", "Level", "Hours", "Rating", "Score", "You",
    ]);

    for (i, view) in views.iter().enumerate() {
        table.add_row(vec![
            Cell::new(first_rank + i).set_alignment(CellAlignment::Right),
            Cell::new(truncate(&view.title, MAX_TITLE_CHARS)),
            Cell::new(&view.platform),
            Cell::new(view.category.as_deref().unwrap_or("-")),
            Cell::new(view.level.as_deref().unwrap_or("-")),
            Cell::new(number(view.duration, 1)).set_alignment(CellAlignment::Right),
            Cell::new(number(view.rating, 1)).set_alignment(CellAlignment::Right),
            Cell::new(number(view.score, 2)).set_alignment(CellAlignment::Right),
            Cell::new(marker(view)),
        ]);
    }
    table
}

/// Prints courses as a table followed by their URLs.
pub fn print_courses(views: &[CourseView], first_rank: usize) {
    if views.is_empty() {
        println!("{}", dim("No courses found."));
        return;
    }
    println!("{}", course_table(views, first_rank));
    for (i, view) in views.iter().enumerate() {
        println!("{} {}", dim(&format!("{:>3}.", first_rank + i)), view.url);
    }
}
