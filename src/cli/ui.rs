use crate::core::{ConversionEntry, ConverterView};
use chrono::Local;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Rate,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Rate => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn amount_cell(value: f64, code: &str) -> Cell {
    Cell::new(format!("{value:.2} {code}")).set_alignment(CellAlignment::Right)
}

/// Creates a spinner shown while a request is outstanding.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
    {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Renders the rate card: headline rate, date and any fetch error.
pub fn render_rate_card(view: &ConverterView) -> String {
    let mut output = format!(
        "1 {} = {}\n",
        view.base_code,
        ui_title(view.direction.base_name())
    );

    match (view.rate, view.effective_date) {
        (Some(rate), Some(date)) => {
            output.push_str(&format!(
                "{} {}\n",
                style_text(&format!("{rate:.4}"), StyleType::Rate),
                view.quote_code
            ));
            let fetched = view
                .fetched_at
                .map(|at| format!(", fetched {}", at.with_timezone(&Local).format("%H:%M:%S")))
                .unwrap_or_default();
            output.push_str(&style_text(
                &format!("NBP mid rate of {date}{fetched}"),
                StyleType::Subtle,
            ));
        }
        _ if view.is_loading => {
            output.push_str(&style_text("Loading rate...", StyleType::Subtle));
        }
        _ => {
            output.push_str(&style_text("Rate unavailable", StyleType::Subtle));
        }
    }

    if let Some(error) = &view.error {
        output.push('\n');
        output.push_str(&style_text(
            &format!("There was a problem fetching the rate: {error}"),
            StyleType::Error,
        ));
    }

    output
}

fn ui_title(text: &str) -> String {
    style_text(text, StyleType::Title)
}

/// Renders the pending amount and its live result.
pub fn render_calculator(view: &ConverterView) -> String {
    let amount = if view.amount.is_empty() {
        "0".to_string()
    } else {
        view.amount.clone()
    };
    let result = view
        .preview
        .map_or("0.00".to_string(), |value| format!("{value:.2}"));

    format!(
        "{amount} {} -> {} {}",
        view.base_code,
        style_text(&result, StyleType::Rate),
        view.quote_code
    )
}

/// Renders the history as a table, newest first.
pub fn render_history(history: &[ConversionEntry]) -> String {
    if history.is_empty() {
        return style_text("No conversions yet", StyleType::Subtle);
    }

    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("Time"),
        header_cell("Amount"),
        header_cell("Result"),
    ]);

    for entry in history {
        table.add_row(vec![
            Cell::new(entry.timestamp.format("%H:%M:%S").to_string()),
            amount_cell(entry.amount, entry.direction.base_code()),
            amount_cell(entry.result, entry.direction.quote_code()).add_attribute(Attribute::Bold),
        ]);
    }

    format!(
        "{}\n{}",
        style_text("Recent conversions", StyleType::Subtle),
        table
    )
}

/// Prints a separator line matching the terminal width.
pub fn separator() -> String {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    "─".repeat(term_width)
}
