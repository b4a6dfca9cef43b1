//! Aligned text rendering of replacement plans for terminal review.

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::plan::ReplacementPlan;

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(display_width(cell));
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths));
    let rule = widths
        .iter()
        .map(|w| "-".repeat((*w).max(3)))
        .collect::<Vec<_>>();
    let rule_widths = widths.iter().map(|w| (*w).max(3)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&rule, &rule_widths));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let line = values
        .iter()
        .zip(widths)
        .map(|(value, width)| {
            let cell = sanitize_cell(value);
            let padding = width.saturating_sub(display_width(&cell));
            format!("{cell}{}", " ".repeat(padding))
        })
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}

fn display_width(value: &str) -> usize {
    let mut width = 0usize;
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            // ANSI colour sequences occupy no columns
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

fn yes_no(value: bool) -> String {
    let text = if value { "yes" } else { "no" };
    text.to_string()
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let mut truncated = value.chars().take(max.saturating_sub(3)).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

/// One row per data block, footnote and API data set version.
pub fn plan_summary_rows(plan: &ReplacementPlan) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for data_block in &plan.data_blocks {
        rows.push(vec![
            "data block".to_string(),
            data_block.name.clone(),
            yes_no(data_block.valid),
            yes_no(data_block.fixable),
            data_block.invalid_elements().to_string(),
        ]);
    }
    for footnote in &plan.footnotes {
        rows.push(vec![
            "footnote".to_string(),
            truncate(&footnote.content, 48),
            yes_no(footnote.valid),
            "-".to_string(),
            footnote.invalid_elements().to_string(),
        ]);
    }
    if let Some(api) = &plan.api_data_set_version_plan {
        rows.push(vec![
            "api data set".to_string(),
            format!("{} v{}", api.data_set_title, api.version),
            yes_no(api.valid),
            "-".to_string(),
            "-".to_string(),
        ]);
    }
    rows
}

pub fn render_plan_summary(plan: &ReplacementPlan) -> String {
    let headers = ["kind", "name", "valid", "fixable", "invalid elements"]
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();
    let mut output = render_table(&headers, &plan_summary_rows(plan));
    if !plan.introduced_filters.is_empty() {
        let _ = writeln!(
            output,
            "\nReplacement introduces new filter(s): {}",
            plan.introduced_filters.join(", ")
        );
    }
    let _ = writeln!(
        output,
        "\nReplacement is {}",
        if plan.valid { "valid" } else { "NOT valid" }
    );
    output
}
