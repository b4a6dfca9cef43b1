//! Flat CSV export of every planned element, for review in a spreadsheet.

use std::io::Write;

use anyhow::{Context, Result};
use csv::QuoteStyle;
use uuid::Uuid;

use crate::plan::ReplacementPlan;

pub const HEADERS: [&str; 7] = ["owner_kind", "owner", "element", "id", "label", "target", "valid"];

struct ElementRow {
    owner_kind: &'static str,
    owner: String,
    element: &'static str,
    id: Uuid,
    label: String,
    target: Option<Uuid>,
    valid: bool,
}

impl ElementRow {
    fn cells(&self) -> [String; 7] {
        [
            self.owner_kind.to_string(),
            self.owner.clone(),
            self.element.to_string(),
            self.id.to_string(),
            self.label.clone(),
            self.target.map(|id| id.to_string()).unwrap_or_default(),
            self.valid.to_string(),
        ]
    }
}

fn element_rows(plan: &ReplacementPlan) -> Vec<ElementRow> {
    let mut rows = Vec::new();
    for data_block in &plan.data_blocks {
        let row = |element, id, label: String, target: Option<Uuid>| ElementRow {
            owner_kind: "data block",
            owner: data_block.name.clone(),
            element,
            id,
            label,
            target,
            valid: target.is_some(),
        };
        for filter in &data_block.filters {
            for group in &filter.groups {
                for item in &group.filter_items {
                    let label = format!("{} / {} / {}", filter.label, group.label, item.label);
                    rows.push(row("filter item", item.id, label, item.target));
                }
            }
        }
        for group in &data_block.indicator_groups {
            for indicator in &group.indicators {
                let label = format!("{} / {}", group.label, indicator.label);
                rows.push(row("indicator", indicator.id, label, indicator.target));
            }
        }
        for location in &data_block.locations {
            for attribute in &location.location_attributes {
                let label = format!("{} / {} ({})", location.label, attribute.label, attribute.code);
                rows.push(row("location", attribute.id, label, attribute.target));
            }
        }
        for id in &data_block.unresolved_references {
            rows.push(row("unresolved", *id, String::new(), None));
        }
    }
    for footnote in &plan.footnotes {
        let row = |element, id, label: String, target: Option<Uuid>| ElementRow {
            owner_kind: "footnote",
            owner: footnote.id.to_string(),
            element,
            id,
            label,
            target,
            valid: target.is_some(),
        };
        for filter in &footnote.filters {
            rows.push(row("filter", filter.id, filter.label.clone(), filter.target));
        }
        for group in &footnote.filter_groups {
            let label = format!("{} / {}", group.filter_label, group.label);
            rows.push(row("filter group", group.id, label, group.target));
        }
        for item in &footnote.filter_items {
            let label = format!(
                "{} / {} / {}",
                item.filter_label, item.filter_group_label, item.label
            );
            rows.push(row("filter item", item.id, label, item.target));
        }
        for group in &footnote.indicator_groups {
            for indicator in &group.indicators {
                let label = format!("{} / {}", group.label, indicator.label);
                rows.push(row("indicator", indicator.id, label, indicator.target));
            }
        }
    }
    rows
}

pub fn write_plan_csv<W: Write>(plan: &ReplacementPlan, output: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .from_writer(output);
    writer.write_record(HEADERS).context("Writing CSV headers")?;
    for row in element_rows(plan) {
        writer
            .write_record(row.cells())
            .with_context(|| format!("Writing CSV row for element {}", row.id))?;
    }
    writer.flush().context("Flushing CSV output")?;
    Ok(())
}

pub fn render_plan_csv(plan: &ReplacementPlan) -> Result<String> {
    let mut buffer = Vec::new();
    write_plan_csv(plan, &mut buffer)?;
    String::from_utf8(buffer).context("Encoding CSV output")
}
