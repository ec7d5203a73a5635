use panelsync_protocol::entity::{CellFormat, EntityDescriptor};
use panelsync_protocol::record::{RecordId, RowRecord};
use serde::Serialize;
use serde_json::Value;

/// Display-ready row: one text cell per descriptor column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRow {
    pub id: RecordId,
    pub cells: Vec<String>,
}

impl RenderedRow {
    pub fn contains(&self, text: &str) -> bool {
        self.cells.iter().any(|cell| cell.contains(text))
    }
}

pub fn render_row(entity: &EntityDescriptor, record: &RowRecord) -> RenderedRow {
    let cells = entity
        .columns
        .iter()
        .map(|column| format_cell(&record.text(&column.field), column.format))
        .collect();

    RenderedRow {
        id: record.id.clone(),
        cells,
    }
}

pub fn render_rows(entity: &EntityDescriptor, records: &[RowRecord]) -> Vec<RenderedRow> {
    records
        .iter()
        .map(|record| render_row(entity, record))
        .collect()
}

pub fn format_cell(raw: &str, format: CellFormat) -> String {
    match format {
        CellFormat::Text => raw.to_string(),
        CellFormat::Currency if raw.is_empty() || raw.starts_with('$') => raw.to_string(),
        CellFormat::Currency => format!("${}", raw),
    }
}

/// Counter values are shown exactly as the server sent them.
pub fn format_counter(value: &Value, format: CellFormat) -> String {
    let raw = match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    format_cell(&raw, format)
}
