//! CSV sources for the datum and the relational tags

use crate::error::{ArchShapeError, Result};
use csv::StringRecord;
use std::fs::File;
use std::path::Path;

/// One row of the datum source: latitude, longitude, label
#[derive(Debug, Clone, PartialEq)]
pub struct DatumRecord {
    pub row: u64,
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
}

/// One row of the tag source: an unused column, then tag and description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRecord {
    pub row: u64,
    pub tag: String,
    pub description: String,
}

/// Build a [`csv::Reader`] that skips the header row and tolerates ragged rows
fn open_reader(path: &Path) -> Result<csv::Reader<File>> {
    let file = File::open(path)?;
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true);
    builder.flexible(true);
    builder.trim(csv::Trim::All);
    Ok(builder.from_reader(file))
}

/// Strip stray double quotes and surrounding blanks
fn clean_field(raw: &str) -> String {
    raw.replace('"', "").trim().to_string()
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| clean_field(field).is_empty())
}

fn row_number(record: &StringRecord) -> u64 {
    record.position().map_or(0, |p| p.line())
}

fn text_field(path: &Path, record: &StringRecord, index: usize, name: &'static str) -> Result<String> {
    match record.get(index) {
        Some(raw) => Ok(clean_field(raw)),
        None => Err(ArchShapeError::MalformedRow {
            file: path.to_path_buf(),
            row: row_number(record),
            field: name,
            value: String::new(),
        }),
    }
}

fn number_field(path: &Path, record: &StringRecord, index: usize, name: &'static str) -> Result<f64> {
    let text = text_field(path, record, index, name)?;
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ArchShapeError::MalformedRow {
            file: path.to_path_buf(),
            row: row_number(record),
            field: name,
            value: record.get(index).unwrap_or_default().to_string(),
        }),
    }
}

/// Read every datum row. Row count is checked by the caller.
pub fn read_datum_records(path: &Path) -> Result<Vec<DatumRecord>> {
    let mut reader = open_reader(path)?;
    let mut records = Vec::new();

    for result in reader.records() {
        let record = result?;
        if is_blank(&record) {
            continue;
        }
        records.push(DatumRecord {
            row: row_number(&record),
            latitude: number_field(path, &record, 0, "latitude")?,
            longitude: number_field(path, &record, 1, "longitude")?,
            label: text_field(path, &record, 2, "label")?,
        });
    }

    tracing::debug!(path = %path.display(), rows = records.len(), "read datum source");
    Ok(records)
}

/// Read every tag row in file order
pub fn read_tag_records(path: &Path) -> Result<Vec<TagRecord>> {
    let mut reader = open_reader(path)?;
    let mut records = Vec::new();

    for result in reader.records() {
        let record = result?;
        if is_blank(&record) {
            continue;
        }
        let tag = text_field(path, &record, 1, "tag")?;
        if tag.is_empty() {
            return Err(ArchShapeError::MalformedRow {
                file: path.to_path_buf(),
                row: row_number(&record),
                field: "tag",
                value: tag,
            });
        }
        records.push(TagRecord {
            row: row_number(&record),
            tag,
            description: text_field(path, &record, 2, "description")?,
        });
    }

    tracing::debug!(path = %path.display(), rows = records.len(), "read tag source");
    Ok(records)
}
