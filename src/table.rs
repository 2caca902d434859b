// CSV and JSON output files.
//
// Rows may carry different column sets; the header is the union of all
// row keys in first-seen order and absent cells are written empty.

use crate::flatten::FlatRow;
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Union of row keys, deduplicated in insertion order.
pub fn columns(rows: &[FlatRow]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();
    for row in rows {
        for key in row.keys() {
            if seen.insert(key.to_string()) {
                ordered.push(key.to_string());
            }
        }
    }
    ordered
}

/// Delete `path` if it exists so the run starts from a fresh file.
pub fn remove_existing(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path)
            .with_context(|| format!("Failed to delete existing file {}", path.display()))?;
        info!("Existing file '{}' has been deleted.", path.display());
    }
    Ok(())
}

/// Write `rows` as a fresh CSV file with a header row.
pub fn write_table(rows: &[FlatRow], path: &Path) -> Result<()> {
    remove_existing(path)?;
    let header = columns(rows);
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    if header.is_empty() {
        writer.flush()?;
        return Ok(());
    }
    writer.write_record(&header)?;
    for row in rows {
        writer.write_record(header.iter().map(|column| row.cell(column)))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Read a CSV file back as rows of strings, one column per header field.
pub fn read_table(path: &Path) -> Result<Vec<FlatRow>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    read_rows(file)
}

/// Parse CSV rows from any reader. A leading UTF-8 BOM is ignored.
pub fn read_rows<R: std::io::Read>(reader: R) -> Result<Vec<FlatRow>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .enumerate()
        .map(|(i, h)| if i == 0 { h.trim_start_matches('\u{feff}').to_string() } else { h.to_string() })
        .collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("Failed to read CSV record")?;
        let mut row = FlatRow::new();
        for (i, column) in headers.iter().enumerate() {
            row.set_str(column.clone(), record.get(i).unwrap_or(""));
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Appends JSON documents to a file as one JSON array. The file is deleted
/// when the writer is opened; the closing bracket is written by
/// [`JsonArrayWriter::finish`].
pub struct JsonArrayWriter {
    out: BufWriter<File>,
    first: bool,
}

impl JsonArrayWriter {
    pub fn create(path: &Path) -> Result<Self> {
        remove_existing(path)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let mut out = BufWriter::new(file);
        out.write_all(b"[\n")?;
        Ok(JsonArrayWriter { out, first: true })
    }

    pub fn append(&mut self, document: &Value) -> Result<()> {
        if !self.first {
            self.out.write_all(b",\n")?;
        }
        serde_json::to_writer_pretty(&mut self.out, document)?;
        self.first = false;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        self.out.write_all(b"\n]")?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn header_is_first_seen_union() {
        let a: FlatRow = [("id", "1"), ("name", "x")].into_iter().collect();
        let b: FlatRow = [("id", "2"), ("cost", "5")].into_iter().collect();
        assert_eq!(columns(&[a, b]), vec!["id", "name", "cost"]);
    }

    #[test]
    fn missing_cells_are_written_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let a: FlatRow = [("id", "1"), ("name", "x")].into_iter().collect();
        let b: FlatRow = [("id", "2"), ("cost", "5")].into_iter().collect();
        write_table(&[a, b], &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "id,name,cost\n1,x,\n2,,5\n");
    }

    #[test]
    fn rows_read_back_with_same_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut a = FlatRow::new();
        a.set("id", &json!("f-1"));
        a.set("Calories", &json!(52.5));
        a.set_str("notes", "a, \"quoted\" note|second");
        let mut b = FlatRow::new();
        b.set("id", &json!("f-2"));
        b.set("Fat", &json!(3));
        let rows = vec![a, b];
        write_table(&rows, &path).unwrap();

        let back = read_table(&path).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back[0].keys().collect::<Vec<_>>(), columns(&rows));
        for (written, read) in rows.iter().zip(&back) {
            for key in written.keys() {
                assert_eq!(written.cell(key), read.cell(key));
            }
        }
    }

    #[test]
    fn existing_file_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale,data\n1,2\n3,4\n").unwrap();
        let row: FlatRow = [("id", "9")].into_iter().collect();
        write_table(&[row], &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "id\n9\n");
    }

    #[test]
    fn empty_table_writes_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_table(&[], &path).unwrap();
        assert!(read_table(&path).unwrap().is_empty());
    }

    #[test]
    fn bom_is_stripped_from_first_header() {
        let rows = read_rows("\u{feff}Name,Unit\nOats,Gram\n".as_bytes()).unwrap();
        assert_eq!(rows[0].cell("Name"), "Oats");
    }

    #[test]
    fn json_array_writer_wraps_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let mut writer = JsonArrayWriter::create(&path).unwrap();
        writer.append(&json!({"a": 1})).unwrap();
        writer.append(&json!({"b": 2})).unwrap();
        writer.finish().unwrap();
        let parsed: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, json!([{"a": 1}, {"b": 2}]));
    }
}
