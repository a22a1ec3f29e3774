// file: src/exporter/csv_sink.rs
// description: UTF-8 CSV writer for catalog feeds and raw table dumps
// reference: https://docs.rs/csv

use crate::error::{ExportError, Result};
use crate::models::record::{display_headers, technical_headers};
use crate::models::{COLUMN_COUNT, ExportRecord};
use csv::{Writer, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::debug;

pub struct CsvSink<W: Write> {
    writer: Writer<W>,
    rows_written: usize,
}

impl CsvSink<File> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| ExportError::file(path, e))?;
        debug!("Opened {} for writing", path.display());

        Ok(Self::from_writer(file))
    }
}

impl<W: Write> CsvSink<W> {
    fn from_writer(inner: W) -> Self {
        Self {
            writer: WriterBuilder::new()
                .has_headers(false)
                .flexible(false)
                .from_writer(inner),
            rows_written: 0,
        }
    }

    /// Display labels followed by technical field names.
    pub fn write_catalog_headers(&mut self) -> Result<()> {
        self.writer.write_record(display_headers())?;
        self.writer.write_record(technical_headers())?;
        Ok(())
    }

    pub fn write_record(&mut self, record: &ExportRecord) -> Result<()> {
        let row = record.to_row();
        debug_assert_eq!(row.len(), COLUMN_COUNT);

        self.writer.write_record(&row)?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn write_header<I, T>(&mut self, columns: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.writer.write_record(columns)?;
        Ok(())
    }

    /// One data row of a raw dump; NULL is written as an empty field.
    pub fn write_values(&mut self, values: &[Option<String>]) -> Result<()> {
        self.writer
            .write_record(values.iter().map(|v| v.as_deref().unwrap_or("")))?;
        self.rows_written += 1;
        Ok(())
    }

    /// Flushes buffered rows and returns the data row count.
    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush()?;
        Ok(self.rows_written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_catalog_file_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.csv");

        let mut sink = CsvSink::create(&path).unwrap();
        sink.write_catalog_headers().unwrap();
        sink.write_record(&ExportRecord::not_found("123")).unwrap();
        assert_eq!(sink.finish().unwrap(), 1);

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Category,Shop sku,Titre du produit,Marque"));
        assert!(lines[1].starts_with("family_id,shop_sku,name,brand_id"));
        assert!(lines[1].ends_with("is_bzc,weight,size_id"));
        assert_eq!(lines[2], format!(",,,,,123{}", ",".repeat(COLUMN_COUNT - 6)));
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quoted.csv");
        let record = ExportRecord {
            title: "Savon, lavande".to_string(),
            ..ExportRecord::default()
        };

        let mut sink = CsvSink::create(&path).unwrap();
        sink.write_record(&record).unwrap();
        sink.finish().unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .unwrap();
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(row.len(), COLUMN_COUNT);
        assert_eq!(&row[2], "Savon, lavande");
    }

    #[test]
    fn test_raw_rows_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raw.csv");

        let mut sink = CsvSink::create(&path).unwrap();
        sink.write_header(["idproduit", "ean"]).unwrap();
        sink.write_values(&[Some("1".to_string()), None]).unwrap();
        assert_eq!(sink.finish().unwrap(), 1);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "idproduit,ean\n1,\n");
    }
}
