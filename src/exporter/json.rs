// file: src/exporter/json.rs
// description: json manifest written next to exported csv files

use crate::error::{ExportError, Result};
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Serialize)]
pub struct ExportManifest<'a, T: Serialize> {
    pub exported_at: String,
    pub tool_version: &'static str,
    pub files: Vec<String>,
    pub summary: &'a T,
}

impl<'a, T: Serialize> ExportManifest<'a, T> {
    pub fn new(files: &[PathBuf], summary: &'a T) -> Self {
        Self {
            exported_at: Utc::now().to_rfc3339(),
            tool_version: env!("CARGO_PKG_VERSION"),
            files: files.iter().map(|p| p.display().to_string()).collect(),
            summary,
        }
    }
}

/// Writes `<csv stem>.manifest.json` beside `csv_path` and returns its path.
pub fn write_manifest<T: Serialize>(csv_path: &Path, manifest: &ExportManifest<'_, T>) -> Result<PathBuf> {
    let path = csv_path.with_extension("manifest.json");
    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(&path, json).map_err(|e| ExportError::file(&path, e))?;

    info!("Manifest written to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::tempdir;

    #[derive(Serialize)]
    struct Counts {
        rows: usize,
    }

    #[test]
    fn test_manifest_next_to_csv() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("comprehensive_products_20240101_000000.csv");
        let counts = Counts { rows: 12 };

        let manifest = ExportManifest::new(&[csv_path.clone()], &counts);
        let path = write_manifest(&csv_path, &manifest).unwrap();

        assert_eq!(
            path,
            dir.path().join("comprehensive_products_20240101_000000.manifest.json")
        );

        let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["summary"]["rows"], 12);
        assert_eq!(value["files"].as_array().unwrap().len(), 1);
    }
}
