// file: src/exporter/mod.rs
// description: csv and manifest output module exports
// reference: internal module structure

pub mod csv_sink;
pub mod json;
pub mod projector;
pub mod raw;

pub use csv_sink::CsvSink;
pub use json::{ExportManifest, write_manifest};
pub use projector::RowProjector;
pub use raw::{RawExportOptions, RawExporter};

use chrono::Local;
use std::path::{Path, PathBuf};

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Local time stamp used in every output file name.
pub fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

pub fn output_path(output_dir: &Path, prefix: &str, timestamp: &str) -> PathBuf {
    output_dir.join(format!("{}_{}.csv", prefix, timestamp))
}

/// Size on disk, 0 when the file cannot be inspected.
pub fn file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_naming() {
        let path = output_path(Path::new("/tmp/feeds"), "comprehensive_products", "20240131_235959");
        assert_eq!(
            path,
            PathBuf::from("/tmp/feeds/comprehensive_products_20240131_235959.csv")
        );
    }

    #[test]
    fn test_timestamp_shape() {
        let stamp = timestamp();
        assert_eq!(stamp.len(), 15);
        assert_eq!(stamp.as_bytes()[8], b'_');
        assert!(stamp.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }
}
