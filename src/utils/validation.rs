// file: src/utils/validation.rs
// description: input validation for operator-supplied paths, sizes and EAN codes
// reference: input validation patterns

use crate::error::{ExportError, Result};
use std::fs;
use std::path::Path;

/// Upper bound for one `LIMIT/OFFSET` page of the raw export.
pub const MAX_BATCH_SIZE: usize = 1_000_000;

pub struct Validator;

impl Validator {
    pub fn validate_file_path(path: &Path) -> Result<()> {
        let canonical = fs::canonicalize(path).map_err(|e| {
            ExportError::Validation(format!(
                "Cannot canonicalize path {}: {}",
                path.display(),
                e
            ))
        })?;

        if !canonical.is_file() {
            return Err(ExportError::Validation(format!(
                "Path is not a file: {}",
                canonical.display()
            )));
        }

        Ok(())
    }

    /// Creates the output directory when missing and rejects non-directories.
    pub fn ensure_output_dir(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(|e| ExportError::file(path, e))?;
        }

        if !path.is_dir() {
            return Err(ExportError::Validation(format!(
                "Path is not a directory: {}",
                path.display()
            )));
        }

        Ok(())
    }

    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ExportError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    pub fn validate_batch_size(size: usize) -> Result<()> {
        if size == 0 {
            return Err(ExportError::Validation(
                "Batch size must be greater than 0".to_string(),
            ));
        }

        if size > MAX_BATCH_SIZE {
            return Err(ExportError::Validation(format!(
                "Batch size too large (max {})",
                MAX_BATCH_SIZE
            )));
        }

        Ok(())
    }

    /// EAN-8 to GTIN-14 shaped code. Anything else is still searchable, this
    /// only drives operator warnings.
    pub fn is_plausible_ean(ean: &str) -> bool {
        (8..=14).contains(&ean.len()) && ean.bytes().all(|b| b.is_ascii_digit())
    }
}
