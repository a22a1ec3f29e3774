// file: src/shell/input.rs
// description: line prompts and parsing of operator input
// reference: numbered menu, a/b/c EAN sources, "yes" confirmations

use crate::error::{ExportError, Result};
use crate::pipeline::clean_ean_list;
use crate::utils::Validator;
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

/// Reads answers line by line from any async buffered reader.
pub struct Prompt<R> {
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin> Prompt<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Prints `question` and returns the trimmed answer, or `None` at end of input.
    pub async fn ask(&mut self, question: &str) -> Result<Option<String>> {
        print!("{}", question);
        std::io::stdout().flush()?;

        let line = self.lines.next_line().await?;
        Ok(line.map(|l| l.trim().to_string()))
    }

    pub async fn confirm(&mut self, question: &str) -> Result<bool> {
        Ok(self
            .ask(question)
            .await?
            .is_some_and(|answer| is_confirmed(&answer)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Exit,
    ListTables,
    DescribeProducts,
    ExportAll,
    ExportSample,
    SearchEan,
    ComprehensiveAll,
    ComprehensiveSample,
    ComprehensiveEan,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "0" => Some(Self::Exit),
            "1" => Some(Self::ListTables),
            "2" => Some(Self::DescribeProducts),
            "3" => Some(Self::ExportAll),
            "4" => Some(Self::ExportSample),
            "5" => Some(Self::SearchEan),
            "6" => Some(Self::ComprehensiveAll),
            "7" => Some(Self::ComprehensiveSample),
            "8" => Some(Self::ComprehensiveEan),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EanInputMode {
    Single,
    CommaSeparated,
    File,
}

impl EanInputMode {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "a" => Some(Self::Single),
            "b" => Some(Self::CommaSeparated),
            "c" => Some(Self::File),
            _ => None,
        }
    }
}

pub fn is_confirmed(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}

pub fn parse_ean_list(input: &str) -> Vec<String> {
    clean_ean_list(input.split(','))
}

/// One EAN per line; blank lines are skipped.
pub fn read_ean_file(path: &Path) -> Result<Vec<String>> {
    Validator::validate_file_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|e| ExportError::file(path, e))?;

    let eans = clean_ean_list(content.lines());
    if eans.is_empty() {
        return Err(ExportError::Validation(format!(
            "no valid EAN codes found in {}",
            path.display()
        )));
    }

    Ok(eans)
}
