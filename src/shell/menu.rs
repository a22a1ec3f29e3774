// file: src/shell/menu.rs
// description: interactive operations menu over one catalog connection
// reference: numbered menu 0-8 with confirmations for full exports

use crate::config::Config;
use crate::database::CatalogSource;
use crate::error::{ExportError, Result};
use crate::exporter::raw::{EanSearchResult, MatchKind, ProductsOverview, RawExportResult};
use crate::exporter::{RawExportOptions, RawExporter, timestamp};
use crate::pipeline::{ExportOrchestrator, ExportRequest, ExportSummary, clean_ean_list};
use crate::shell::input::{
    EanInputMode, MenuChoice, Prompt, parse_ean_list, read_ean_file,
};
use crate::utils::Validator;
use crate::utils::logging::{
    format_bytes, format_error, format_heading, format_info, format_success, format_warning,
};
use std::path::Path;
use tokio::io::AsyncBufRead;
use tracing::{error, info};

const SAMPLE_ROWS_SHOWN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Drives `operation` unless `interrupt` completes first; `None` means interrupted.
pub async fn run_until<F, I>(operation: F, interrupt: I) -> Option<F::Output>
where
    F: Future,
    I: Future,
{
    tokio::select! {
        output = operation => Some(output),
        _ = interrupt => None,
    }
}

pub struct Shell<'a, S, R> {
    source: &'a mut S,
    config: &'a Config,
    prompt: Prompt<R>,
    colored: bool,
}

impl<'a, S: CatalogSource, R: AsyncBufRead + Unpin> Shell<'a, S, R> {
    pub fn new(source: &'a mut S, config: &'a Config, reader: R) -> Self {
        Self {
            source,
            config,
            prompt: Prompt::new(reader),
            colored: true,
        }
    }

    pub fn with_color(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Runs the menu until the operator exits, input ends or Ctrl-C arrives.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            match run_until(self.step(), tokio::signal::ctrl_c()).await {
                Some(flow) => {
                    if flow? == Flow::Exit {
                        println!("{}", format_info("Goodbye!"));
                        break;
                    }
                }
                None => {
                    println!();
                    println!("{}", format_warning("Interrupted, closing the connection"));
                    info!("Interrupted by operator");
                    break;
                }
            }
        }

        Ok(())
    }

    /// One menu round: show options, read a choice and run it. Operation
    /// failures are reported and the menu continues.
    pub async fn step(&mut self) -> Result<Flow> {
        print_menu();

        let Some(answer) = self.prompt.ask("\nSelect option (0-8): ").await? else {
            return Ok(Flow::Exit);
        };

        let Some(choice) = MenuChoice::parse(&answer) else {
            println!("{}", format_error("Invalid option, please choose 0-8"));
            return Ok(Flow::Continue);
        };

        if choice == MenuChoice::Exit {
            return Ok(Flow::Exit);
        }

        if let Err(e) = self.dispatch(choice).await {
            error!("Operation failed: {}", e);
            println!("{}", format_error(&e.to_string()));
        }

        Ok(Flow::Continue)
    }

    async fn dispatch(&mut self, choice: MenuChoice) -> Result<()> {
        match choice {
            MenuChoice::Exit => Ok(()),
            MenuChoice::ListTables => self.list_tables().await,
            MenuChoice::DescribeProducts => self.describe_products().await,
            MenuChoice::ExportAll => {
                println!(
                    "{}",
                    format_warning("This exports ALL active products and may take hours")
                );
                if self
                    .prompt
                    .confirm("Are you sure? Type 'yes' to confirm: ")
                    .await?
                {
                    self.export_products(None).await
                } else {
                    println!("{}", format_info("Export cancelled"));
                    Ok(())
                }
            }
            MenuChoice::ExportSample => {
                self.export_products(Some(self.config.export.sample_size))
                    .await
            }
            MenuChoice::SearchEan => match self.ask_eans().await? {
                Some(eans) => self.search_eans(&eans).await,
                None => Ok(()),
            },
            MenuChoice::ComprehensiveAll => {
                println!(
                    "{}",
                    format_warning("This exports ALL active products with 37 enriched columns")
                );
                if self
                    .prompt
                    .confirm("Continue? Type 'yes' to confirm: ")
                    .await?
                {
                    self.comprehensive(ExportRequest::full()).await
                } else {
                    println!("{}", format_info("Export cancelled"));
                    Ok(())
                }
            }
            MenuChoice::ComprehensiveSample => {
                self.comprehensive(ExportRequest::sample(
                    self.config.export.comprehensive_sample_size,
                ))
                .await
            }
            MenuChoice::ComprehensiveEan => match self.ask_eans().await? {
                Some(eans) => self.comprehensive(ExportRequest::by_eans(eans)).await,
                None => Ok(()),
            },
        }
    }

    /// Asks for an EAN source and reads the codes. `None` when the input is
    /// missing or invalid, after telling the operator why.
    async fn ask_eans(&mut self) -> Result<Option<Vec<String>>> {
        println!("\nEAN input:");
        println!("a. Single EAN");
        println!("b. Multiple EANs (comma-separated)");
        println!("c. Load EANs from file");

        let answer = self
            .prompt
            .ask("Select search option (a/b/c): ")
            .await?
            .unwrap_or_default();

        let Some(mode) = EanInputMode::parse(&answer) else {
            println!("{}", format_error("Invalid search option"));
            return Ok(None);
        };

        let eans = match mode {
            EanInputMode::Single => {
                let ean = self.prompt.ask("Enter EAN code: ").await?.unwrap_or_default();
                clean_ean_list([ean.as_str()])
            }
            EanInputMode::CommaSeparated => {
                let line = self
                    .prompt
                    .ask("Enter EAN codes (comma-separated): ")
                    .await?
                    .unwrap_or_default();
                parse_ean_list(&line)
            }
            EanInputMode::File => {
                let path = self
                    .prompt
                    .ask("Enter path to text file with EAN codes: ")
                    .await?
                    .unwrap_or_default();
                if path.is_empty() {
                    Vec::new()
                } else {
                    match read_ean_file(Path::new(&path)) {
                        Ok(eans) => {
                            println!(
                                "{}",
                                format_success(&format!("Loaded {} EAN codes from file", eans.len()))
                            );
                            eans
                        }
                        Err(e) => {
                            println!("{}", format_error(&e.to_string()));
                            return Ok(None);
                        }
                    }
                }
            }
        };

        if eans.is_empty() {
            println!("{}", format_error("No EAN code provided"));
            return Ok(None);
        }

        let odd: Vec<&String> = eans
            .iter()
            .filter(|ean| !Validator::is_plausible_ean(ean))
            .collect();
        if !odd.is_empty() {
            println!(
                "{}",
                format_warning(&format!(
                    "{} code(s) do not look like EAN/GTIN, searching anyway",
                    odd.len()
                ))
            );
        }

        Ok(Some(eans))
    }

    fn raw_exporter(&mut self) -> RawExporter<'_, S> {
        RawExporter::new(&mut *self.source, self.config.export.output_dir.clone())
            .with_color(self.colored)
    }

    pub async fn list_tables(&mut self) -> Result<()> {
        let tables = self.raw_exporter().list_tables().await?;

        println!("\n{}", format_heading(&format!("Tables ({})", tables.len())));
        for (index, table) in tables.iter().enumerate() {
            println!("{:3}. {}", index + 1, table);
        }
        Ok(())
    }

    pub async fn describe_products(&mut self) -> Result<()> {
        let overview = self.raw_exporter().describe_products().await?;
        print_overview(&overview);
        Ok(())
    }

    /// Raw dump of active products; `max_products` selects the sample variant.
    pub async fn export_products(&mut self, max_products: Option<usize>) -> Result<()> {
        Validator::ensure_output_dir(&self.config.export.output_dir)?;

        let options = match max_products {
            Some(max) => RawExportOptions {
                batch_size: self.config.export.sample_batch_size,
                max_products: Some(max),
            },
            None => RawExportOptions {
                batch_size: self.config.export.full_batch_size,
                max_products: None,
            },
        };

        let result = self
            .raw_exporter()
            .export_products(options, &timestamp())
            .await?;
        print_raw_export(&result);
        Ok(())
    }

    pub async fn search_eans(&mut self, eans: &[String]) -> Result<()> {
        Validator::ensure_output_dir(&self.config.export.output_dir)?;

        let result = self
            .raw_exporter()
            .search_by_ean(eans, &timestamp())
            .await?;
        print_search(&result);
        Ok(())
    }

    pub async fn comprehensive(&mut self, request: ExportRequest) -> Result<()> {
        let summary = ExportOrchestrator::new(&mut *self.source, self.config.export.clone())
            .with_color(self.colored)
            .run(&request, &timestamp())
            .await?;
        print_summary(&summary);
        Ok(())
    }
}

fn print_menu() {
    println!("\n{}", format_heading("Available operations"));
    println!("1. List all tables in the database");
    println!("2. Analyze products table (fields and structure)");
    println!("3. Export all products to CSV (original format)");
    println!("4. Export sample products to CSV (original format)");
    println!("5. Search products by EAN and save to CSV");
    println!("6. Comprehensive export (37 columns)");
    println!("7. Comprehensive export of a sample");
    println!("8. Comprehensive export filtered by EAN");
    println!("0. Exit");
}

fn print_overview(overview: &ProductsOverview) {
    println!("\n{}", format_heading("Products table"));
    println!("{:<30} {:<25} {:<6} {}", "Field", "Type", "Null", "Key");
    for column in &overview.columns {
        println!(
            "{:<30} {:<25} {:<6} {}",
            column.name, column.data_type, column.nullable, column.key
        );
    }

    println!();
    println!("Total products: {}", overview.total_products);
    println!(
        "Products with EAN: {} ({:.1}%)",
        overview.products_with_ean,
        overview.ean_percentage()
    );

    println!("\nSample products:");
    let samples = &overview.samples;
    for row in 0..samples.len().min(SAMPLE_ROWS_SHOWN) {
        let field = |name: &str| samples.value(row, name).unwrap_or("").to_string();
        println!(
            "  ID: {} | EAN: {} | Ref: {} | Price: {} | Status: {}",
            field("idproduit"),
            field("ean"),
            field("ref"),
            field("prix"),
            field("status")
        );
    }
}

fn print_raw_export(result: &RawExportResult) {
    println!("\n{}", format_success("Export completed"));
    println!("File: {}", result.path.display());
    println!("Products exported: {}", result.rows);
    println!("File size: {}", format_bytes(result.bytes));
}

fn print_search(result: &EanSearchResult) {
    for ean_match in &result.matches {
        let line = match ean_match.kind {
            MatchKind::Exact => {
                format_success(&format!("{}: {} exact match(es)", ean_match.ean, ean_match.count))
            }
            MatchKind::Partial => format_success(&format!(
                "{}: {} partial match(es)",
                ean_match.ean, ean_match.count
            )),
            MatchKind::Missing => format_error(&format!("{}: no matches found", ean_match.ean)),
        };
        println!("  {}", line);
    }

    let Some(path) = &result.path else {
        println!("{}", format_error("No products found for any EAN code"));
        return;
    };

    let products = &result.products;
    println!(
        "\n{}",
        format_heading(&format!("Search results ({} unique products)", products.len()))
    );
    for row in 0..products.len() {
        println!(
            "{:3}. EAN: {:<15} | Ref: {:<20} | Price: {}",
            row + 1,
            products.value(row, "ean").unwrap_or(""),
            products.value(row, "ref").unwrap_or(""),
            products.value(row, "prix").unwrap_or("")
        );
    }

    println!("\n{}", format_success("Search results exported"));
    println!("File: {}", path.display());
}

fn print_summary(summary: &ExportSummary) {
    println!("\n{}", format_success("Comprehensive export completed"));
    for file in &summary.files {
        println!("File: {}", file.display());
    }

    if summary.is_filtered() {
        println!("Searched EANs: {}", summary.requested_eans);
        println!(
            "Found: {} ({:.1}%)",
            summary.found_eans,
            summary.found_percentage()
        );
        println!(
            "Not found: {} ({:.1}%)",
            summary.not_found_eans,
            summary.not_found_percentage()
        );
    }

    println!("Products exported: {}", summary.products_exported);
    if let Some(manifest) = &summary.manifest {
        println!("Manifest: {}", manifest.display());
    }
}

/// Operator-facing wording for a failed command.
pub fn describe_failure(error: &ExportError) -> String {
    match error {
        ExportError::Connection(_) => format!("Cannot proceed without database connection: {}", error),
        ExportError::Validation(message) => message.clone(),
        _ => error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::{InMemoryCatalog, MemoryProduct};
    use tempfile::TempDir;

    fn config(dir: &Path) -> Config {
        let mut config = Config::default_config();
        config.export.output_dir = dir.to_path_buf();
        config.export.sample_size = 2;
        config.export.comprehensive_sample_size = 1;
        config
    }

    fn catalog() -> InMemoryCatalog {
        let mut catalog = InMemoryCatalog::new();
        catalog.products.push(MemoryProduct::active(1, "3760000000017"));
        catalog.products.push(MemoryProduct::active(2, "3760000000024"));
        catalog.products.push(MemoryProduct::active(3, "3760000000031"));
        catalog
    }

    fn files_with_prefix(dir: &Path, prefix: &str) -> usize {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(prefix))
            .count()
    }

    #[tokio::test]
    async fn test_exit_and_end_of_input() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());
        let mut source = catalog();

        let mut shell = Shell::new(&mut source, &config, &b"0\n"[..]).with_color(false);
        assert_eq!(shell.step().await.unwrap(), Flow::Exit);

        let mut shell = Shell::new(&mut source, &config, &b""[..]).with_color(false);
        assert_eq!(shell.step().await.unwrap(), Flow::Exit);
    }

    #[tokio::test]
    async fn test_invalid_choice_continues() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());
        let mut source = catalog();

        let mut shell = Shell::new(&mut source, &config, &b"42\n"[..]).with_color(false);
        assert_eq!(shell.step().await.unwrap(), Flow::Continue);
    }

    #[tokio::test]
    async fn test_full_export_requires_yes() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());
        let mut source = catalog();

        let mut shell = Shell::new(&mut source, &config, &b"3\nno\n6\ny\n"[..]).with_color(false);
        assert_eq!(shell.step().await.unwrap(), Flow::Continue);
        assert_eq!(shell.step().await.unwrap(), Flow::Continue);

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_comprehensive_ean_from_comma_list() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());
        let mut source = catalog();

        let script = b"8\nb\n3760000000017, 0000000000000\n0\n";
        let mut shell = Shell::new(&mut source, &config, &script[..]).with_color(false);
        shell.run().await.unwrap();

        assert_eq!(files_with_prefix(dir.path(), "comprehensive_ean_found_"), 1);
        assert_eq!(files_with_prefix(dir.path(), "comprehensive_ean_not_found_"), 1);
    }

    #[tokio::test]
    async fn test_sample_exports_write_files() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());
        let mut source = catalog();

        let mut shell = Shell::new(&mut source, &config, &b"4\n7\n"[..]).with_color(false);
        assert_eq!(shell.step().await.unwrap(), Flow::Continue);
        assert_eq!(shell.step().await.unwrap(), Flow::Continue);

        assert_eq!(files_with_prefix(dir.path(), "all_products_"), 1);
        assert_eq!(files_with_prefix(dir.path(), "comprehensive_products_"), 1);
    }

    #[tokio::test]
    async fn test_missing_ean_file_keeps_menu_running() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());
        let mut source = catalog();

        let script = b"5\nc\n/nonexistent/eans.txt\n";
        let mut shell = Shell::new(&mut source, &config, &script[..]).with_color(false);
        assert_eq!(shell.step().await.unwrap(), Flow::Continue);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_run_until_stops_on_interrupt() {
        let finished = run_until(async { 7 }, std::future::pending::<()>()).await;
        assert_eq!(finished, Some(7));

        let interrupted = run_until(std::future::pending::<u32>(), async {}).await;
        assert_eq!(interrupted, None);
    }

    #[tokio::test]
    async fn test_interrupted_export_leaves_source_usable() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());
        let mut source = catalog();

        {
            let mut shell = Shell::new(&mut source, &config, &b""[..]).with_color(false);
            let outcome = run_until(
                async {
                    std::future::pending::<()>().await;
                    shell.comprehensive(ExportRequest::full()).await
                },
                async {},
            )
            .await;
            assert!(outcome.is_none());
        }

        assert_eq!(source.count_products().await.unwrap(), 3);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_describe_failure_wording() {
        let error = ExportError::Validation("no valid EAN codes provided".to_string());
        assert_eq!(describe_failure(&error), "no valid EAN codes provided");
    }
}
