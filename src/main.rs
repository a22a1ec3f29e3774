// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result, anyhow, bail};
use catalog_export::pipeline::ExportRequest;
use catalog_export::shell::input::read_ean_file;
use catalog_export::shell::menu::{describe_failure, run_until};
use catalog_export::utils::logging::format_error;
use catalog_export::{Config, MySqlCatalog, Shell, clean_ean_list};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tokio::io::{BufReader, Stdin};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "catalog_export")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "CSV exports of the MySQL product catalog for marketplace feeds", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    /// Runs the interactive menu when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive numbered menu
    Menu,

    /// List every table of the catalog schema
    Tables,

    /// Columns, EAN coverage and sample rows of the products table
    Describe,

    /// Raw CSV export of active products, in batches
    Export {
        /// Export the configured sample size only
        #[arg(long, conflicts_with = "max")]
        sample: bool,

        #[arg(long, value_name = "NUM")]
        max: Option<usize>,

        /// Confirm a full export without prompting
        #[arg(long)]
        yes: bool,
    },

    /// Look up products by EAN (exact, then partial) and export them
    Search {
        eans: Vec<String>,

        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// 37-column enriched export, optionally split by EAN
    Comprehensive {
        #[arg(long, value_name = "NUM", conflicts_with_all = ["ean", "ean_file"])]
        limit: Option<usize>,

        /// Comma-separated EAN codes
        #[arg(long, value_delimiter = ',')]
        ean: Vec<String>,

        #[arg(long, value_name = "FILE")]
        ean_file: Option<PathBuf>,

        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    catalog_export::utils::logging::init_logger(cli.color, cli.verbose);

    info!("Catalog export tool");
    info!("Loading configuration from: {}", cli.config.display());

    if !cli.config.exists() {
        warn!(
            "Config file {} not found, using defaults and environment",
            cli.config.display()
        );
    }
    let config = Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?;

    let mut catalog = match MySqlCatalog::connect(config.database.clone()).await {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("{}", format_error(&describe_failure(&e)));
            return Err(e).context("Database connection failed");
        }
    };

    if let Err(e) = catalog.ping().await {
        eprintln!("{}", format_error(&describe_failure(&e)));
        return Err(e).context("Database connection check failed");
    }
    info!("Using catalog schema {}", catalog.database_name());

    // The menu handles Ctrl-C itself between operations.
    let outcome = match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => run_command(Commands::Menu, &config, &mut catalog, cli.color).await,
        command => {
            let operation = run_command(command, &config, &mut catalog, cli.color);
            match run_until(operation, tokio::signal::ctrl_c()).await {
                Some(outcome) => outcome,
                None => {
                    warn!("Interrupted, closing the connection");
                    Err(anyhow!("Interrupted by operator"))
                }
            }
        }
    };

    if let Err(e) = catalog.close().await {
        warn!("Failed to close database connection: {}", e);
    }

    outcome
}

async fn run_command(
    command: Commands,
    config: &Config,
    catalog: &mut MySqlCatalog,
    colored: bool,
) -> Result<()> {
    let mut shell = Shell::new(catalog, config, stdin_reader()).with_color(colored);

    match command {
        Commands::Menu => {
            shell.run().await.context("Interactive session failed")?;
        }
        Commands::Tables => {
            shell.list_tables().await.context("Listing tables failed")?;
        }
        Commands::Describe => {
            shell
                .describe_products()
                .await
                .context("Describing products failed")?;
        }
        Commands::Export { sample, max, yes } => {
            let max_products = if sample {
                Some(config.export.sample_size)
            } else {
                max
            };

            if max_products.is_none() && !yes {
                bail!("A full export must be confirmed with --yes (or use --sample / --max)");
            }

            shell
                .export_products(max_products)
                .await
                .context("Product export failed")?;
        }
        Commands::Search { eans, file } => {
            let eans = collect_eans(eans, file)?;
            shell.search_eans(&eans).await.context("EAN search failed")?;
        }
        Commands::Comprehensive {
            limit,
            ean,
            ean_file,
            yes,
        } => {
            let request = if !ean.is_empty() || ean_file.is_some() {
                ExportRequest::by_eans(collect_eans(ean, ean_file)?)
            } else if let Some(limit) = limit {
                ExportRequest::sample(limit)
            } else if yes {
                ExportRequest::full()
            } else {
                bail!("A full comprehensive export must be confirmed with --yes (or use --limit / --ean)");
            };

            shell
                .comprehensive(request)
                .await
                .context("Comprehensive export failed")?;
        }
    }

    Ok(())
}

fn stdin_reader() -> BufReader<Stdin> {
    BufReader::new(tokio::io::stdin())
}

/// Codes from the command line followed by the codes of `file`, cleaned.
fn collect_eans(eans: Vec<String>, file: Option<PathBuf>) -> Result<Vec<String>> {
    let mut all = eans;
    if let Some(path) = file {
        let from_file = read_ean_file(&path)
            .with_context(|| format!("Failed to read EAN codes from {}", path.display()))?;
        info!("Loaded {} EAN codes from file", from_file.len());
        all.extend(from_file);
    }

    let cleaned = clean_ean_list(all);
    if cleaned.is_empty() {
        bail!("No EAN code provided");
    }
    Ok(cleaned)
}
