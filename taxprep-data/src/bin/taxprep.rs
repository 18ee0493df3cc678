use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use taxprep_core::TaxYearRegistry;
use taxprep_core::calculations::classifier::{classify, is_potentially_business};
use taxprep_data::{assets, logging, prepare_report, settings, tax_years, transactions};
use tracing::info;

/// Schedule C tax preparation: expense lines, home office, depreciation and
/// self-employment tax for one tax year.
#[derive(Parser, Debug)]
#[command(name = "taxprep")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log at DEBUG level unless RUST_LOG says otherwise
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    /// TOML file with extra or replacement [[tax_year]] tables
    #[arg(long, global = true)]
    tax_years: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute every form for the tax year named in the settings file
    Report {
        /// Settings TOML (tax year, filing status, net profit, home office)
        #[arg(short, long)]
        settings: PathBuf,

        /// Transactions CSV
        #[arg(short, long)]
        transactions: Option<PathBuf>,

        /// Assets CSV
        #[arg(short, long)]
        assets: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show the Schedule C line for each category code
    Classify {
        #[arg(required = true)]
        codes: Vec<String>,
    },

    /// List tax years with registered constants
    Years,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let mut registry = TaxYearRegistry::builtin();
    if let Some(path) = &cli.tax_years {
        let configs = tax_years::load_from_file(path)
            .with_context(|| format!("Failed to parse tax-year tables: {}", path.display()))?;
        let applied = tax_years::apply(&mut registry, configs)
            .with_context(|| format!("Invalid tax-year table in: {}", path.display()))?;
        info!(applied, path = %path.display(), "loaded tax-year tables");
    }

    match cli.command {
        Command::Report {
            settings,
            transactions,
            assets,
            format,
        } => run_report(&registry, &settings, transactions.as_deref(), assets.as_deref(), format),
        Command::Classify { codes } => {
            for code in codes {
                let scope = if is_potentially_business(&code) {
                    "business category"
                } else {
                    "unmapped"
                };
                println!("{code}: {} ({scope})", classify(&code));
            }
            Ok(())
        }
        Command::Years => {
            for year in registry.tax_years() {
                let config = registry.get(year)?;
                println!(
                    "{year}: Section 179 limit {}, bonus rate {}, SS wage base {}",
                    config.section_179_limit, config.bonus_depreciation_rate, config.ss_wage_base
                );
            }
            Ok(())
        }
    }
}

fn run_report(
    registry: &TaxYearRegistry,
    settings_path: &std::path::Path,
    transactions_path: Option<&std::path::Path>,
    assets_path: Option<&std::path::Path>,
    format: OutputFormat,
) -> Result<()> {
    let settings = settings::load_from_file(settings_path)
        .with_context(|| format!("Failed to load settings: {}", settings_path.display()))?;

    let transactions = match transactions_path {
        Some(path) => transactions::load_from_file(path)
            .with_context(|| format!("Failed to load transactions: {}", path.display()))?,
        None => Vec::new(),
    };
    info!(count = transactions.len(), "loaded transactions");

    let assets = match assets_path {
        Some(path) => assets::load_from_file(path)
            .with_context(|| format!("Failed to load assets: {}", path.display()))?,
        None => Vec::new(),
    };
    info!(count = assets.len(), "loaded assets");

    let report = prepare_report(registry, &settings, &transactions, &assets)
        .with_context(|| format!("Failed to prepare report for tax year {}", settings.tax_year))?;

    match format {
        OutputFormat::Text => print!("{report}"),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialise report")?
        ),
    }

    Ok(())
}
