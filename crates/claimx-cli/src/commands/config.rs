//! Config command - manage the sales tax configuration file.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand, ValueEnum};
use console::style;

use claimx_core::models::config::{parse_percentage, ClaimConfig, SALES_TAX_ENV};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show the stored configuration and the effective tax rate
    Show,

    /// Create a configuration file with the default tax rate
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print a configuration value
    Get {
        #[arg(value_enum)]
        key: ConfigKey,
    },

    /// Store a configuration value
    Set {
        #[arg(value_enum)]
        key: ConfigKey,
        /// New value
        value: String,
    },

    /// Show the configuration file path
    Path,
}

/// Keys understood by `get` and `set`.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum ConfigKey {
    #[value(name = "tax.sales_tax_percentage")]
    SalesTaxPercentage,
}

impl ConfigKey {
    fn name(self) -> &'static str {
        match self {
            ConfigKey::SalesTaxPercentage => "tax.sales_tax_percentage",
        }
    }
}

/// Where the effective sales tax rate comes from.
#[derive(Debug, PartialEq, Eq)]
enum RateSource {
    Environment,
    File,
    Default,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show => show_config(&path),
        ConfigCommand::Init { force } => init_config(&path, force),
        ConfigCommand::Get { key } => get_config(&path, key),
        ConfigCommand::Set { key, value } => set_config(&path, key, &value),
        ConfigCommand::Path => show_path(&path),
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("claimx")
        .join("config.json")
}

/// Load the configuration used by the processing commands.
///
/// An explicit path must exist; otherwise the default location is used when
/// present. The environment override is applied last.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ClaimConfig> {
    let path = match config_path {
        Some(path) => {
            let path = PathBuf::from(path);
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Some(path)
        }
        None => Some(default_config_path()).filter(|p| p.exists()),
    };

    Ok(ClaimConfig::load(path.as_deref())?)
}

fn stored_config(path: &Path) -> anyhow::Result<Option<ClaimConfig>> {
    if path.exists() {
        Ok(Some(ClaimConfig::from_file(path)?))
    } else {
        Ok(None)
    }
}

fn rate_source(stored: Option<&ClaimConfig>) -> RateSource {
    let env_rate = std::env::var(SALES_TAX_ENV)
        .ok()
        .and_then(|raw| parse_percentage(&raw));

    if env_rate.is_some() {
        RateSource::Environment
    } else if stored.is_some_and(|c| c.tax.sales_tax_percentage.is_some()) {
        RateSource::File
    } else {
        RateSource::Default
    }
}

fn show_config(path: &Path) -> anyhow::Result<()> {
    let stored = stored_config(path)?;

    match &stored {
        Some(config) => println!("{}", serde_json::to_string_pretty(config)?),
        None => println!(
            "{} No config file at {}, using defaults.",
            style("ℹ").blue(),
            path.display()
        ),
    }

    let effective = stored.clone().unwrap_or_default().apply_env();
    let source = match rate_source(stored.as_ref()) {
        RateSource::Environment => SALES_TAX_ENV,
        RateSource::File => "config file",
        RateSource::Default => "default",
    };
    println!(
        "{} Effective sales tax percentage: {} ({})",
        style("ℹ").blue(),
        effective.sales_tax_percentage(),
        source
    );

    Ok(())
}

fn init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut config = ClaimConfig::default();
    config.tax.sales_tax_percentage = Some(config.sales_tax_percentage());
    config.save(path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        path.display()
    );

    Ok(())
}

fn get_config(path: &Path, key: ConfigKey) -> anyhow::Result<()> {
    let config = stored_config(path)?.unwrap_or_default();

    match key {
        ConfigKey::SalesTaxPercentage => println!("{}", config.sales_tax_percentage()),
    }

    Ok(())
}

fn set_config(path: &Path, key: ConfigKey, value: &str) -> anyhow::Result<()> {
    let mut config = stored_config(path)?.unwrap_or_default();

    match key {
        ConfigKey::SalesTaxPercentage => {
            let rate = parse_percentage(value)
                .ok_or_else(|| anyhow::anyhow!("Not a valid percentage: {}", value))?;
            config.tax.sales_tax_percentage = Some(rate);
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    config.save(path)?;

    println!("{} Set {} = {}", style("✓").green(), key.name(), value.trim());

    Ok(())
}

fn show_path(path: &Path) -> anyhow::Result<()> {
    println!("Configuration file: {}", path.display());

    if path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'claimx config init' to create a configuration file.");
    }

    Ok(())
}
