//! Process command - extract an expense claim from a single text.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tokio::io::AsyncReadExt;
use tracing::{debug, error, info};

use claimx_core::extract::format_amount;
use claimx_core::models::config::parse_percentage;
use claimx_core::{ClaimConfig, ErrorResponse, ExpenseClaimProcessor, ProcessedReservation};

use super::config::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input text file, or "-" to read stdin
    #[arg(required_unless_present = "text")]
    input: Option<PathBuf>,

    /// Process this text instead of a file
    #[arg(short, long, conflicts_with = "input")]
    text: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Sales tax percentage, overriding the configuration
    #[arg(long)]
    tax_rate: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per expense line
    Csv,
    /// XML output
    Xml,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Xml => "xml",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(raw) = &args.tax_rate {
        apply_tax_rate(&mut config, raw)?;
    }

    let text = read_input(&args).await?;
    info!("Processing {} characters of text", text.len());

    let processor = ExpenseClaimProcessor::from_config(&config);
    let reservation = match processor.process(&text) {
        Ok(reservation) => reservation,
        Err(e) => {
            let response = ErrorResponse::from(&e);
            error!("Processing failed: {}", e);
            eprintln!("{}", serde_json::to_string(&response)?);
            return Err(e.into());
        }
    };

    let output = format_reservation(&reservation, args.format, args.pretty)?;

    if let Some(output_path) = &args.output {
        tokio::fs::write(output_path, &output).await?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Apply a `--tax-rate` value; unlike the config file, a bad flag is an error.
pub fn apply_tax_rate(config: &mut ClaimConfig, raw: &str) -> anyhow::Result<()> {
    let rate = parse_percentage(raw)
        .ok_or_else(|| anyhow::anyhow!("Invalid sales tax percentage: {}", raw))?;
    config.tax.sales_tax_percentage = Some(rate);
    Ok(())
}

async fn read_input(args: &ProcessArgs) -> anyhow::Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }

    match args.input.as_deref() {
        Some(path) if path == Path::new("-") => {
            let mut text = String::new();
            tokio::io::stdin().read_to_string(&mut text).await?;
            Ok(text)
        }
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Input file not found: {}", path.display());
            }
            Ok(tokio::fs::read_to_string(path).await?)
        }
        None => anyhow::bail!("No input given: pass a file, '-' for stdin, or --text"),
    }
}

pub fn format_reservation(
    reservation: &ProcessedReservation,
    format: OutputFormat,
    pretty: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(reservation)?),
        OutputFormat::Json => Ok(serde_json::to_string(reservation)?),
        OutputFormat::Csv => format_csv(reservation),
        OutputFormat::Xml => Ok(quick_xml::se::to_string_with_root("reservation", reservation)?),
        OutputFormat::Text => Ok(format_text(reservation)),
    }
}

fn format_csv(reservation: &ProcessedReservation) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "vendor",
        "description",
        "date",
        "cost_centre",
        "total_including_tax",
        "tax",
        "total_excluding_tax",
        "payment_method",
    ])?;

    let vendor = reservation.vendor.clone().unwrap_or_default();
    let description = reservation.description.clone().unwrap_or_default();
    let date = reservation.date.map(|d| d.to_string()).unwrap_or_default();

    for line in &reservation.expense_lines {
        wtr.write_record([
            &vendor,
            &description,
            &date,
            &line.cost_centre,
            &line.total_including_tax.map(|d| d.to_string()).unwrap_or_default(),
            &line.tax.map(|d| d.to_string()).unwrap_or_default(),
            &line.total_excluding_tax.map(|d| d.to_string()).unwrap_or_default(),
            &line.payment_method.clone().unwrap_or_default(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(reservation: &ProcessedReservation) -> String {
    let mut output = String::new();
    let or_dash = |value: Option<&str>| value.unwrap_or("-").to_string();

    output.push_str(&format!("Vendor:      {}\n", or_dash(reservation.vendor.as_deref())));
    output.push_str(&format!(
        "Description: {}\n",
        or_dash(reservation.description.as_deref())
    ));
    output.push_str(&format!(
        "Date:        {}\n",
        reservation
            .date
            .map(|d| d.format("%-d %B %Y").to_string())
            .unwrap_or_else(|| "-".to_string())
    ));
    output.push('\n');

    output.push_str("Expenses:\n");
    for (i, line) in reservation.expense_lines.iter().enumerate() {
        output.push_str(&format!(
            "  {}. {} ({})\n",
            i + 1,
            line.cost_centre,
            or_dash(line.payment_method.as_deref())
        ));
        output.push_str(&format!(
            "     Including tax: {}\n",
            line.total_including_tax.map(format_amount).unwrap_or_else(|| "-".to_string())
        ));
        output.push_str(&format!(
            "     Tax:           {}\n",
            line.tax.map(format_amount).unwrap_or_else(|| "-".to_string())
        ));
        output.push_str(&format!(
            "     Excluding tax: {}\n",
            line.total_excluding_tax.map(format_amount).unwrap_or_else(|| "-".to_string())
        ));
    }
    output.push('\n');

    output.push_str(&format!(
        "Total including tax: {}\n",
        format_amount(reservation.total_including_tax())
    ));
    output.push_str(&format!(
        "Total tax:           {}\n",
        format_amount(reservation.total_tax())
    ));

    output
}
