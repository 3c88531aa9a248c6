//! Process command - extract fields from a single receipt file.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use recibo_core::receipt::adapt;
use recibo_core::{
    ExtractResponse, Field, NormalizedTransaction, ReceiptAnalyzer, ReceiptExtractor, TransactionRecord,
};

use super::{load_config, read_markup};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input receipt (HTML)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print the per-field extraction record instead of the transaction
    #[arg(long)]
    record: bool,

    /// Include confidence and method columns in CSV and text output
    #[arg(long)]
    details: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Reading receipt...");

    let markup = read_markup(&args.input)?;
    let extractor = ReceiptExtractor::from_config(&config);

    pb.set_message("Extracting fields...");
    let output = match extractor.analyze(&markup) {
        Ok(record) if args.record => format_record(&record, args.format, args.details)?,
        Ok(record) => {
            let transaction = adapt(&record, extractor.config());
            format_transaction(&transaction, Some(&record), args.format, args.details)?
        }
        // The error object is the JSON contract for unusable documents
        Err(e) if !args.record && matches!(args.format, OutputFormat::Json) => {
            serde_json::to_string(&ExtractResponse::Error { error: e.to_string() })?
        }
        Err(e) => {
            pb.finish_and_clear();
            anyhow::bail!("{}: {}", args.input.display(), e);
        }
    };

    pb.finish_and_clear();

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!("{} Output written to {}", style("✓").green(), output_path.display());
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Render the per-field record.
pub fn format_record(record: &TransactionRecord, format: OutputFormat, details: bool) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(record)?),
        OutputFormat::Csv => record_csv(record, details),
        OutputFormat::Text => Ok(record_text(record, details)),
    }
}

/// Render a normalized transaction. `record` supplies method columns when
/// details are requested.
pub fn format_transaction(
    transaction: &NormalizedTransaction,
    record: Option<&TransactionRecord>,
    format: OutputFormat,
    details: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(transaction)?),
        OutputFormat::Csv => transaction_csv(transaction, record, details),
        OutputFormat::Text => Ok(transaction_text(transaction, record, details)),
    }
}

fn record_csv(record: &TransactionRecord, details: bool) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = Vec::new();
    let mut row = Vec::new();
    for (field, value) in record.iter() {
        header.push(field.key().to_string());
        row.push(value.value.clone().unwrap_or_default());
        if details {
            header.push(format!("{}_confidence", field.key()));
            header.push(format!("{}_method", field.key()));
            row.push(format!("{:.3}", value.confidence));
            row.push(value.method.as_str().to_string());
        }
    }

    wtr.write_record(&header)?;
    wtr.write_record(&row)?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn record_text(record: &TransactionRecord, details: bool) -> String {
    let mut output = String::new();

    for (field, value) in record.iter() {
        let shown = value.value.as_deref().unwrap_or("-");
        if details {
            output.push_str(&format!(
                "{:<20} {:<36} {:.3} {}\n",
                field.key(),
                shown,
                value.confidence,
                value.method.as_str()
            ));
        } else {
            output.push_str(&format!("{:<20} {}\n", field.key(), shown));
        }
    }

    output
}

/// Columns of the normalized transaction with the record field behind
/// each, if any.
fn transaction_columns(transaction: &NormalizedTransaction) -> Vec<(&'static str, String, Option<Field>)> {
    let vars = &transaction.transaction_variables;
    vec![
        ("originAccount", vars.origin_account.clone().unwrap_or_default(), Some(Field::OriginAccount)),
        (
            "destinationAccount",
            vars.destination_account.clone().unwrap_or_default(),
            Some(Field::DestinationAccount),
        ),
        ("amount", vars.amount.map(|a| format!("{:.2}", a)).unwrap_or_default(), Some(Field::Amount)),
        ("currency", vars.currency.clone().unwrap_or_default(), Some(Field::Currency)),
        (
            "operationDate",
            vars.operation_date.map(|d| d.format("%Y-%m-%dT%H:%M:%S").to_string()).unwrap_or_default(),
            Some(Field::Date),
        ),
        ("operationNumber", vars.operation_number.clone().unwrap_or_default(), Some(Field::OperationId)),
        ("transactionType", transaction.transaction_type.clone().unwrap_or_default(), None),
    ]
}

fn transaction_csv(
    transaction: &NormalizedTransaction,
    record: Option<&TransactionRecord>,
    details: bool,
) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = Vec::new();
    let mut row = Vec::new();
    for (name, value, field) in transaction_columns(transaction) {
        header.push(name.to_string());
        row.push(value);
        if let (true, Some(field), Some(record)) = (details, field, record) {
            header.push(format!("{}Confidence", name));
            header.push(format!("{}Method", name));
            row.push(format!("{:.3}", record.confidence(field)));
            row.push(record.method(field).as_str().to_string());
        }
    }

    wtr.write_record(&header)?;
    wtr.write_record(&row)?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn transaction_text(
    transaction: &NormalizedTransaction,
    record: Option<&TransactionRecord>,
    details: bool,
) -> String {
    let mut output = String::new();

    for (name, value, field) in transaction_columns(transaction) {
        let shown = if value.is_empty() { "-".to_string() } else { value };
        match (details, field, record) {
            (true, Some(field), Some(record)) => output.push_str(&format!(
                "{:<20} {:<36} {:.3} {}\n",
                name,
                shown,
                record.confidence(field),
                record.method(field).as_str()
            )),
            _ => output.push_str(&format!("{:<20} {}\n", name, shown)),
        }
    }

    output
}
