use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use zugferd_invoice::core::{InvoiceError, ProfileLevel, TotalPolicy};
use zugferd_invoice::pipeline::{GeneratorConfig, InvoiceGenerator};

/// Generate a PDF invoice with an embedded ZUGFeRD XML twin.
#[derive(Debug, Parser)]
#[command(name = "zugferd-invoice", version, about)]
struct Cli {
    /// JSON config file; built-in sample values fill anything it omits.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Product list XML to read line items from.
    #[arg(short, long)]
    items: Option<PathBuf>,

    /// Output PDF path.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Invoice number.
    #[arg(short, long)]
    number: Option<String>,

    /// ZUGFeRD profile: basic, comfort or extended.
    #[arg(short, long)]
    profile: Option<ProfileLevel>,

    /// Fail on a non-numeric line total instead of counting it as zero.
    #[arg(long)]
    strict_totals: bool,
}

impl Cli {
    fn into_config(self) -> Result<GeneratorConfig, InvoiceError> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_json_file(path)?,
            None => GeneratorConfig::default(),
        };
        if let Some(items) = self.items {
            config.items_path = items;
        }
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if let Some(number) = self.number {
            config.invoice_number = number;
        }
        if let Some(profile) = self.profile {
            config.profile = profile;
        }
        if self.strict_totals {
            config.total_policy = TotalPolicy::Strict;
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let result = cli
        .into_config()
        .and_then(|config| InvoiceGenerator::new(config).generate());

    match result {
        Ok(generated) => {
            println!(
                "{} ({} bytes, total {} {})",
                generated.path.display(),
                generated.pdf_size,
                generated.invoice.total_amount(),
                generated.invoice.currency
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "invoice generation failed");
            ExitCode::FAILURE
        }
    }
}
