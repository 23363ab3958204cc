//! certforge – render one certificate per name in a CSV file.
//!
//! Usage:
//!   certforge [--config run.json] [--template art.png] [--records names.csv] ...
//!
//! Flags override values from `--config`, which override the built-in
//! defaults.

use std::fs;
use std::path::PathBuf;

use clap::Parser;

use cert_forge::fonts::Hinting;
use cert_forge::{
    generate_certificates_with, CertError, GeneratorConfig, RecordStatus, RunSummary, TextColor,
};

#[derive(Parser, Debug)]
#[command(name = "certforge", version)]
#[command(about = "Render a name from each CSV row onto a certificate template")]
struct Cli {
    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Background template image
    #[arg(long)]
    template: Option<PathBuf>,

    /// Delimited file with the names in its first column
    #[arg(long)]
    records: Option<PathBuf>,

    /// Directory for the generated certificates
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// TrueType/OpenType font file
    #[arg(long)]
    font: Option<PathBuf>,

    /// Font size in points
    #[arg(long)]
    font_size: Option<f32>,

    #[arg(long)]
    dpi: Option<f32>,

    /// none, vertical or full
    #[arg(long)]
    hinting: Option<Hinting>,

    /// Text colour: black, white, transparent, opaque or #rrggbb[aa]
    #[arg(long)]
    color: Option<TextColor>,

    /// Y coordinate of the text baseline in pixels
    #[arg(long)]
    baseline_y: Option<f32>,

    /// Field delimiter of the records file
    #[arg(long)]
    delimiter: Option<char>,

    /// The records file has no header row
    #[arg(long)]
    no_headers: bool,

    /// Replace unsafe characters in output file names
    #[arg(long)]
    sanitize_names: bool,

    /// Write the run summary as JSON to this file
    #[arg(long)]
    summary: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Result<(GeneratorConfig, Option<PathBuf>), CertError> {
        let mut cfg = match &self.config {
            Some(path) => GeneratorConfig::from_file(path)?,
            None => GeneratorConfig::default(),
        };

        if let Some(v) = self.template {
            cfg.template_path = v;
        }
        if let Some(v) = self.records {
            cfg.records_path = v;
        }
        if let Some(v) = self.output_dir {
            cfg.output_dir = v;
        }
        if let Some(v) = self.font {
            cfg.font_path = v;
        }
        if let Some(v) = self.font_size {
            cfg.font_size = v;
        }
        if let Some(v) = self.dpi {
            cfg.dpi = v;
        }
        if let Some(v) = self.hinting {
            cfg.hinting = v;
        }
        if let Some(v) = self.color {
            cfg.text_color = v;
        }
        if let Some(v) = self.baseline_y {
            cfg.baseline_y = v;
        }
        if let Some(v) = self.delimiter {
            cfg.delimiter = v;
        }
        if self.no_headers {
            cfg.has_headers = false;
        }
        if self.sanitize_names {
            cfg.sanitize_names = true;
        }

        Ok((cfg, self.summary))
    }
}

/// Run one batch. Fatal errors come back as `Err`; per-record problems are
/// printed as they happen and do not fail the run.
fn run(cli: Cli) -> Result<RunSummary, CertError> {
    let (config, summary_path) = cli.into_config()?;

    let summary = generate_certificates_with(&config, |outcome| match &outcome.status {
        RecordStatus::Created { .. } => {
            println!(
                "Created certificate for {}",
                outcome.name.as_deref().unwrap_or_default()
            );
        }
        RecordStatus::Malformed { reason } => {
            eprintln!("Error reading records: {reason}");
        }
        RecordStatus::SaveFailed { reason } => {
            eprintln!(
                "Error saving certificate for {}: {reason}",
                outcome.name.as_deref().unwrap_or_default()
            );
        }
    })?;

    println!("Certificate generation complete!");
    eprintln!(
        "{} created, {} malformed row{}, {} failed save{}",
        summary.created,
        summary.malformed,
        if summary.malformed == 1 { "" } else { "s" },
        summary.failed,
        if summary.failed == 1 { "" } else { "s" }
    );

    if let Some(path) = summary_path {
        fs::write(&path, summary.to_json()).map_err(|source| CertError::Io { path, source })?;
    }

    Ok(summary)
}

// The exit status does not distinguish outcomes: fatal errors are reported on
// stderr and the process still exits normally.
fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e}");
    }
}
