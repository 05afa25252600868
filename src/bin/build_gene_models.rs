use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;

use genemodel::annotation::ReferenceData;
use genemodel::cli;
use genemodel::config::BuildConfig;
use genemodel::document::JsonLinesWriter;
use genemodel::gtf::open_gtf;
use genemodel::pipeline::{ImportSummary, import};

#[derive(Parser)]
#[command(
    name = "build_gene_models",
    about = "Build gene models with coding regions from an Ensembl GTF"
)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(short = 'c', long = "config")]
    config: PathBuf,

    /// Output JSON-lines file (overrides the configured output)
    #[arg(short = 'o', long = "out")]
    out: Option<PathBuf>,

    #[command(flatten)]
    verbose: Verbosity,
}

fn main() -> Result<()> {
    let start = Instant::now();
    let cli_args = Cli::parse();

    match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_max_level(cli_args.verbose.log_level_filter().as_trace())
            .with_writer(std::io::stderr)
            .init(),
    };

    cli::banner("Build Gene Models");

    // ── Configuration ────────────────────────────────────
    cli::section("Configuration");

    let config = BuildConfig::from_file(&cli_args.config)?;
    let output = cli_args.out.unwrap_or_else(|| config.output.clone());

    cli::kv("Config", &cli_args.config.display().to_string());
    for (name, path) in config.input_files() {
        cli::kv(name, &path.display().to_string());
    }
    cli::kv("Output", &output.display().to_string());

    eprintln!();

    // ── Reference Tables ─────────────────────────────────
    cli::section("Reference Tables");

    let reference = ReferenceData::from_paths(
        config.canonical_transcripts.as_deref(),
        config.protein_domains.as_deref(),
    )
    .context("failed to load reference tables")?;

    cli::kv(
        "Canonical",
        &format!("{} genes", reference.canonical_transcripts.len()),
    );
    cli::kv(
        "Domains",
        &format!("{} transcripts", reference.protein_domains.len()),
    );
    if reference.canonical_transcripts.is_empty() {
        cli::warning("no canonical transcript table, no transcript will be marked canonical");
    }

    eprintln!();

    // ── Gene Models ──────────────────────────────────────
    cli::section("Gene Models");

    let summary = write_gene_models(&config.gtf, &output, &reference)?;
    cli::import_summary(&summary);
    cli::success(&format!("wrote {}", output.display()));

    cli::print_summary(start);
    Ok(())
}

/// Writes to `<output>.partial` and renames on success so a failed run never
/// leaves a truncated output behind.
fn write_gene_models(gtf: &Path, output: &Path, reference: &ReferenceData) -> Result<ImportSummary> {
    let staging = staging_path(output);

    let result = (|| -> Result<ImportSummary> {
        let records = open_gtf(gtf).with_context(|| format!("failed to open GTF: {}", gtf.display()))?;
        let file = File::create(&staging)
            .with_context(|| format!("failed to create {}", staging.display()))?;
        let mut writer = JsonLinesWriter::new(BufWriter::new(file));

        let summary = import(records, reference, &mut writer)
            .with_context(|| format!("failed to build gene models from {}", gtf.display()))?;
        writer.finish()?;
        Ok(summary)
    })();

    match result {
        Ok(summary) => {
            fs::rename(&staging, output).with_context(|| {
                format!(
                    "failed to move {} to {}",
                    staging.display(),
                    output.display()
                )
            })?;
            Ok(summary)
        }
        Err(e) => {
            let _ = fs::remove_file(&staging);
            Err(e)
        }
    }
}

fn staging_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}
