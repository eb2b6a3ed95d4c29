#[path = "mxprovider-cli/args.rs"]
mod args;
#[path = "mxprovider-cli/output.rs"]
mod output;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use mxprovider_lib::{PatternTable, read_records_from_path, run};
use tracing_subscriber::EnvFilter;

use crate::args::Cli;

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn prompt_input_path() -> Result<PathBuf> {
    eprint!("Enter the path to your source file (emails/domains): ");
    io::stderr().flush().context("flush stderr")?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).context("read stdin")?;
    let path = line.trim().trim_matches('"');
    if path.is_empty() {
        bail!("no input file given");
    }
    Ok(PathBuf::from(path))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level());

    let patterns_path = cli.patterns_path();
    let table = PatternTable::load(&patterns_path)
        .with_context(|| format!("load pattern table {}", patterns_path.display()))?;
    tracing::info!(rules = table.len(), path = %patterns_path.display(), "pattern table loaded");

    let input_path = match &cli.input {
        Some(path) => path.clone(),
        None => prompt_input_path()?,
    };
    let records = read_records_from_path(&input_path)
        .with_context(|| format!("read input {}", input_path.display()))?;

    // codes de sortie : 0 OK, 2 aucun domaine valide, 1 fatal
    if records.is_empty() {
        eprintln!("No valid domains found in {}", input_path.display());
        std::process::exit(2);
    }

    let report = run(&records, &table, &cli.resolver_options())
        .await
        .context("initialise DNS resolver")?;

    let today = chrono::Local::now().date_naive();
    let written = output::write_reports(&report, &input_path, &cli.out_dir, today)?;
    output::print_summary(&report, &written, &cli.format)
}
