use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use mxprovider_lib::RunReport;
use mxprovider_lib::report::{self, ReportKind};

/// Write the three dated CSV reports into `out_dir`; returns their paths.
pub fn write_reports(
    run: &RunReport,
    input_path: &Path,
    out_dir: &Path,
    date: NaiveDate,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create output directory {}", out_dir.display()))?;

    let mut written = Vec::new();
    for kind in ReportKind::ALL {
        let mut buf = Vec::new();
        match kind {
            ReportKind::Counts => report::write_tallies(&mut buf, &run.tallies)?,
            ReportKind::Domains => report::write_domains(&mut buf, &run.classifications)?,
            ReportKind::Unclassified => {
                report::write_review_queue(&mut buf, &run.classifications)?
            }
        }
        let path = out_dir.join(report::dated_output_name(input_path, kind, date));
        report::write_all_atomically(&path, &buf)
            .with_context(|| format!("write {} report", kind.as_str()))?;
        written.push(path);
    }
    Ok(written)
}

pub fn print_summary(run: &RunReport, written: &[PathBuf], format: &str) -> Result<()> {
    match format {
        "human" => {
            print_human(run, written);
            Ok(())
        }
        "json" => print_json(run, written),
        other => bail!("unknown --format '{other}', use: human|json"),
    }
}

fn print_human(run: &RunReport, written: &[PathBuf]) {
    let width = run
        .tallies
        .iter()
        .map(|t| t.provider.chars().count())
        .max()
        .unwrap_or(0)
        .max("provider".len());

    println!("{:<width$}  {:>7}  {:>7}", "provider", "domains", "records");
    for tally in &run.tallies {
        println!(
            "{:<width$}  {:>7}  {:>7}",
            tally.provider, tally.domain_count, tally.record_count
        );
    }
    println!(
        "{:<width$}  {:>7}  {:>7}",
        "total",
        run.total_domains(),
        run.total_records()
    );
    println!();
    for path in written {
        println!("Wrote: {}", path.display());
    }
}

#[cfg(feature = "with-serde")]
fn print_json(run: &RunReport, written: &[PathBuf]) -> Result<()> {
    let summary = serde_json::json!({
        "tallies": run.tallies,
        "classifications": run.classifications.iter().collect::<Vec<_>>(),
        "written": written,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[cfg(not(feature = "with-serde"))]
fn print_json(_: &RunReport, _: &[PathBuf]) -> Result<()> {
    bail!("format=json nécessite la feature 'with-serde'")
}
