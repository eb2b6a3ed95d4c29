//! CSV reports built from a [`RunReport`](crate::aggregate::RunReport).

use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;

use crate::aggregate::{Classifications, ProviderTally};

/// Separator between MX hosts inside a single CSV cell.
pub const HOST_DELIMITER: &str = ";";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV write failed: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ReportError {
    fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<csv::Error> for ReportError {
    fn from(source: csv::Error) -> Self {
        Self::Csv { source }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Counts,
    Domains,
    Unclassified,
}

impl ReportKind {
    pub const ALL: [ReportKind; 3] = [Self::Counts, Self::Domains, Self::Unclassified];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Counts => "counts",
            Self::Domains => "domains",
            Self::Unclassified => "unclassified",
        }
    }
}

/// `YYYY-MM-DD-<kind>-<input file name>.csv`
pub fn dated_output_name(input_path: &Path, kind: ReportKind, date: NaiveDate) -> String {
    let base = input_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string());
    format!("{}-{}-{}.csv", date.format("%Y-%m-%d"), kind.as_str(), base)
}

pub fn write_tallies<W: Write>(writer: W, tallies: &[ProviderTally]) -> Result<(), ReportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["provider", "domain_count", "record_count"])?;
    for tally in tallies {
        wtr.write_record([
            tally.provider.clone(),
            tally.domain_count.to_string(),
            tally.record_count.to_string(),
        ])?;
    }
    wtr.flush().map_err(|err| ReportError::io("<tallies>", err))?;
    Ok(())
}

pub fn write_domains<W: Write>(
    writer: W,
    classifications: &Classifications,
) -> Result<(), ReportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["domain", "provider", "best_mx_preference", "mx_hosts"])?;
    for result in classifications {
        wtr.write_record([
            result.domain.to_string(),
            result.provider_label.clone(),
            preference_cell(result.best_preference),
            result.mx_hosts.join(HOST_DELIMITER),
        ])?;
    }
    wtr.flush().map_err(|err| ReportError::io("<domains>", err))?;
    Ok(())
}

/// Bad-Domain rows only.
pub fn write_review_queue<W: Write>(
    writer: W,
    classifications: &Classifications,
) -> Result<(), ReportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["domain", "best_mx_preference", "mx_hosts", "error"])?;
    for result in classifications.review_queue() {
        wtr.write_record([
            result.domain.to_string(),
            preference_cell(result.best_preference),
            result.mx_hosts.join(HOST_DELIMITER),
            result.error.clone().unwrap_or_default(),
        ])?;
    }
    wtr.flush().map_err(|err| ReportError::io("<review queue>", err))?;
    Ok(())
}

fn preference_cell(preference: Option<u16>) -> String {
    preference.map(|p| p.to_string()).unwrap_or_default()
}

/// Write through a temporary file then rename over `path`.
pub fn write_all_atomically(path: &Path, bytes: &[u8]) -> Result<(), ReportError> {
    let display = path.display().to_string();
    let tmp = path.with_extension("csv.tmp");
    {
        let mut f = std::fs::File::create(&tmp).map_err(|err| ReportError::io(&display, err))?;
        f.write_all(bytes)
            .map_err(|err| ReportError::io(&display, err))?;
        f.sync_all().map_err(|err| ReportError::io(&display, err))?;
    }
    std::fs::rename(&tmp, path).map_err(|err| ReportError::io(&display, err))?;
    Ok(())
}
