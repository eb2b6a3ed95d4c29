//! Input parsing: turns a list of e-mail addresses and/or domains into
//! [`RawRecord`]s.
//!
//! The format is sniffed from the first 4 KiB. When a `,`, `;` or tab shows
//! up the file is read as delimited rows and each row yields the first of its
//! first three cells holding a domain. Otherwise every line is taken whole,
//! or split on whitespace/`,`/`;` when the whole line is not a domain.
//! Duplicates are preserved.

mod domain;
mod error;
mod types;

pub use error::InputError;
pub use types::{DomainKey, RawRecord};

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use domain::extract_domain;

const SNIFF_LEN: usize = 4096;
const CANDIDATE_CELLS: usize = 3;
const DELIMITERS: [u8; 3] = [b',', b';', b'\t'];

pub fn read_records_from_path(path: impl AsRef<Path>) -> Result<Vec<RawRecord>, InputError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| InputError::open(path, err))?;
    read_records(file)
}

pub fn read_records<R: Read>(mut reader: R) -> Result<Vec<RawRecord>, InputError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(InputError::read)?;
    let text = String::from_utf8_lossy(&bytes);

    let sample = &text.as_bytes()[..text.len().min(SNIFF_LEN)];
    let records = match sniff_delimiter(sample) {
        Some(delimiter) => match read_delimited(&text, delimiter) {
            Ok(records) => records,
            Err(err) => {
                debug!(error = %err, "delimited parse failed, reading as plain text");
                read_plain(&text)
            }
        },
        None => read_plain(&text),
    };

    debug!(records = records.len(), "input parsed");
    Ok(records)
}

/// Most frequent of `,` `;` tab in `sample`, if any appears.
pub(crate) fn sniff_delimiter(sample: &[u8]) -> Option<u8> {
    let mut best: Option<(u8, usize)> = None;
    for delimiter in DELIMITERS {
        let count = sample.iter().filter(|b| **b == delimiter).count();
        if count > 0 && best.is_none_or(|(_, n)| count > n) {
            best = Some((delimiter, count));
        }
    }
    best.map(|(delimiter, _)| delimiter)
}

fn read_delimited(text: &str, delimiter: u8) -> Result<Vec<RawRecord>, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let found = row
            .iter()
            .take(CANDIDATE_CELLS)
            .find_map(|cell| extract_domain(cell).ok().map(|domain| (cell, domain)));
        match found {
            Some((cell, domain)) => {
                let position = records.len();
                records.push(RawRecord::new(position, line, cell.trim(), key(domain)));
            }
            None => debug!(line, "row skipped: no domain in leading cells"),
        }
    }
    Ok(records)
}

fn read_plain(text: &str) -> Vec<RawRecord> {
    let mut records = Vec::new();
    for (idx, raw_line) in text.lines().enumerate() {
        let line = idx as u64 + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match extract_domain(trimmed) {
            Ok(domain) => {
                let position = records.len();
                records.push(RawRecord::new(position, line, trimmed, key(domain)));
            }
            Err(reasons) => {
                let before = records.len();
                for token in trimmed
                    .split(|c: char| c.is_whitespace() || c == ',' || c == ';')
                    .filter(|token| !token.is_empty())
                {
                    if let Ok(domain) = extract_domain(token) {
                        let position = records.len();
                        records.push(RawRecord::new(position, line, token, key(domain)));
                    }
                }
                if records.len() == before {
                    debug!(line, reasons = %reasons.join("; "), "line skipped");
                }
            }
        }
    }
    records
}

fn key(domain: String) -> DomainKey {
    DomainKey::from_normalized(domain)
}
