use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use regex::RegexBuilder;

use super::types::normalize_host;
use super::{MatchType, Matcher, PatternError, PatternRule};

pub(crate) const DEFAULT_PRIORITY: i64 = 100;

// Keeps user-supplied regexes from compiling into huge automata.
const REGEX_SIZE_LIMIT: usize = 1 << 20;

const REQUIRED_COLUMNS: [&str; 3] = ["provider", "match_type", "pattern"];

struct Columns {
    provider: usize,
    match_type: usize,
    pattern: usize,
    priority: Option<usize>,
    notes: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self, PatternError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        let missing: Vec<&'static str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|name| find(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(PatternError::MissingColumns { columns: missing });
        }

        Ok(Self {
            provider: find("provider").unwrap_or_default(),
            match_type: find("match_type").unwrap_or_default(),
            pattern: find("pattern").unwrap_or_default(),
            priority: find("priority"),
            notes: find("notes"),
        })
    }
}

pub(crate) fn load_path(path: &Path) -> Result<Vec<PatternRule>, PatternError> {
    let file = File::open(path).map_err(|err| PatternError::io(path, err))?;
    load_reader(file)
}

pub(crate) fn load_reader<R: Read>(reader: R) -> Result<Vec<PatternRule>, PatternError> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers().map_err(PatternError::csv)?.clone();
    let columns = Columns::from_headers(&headers)?;

    let mut rules = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(PatternError::csv)?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        rules.push(parse_rule(&record, &columns, line)?);
    }
    Ok(rules)
}

fn parse_rule(record: &StringRecord, columns: &Columns, line: u64) -> Result<PatternRule, PatternError> {
    let field = |idx: usize| record.get(idx).unwrap_or("");
    let optional = |idx: Option<usize>| idx.map(field).unwrap_or("");

    let provider = field(columns.provider);
    if provider.is_empty() {
        return Err(PatternError::EmptyField {
            line,
            field: "provider",
        });
    }
    let pattern = field(columns.pattern);
    if pattern.is_empty() {
        return Err(PatternError::EmptyField {
            line,
            field: "pattern",
        });
    }

    let raw_type = field(columns.match_type);
    let match_type =
        MatchType::parse(raw_type).ok_or_else(|| PatternError::UnknownMatchType {
            line,
            value: raw_type.to_string(),
        })?;

    let raw_priority = optional(columns.priority);
    let priority = if raw_priority.is_empty() {
        DEFAULT_PRIORITY
    } else {
        raw_priority
            .parse::<i64>()
            .map_err(|err| PatternError::invalid_priority(line, raw_priority, err))?
    };

    Ok(PatternRule {
        provider: provider.to_string(),
        pattern: pattern.to_string(),
        priority,
        notes: optional(columns.notes).to_string(),
        matcher: build_matcher(match_type, pattern, line)?,
    })
}

pub(crate) fn build_matcher(
    match_type: MatchType,
    pattern: &str,
    line: u64,
) -> Result<Matcher, PatternError> {
    let matcher = match match_type {
        MatchType::Suffix => Matcher::Suffix(normalize_host(pattern)),
        MatchType::Contains => Matcher::Contains(normalize_host(pattern)),
        MatchType::Exact => Matcher::Exact(normalize_host(pattern)),
        MatchType::Regex => {
            let re = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .size_limit(REGEX_SIZE_LIMIT)
                .build()
                .map_err(|err| PatternError::invalid_regex(line, pattern, err))?;
            Matcher::Regex(re)
        }
    };
    Ok(matcher)
}
