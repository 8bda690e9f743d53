//! CSV ingest for pitch-level exports.
//!
//! This module turns a wide pitch CSV (Savant-style, ~90 columns) into
//! `PitchRecord`s carrying only the fields the analysis uses.
//!
//! Design goals:
//! - **Strict schema** only for `description` (clear errors + exit code 2)
//! - **Tolerant predictors**: a missing `release_speed` / `release_spin_rate`
//!   column is logged, not fatal; the fitter decides what that means per model
//! - **Row-level validation**: unparsable cells become missing values and are
//!   reported, the row itself is kept
//! - **Literal descriptions**: the description cell is never trimmed

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;
use tracing::{info, warn};

use crate::domain::PitchRecord;
use crate::error::AppError;

const DESCRIPTION: &str = "description";
const RELEASE_SPEED: &str = "release_speed";
const RELEASE_SPIN_RATE: &str = "release_spin_rate";
const PLAYER_NAME: &str = "player_name";
const PITCH_TYPE: &str = "pitch_type";
const GAME_DATE: &str = "game_date";

/// A row-level problem encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: records + row errors + schema notes.
#[derive(Debug, Clone)]
pub struct IngestedPitches {
    /// Where the rows came from (path or label), for messages.
    pub source: String,
    pub pitches: Vec<PitchRecord>,
    pub row_errors: Vec<RowError>,
    /// Optional analysis columns absent from the header.
    pub missing_columns: Vec<&'static str>,
    pub rows_read: usize,
}

/// Load a pitch CSV from disk.
pub fn load_pitches(path: &Path) -> Result<IngestedPitches, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display()))
    })?;
    read_pitches(file, &path.display().to_string())
}

/// Read pitch rows from any CSV source.
pub fn read_pitches<R: Read>(reader: R, source: &str) -> Result<IngestedPitches, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers of '{source}': {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    if !header_map.contains_key(DESCRIPTION) {
        return Err(AppError::new(
            2,
            format!("Missing required column in '{source}': `{DESCRIPTION}`"),
        ));
    }

    let missing_columns: Vec<&'static str> = [RELEASE_SPEED, RELEASE_SPIN_RATE]
        .into_iter()
        .filter(|c| !header_map.contains_key(*c))
        .collect();
    for c in &missing_columns {
        warn!(source, column = c, "column not found; models using it will fail");
    }

    let mut pitches = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: header is line 1, records are 1-based after it.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let (pitch, problems) = parse_row(&record, &header_map);
        row_errors.extend(problems.into_iter().map(|message| RowError { line, message }));
        pitches.push(pitch);
    }

    if pitches.is_empty() {
        return Err(AppError::new(3, format!("No pitch rows found in '{source}'.")));
    }

    info!(source, rows = pitches.len(), row_errors = row_errors.len(), "loaded pitches");

    Ok(IngestedPitches {
        source: source.to_string(),
        pitches,
        row_errors,
        missing_columns,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

/// Parse one row. Cell-level problems are returned alongside the (partial) record.
fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> (PitchRecord, Vec<String>) {
    let mut problems = Vec::new();

    let description = get_raw(record, header_map, DESCRIPTION)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let mut number = |name: &str| match parse_opt_f64(get_optional(record, header_map, name)) {
        Ok(v) => v,
        Err(raw) => {
            problems.push(format!("Invalid `{name}` value '{raw}' (treated as missing)."));
            None
        }
    };
    let release_speed = number(RELEASE_SPEED);
    let release_spin_rate = number(RELEASE_SPIN_RATE);

    let game_date = match get_optional(record, header_map, GAME_DATE).filter(|s| !is_na(s)) {
        Some(s) => match parse_date(s) {
            Ok(d) => Some(d),
            Err(e) => {
                problems.push(e);
                None
            }
        },
        None => None,
    };

    let pitch = PitchRecord {
        description,
        release_speed,
        release_spin_rate,
        player_name: get_optional(record, header_map, PLAYER_NAME).map(str::to_string),
        pitch_type: get_optional(record, header_map, PITCH_TYPE).map(str::to_string),
        game_date,
    };
    (pitch, problems)
}

fn get_raw<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx)
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    get_raw(record, header_map, name)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn is_na(s: &str) -> bool {
    s.eq_ignore_ascii_case("na") || s.eq_ignore_ascii_case("null") || s.eq_ignore_ascii_case("nan")
}

/// Missing or NA cells are `Ok(None)`; unparsable cells are `Err(raw)`.
fn parse_opt_f64(s: Option<&str>) -> Result<Option<f64>, String> {
    let Some(s) = s else { return Ok(None) };
    if is_na(s) {
        return Ok(None);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(s.to_string()),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    const FMTS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid `game_date` '{s}'. Expected one of: YYYY-MM-DD, MM/DD/YYYY, YYYY/MM/DD."
    ))
}
