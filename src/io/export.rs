//! CSV exports.
//!
//! - per-row predicted probabilities (`whiff fit --export`)
//! - synthetic pitch datasets (`whiff sample`) in the same column layout ingest reads
//!
//! Both are meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::domain::PitchRecord;
use crate::error::AppError;
use crate::report::PredictionRow;

/// Write per-row predictions to a CSV file.
pub fn write_predictions_csv(path: &Path, rows: &[PredictionRow]) -> Result<(), AppError> {
    let file = create(path)?;
    write_predictions(file, rows)
}

/// Write per-row predictions to any writer. Missing values are empty cells.
pub fn write_predictions<W: Write>(writer: W, rows: &[PredictionRow]) -> Result<(), AppError> {
    let mut w = csv::Writer::from_writer(writer);
    for r in rows {
        w.serialize(r)
            .map_err(|e| AppError::new(2, format!("Failed to write predictions row: {e}")))?;
    }
    w.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush predictions CSV: {e}")))?;
    Ok(())
}

#[derive(Serialize)]
struct PitchRow<'a> {
    pitch_type: Option<&'a str>,
    game_date: Option<String>,
    release_speed: Option<f64>,
    player_name: Option<&'a str>,
    description: Option<&'a str>,
    release_spin_rate: Option<f64>,
}

/// Write pitch records to a CSV file readable by `io::ingest`.
pub fn write_pitches_csv(path: &Path, pitches: &[PitchRecord]) -> Result<(), AppError> {
    let file = create(path)?;
    write_pitches(file, pitches)
}

pub fn write_pitches<W: Write>(writer: W, pitches: &[PitchRecord]) -> Result<(), AppError> {
    let mut w = csv::Writer::from_writer(writer);
    for p in pitches {
        let row = PitchRow {
            pitch_type: p.pitch_type.as_deref(),
            game_date: p.game_date.map(|d| d.format("%Y-%m-%d").to_string()),
            release_speed: p.release_speed,
            player_name: p.player_name.as_deref(),
            description: p.description.as_deref(),
            release_spin_rate: p.release_spin_rate,
        };
        w.serialize(row)
            .map_err(|e| AppError::new(2, format!("Failed to write pitch row: {e}")))?;
    }
    w.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush pitch CSV: {e}")))?;
    Ok(())
}

fn create(path: &Path) -> Result<File, AppError> {
    File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::io::ingest::read_pitches;

    #[test]
    fn predictions_csv_has_header_and_empty_missing_cells() {
        let rows = [
            PredictionRow {
                row: 1,
                result: true,
                response: 1,
                release_speed: Some(97.0),
                release_spin_rate: None,
                p_velocity: Some(0.75),
                p_spin: None,
                p_combined: None,
            },
            PredictionRow {
                row: 2,
                result: false,
                response: 0,
                release_speed: Some(91.5),
                release_spin_rate: Some(2250.0),
                p_velocity: Some(0.2),
                p_spin: Some(0.3),
                p_combined: Some(0.25),
            },
        ];
        let mut buf = Vec::new();
        write_predictions(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "row,result,response,release_speed,release_spin_rate,p_velocity,p_spin,p_combined"
        );
        assert_eq!(lines[1], "1,true,1,97.0,,0.75,,");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn written_pitches_read_back_through_ingest() {
        let pitches = vec![
            PitchRecord {
                description: Some("swinging_strike".to_string()),
                release_speed: Some(96.4),
                release_spin_rate: Some(2401.0),
                player_name: Some("Pitcher, 01".to_string()),
                pitch_type: Some("FF".to_string()),
                game_date: NaiveDate::from_ymd_opt(2023, 5, 1),
            },
            PitchRecord {
                description: Some("foul".to_string()),
                release_speed: Some(93.0),
                release_spin_rate: None,
                player_name: Some("Pitcher, 02".to_string()),
                pitch_type: Some("FF".to_string()),
                game_date: NaiveDate::from_ymd_opt(2023, 5, 2),
            },
        ];
        let mut buf = Vec::new();
        write_pitches(&mut buf, &pitches).unwrap();

        let back = read_pitches(buf.as_slice(), "buffer").unwrap();
        assert!(back.row_errors.is_empty());
        assert_eq!(back.pitches, pitches);
    }
}
