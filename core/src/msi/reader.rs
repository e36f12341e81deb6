//! MSI Planet antenna file reader (.msi / .pln).
//!
//! The format is a line-oriented header of `KEYWORD value` pairs followed by
//! `HORIZONTAL <n>` and `VERTICAL <n>` blocks of angle/loss pairs. Losses are
//! recorded in dB down from the stated GAIN; magnitudes are reconstructed as
//! `gain - loss` so both cuts share the gain reference.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::measurement::{AngularSlice, Gain, PatternMetadata};
use crate::prelude::{PatternError, PatternResult};
use crate::telemetry::log::LogManager;

/// Parsed contents of one measurement container.
#[derive(Debug, Clone)]
pub struct MsiData {
    pub horizontal: AngularSlice,
    pub vertical: AngularSlice,
    pub metadata: PatternMetadata,
}

/// Reads and parses a measurement file from disk.
pub fn read_msi<P: AsRef<Path>>(path: P) -> PatternResult<MsiData> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| {
        PatternError::FileFormat(format!("cannot open {}: {err}", path.display()))
    })?;
    parse_msi(BufReader::new(file))
}

/// Parses measurement data from any buffered reader.
pub fn parse_msi<R: BufRead>(reader: R) -> PatternResult<MsiData> {
    let lines: Vec<String> = reader
        .lines()
        .collect::<Result<_, _>>()
        .map_err(|err| PatternError::FileFormat(format!("unreadable input: {err}")))?;

    let logger = LogManager::new();
    let mut metadata = PatternMetadata::default();
    let mut horizontal_raw: Option<Vec<(f64, f64)>> = None;
    let mut vertical_raw: Option<Vec<(f64, f64)>> = None;

    let mut line_num = 0usize;
    while line_num < lines.len() {
        let raw = lines[line_num].trim();
        line_num += 1;
        if raw.is_empty() {
            continue;
        }

        let (keyword, rest) = split_keyword(raw);
        match keyword.as_str() {
            "name" => metadata.name = Some(rest.to_string()),
            "make" => metadata.make = Some(rest.to_string()),
            "frequency" => {
                // Stated in MHz.
                let mhz = parse_number(rest, line_num)?;
                metadata.frequency_hz = Some(mhz * 1e6);
            }
            "h_width" => metadata.h_width_deg = Some(parse_number(rest, line_num)?),
            "v_width" => metadata.v_width_deg = Some(parse_number(rest, line_num)?),
            "front_to_back" => {
                metadata.front_to_back_db = Some(parse_number(rest, line_num)?)
            }
            "gain" => metadata.gain = Some(parse_gain(rest, line_num)?),
            "tilt" => metadata.tilt = Some(rest.to_string()),
            "polarization" => metadata.polarization = Some(rest.to_string()),
            "comment" => metadata.comment = Some(rest.to_string()),
            "horizontal" | "vertical" => {
                let declared = parse_number(rest, line_num)? as usize;
                let (pairs, consumed) = parse_pairs(&lines[line_num..], line_num)?;
                line_num += consumed;
                if pairs.len() != declared {
                    return Err(PatternError::FileFormat(format!(
                        "{} section declares {} points but contains {}",
                        keyword.to_uppercase(),
                        declared,
                        pairs.len()
                    )));
                }
                if keyword == "horizontal" {
                    horizontal_raw = Some(pairs);
                } else {
                    vertical_raw = Some(pairs);
                }
            }
            _ => {
                metadata.extras.insert(keyword, rest.to_string());
            }
        }
    }

    let horizontal_raw = horizontal_raw
        .ok_or_else(|| PatternError::FileFormat("missing HORIZONTAL section".into()))?;
    let vertical_raw = vertical_raw
        .ok_or_else(|| PatternError::FileFormat("missing VERTICAL section".into()))?;

    let gain_db = metadata.gain_db();
    if metadata.gain.is_none() {
        logger.advise("no GAIN line in measurement file; magnitudes are peak-referenced");
    }

    let horizontal = slice_from_pairs(&horizontal_raw, gain_db)?;
    let vertical = slice_from_pairs(&vertical_raw, gain_db)?;
    logger.record(&format!(
        "measurement parsed: {} azimuth points, {} elevation points",
        horizontal.len(),
        vertical.len()
    ));

    Ok(MsiData {
        horizontal,
        vertical,
        metadata,
    })
}

fn slice_from_pairs(pairs: &[(f64, f64)], gain_db: f64) -> PatternResult<AngularSlice> {
    let angles = pairs.iter().map(|&(angle, _)| angle).collect();
    // Pair values are losses relative to the gain reference.
    let magnitude = pairs.iter().map(|&(_, loss)| gain_db - loss).collect();
    AngularSlice::new(angles, magnitude)
}

/// Splits a header line into its lowercased keyword and the remainder.
fn split_keyword(line: &str) -> (String, &str) {
    match line.find(char::is_whitespace) {
        Some(idx) => (line[..idx].to_lowercase(), line[idx..].trim()),
        None => (line.to_lowercase(), ""),
    }
}

fn parse_number(text: &str, line_num: usize) -> PatternResult<f64> {
    text.split_whitespace()
        .next()
        .and_then(|token| token.parse::<f64>().ok())
        .ok_or_else(|| {
            PatternError::FileFormat(format!("no numeric value found on line {line_num}"))
        })
}

fn parse_gain(text: &str, line_num: usize) -> PatternResult<Gain> {
    let mut parts = text.split_whitespace();
    let value = parts
        .next()
        .and_then(|token| token.parse::<f64>().ok())
        .ok_or_else(|| {
            PatternError::FileFormat(format!("no numeric gain value on line {line_num}"))
        })?;
    // Unit defaults to dBd when the file omits it.
    let unit = parts.next().unwrap_or("dBd").to_string();
    Ok(Gain { value, unit })
}

/// Consumes angle/value pair lines until a non-pair line ends the block.
/// Returns the pairs and how many lines were consumed (the terminating line
/// is left for the caller to interpret as the next keyword).
fn parse_pairs(lines: &[String], block_start: usize) -> PatternResult<(Vec<(f64, f64)>, usize)> {
    let mut pairs = Vec::new();
    let mut consumed = 0usize;

    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            consumed += 1;
            continue;
        }
        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        let first_numeric = tokens[0].parse::<f64>();
        if tokens.len() == 2 {
            match (first_numeric, tokens[1].parse::<f64>()) {
                (Ok(angle), Ok(value)) => {
                    pairs.push((angle, value));
                    consumed += 1;
                }
                _ => break,
            }
        } else if first_numeric.is_ok() {
            return Err(PatternError::FileFormat(format!(
                "expected 2 values on line {}",
                block_start + consumed + 1
            )));
        } else {
            break;
        }
    }

    Ok((pairs, consumed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
NAME Test Panel
MAKE AntWorks
FREQUENCY 1850
H_WIDTH 65
V_WIDTH 7.5
FRONT_TO_BACK 30
GAIN 17.1 dBi
TILT ELECTRICAL
POLARIZATION +45
COMMENT lab sweep
HORIZONTAL 4
0 0.0
90 3.0
180 20.0
270 3.0
VERTICAL 3
-90 25.0
0 0.0
90 25.0
";

    #[test]
    fn parses_header_and_both_cuts() {
        let data = parse_msi(Cursor::new(SAMPLE)).unwrap();
        assert_eq!(data.metadata.frequency_hz, Some(1.85e9));
        assert_eq!(data.metadata.name.as_deref(), Some("Test Panel"));
        assert_eq!(data.metadata.gain.as_ref().unwrap().unit, "dBi");
        assert_eq!(data.horizontal.angles, vec![0.0, 90.0, 180.0, 270.0]);
        assert_eq!(data.vertical.angles, vec![-90.0, 0.0, 90.0]);
    }

    #[test]
    fn magnitudes_are_gain_minus_loss() {
        let data = parse_msi(Cursor::new(SAMPLE)).unwrap();
        assert_eq!(data.horizontal.magnitude[0], 17.1);
        assert!((data.horizontal.magnitude[1] - 14.1).abs() < 1e-12);
        assert!((data.vertical.magnitude[0] - (17.1 - 25.0)).abs() < 1e-12);
    }

    #[test]
    fn gainless_file_is_peak_referenced() {
        let text = "HORIZONTAL 2\n0 0\n180 10\nVERTICAL 2\n0 0\n90 5\n";
        let data = parse_msi(Cursor::new(text)).unwrap();
        assert_eq!(data.horizontal.magnitude, vec![0.0, -10.0]);
        assert_eq!(data.vertical.magnitude, vec![0.0, -5.0]);
    }

    #[test]
    fn unknown_keywords_land_in_extras() {
        let text = "CUSTOM_FIELD abc 123\nHORIZONTAL 1\n0 0\nVERTICAL 1\n0 0\n";
        let data = parse_msi(Cursor::new(text)).unwrap();
        assert_eq!(
            data.metadata.extras.get("custom_field").map(String::as_str),
            Some("abc 123")
        );
    }

    #[test]
    fn count_mismatch_is_a_format_error() {
        let text = "HORIZONTAL 3\n0 0\n90 1\nVERTICAL 1\n0 0\n";
        let err = parse_msi(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, PatternError::FileFormat(_)));
        assert!(err.to_string().contains("declares 3"));
    }

    #[test]
    fn missing_vertical_section_is_rejected() {
        let text = "GAIN 10 dBd\nHORIZONTAL 1\n0 0\n";
        let err = parse_msi(Cursor::new(text)).unwrap_err();
        assert!(err.to_string().contains("VERTICAL"));
    }

    #[test]
    fn malformed_pair_line_is_rejected() {
        let text = "HORIZONTAL 2\n0 0\n90 1 extra\n";
        let err = parse_msi(Cursor::new(text)).unwrap_err();
        assert!(err.to_string().contains("expected 2 values"));
    }

    #[test]
    fn missing_file_is_a_format_error() {
        let err = read_msi("/nonexistent/antenna.msi").unwrap_err();
        assert!(matches!(err, PatternError::FileFormat(_)));
    }
}
