//! Marker-delimited region extraction.
//!
//! Matching is exact-line, not substring or regex. The remote artifact
//! uses fixed comment lines as section delimiters, so exact matching
//! avoids false positives from lines that merely contain the marker text.

use crate::error::{Result, SetupError};
use crate::profile::MarkerPair;

/// Extract the lines strictly between a marker pair.
///
/// The begin marker must appear before the end marker, and the interior
/// must contain at least one non-blank line; every other shape is an
/// `Extraction` error, never a silently empty region.
pub fn extract(text: &str, markers: &MarkerPair) -> Result<Vec<String>> {
    let lines: Vec<&str> = text.lines().collect();

    let begin = lines
        .iter()
        .position(|line| *line == markers.begin)
        .ok_or_else(|| SetupError::Extraction {
            message: format!("begin marker {:?} not found", markers.begin),
        })?;

    let interior_start = begin + 1;
    let end_offset = lines[interior_start..]
        .iter()
        .position(|line| *line == markers.end)
        .ok_or_else(|| SetupError::Extraction {
            message: format!(
                "end marker {:?} not found after begin marker {:?}",
                markers.end, markers.begin
            ),
        })?;

    let region = &lines[interior_start..interior_start + end_offset];
    if region.iter().all(|line| line.trim().is_empty()) {
        return Err(SetupError::Extraction {
            message: format!(
                "region between {:?} and {:?} is empty",
                markers.begin, markers.end
            ),
        });
    }

    Ok(region.iter().map(|line| line.to_string()).collect())
}
