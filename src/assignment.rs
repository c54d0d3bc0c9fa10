//! Assignment numbering.
//!
//! Source directories are named `assignment-<N>` and exported artifacts
//! `assignment-<NN>.pdf`. Numbers below ten carry a single leading zero, larger
//! numbers are printed as is. Parsing a name re-applies that rule, so
//! `assignment-010` and `assignment-10` both map to `"10"`.

use crate::error::{Error, Result};

/// Prefix shared by source directories, artifacts and default archive names.
pub const PREFIX: &str = "assignment-";

/// Formats an assignment number with the leading-zero rule.
pub fn format_number(n: u32) -> String {
    if n < 10 {
        format!("0{n}")
    } else {
        n.to_string()
    }
}

/// Directory name for an assignment number, e.g. `assignment-03`.
pub fn directory_name(n: u32) -> String {
    format!("{PREFIX}{}", format_number(n))
}

/// Artifact file name for a canonical id, e.g. `assignment-03.pdf`.
pub fn artifact_name(id: &str) -> String {
    format!("{PREFIX}{id}.pdf")
}

/// Parses `assignment-<digits>` into the canonical id.
///
/// Anything else is rejected, including signs, embedded letters and names
/// without digits.
pub fn number_from_directory(name: &str) -> Result<String> {
    let digits = name
        .strip_prefix(PREFIX)
        .ok_or_else(|| invalid(name))?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(name));
    }

    let n: u32 = digits.parse().map_err(|_| invalid(name))?;
    Ok(format_number(n))
}

/// Parses `assignment-<digits>.pdf` (or the bare directory form) into the canonical id.
pub fn number_from_filename(name: &str) -> Result<String> {
    let stem = name.strip_suffix(".pdf").unwrap_or(name);
    number_from_directory(stem).map_err(|_| invalid(name))
}

fn invalid(name: &str) -> Error {
    Error::InvalidAssignmentName {
        name: name.to_string(),
    }
}
