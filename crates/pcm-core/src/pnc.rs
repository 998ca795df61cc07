//! # Police National Computer Identifier Formats
//!
//! A PNC id is recorded in one of two canonical layouts depending on the
//! system that captured it:
//!
//! ```text
//! SPI-standard   2004 12345 67A   12 characters, no '/'
//! CJS-standard   2004/12345 67A   13 characters, one '/' after the 4th character
//! ```
//!
//! Case records may hold either layout for the same person, so a search by
//! PNC id has to try both. Anything that matches neither shape is used as-is.
//!
//! Lengths are counted in characters, not bytes.

use serde::{Deserialize, Serialize};

/// Character count of an SPI-standard PNC id.
pub const SPI_STANDARD_LEN: usize = 12;

/// Character count of a CJS-standard PNC id.
pub const CJS_STANDARD_LEN: usize = 13;

/// Number of leading characters before the CJS separator.
pub const CJS_SEPARATOR_POSITION: usize = 4;

const SEPARATOR: char = '/';

/// The layout of a PNC identifier string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PncFormat {
    /// 12 characters with no separator.
    SpiStandard,
    /// 13 characters with a single separator after the 4th character.
    CjsStandard,
    /// Neither canonical layout.
    Unrecognised,
}

impl PncFormat {
    /// Classify a raw PNC id.
    pub fn classify(pnc_id: &str) -> Self {
        let len = pnc_id.chars().count();
        let separators: Vec<usize> = pnc_id
            .chars()
            .enumerate()
            .filter(|(_, c)| *c == SEPARATOR)
            .map(|(i, _)| i)
            .collect();

        match (len, separators.as_slice()) {
            (SPI_STANDARD_LEN, []) => Self::SpiStandard,
            (CJS_STANDARD_LEN, [pos]) if *pos == CJS_SEPARATOR_POSITION => Self::CjsStandard,
            _ => Self::Unrecognised,
        }
    }

    /// Whether the id has a counterpart in the other canonical layout.
    pub fn has_alternate(&self) -> bool {
        !matches!(self, Self::Unrecognised)
    }
}

impl std::fmt::Display for PncFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::SpiStandard => "SPI_STANDARD",
            Self::CjsStandard => "CJS_STANDARD",
            Self::Unrecognised => "UNRECOGNISED",
        };
        f.write_str(s)
    }
}

/// Convert an SPI-standard id to CJS-standard by inserting the separator
/// after the 4th character.
pub fn to_cjs_standard(spi: &str) -> String {
    let mut out = String::with_capacity(spi.len() + 1);
    for (i, c) in spi.chars().enumerate() {
        if i == CJS_SEPARATOR_POSITION {
            out.push(SEPARATOR);
        }
        out.push(c);
    }
    out
}

/// Convert a CJS-standard id to SPI-standard by removing the separator.
pub fn to_spi_standard(cjs: &str) -> String {
    cjs.chars().filter(|c| *c != SEPARATOR).collect()
}

/// The same id rendered in the other canonical layout, or `None` when the
/// id matches neither layout.
pub fn alternate_form(pnc_id: &str) -> Option<String> {
    match PncFormat::classify(pnc_id) {
        PncFormat::SpiStandard => Some(to_cjs_standard(pnc_id)),
        PncFormat::CjsStandard => Some(to_spi_standard(pnc_id)),
        PncFormat::Unrecognised => None,
    }
}
