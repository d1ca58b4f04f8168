//! # Formatted DG1
//!
//! The machine-readable zone of a TD3 passport is two lines of 44
//! characters. The circuit consumes it wrapped in the DG1 tag/length header
//! `61 5B 5F 1F 58`, giving a fixed 93-byte record. Every sub-field the leaf
//! builders need sits at a constant offset from the ICAO 9303 layout.

use std::ops::Range;

use crate::error::DocumentError;

/// MRZ length for a TD3 document (two lines of 44).
pub const MRZ_LEN: usize = 88;

/// DG1 tag/length header preceding the MRZ.
pub const DG1_HEADER: [u8; 5] = [0x61, 0x5B, 0x5F, 0x1F, 0x58];

/// Length of the formatted DG1 record.
pub const DG1_LEN: usize = DG1_HEADER.len() + MRZ_LEN;

/// Issuing state or organization.
pub const ISSUING_COUNTRY: Range<usize> = 7..10;
/// Primary and secondary identifiers.
pub const NAME: Range<usize> = 10..49;
/// Document number (without check digit).
pub const PASSPORT_NUMBER: Range<usize> = 49..58;
/// Nationality.
pub const NATIONALITY: Range<usize> = 59..62;
/// Date of birth, `YYMMDD`.
pub const DATE_OF_BIRTH: Range<usize> = 62..68;
/// Date of expiry, `YYMMDD`.
pub const DATE_OF_EXPIRY: Range<usize> = 70..76;

/// A validated 93-byte DG1 record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedDg1([u8; DG1_LEN]);

impl FormattedDg1 {
    /// Wrap an 88-character ASCII MRZ.
    ///
    /// Line breaks are tolerated and stripped, so both the concatenated and
    /// the two-line rendering are accepted.
    pub fn from_mrz(mrz: &str) -> Result<Self, DocumentError> {
        let zone: Vec<u8> = mrz.bytes().filter(|b| *b != b'\n' && *b != b'\r').collect();
        if zone.len() != MRZ_LEN {
            return Err(DocumentError::InvalidMrz(format!(
                "expected {MRZ_LEN} characters, got {}",
                zone.len()
            )));
        }
        if let Some(bad) = zone.iter().find(|b| !b.is_ascii_graphic()) {
            return Err(DocumentError::InvalidMrz(format!(
                "non-printable byte 0x{bad:02x}"
            )));
        }

        let mut record = [0u8; DG1_LEN];
        record[..DG1_HEADER.len()].copy_from_slice(&DG1_HEADER);
        record[DG1_HEADER.len()..].copy_from_slice(&zone);
        Ok(Self(record))
    }

    /// The full 93-byte record.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The 88 MRZ bytes without the header.
    pub fn mrz(&self) -> &[u8] {
        &self.0[DG1_HEADER.len()..]
    }

    pub fn issuing_country(&self) -> &[u8] {
        &self.0[ISSUING_COUNTRY]
    }

    pub fn name(&self) -> &[u8] {
        &self.0[NAME]
    }

    pub fn passport_number(&self) -> &[u8] {
        &self.0[PASSPORT_NUMBER]
    }

    pub fn nationality(&self) -> &[u8] {
        &self.0[NATIONALITY]
    }

    pub fn date_of_birth(&self) -> &[u8] {
        &self.0[DATE_OF_BIRTH]
    }

    pub fn date_of_expiry(&self) -> &[u8] {
        &self.0[DATE_OF_EXPIRY]
    }
}
