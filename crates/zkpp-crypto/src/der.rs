//! # ECDSA Signature Decoding
//!
//! Document signers emit ECDSA signatures as DER
//! `SEQUENCE { INTEGER r, INTEGER s }`. The circuit takes `r` and `s` as
//! separate limb vectors, so the structure is unpacked here. Only the subset
//! of DER an ECDSA signature can use is accepted: definite lengths of at most
//! two length bytes, and no trailing data.

use num_bigint::BigUint;

use zkpp_core::DocumentError;

const TAG_SEQUENCE: u8 = 0x30;
const TAG_INTEGER: u8 = 0x02;

/// The two scalars of an ECDSA signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcdsaSignature {
    pub r: BigUint,
    pub s: BigUint,
}

impl EcdsaSignature {
    /// Decode a DER-encoded signature.
    pub fn from_der(der: &[u8]) -> Result<Self, DocumentError> {
        let mut reader = DerReader { input: der, pos: 0 };
        let body = reader.read_tlv(TAG_SEQUENCE)?;
        if !reader.is_empty() {
            return Err(malformed("trailing bytes after signature sequence"));
        }

        let mut inner = DerReader { input: body, pos: 0 };
        let r = inner.read_tlv(TAG_INTEGER)?;
        let s = inner.read_tlv(TAG_INTEGER)?;
        if !inner.is_empty() {
            return Err(malformed("trailing bytes inside signature sequence"));
        }
        for (name, value) in [("r", r), ("s", s)] {
            if value.is_empty() {
                return Err(malformed(&format!("empty {name}")));
            }
            if value[0] & 0x80 != 0 {
                return Err(malformed(&format!("negative {name}")));
            }
        }

        Ok(Self {
            r: BigUint::from_bytes_be(r),
            s: BigUint::from_bytes_be(s),
        })
    }
}

fn malformed(reason: &str) -> DocumentError {
    DocumentError::MalformedSignature(reason.to_string())
}

struct DerReader<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> DerReader<'a> {
    fn is_empty(&self) -> bool {
        self.pos == self.input.len()
    }

    fn byte(&mut self) -> Result<u8, DocumentError> {
        let b = *self
            .input
            .get(self.pos)
            .ok_or_else(|| malformed("unexpected end of input"))?;
        self.pos += 1;
        Ok(b)
    }

    fn length(&mut self) -> Result<usize, DocumentError> {
        let first = self.byte()?;
        match first {
            0x00..=0x7f => Ok(usize::from(first)),
            0x81 => Ok(usize::from(self.byte()?)),
            0x82 => {
                let hi = usize::from(self.byte()?);
                let lo = usize::from(self.byte()?);
                Ok((hi << 8) | lo)
            }
            _ => Err(malformed(&format!("unsupported length form 0x{first:02x}"))),
        }
    }

    fn read_tlv(&mut self, tag: u8) -> Result<&'a [u8], DocumentError> {
        let actual = self.byte()?;
        if actual != tag {
            return Err(malformed(&format!("expected tag 0x{tag:02x}, found 0x{actual:02x}")));
        }
        let len = self.length()?;
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.input.len())
            .ok_or_else(|| malformed("length exceeds input"))?;
        let value = &self.input[self.pos..end];
        self.pos = end;
        Ok(value)
    }
}
