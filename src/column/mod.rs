use std::mem::size_of;

use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::Code;

/// Densely packed u32 code array, one slot per input row.
///
/// Sized once from the line-count pre-pass; immutable after encode returns.
#[derive(Debug, Default)]
pub struct CodeColumn {
    codes: Vec<Code>,
}

impl CodeColumn {
    pub fn new() -> Self {
        CodeColumn { codes: Vec::new() }
    }

    /// Zero-filled column for `rows` slots. Every slot is overwritten by the
    /// encoder before the column becomes visible to queries.
    pub fn with_len(rows: usize) -> Self {
        CodeColumn {
            codes: vec![0; rows],
        }
    }

    pub fn from_codes(codes: Vec<Code>) -> Self {
        CodeColumn { codes }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<Code> {
        self.codes.get(row).copied()
    }

    pub fn as_slice(&self) -> &[Code] {
        &self.codes
    }

    pub fn as_mut_slice(&mut self) -> &mut [Code] {
        &mut self.codes
    }

    pub fn byte_size(&self) -> usize {
        self.codes.len() * size_of::<Code>()
    }

    /// Raw little-endian byte image, 4 bytes per code. This is the payload
    /// handed to the snapshot compressor.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.byte_size());
        for &code in &self.codes {
            bytes.extend_from_slice(&code.to_le_bytes());
        }
        bytes
    }

    /// Rebuild from a little-endian byte image. The length must be an exact
    /// multiple of 4.
    pub fn from_le_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() % size_of::<Code>() != 0 {
            return Err(Error::new(
                ErrorKind::Parse,
                format!("column byte length {} is not a multiple of 4", bytes.len()),
            ));
        }
        let codes = bytes
            .chunks_exact(size_of::<Code>())
            .map(|chunk| Code::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();
        Ok(CodeColumn { codes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_round_trip() {
        let column = CodeColumn::from_codes(vec![0, 1, 0xDEAD_BEEF, u32::MAX]);
        let bytes = column.to_le_bytes();
        assert_eq!(bytes.len(), 16);
        let back = CodeColumn::from_le_bytes(&bytes).unwrap();
        assert_eq!(back.as_slice(), column.as_slice());
    }

    #[test]
    fn from_le_bytes_rejects_ragged_input() {
        let err = CodeColumn::from_le_bytes(&[1, 2, 3]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parse);
    }

    #[test]
    fn with_len_sizes_exactly() {
        let column = CodeColumn::with_len(37);
        assert_eq!(column.len(), 37);
        assert_eq!(column.get(36), Some(0));
        assert_eq!(column.get(37), None);
    }
}
