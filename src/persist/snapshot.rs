//! Save/load of a post-encode snapshot: dictionary pairs plus the
//! zstd-compressed code column.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crc32fast::Hasher;
use tracing::{debug, info};

use crate::column::CodeColumn;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::Code;
use crate::dict::Dictionary;
use crate::persist::format::{MAGIC, MAX_VALUE_LEN, VERSION};

pub fn save(path: &Path, dict: &Dictionary, column: &CodeColumn, level: i32) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writer.write_all(&MAGIC)?;
    writer.write_all(&VERSION.to_le_bytes())?;

    // Dictionary pairs carry explicit codes; iteration over the reverse
    // vector makes the code of the i-th pair equal to i.
    writer.write_all(&(dict.len() as u64).to_le_bytes())?;
    for (code, value) in dict.values().enumerate() {
        writer.write_all(&(value.len() as u64).to_le_bytes())?;
        writer.write_all(value.as_bytes())?;
        writer.write_all(&(code as Code).to_le_bytes())?;
    }

    let column_bytes = column.to_le_bytes();
    let compressed = zstd::encode_all(column_bytes.as_slice(), level)
        .map_err(|e| Error::new(ErrorKind::Compression, format!("zstd encode: {}", e)))?;

    let mut hasher = Hasher::new();
    hasher.update(&compressed);
    let checksum = hasher.finalize();

    writer.write_all(&(column.len() as u64).to_le_bytes())?;
    writer.write_all(&(compressed.len() as u64).to_le_bytes())?;
    writer.write_all(&compressed)?;
    writer.write_all(&checksum.to_le_bytes())?;

    let file = writer
        .into_inner()
        .map_err(|e| Error::new(ErrorKind::Io, format!("flush snapshot: {}", e)))?;
    file.sync_all()?;

    info!(
        entries = dict.len(),
        rows = column.len(),
        compressed_bytes = compressed.len(),
        "snapshot saved"
    );

    Ok(())
}

pub fn load(path: &Path) -> Result<(Dictionary, CodeColumn)> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(Error::new(
            ErrorKind::Parse,
            format!("bad magic {:?}, not a snapshot file", magic),
        ));
    }

    let version = read_u32(&mut reader)?;
    if version != VERSION {
        return Err(Error::new(
            ErrorKind::Parse,
            format!("unsupported snapshot version {}", version),
        ));
    }

    let dict_count = read_u64(&mut reader)? as usize;
    let mut pairs = Vec::with_capacity(dict_count);
    for _ in 0..dict_count {
        let len = read_u64(&mut reader)?;
        if len > MAX_VALUE_LEN {
            return Err(Error::new(
                ErrorKind::Parse,
                format!("dictionary value length {} exceeds limit", len),
            ));
        }
        let mut value = vec![0u8; len as usize];
        reader.read_exact(&mut value)?;
        let value = String::from_utf8(value)
            .map_err(|e| Error::new(ErrorKind::Parse, format!("dictionary value: {}", e)))?;
        let code = read_u32(&mut reader)?;
        pairs.push((value, code));
    }

    // Codes must be a permutation of 0..dict_count.
    let dict = Dictionary::from_pairs(pairs)?;

    let row_count = read_u64(&mut reader)? as usize;
    let compressed_size = read_u64(&mut reader)? as usize;
    let mut compressed = vec![0u8; compressed_size];
    reader.read_exact(&mut compressed)?;

    let stored_checksum = read_u32(&mut reader)?;
    let mut hasher = Hasher::new();
    hasher.update(&compressed);
    if hasher.finalize() != stored_checksum {
        return Err(Error::new(
            ErrorKind::Parse,
            "column checksum mismatch".to_string(),
        ));
    }

    let column_bytes = zstd::decode_all(compressed.as_slice())
        .map_err(|e| Error::new(ErrorKind::Compression, format!("zstd decode: {}", e)))?;
    if column_bytes.len() != row_count * std::mem::size_of::<Code>() {
        return Err(Error::new(
            ErrorKind::Parse,
            format!(
                "column decompressed to {} bytes, header says {} rows",
                column_bytes.len(),
                row_count
            ),
        ));
    }

    let column = CodeColumn::from_le_bytes(&column_bytes)?;

    // Every stored code must resolve; a column slot past the dictionary
    // cannot be dispatched by queries.
    if let Some(&bad) = column
        .as_slice()
        .iter()
        .find(|&&code| code as usize >= dict.len())
    {
        return Err(Error::new(
            ErrorKind::DictionaryCorrupt,
            format!("column code {} >= dictionary size {}", bad, dict.len()),
        ));
    }

    debug!(entries = dict.len(), rows = column.len(), "snapshot loaded");

    Ok((dict, column))
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_u64<R: Read>(reader: &mut R) -> Result<u64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}
