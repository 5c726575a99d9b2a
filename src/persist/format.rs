//! Snapshot file framing.
//!
//! Little-endian throughout:
//!
//! ```text
//! [u8; 4]  magic = b"DCOL"
//! u32      version = 1
//! u64      dict_count
//! repeat dict_count:
//!   u64    value_length
//!   bytes  value
//!   u32    code
//! u64      row_count                 (uncompressed column length, in rows)
//! u64      compressed_column_size
//! bytes    zstd(column as le u32s)
//! u32      crc32 of the compressed column bytes
//! ```

pub const MAGIC: [u8; 4] = *b"DCOL";
pub const VERSION: u32 = 1;

/// Upper bound accepted for a single dictionary value, a guard against
/// reading a corrupt length field as an allocation size.
pub const MAX_VALUE_LEN: u64 = 1 << 32;
