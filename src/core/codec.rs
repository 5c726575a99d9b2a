//! The codec façade: owns the dictionary, the code column, and the query
//! counters, and exposes the public encode / query / persistence API.

use std::mem::size_of;
use std::path::Path;

use parking_lot::RwLock;

use crate::column::CodeColumn;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::stats::{CodecStats, QueryCounters, QueryStats};
use crate::core::types::{Code, PrefixMatches};
use crate::dict::Dictionary;
use crate::encode::{EncodeStats, ParallelEncoder};
use crate::persist::snapshot;
use crate::scan::{exact, prefix};
use crate::simd;

/// Dictionary-encoded column over a single text column.
///
/// The dictionary sits behind a readers-writer lock: encode workers probe
/// under the read lock and intern under the write lock, and every query
/// holds the read lock for its full scan. The column itself needs no lock —
/// encode workers write disjoint row ranges, and queries only run against a
/// fully built column because `encode` takes `&mut self`.
pub struct DictionaryCodec {
    dict: RwLock<Dictionary>,
    column: CodeColumn,
    counters: QueryCounters,
    config: Config,
}

impl Default for DictionaryCodec {
    fn default() -> Self {
        DictionaryCodec::new()
    }
}

impl DictionaryCodec {
    pub fn new() -> Self {
        DictionaryCodec::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        DictionaryCodec {
            dict: RwLock::new(Dictionary::new()),
            column: CodeColumn::new(),
            counters: QueryCounters::new(),
            config,
        }
    }

    /// Build the dictionary and code column from a line-oriented text file
    /// using `threads` workers. Any previous contents are discarded first;
    /// on error the codec is left empty.
    pub fn encode(&mut self, path: impl AsRef<Path>, threads: usize) -> Result<EncodeStats> {
        self.dict = RwLock::new(Dictionary::new());
        self.column = CodeColumn::new();

        let encoder = ParallelEncoder::new(self.config.clone());
        let result = encoder.encode(path.as_ref(), threads, &self.dict, &mut self.column);

        if result.is_err() {
            self.dict = RwLock::new(Dictionary::new());
            self.column = CodeColumn::new();
        }
        result
    }

    // ---- Exact match ----------------------------------------------------

    /// Rows whose value equals `target`, ascending. SIMD scan.
    pub fn find_exact(&self, target: &str) -> Vec<usize> {
        let dict = self.dict.read();
        let rows = exact::find_simd(&dict, self.column.as_slice(), target);
        self.counters.record(rows.len());
        rows
    }

    /// Code-domain scalar scan, same results as `find_exact`.
    pub fn find_exact_scalar(&self, target: &str) -> Vec<usize> {
        let dict = self.dict.read();
        let rows = exact::find_scalar(&dict, self.column.as_slice(), target);
        self.counters.record(rows.len());
        rows
    }

    /// String-comparing oracle, same results as `find_exact`.
    pub fn find_exact_baseline(&self, target: &str) -> Vec<usize> {
        let dict = self.dict.read();
        let rows = exact::find_baseline(&dict, self.column.as_slice(), target);
        self.counters.record(rows.len());
        rows
    }

    /// SIMD exact match applied to each query in turn.
    pub fn find_exact_batch<S: AsRef<str>>(&self, targets: &[S]) -> Vec<Vec<usize>> {
        let dict = self.dict.read();
        let results = exact::find_batch(&dict, self.column.as_slice(), targets);
        for rows in &results {
            self.counters.record(rows.len());
        }
        results
    }

    // ---- Prefix match ---------------------------------------------------

    /// `(value, rows)` pairs for every dictionary value with the given byte
    /// prefix, pairs in code order. Empty prefix returns an empty result.
    pub fn find_prefix(&self, query: &str) -> PrefixMatches {
        let dict = self.dict.read();
        let matches = prefix::find_simd(&dict, self.column.as_slice(), query);
        self.counters
            .record(matches.iter().map(|(_, rows)| rows.len()).sum());
        matches
    }

    /// Baseline prefix search, same results as `find_prefix`.
    pub fn find_prefix_baseline(&self, query: &str) -> PrefixMatches {
        let dict = self.dict.read();
        let matches = prefix::find_baseline(&dict, self.column.as_slice(), query);
        self.counters
            .record(matches.iter().map(|(_, rows)| rows.len()).sum());
        matches
    }

    // ---- Persistence ----------------------------------------------------

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let dict = self.dict.read();
        snapshot::save(
            path.as_ref(),
            &dict,
            &self.column,
            self.config.compression_level,
        )
    }

    /// Rebuild a codec from a snapshot written by `save`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let (dict, column) = snapshot::load(path.as_ref())?;
        Ok(DictionaryCodec {
            dict: RwLock::new(dict),
            column,
            counters: QueryCounters::new(),
            config: Config::default(),
        })
    }

    // ---- Inspectors -----------------------------------------------------

    pub fn dictionary_size(&self) -> usize {
        self.dict.read().len()
    }

    pub fn row_count(&self) -> usize {
        self.column.len()
    }

    /// Total bytes of the original values divided by the encoded footprint
    /// (dictionary bytes + column bytes). Zero for an empty codec.
    pub fn compression_ratio(&self) -> f64 {
        let dict = self.dict.read();
        if dict.is_empty() || self.column.is_empty() {
            return 0.0;
        }

        let original: usize = self
            .column
            .as_slice()
            .iter()
            .map(|&code| dict.value_of_unchecked(code).len())
            .sum();
        let encoded = dict.byte_size() + self.column.byte_size();
        original as f64 / encoded as f64
    }

    /// Approximate resident footprint of dictionary plus column.
    pub fn memory_usage(&self) -> usize {
        self.dict.read().byte_size() + self.column.byte_size()
    }

    /// Which scan kernel is active on this machine: "avx2" or "scalar".
    pub fn simd_backend(&self) -> &'static str {
        simd::scan::active_backend()
    }

    pub fn stats(&self) -> CodecStats {
        CodecStats {
            row_count: self.row_count(),
            dictionary_size: self.dictionary_size(),
            compression_ratio: self.compression_ratio(),
            memory_usage_bytes: self.memory_usage(),
            simd_backend: self.simd_backend(),
        }
    }

    /// Harness-consumable counters: queries executed and rows matched.
    pub fn query_stats(&self) -> QueryStats {
        self.counters.snapshot()
    }

    /// Code assigned to `value`, if interned. Lets callers distinguish "no
    /// matches" from "not a known value".
    pub fn code_of(&self, value: &str) -> Option<Code> {
        self.dict.read().lookup(value)
    }
}

impl std::fmt::Debug for DictionaryCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DictionaryCodec")
            .field("rows", &self.column.len())
            .field("dictionary_size", &self.dict.read().len())
            .field("column_bytes", &(self.column.len() * size_of::<Code>()))
            .finish()
    }
}
