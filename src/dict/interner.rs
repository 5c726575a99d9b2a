use std::collections::HashMap;
use std::mem::size_of;

use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::Code;

/// Bijection between distinct values and dense u32 codes.
///
/// The forward map assigns codes; the append-only reverse vector gives O(1)
/// code -> value lookup. Codes are exactly `0..len()` at all times.
#[derive(Debug, Default)]
pub struct Dictionary {
    forward: HashMap<String, Code>,
    reverse: Vec<String>,
}

impl Dictionary {
    pub fn new() -> Self {
        Dictionary::default()
    }

    /// Pre-reserve headroom on both sides to limit rehashing during encode.
    pub fn reserve(&mut self, additional: usize) {
        self.forward.reserve(additional);
        self.reverse.reserve(additional);
    }

    /// Insert `value` if absent and return its code; returns the existing
    /// code otherwise. Fails once the code space is exhausted.
    pub fn intern(&mut self, value: &str) -> Result<Code> {
        if let Some(&code) = self.forward.get(value) {
            return Ok(code);
        }

        if self.reverse.len() >= u32::MAX as usize {
            return Err(Error::new(
                ErrorKind::DictionaryFull,
                format!("cannot assign code to {:?}: code space exhausted", value),
            ));
        }

        let code = self.reverse.len() as Code;
        self.forward.insert(value.to_string(), code);
        self.reverse.push(value.to_string());
        Ok(code)
    }

    pub fn lookup(&self, value: &str) -> Option<Code> {
        self.forward.get(value).copied()
    }

    pub fn value_of(&self, code: Code) -> Result<&str> {
        self.reverse
            .get(code as usize)
            .map(|s| s.as_str())
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::OutOfRange,
                    format!("code {} >= dictionary size {}", code, self.reverse.len()),
                )
            })
    }

    /// Value for a code known to be in range (codes read back from the
    /// column). Panics on a violated column invariant.
    pub fn value_of_unchecked(&self, code: Code) -> &str {
        &self.reverse[code as usize]
    }

    pub fn len(&self) -> usize {
        self.reverse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reverse.is_empty()
    }

    /// Values in code order. Code of the i-th yielded value is `i`.
    pub fn values(&self) -> impl Iterator<Item = &str> + '_ {
        self.reverse.iter().map(|s| s.as_str())
    }

    /// Approximate heap footprint: string bytes on both sides plus the
    /// per-entry code stored in the forward map.
    pub fn byte_size(&self) -> usize {
        let forward: usize = self
            .forward
            .keys()
            .map(|k| k.len() + size_of::<Code>())
            .sum();
        let reverse: usize = self.reverse.iter().map(|v| v.len()).sum();
        forward + reverse
    }

    /// Rebuild from (value, code) pairs read from a snapshot. The codes must
    /// form a permutation of `0..pairs.len()`.
    pub fn from_pairs(pairs: Vec<(String, Code)>) -> Result<Self> {
        let count = pairs.len();
        let mut reverse: Vec<Option<String>> = vec![None; count];
        let mut forward = HashMap::with_capacity(count);

        for (value, code) in pairs {
            let slot = reverse.get_mut(code as usize).ok_or_else(|| {
                Error::new(
                    ErrorKind::DictionaryCorrupt,
                    format!("code {} out of range for {} entries", code, count),
                )
            })?;
            if slot.is_some() {
                return Err(Error::new(
                    ErrorKind::DictionaryCorrupt,
                    format!("duplicate code {}", code),
                ));
            }
            *slot = Some(value.clone());
            if forward.insert(value, code).is_some() {
                return Err(Error::new(
                    ErrorKind::DictionaryCorrupt,
                    format!("duplicate value for code {}", code),
                ));
            }
        }

        // Every slot filled means the codes were a permutation of 0..count.
        let reverse: Vec<String> = reverse
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::DictionaryCorrupt,
                    "codes are not a permutation of 0..count".to_string(),
                )
            })?;

        Ok(Dictionary { forward, reverse })
    }
}
