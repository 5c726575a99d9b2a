//! Exact-match scans over the code column.
//!
//! Three implementations with identical results: a string-comparing
//! baseline (the correctness oracle), a code-domain scalar scan, and the
//! SIMD scan. All return ascending row indices; an unknown target yields an
//! empty result rather than an error.

use crate::core::types::Code;
use crate::dict::Dictionary;
use crate::simd;

/// Correctness oracle: resolve every row back to its value and compare
/// strings. O(rows) string comparisons.
pub fn find_baseline(dict: &Dictionary, codes: &[Code], target: &str) -> Vec<usize> {
    let mut results = Vec::new();
    for (row, &code) in codes.iter().enumerate() {
        if dict.value_of_unchecked(code) == target {
            results.push(row);
        }
    }
    results
}

/// Translate the target to its code, then scan the column one slot at a
/// time.
pub fn find_scalar(dict: &Dictionary, codes: &[Code], target: &str) -> Vec<usize> {
    let target_code = match dict.lookup(target) {
        Some(code) => code,
        None => return Vec::new(),
    };

    let mut results = Vec::new();
    for (row, &code) in codes.iter().enumerate() {
        if code == target_code {
            results.push(row);
        }
    }
    results
}

/// Translate the target to its code, then run the vectorized equality scan.
pub fn find_simd(dict: &Dictionary, codes: &[Code], target: &str) -> Vec<usize> {
    let target_code = match dict.lookup(target) {
        Some(code) => code,
        None => return Vec::new(),
    };

    let mut results = Vec::new();
    simd::scan::scan_eq_u32(codes, target_code, &mut results);
    results
}

/// SIMD exact match applied per query. No cross-query vectorization.
pub fn find_batch<S: AsRef<str>>(
    dict: &Dictionary,
    codes: &[Code],
    targets: &[S],
) -> Vec<Vec<usize>> {
    targets
        .iter()
        .map(|target| find_simd(dict, codes, target.as_ref()))
        .collect()
}
