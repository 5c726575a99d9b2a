//! Prefix-match scans: every distinct dictionary value whose byte prefix
//! equals the query, paired with the rows where it occurs.
//!
//! Result pairs are in code order, row lists ascending, empty buckets
//! dropped. An empty prefix returns an empty result by convention.

use std::collections::HashMap;

use crate::core::types::{Code, PrefixMatches};
use crate::dict::Dictionary;
use crate::simd;

/// Candidate codes whose value starts with `prefix`, in code order.
fn candidates(dict: &Dictionary, prefix: &str) -> Vec<Code> {
    let prefix_bytes = prefix.as_bytes();
    dict.values()
        .enumerate()
        .filter(|(_, value)| value.as_bytes().starts_with(prefix_bytes))
        .map(|(code, _)| code as Code)
        .collect()
}

/// Baseline: enumerate candidates, then bucket every row by one pass over
/// the column with a per-code membership map.
pub fn find_baseline(dict: &Dictionary, codes: &[Code], prefix: &str) -> PrefixMatches {
    if prefix.is_empty() {
        return Vec::new();
    }

    let candidate_codes = candidates(dict, prefix);
    if candidate_codes.is_empty() {
        return Vec::new();
    }

    // code -> bucket slot, buckets laid out in code order
    let slots: HashMap<Code, usize> = candidate_codes
        .iter()
        .enumerate()
        .map(|(slot, &code)| (code, slot))
        .collect();
    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); candidate_codes.len()];

    for (row, code) in codes.iter().enumerate() {
        if let Some(&slot) = slots.get(code) {
            buckets[slot].push(row);
        }
    }

    collect_pairs(dict, &candidate_codes, buckets)
}

/// SIMD variant: one vectorized equality scan per candidate while the
/// candidate set is small, otherwise the same single-pass membership walk
/// as the baseline. A broadcast-compare per candidate re-reads the whole
/// column, which only pays off when candidates are few.
pub fn find_simd(dict: &Dictionary, codes: &[Code], prefix: &str) -> PrefixMatches {
    const SCAN_PER_CANDIDATE_LIMIT: usize = 4;

    if prefix.is_empty() {
        return Vec::new();
    }

    let candidate_codes = candidates(dict, prefix);
    if candidate_codes.is_empty() {
        return Vec::new();
    }

    if candidate_codes.len() > SCAN_PER_CANDIDATE_LIMIT {
        return find_baseline(dict, codes, prefix);
    }

    let mut buckets: Vec<Vec<usize>> = Vec::with_capacity(candidate_codes.len());
    for &code in &candidate_codes {
        let mut rows = Vec::new();
        simd::scan::scan_eq_u32(codes, code, &mut rows);
        buckets.push(rows);
    }

    collect_pairs(dict, &candidate_codes, buckets)
}

fn collect_pairs(
    dict: &Dictionary,
    candidate_codes: &[Code],
    buckets: Vec<Vec<usize>>,
) -> PrefixMatches {
    candidate_codes
        .iter()
        .zip(buckets)
        .filter(|(_, rows)| !rows.is_empty())
        .map(|(&code, rows)| (dict.value_of_unchecked(code).to_string(), rows))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (Dictionary, Vec<Code>) {
        let mut dict = Dictionary::new();
        let values = ["apple", "banana", "apple", "cherry", "banana", "apple"];
        let codes = values
            .iter()
            .map(|v| dict.intern(v).unwrap())
            .collect::<Vec<_>>();
        (dict, codes)
    }

    #[test]
    fn single_candidate() {
        let (dict, codes) = fixture();
        let matches = find_simd(&dict, &codes, "ap");
        assert_eq!(matches, vec![("apple".to_string(), vec![0, 2, 5])]);
    }

    #[test]
    fn empty_prefix_returns_nothing() {
        let (dict, codes) = fixture();
        assert!(find_baseline(&dict, &codes, "").is_empty());
        assert!(find_simd(&dict, &codes, "").is_empty());
    }

    #[test]
    fn no_candidates() {
        let (dict, codes) = fixture();
        assert!(find_simd(&dict, &codes, "zz").is_empty());
    }

    #[test]
    fn baseline_and_simd_agree_on_wide_prefixes() {
        let mut dict = Dictionary::new();
        // 12 values share the "v" prefix so the SIMD variant takes the
        // membership path.
        let values: Vec<String> = (0..12).map(|i| format!("value{:02}", i)).collect();
        let mut codes = Vec::new();
        for round in 0..5 {
            for (i, value) in values.iter().enumerate() {
                if (i + round) % 3 != 0 {
                    codes.push(dict.intern(value).unwrap());
                }
            }
        }

        let baseline = find_baseline(&dict, &codes, "v");
        let simd = find_simd(&dict, &codes, "v");
        assert_eq!(baseline, simd);

        // Row lists ascending, pairs in code order
        for (value, rows) in &baseline {
            assert!(rows.windows(2).all(|w| w[0] < w[1]), "{} unsorted", value);
        }
        let pair_codes: Vec<Code> = baseline
            .iter()
            .map(|(value, _)| dict.lookup(value).unwrap())
            .collect();
        assert!(pair_codes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn prefix_match_is_byte_wise() {
        let mut dict = Dictionary::new();
        let codes = vec![
            dict.intern("naïve").unwrap(),
            dict.intern("nave").unwrap(),
        ];
        // "naï" is a 4-byte prefix; only the first value carries it.
        let matches = find_simd(&dict, &codes, "naï");
        assert_eq!(matches, vec![("naïve".to_string(), vec![0])]);
    }
}
