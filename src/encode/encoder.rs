//! Parallel dictionary encoder.
//!
//! The input streams in fixed-size text blocks; each block splits into `T`
//! contiguous line ranges, and each worker writes codes straight into its
//! disjoint sub-range of the column. Workers probe the shared dictionary
//! under the read lock and batch their misses, so the write lock is taken
//! once per `batch_size` misses instead of once per miss.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::column::CodeColumn;
use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::Code;
use crate::dict::Dictionary;
use crate::encode::chunk::{count_lines, ChunkReader};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeStats {
    pub rows: usize,
    pub distinct_values: usize,
    pub chunks: usize,
}

pub struct ParallelEncoder {
    config: Config,
    progress: Arc<AtomicUsize>,
}

impl ParallelEncoder {
    pub fn new(config: Config) -> Self {
        ParallelEncoder {
            config,
            progress: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Rows encoded so far, across all blocks.
    pub fn progress(&self) -> usize {
        self.progress.load(Ordering::Relaxed)
    }

    /// Populate `dict` and `column` from the file at `path` using `threads`
    /// workers. Row order of the column equals line order of the input.
    ///
    /// Code assignment depends on which worker reaches a value first, so
    /// codes are not stable across runs; the (dictionary, column) pair is.
    pub fn encode(
        &self,
        path: &Path,
        threads: usize,
        dict: &RwLock<Dictionary>,
        column: &mut CodeColumn,
    ) -> Result<EncodeStats> {
        if threads == 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "thread count must be at least 1".to_string(),
            ));
        }

        self.progress.store(0, Ordering::Relaxed);

        // Pre-pass sizes the column exactly; workers then write slots
        // without any bounds bookkeeping.
        let total_rows = count_lines(path)?;
        *column = CodeColumn::with_len(total_rows);
        dict.write().reserve(self.config.dict_reserve);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| Error::new(ErrorKind::Io, format!("worker pool: {}", e)))?;

        let mut reader = ChunkReader::open(path, &self.config)?;
        let mut remaining = column.as_mut_slice();
        let mut rows_done = 0usize;
        let mut chunks = 0usize;

        while let Some(lines) = reader.next_chunk()? {
            if lines.len() > remaining.len() {
                return Err(Error::new(
                    ErrorKind::Io,
                    "input file grew between the counting pass and encode".to_string(),
                ));
            }
            let (block_slots, rest) = remaining.split_at_mut(lines.len());
            remaining = rest;

            self.encode_block(&pool, threads, &lines, block_slots, dict)?;

            rows_done += lines.len();
            chunks += 1;
            debug!(
                chunk = chunks,
                rows = rows_done,
                distinct = dict.read().len(),
                "encoded block"
            );
        }

        if rows_done != total_rows {
            return Err(Error::new(
                ErrorKind::Io,
                format!(
                    "input file shrank between passes: expected {} rows, read {}",
                    total_rows, rows_done
                ),
            ));
        }

        let distinct_values = dict.read().len();
        info!(rows = total_rows, distinct = distinct_values, "encode complete");

        Ok(EncodeStats {
            rows: total_rows,
            distinct_values,
            chunks,
        })
    }

    /// Split one block into `threads` contiguous ranges and run them on the
    /// pool. The last worker absorbs the remainder. Joins every worker
    /// before returning; any worker error aborts the block.
    fn encode_block(
        &self,
        pool: &rayon::ThreadPool,
        threads: usize,
        lines: &[String],
        slots: &mut [Code],
        dict: &RwLock<Dictionary>,
    ) -> Result<()> {
        let per_worker = lines.len() / threads;
        let batch_size = self.config.batch_size;
        let progress = &self.progress;

        let mut worker_results: Vec<Result<()>> = Vec::with_capacity(threads);
        for _ in 0..threads {
            worker_results.push(Ok(()));
        }

        pool.scope(|scope| {
            let mut line_rest = lines;
            let mut slot_rest = slots;

            for (i, result) in worker_results.iter_mut().enumerate() {
                let take = if i == threads - 1 {
                    line_rest.len()
                } else {
                    per_worker
                };
                let (range_lines, lines_tail) = line_rest.split_at(take);
                let (range_slots, slots_tail) = slot_rest.split_at_mut(take);
                line_rest = lines_tail;
                slot_rest = slots_tail;

                scope.spawn(move |_| {
                    *result = encode_range(range_lines, range_slots, dict, batch_size);
                    progress.fetch_add(range_lines.len(), Ordering::Relaxed);
                });
            }
        });

        worker_results.into_iter().collect()
    }
}

/// One worker's sequential pass over its line range.
fn encode_range(
    lines: &[String],
    slots: &mut [Code],
    dict: &RwLock<Dictionary>,
    batch_size: usize,
) -> Result<()> {
    let mut pending: Vec<(&str, usize)> = Vec::with_capacity(batch_size);

    for (i, line) in lines.iter().enumerate() {
        {
            let dict = dict.read();
            if let Some(code) = dict.lookup(line) {
                slots[i] = code;
                continue;
            }
        }

        pending.push((line.as_str(), i));
        if pending.len() >= batch_size {
            flush_pending(&mut pending, slots, dict)?;
        }
    }

    if !pending.is_empty() {
        flush_pending(&mut pending, slots, dict)?;
    }

    Ok(())
}

/// Drain the pending list under the write lock. Each entry is re-probed
/// first: another worker may have interned the value since the miss.
fn flush_pending(
    pending: &mut Vec<(&str, usize)>,
    slots: &mut [Code],
    dict: &RwLock<Dictionary>,
) -> Result<()> {
    let mut dict = dict.write();
    for (value, slot) in pending.drain(..) {
        slots[slot] = dict.intern(value)?;
    }
    Ok(())
}
