pub mod core;
pub mod dict;
pub mod column;
pub mod encode;
pub mod scan;
pub mod simd;
pub mod persist;

pub use crate::core::codec::DictionaryCodec;

/*
┌──────────────────────────────────────────────────────────────────────┐
│                        DICTCOL ARCHITECTURE                          │
└──────────────────────────────────────────────────────────────────────┘

  ┌──────────────────────── struct DictionaryCodec ───────────────────┐
  │ dict: RwLock<Dictionary>   // forward map + reverse vec           │
  │ column: CodeColumn         // dense u32 codes, one per input row  │
  │ counters: QueryCounters    // queries / matched rows (atomics)    │
  │ config: Config             // chunking, batching, compression     │
  └───────────────────────────────────────────────────────────────────┘

  encode::ParallelEncoder ──reads──> encode::ChunkReader (10MB blocks)
        │
        ├──splits block into T contiguous line ranges────┐
        │                                                │
        └──workers probe Dictionary under read lock,     │
           batch misses, flush under write lock,         │
           write codes into disjoint column ranges ──────┘

  scan::exact   — baseline (string compare) / scalar / SIMD
  scan::prefix  — candidate values from dictionary, bucketed column pass
  simd::scan    — AVX2 equality kernel with unrolled scalar fallback

  persist::snapshot — magic + version + dictionary pairs +
                      row count + zstd(column) + crc32
*/
