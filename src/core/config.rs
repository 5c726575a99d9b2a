#[derive(Debug, Clone)]
pub struct Config {
    pub chunk_size: usize,          // Text bytes read per block
    pub max_lines_per_chunk: usize, // Line cap per block
    pub batch_size: usize,          // Pending inserts per write-lock flush
    pub dict_reserve: usize,        // Headroom reserved at encode start
    pub compression_level: i32,     // zstd level for the column snapshot
}

impl Default for Config {
    fn default() -> Self {
        let chunk_size = 10 * 1024 * 1024; // 10MB blocks
        Config {
            chunk_size,
            max_lines_per_chunk: chunk_size / 16, // Assumes ~16 byte average line
            batch_size: 100,
            dict_reserve: 1_000_000,
            compression_level: 3,
        }
    }
}
