use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransposeError {
    #[error("thread count must be at least 1")]
    InvalidThreadCount,
    #[error("block size must be at least 1x1, got {blk_rows}x{blk_cols}")]
    InvalidBlockSize { blk_rows: usize, blk_cols: usize },
    #[error("matrix dimensions {rows}x{cols} overflow usize")]
    DimensionOverflow { rows: usize, cols: usize },
    #[error("source matrix: expected {expected} elements, got {got}")]
    SourceLength { expected: usize, got: usize },
    #[error("destination matrix: expected {expected} elements, got {got}")]
    DestinationLength { expected: usize, got: usize },
    #[error("failed to spawn worker {worker}")]
    WorkerSpawn {
        worker: usize,
        #[source]
        source: io::Error,
    },
    #[error("worker {worker} panicked")]
    WorkerPanicked { worker: usize },
    #[error("invalid value {value:?} for {key}")]
    Config { key: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, TransposeError>;
