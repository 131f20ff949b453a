//! Runner configuration.

use std::env;
use std::str::FromStr;

use crate::error::{Result, TransposeError};

/// Matrix shape, tiling and parallelism for a transpose run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub rows: usize,
    pub cols: usize,
    pub blk_rows: usize,
    pub blk_cols: usize,
    pub num_threads: usize,
    pub iterations: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            rows: 8,
            cols: 16,
            blk_rows: 2,
            blk_cols: 4,
            num_threads: 2,
            iterations: 3,
        }
    }
}

impl RunConfig {
    /// Defaults, overridden by any of `TRANSPOSE_ROWS`, `TRANSPOSE_COLS`,
    /// `TRANSPOSE_BLK_ROWS`, `TRANSPOSE_BLK_COLS`, `TRANSPOSE_THREADS` and
    /// `TRANSPOSE_ITERATIONS` that are set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`RunConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut config = Self::default();
        // Dimensions may be 0; everything else must be at least 1.
        override_with(&lookup, "TRANSPOSE_ROWS", &mut config.rows, 0)?;
        override_with(&lookup, "TRANSPOSE_COLS", &mut config.cols, 0)?;
        override_with(&lookup, "TRANSPOSE_BLK_ROWS", &mut config.blk_rows, 1)?;
        override_with(&lookup, "TRANSPOSE_BLK_COLS", &mut config.blk_cols, 1)?;
        override_with(&lookup, "TRANSPOSE_THREADS", &mut config.num_threads, 1)?;
        override_with(&lookup, "TRANSPOSE_ITERATIONS", &mut config.iterations, 1)?;
        if config.rows.checked_mul(config.cols).is_none() {
            return Err(TransposeError::DimensionOverflow {
                rows: config.rows,
                cols: config.cols,
            });
        }
        Ok(config)
    }

    /// Elements in one matrix. Loaded configs never overflow here.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn override_with<F>(lookup: &F, key: &'static str, field: &mut usize, min: usize) -> Result<()>
where
    F: Fn(&'static str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(());
    };
    match usize::from_str(raw.trim()) {
        Ok(value) if value >= min => {
            *field = value;
            Ok(())
        }
        _ => Err(TransposeError::Config { key, value: raw }),
    }
}
