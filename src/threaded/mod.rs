//! Multi-threaded transpose.
//!
//! Splits one dimension of the matrix evenly across short-lived worker
//! threads. Each worker gets an exclusive view of its part of the
//! destination, so no two threads ever touch the same element.
//!
//! - `partition`: Balanced `[min, max)` ranges over a dimension
//! - `view`: Disjoint mutable blocks of the destination matrix
//! - `engine`: Spawn, run and join the workers

pub mod engine;
pub mod partition;
pub mod view;
