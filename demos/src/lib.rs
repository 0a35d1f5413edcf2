//! Shared setup for the runnable SafeMom demos under `examples/`.

pub mod common;
