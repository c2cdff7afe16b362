#![forbid(unsafe_code)]
//! schedgraph-sim library.
//!
//! Seeded generators for the fixed and random datasets used to exercise the
//! analysis pipeline.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` for return types.
//! - **Logging**: Use `tracing` macros (`info!`, `debug!`).

pub mod generator;

pub use generator::{DEFAULT_SEED, GraphGenerator, STANDARD_DATASETS};
