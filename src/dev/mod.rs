// src/dev/mod.rs
// Helpers shared by the fuzz/perf tools and the integration tests.

pub mod generator;
pub mod markup;
