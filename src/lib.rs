// src/lib.rs
pub mod config;
pub mod dev;
pub mod highlight;

pub use highlight::{highlight, highlight_bytes};
