//! Core library for the `congplot` CLI.
//!
//! This crate turns the tab-separated logs of network congestion experiments
//! into static charts. Parsed logs become declarative figure descriptions,
//! which are rendered with `plotters`. The primary user-facing
//! interface is the `congplot` command-line application; library APIs may
//! evolve as the CLI grows.
pub mod args;
pub mod charts;
pub mod config;
pub mod entry;
pub mod error;
pub mod figure;
pub mod ingest;
pub mod logger;
pub mod reports;
