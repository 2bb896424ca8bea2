//! # Swimbots
//!
//! Headless host for the Swimbots simulation. The simulation itself lives in
//! `swimbots_core`; this crate paces it, reports births and deaths, and
//! streams snapshots to observers.

pub mod host;

pub use host::{Host, JsonLinesSink, MemorySink, NullSink, SnapshotSink};
