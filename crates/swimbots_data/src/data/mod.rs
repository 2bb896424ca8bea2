//! Core data structures for the Swimbots simulation.

pub mod agent;
pub mod events;
pub mod genome;
pub mod snapshot;
