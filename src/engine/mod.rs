//! Core engine — the fetch → analyze → write cycle and the refresh loop.

pub mod cycle;
pub mod scheduler;
