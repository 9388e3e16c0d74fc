//! Shared wire definitions for the `taskd` JSON API and its backing file.

pub mod api;
pub mod codec;
pub mod task;
