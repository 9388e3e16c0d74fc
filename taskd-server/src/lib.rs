//! `taskd` server library.
//!
//! Exposes the task store, its storage backends and the HTTP router for use
//! in tests and embedding. The binary in `main.rs` wires a
//! [`backend::JsonFileBackend`] into a [`store::TaskStore`] and serves it.

pub mod backend;
pub mod config;
pub mod server;
pub mod store;
