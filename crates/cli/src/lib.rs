//! Library interface for the searchgate binary
//!
//! Exposes the engine launcher for integration testing while keeping the
//! startup sequence in main.rs.

pub mod engine_process;
