//! Filament - minimal static file HTTP/1.x server
//!
//! Core library: request parsing, file resolution, response serialization
//! and the per-connection driver.

pub mod config;
pub mod http;
pub mod server;
