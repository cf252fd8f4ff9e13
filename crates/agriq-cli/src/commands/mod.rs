//! CLI command implementations.

pub mod all;
pub mod backends;
pub mod classify;
pub mod common;
pub mod config;
pub mod crop;
pub mod fertilizer;
pub mod version;
