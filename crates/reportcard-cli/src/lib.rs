//! reportcard-cli library root.
//!
//! Exposes the config layer and command implementations so integration
//! tests can drive them without going through argument parsing.

pub mod commands;
pub mod config;
