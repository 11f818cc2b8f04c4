//! # herald-core
//!
//! Core error handling and configuration shared by the Herald crates.

pub mod config;
pub mod error;
