// src/lib.rs

#[macro_use]
pub mod log;

pub mod config;
pub mod core;
pub mod error;

pub mod chunk;
pub mod clean;
pub mod file;
pub mod progress;
pub mod runner;
pub mod split;
pub mod store;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{PackError, Result};
