//! billtime library crate
//!
//! This crate provides both a CLI binary and a library API for programmatic use

pub mod cli;
pub mod config;
pub mod draft;
pub mod error;
pub mod invoice;
pub mod kv;
pub mod logging;
pub mod output;
pub mod screenshot;
pub mod session;
pub mod store;
pub mod theme;
pub mod tick;
pub mod time_utils;
pub mod timer;
pub mod tracker;
pub mod tui;

pub use error::{BilltimeError, Result};
