//! Reusable TUI widgets

pub mod logo;
pub mod shortcuts;

pub use logo::*;
pub use shortcuts::*;
