//! Core domain + application logic for the Hall of Fame bot.
//!
//! This crate is intentionally framework-agnostic. The Discord client lives
//! behind a port (trait) implemented in the adapter crate.

pub mod classify;
pub mod compose;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod ports;
pub mod registry;

pub use errors::{Error, Result};
