//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! All progress, warning and error text goes through this module so the
//! quiet and debug flags are honored everywhere.

pub mod output;
