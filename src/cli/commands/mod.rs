//! cli::commands
//!
//! Command handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Calls the engine to execute the command
//! 3. Formats and displays output
//!
//! Handlers do NOT perform repository mutations directly.

mod completion;
mod publish;

pub use completion::{completion, write_completion};
pub use publish::{publish, resolve_options};
