//! core
//!
//! Core domain types and configuration for the publisher.
//!
//! # Modules
//!
//! - [`types`] - Strong types: BranchName, RemoteName, RemoteUrl, Identity
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid inputs from reaching git
//! - Schemas are strict and reject unknown fields

pub mod config;
pub mod types;
