//! # Searchgate
//!
//! A query-compiling search gateway library for Elasticsearch-compatible
//! engines.
//!
//! ## Features
//!
//! - Simplified client query syntax compiled to the engine's search DSL
//! - Mapping-driven, type-directed expression generation
//! - Per-namespace isolation and configuration
//! - Reusable named filter and sorting fragments
//! - Signed tokens scoping a session to a namespace and filter set
//! - Should/Must match strategies with per-request and per-namespace overrides

pub mod backend;
pub mod builder;
pub mod config;
pub mod error;
pub mod expression;
pub mod mapping;
pub mod processor;
pub mod provider;
pub mod query;
pub mod request;
pub mod token;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
