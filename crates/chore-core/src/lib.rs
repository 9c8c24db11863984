//! Core types and trait definitions for the chore to-do service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally return `impl Future` from trait methods (native async
// traits, stabilised in Rust 1.75) to keep explicit `Send` bounds.
#![allow(async_fn_in_trait)]

pub mod command;
pub mod error;
pub mod executor;
pub mod identity;
pub mod item;
pub mod request;

pub use error::{Error, Result};
