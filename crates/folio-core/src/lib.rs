//! Core types and trait definitions for the Folio migration pipeline.
//!
//! This crate is deliberately free of database and storage dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod dates;
pub mod entity;
pub mod error;
pub mod ids;
pub mod publish;
pub mod record;
pub mod store;

pub use error::{Error, Result};
