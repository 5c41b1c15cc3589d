//! Core types and resolvers for the Forge idea repository.
//!
//! This crate performs no I/O. Storage backends (e.g. `forge-store-fs`) load
//! and persist the types defined here; the resolvers take their inputs as
//! explicit arguments and return plain values.

pub mod archive;
pub mod assessment;
pub mod draft;
pub mod error;
pub mod idea;
pub mod overlay;
pub mod provenance;
pub mod repository;

pub use error::{Error, Result};
