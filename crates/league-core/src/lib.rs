//! # league-core
//!
//! Core types, traits, and utilities for League RS.
//!
//! This crate provides the foundational building blocks used across all other crates:
//! - Common error types
//! - Core traits (Entity, Identifiable)
//! - Page request and page types
//! - Configuration types

pub mod error;
pub mod traits;
pub mod pagination;
pub mod config;

pub use error::*;
pub use traits::*;
pub use pagination::*;
