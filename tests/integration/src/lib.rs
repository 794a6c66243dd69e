//! Integration test utilities for the board
//!
//! This crate provides helpers for running end-to-end scenarios against
//! the service layer, backed by the in-memory store or PostgreSQL.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
