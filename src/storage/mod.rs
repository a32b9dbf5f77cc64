//! Storage layer for babytrack.
//!
//! This module provides SQLite-based persistence for:
//! - Timed sessions (nursing, sleep)
//! - Quick records (diaper changes, feedings)

mod database;
mod migrations;
pub mod timestamp;

pub use database::Database;
