//! babytrack - a baby-care tracker for the terminal
//!
//! This crate provides resumable nursing and sleep timers backed by SQLite,
//! quick diaper and feeding logs, daily summaries and period reports, and a
//! live dashboard.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod output;
pub mod storage;
pub mod tui;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::TrackError;
