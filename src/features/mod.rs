//! Feature implementations for babytrack.
//!
//! - Timed sessions for nursing and sleep
//! - Quick records for diapers and bottle feedings
//! - Daily summaries, period reports and history
//! - Shell completions

pub mod records;
pub mod report;
pub mod session;
pub mod shell;
