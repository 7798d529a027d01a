//! Presentation consumers of the engine's read-only API.
//!
//! [`console`] renders text for a terminal; [`summary`] and [`export`]
//! produce JSON and CSV. None of them mutate the group.

pub mod console;
pub mod export;
pub mod summary;

use crate::core::error::InvariantViolation;
use thiserror::Error;

/// Errors raised while building or writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("internal error: {0}")]
    Invariant(#[from] InvariantViolation),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
