#![forbid(unsafe_code)]

//! Core domain model and business logic for the BMI tracker.
//!
//! This crate provides:
//! - Domain types (measurements, results, history entries)
//! - BMI engine (validation, computation, classification)
//! - Persistence (SQLite history, preference file)
//! - Application orchestration for front ends

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod engine;
pub mod history;
pub mod preferences;
pub mod app;

// Re-export commonly used types
pub use error::{Error, InputError, Result};
pub use types::*;
pub use config::Config;
pub use engine::{classify, compute, evaluate, result_text, validate};
pub use history::{HistoryLog, SqliteHistory};
pub use preferences::{JsonPreferences, MemoryPreferences, PreferenceStore};
pub use app::{Alert, App, Outcome, ViewState};
