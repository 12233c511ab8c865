#![forbid(unsafe_code)]

//! Core domain model and business logic for the nutri calorie calculator.
//!
//! This crate provides:
//! - Domain types (inputs, results, saved entries)
//! - Calculation engine (BMR, TDEE, macro split)
//! - Persistence (JSON entry store, CSV export)
//! - Configuration and logging setup

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod timestamp;
pub mod engine;
pub mod store;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use engine::{activity_multiplier, calculate, compute_bmr, compute_macros};
pub use store::{EntryStore, JsonFileStore};
pub use export::entries_to_csv;
