//! Core type definitions for photosorter

mod action;
mod entry;
mod error;

pub use action::CopyOutcome;
pub use entry::{is_hidden, Candidate};
pub use error::SortError;
