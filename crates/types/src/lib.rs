//! Shared primitive types for letter assembly.
//!
//! These types are used by the core wizard, the exporter and the REST layer. They carry their
//! own validation so that values crossing crate boundaries are already well-formed:
//!
//! - [`NonEmptyText`] for labels and filenames that must not be blank
//! - [`EntryId`] for the stable keys of list entries (lab results, treatments)
//! - [`LetterDate`] for the long "Month D, YYYY" date rendering used in letters

mod date;
mod entry_id;
mod text;

pub use date::{format_long_date, LetterDate};
pub use entry_id::EntryId;
pub use text::NonEmptyText;

/// Errors raised when constructing validated primitives.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("text cannot be empty")]
    Empty,

    /// The input could not be read as a calendar date
    #[error("invalid date: {0}")]
    InvalidDate(String),
}
