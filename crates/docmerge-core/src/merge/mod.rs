//! Placeholder resolution
//!
//! Substitutes `«Name»` tokens in a parsed document with row values. A
//! token can be split across adjacent runs by the authoring format, so
//! matching happens on a flat per-paragraph text view with fragment
//! boundary offsets; replacements are mapped back onto the owning
//! fragments, keeping the first fragment's formatting and removing the
//! fragments the token consumed.

mod report;
mod resolve;
mod scan;

pub use report::MergeReport;
pub use resolve::{placeholders, resolve_document};
