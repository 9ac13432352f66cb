//! LibreOffice resolution and PDF conversion for docmerge.
//!
//! The converter is an external collaborator: docmerge never parses or
//! produces PDF itself, it resolves a `soffice` binary and drives it one
//! document at a time.
//!
//! # Resolution Flow
//!
//! ```text
//! resolve_soffice()
//!     ↓
//! 1. DOCMERGE_SOFFICE environment override
//!     → set and present: use it
//!     → set but missing: NotFound (no silent fallback past an
//!       explicit override)
//!     ↓ (unset)
//! 2. System PATH
//!     → which::which("soffice")
//!     ↓ (not found)
//! 3. Well-known install locations
//!     ↓ (not found)
//! 4. NotFound with searched locations
//! ```
//!
//! Conversion is a synchronous subprocess call; a non-zero exit or a
//! missing output PDF is a per-document `CONVERSION_ERROR`, never a
//! panic, and converter absence is a reported capability gap.

pub mod convert;
pub mod info;
pub mod resolve;

// Re-export commonly used types
pub use convert::convert_to_pdf;
pub use info::{OfficeInfo, OfficeSource};
pub use resolve::{ResolveResult, resolve_soffice};

// Type alias for convenience
pub type Result<T> = docmerge_core::Result<T>;
