use std::path::PathBuf;

use crate::info::{OfficeInfo, OfficeSource};
use docmerge_core::Result;

/// Environment variable overriding converter resolution
pub const SOFFICE_ENV: &str = "DOCMERGE_SOFFICE";

/// Well-known LibreOffice install locations, checked after PATH
#[cfg(not(windows))]
const WELL_KNOWN: &[&str] = &[
    "/usr/bin/soffice",
    "/usr/local/bin/soffice",
    "/usr/lib/libreoffice/program/soffice",
    "/opt/libreoffice/program/soffice",
    "/Applications/LibreOffice.app/Contents/MacOS/soffice",
];

#[cfg(windows)]
const WELL_KNOWN: &[&str] = &[
    "C:\\Program Files\\LibreOffice\\program\\soffice.exe",
    "C:\\Program Files (x86)\\LibreOffice\\program\\soffice.exe",
];

/// Result of converter resolution
#[derive(Debug, Clone)]
pub enum ResolveResult {
    Resolved(OfficeInfo),
    /// No binary found; `searched` lists every location consulted
    NotFound { searched: Vec<String> },
}

/// Resolve the LibreOffice binary.
///
/// Resolution priority:
/// 1. `DOCMERGE_SOFFICE` (an explicit override that points at a missing
///    file is NotFound, not a fallback)
/// 2. System PATH
/// 3. Well-known install locations
pub fn resolve_soffice() -> Result<ResolveResult> {
    if let Ok(value) = std::env::var(SOFFICE_ENV) {
        if !value.is_empty() {
            let path = PathBuf::from(&value);
            if path.is_file() {
                return Ok(ResolveResult::Resolved(OfficeInfo {
                    source: OfficeSource::EnvOverride,
                    path,
                }));
            }
            return Ok(ResolveResult::NotFound {
                searched: vec![format!("{}={}", SOFFICE_ENV, value)],
            });
        }
    }

    if let Some(info) = resolve_system() {
        return Ok(ResolveResult::Resolved(info));
    }

    if let Some(info) = resolve_well_known() {
        return Ok(ResolveResult::Resolved(info));
    }

    let mut searched = vec!["PATH (soffice)".to_string()];
    searched.extend(WELL_KNOWN.iter().map(|s| s.to_string()));
    Ok(ResolveResult::NotFound { searched })
}

/// Resolve soffice from system PATH
fn resolve_system() -> Option<OfficeInfo> {
    let path = which::which("soffice").ok()?;
    Some(OfficeInfo {
        source: OfficeSource::System,
        path,
    })
}

/// Resolve soffice from well-known install locations
fn resolve_well_known() -> Option<OfficeInfo> {
    for candidate in WELL_KNOWN {
        let path = PathBuf::from(candidate);
        if path.is_file() {
            return Some(OfficeInfo {
                source: OfficeSource::WellKnown,
                path,
            });
        }
    }
    None
}
