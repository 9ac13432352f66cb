use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum OfficeSource {
    EnvOverride,
    System,
    WellKnown,
}

impl fmt::Display for OfficeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OfficeSource::EnvOverride => write!(f, "environment override"),
            OfficeSource::System => write!(f, "system PATH"),
            OfficeSource::WellKnown => write!(f, "well-known location"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OfficeInfo {
    pub source: OfficeSource,
    pub path: PathBuf,
}
