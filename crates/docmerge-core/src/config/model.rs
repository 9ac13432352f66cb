use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::consts::{DEFAULT_OUTPUT_DIR, DEFAULT_PDF_DIR};

/// Ordered placeholder-name → column-name lookup table
pub type Mapping = IndexMap<String, String>;

/// docmerge.toml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub project: ProjectConfig,
    pub source: SourceConfig,
    pub template: TemplateConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub naming: NamingConfig,
    #[serde(default)]
    pub mapping: Mapping,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Workbook path, relative to the project root
    pub workbook: PathBuf,
    /// Name of the sheet holding the data, first row as header
    pub sheet: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Template document path, relative to the project root
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_pdf_dir")]
    pub pdf_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            pdf_dir: default_pdf_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_pdf_dir() -> PathBuf {
    PathBuf::from(DEFAULT_PDF_DIR)
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NamingConfig {
    /// Columns contributing to the output file name, in order
    #[serde(default)]
    pub fields: Vec<String>,
}

impl Config {
    /// Read and validate docmerge.toml
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| crate::error::DocmergeError::ConfigParse(e.to_string()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::error::DocmergeError::ConfigParse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> crate::error::Result<()> {
        if self.source.sheet.is_empty() {
            return Err(crate::error::DocmergeError::ConfigInvalidValue {
                field: "source.sheet".to_string(),
                reason: "sheet name must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let toml = r#"
[project]
name = "eoi-letters"

[source]
workbook = "dataset.xlsx"
sheet = "Sheet1"

[template]
path = "template.docx"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.project.name, "eoi-letters");
        assert_eq!(config.source.sheet, "Sheet1");
        assert_eq!(config.output.dir, PathBuf::from("output"));
        assert_eq!(config.output.pdf_dir, PathBuf::from("output_pdf"));
        assert!(config.naming.fields.is_empty());
        assert!(config.mapping.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[project]
name = "eoi-letters"

[source]
workbook = "data/dataset.xlsx"
sheet = "2. Filtered"

[template]
path = "template.docx"

[output]
dir = "out"
pdf_dir = "out_pdf"

[naming]
fields = ["PI", "Nominee"]

[mapping]
PI = "PI"
Abstract = "Abstract"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.source.sheet, "2. Filtered");
        assert_eq!(config.output.dir, PathBuf::from("out"));
        assert_eq!(config.naming.fields, vec!["PI", "Nominee"]);
        assert_eq!(config.mapping.get("Abstract").unwrap(), "Abstract");
    }

    #[test]
    fn test_mapping_preserves_declaration_order() {
        let toml = r#"
[project]
name = "t"

[source]
workbook = "w.xlsx"
sheet = "S"

[template]
path = "t.docx"

[mapping]
Zeta = "Z Column"
Alpha = "A Column"
Mid = "M Column"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let keys: Vec<&str> = config.mapping.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_empty_sheet_name_rejected() {
        let toml = r#"
[project]
name = "t"

[source]
workbook = "w.xlsx"
sheet = ""

[template]
path = "t.docx"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.validate().is_err());
    }
}
