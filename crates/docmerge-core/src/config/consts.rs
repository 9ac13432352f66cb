/// Configuration file searched for in current and parent directories
pub const CONFIG_FILE_NAME: &str = "docmerge.toml";

/// Default directory for generated documents, relative to project root
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Default directory for converted PDFs, relative to project root
pub const DEFAULT_PDF_DIR: &str = "output_pdf";
