use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::docx::model::Document;
use crate::error::{DocmergeError, Result};

const DOCUMENT_PART: &str = "word/document.xml";

/// A `.docx` container, read fully into memory.
///
/// Every part is kept verbatim; only `word/document.xml` is replaced on
/// save. The template package is opened once and reused for every row.
#[derive(Debug, Clone)]
pub struct Package {
    parts: Vec<(String, Vec<u8>)>,
}

impl Package {
    /// Open a `.docx` file.
    ///
    /// Fails with `TEMPLATE_FORMAT_ERROR` if the file is unreadable, not
    /// a zip archive, or has no `word/document.xml` part.
    pub fn open(path: &Path) -> Result<Self> {
        let invalid = |detail: String| {
            DocmergeError::TemplateFormat(format!("'{}': {}", path.display(), detail))
        };

        let file = File::open(path).map_err(|e| invalid(e.to_string()))?;
        let mut archive =
            ZipArchive::new(BufReader::new(file)).map_err(|e| invalid(e.to_string()))?;

        let mut parts = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).map_err(|e| invalid(e.to_string()))?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            let mut bytes = Vec::with_capacity(entry.size() as usize);
            entry
                .read_to_end(&mut bytes)
                .map_err(|e| invalid(e.to_string()))?;
            parts.push((name, bytes));
        }

        if !parts.iter().any(|(name, _)| name == DOCUMENT_PART) {
            return Err(invalid(format!("no {} part", DOCUMENT_PART)));
        }

        Ok(Self { parts })
    }

    /// Parse the package's main document part
    pub fn document(&self) -> Result<Document> {
        let bytes = self
            .parts
            .iter()
            .find(|(name, _)| name == DOCUMENT_PART)
            .map(|(_, bytes)| bytes)
            .ok_or_else(|| {
                DocmergeError::TemplateFormat(format!("no {} part", DOCUMENT_PART))
            })?;

        let xml = std::str::from_utf8(bytes).map_err(|e| {
            DocmergeError::TemplateFormat(format!("{} is not UTF-8: {}", DOCUMENT_PART, e))
        })?;

        Document::parse(xml)
    }

    /// Write a new package with `document` as the main document part.
    ///
    /// Fails with `WRITE_ERROR` on filesystem failure; fatal for the
    /// current row only.
    pub fn save_with_document(&self, document: &Document, path: &Path) -> Result<()> {
        let write_err = |reason: String| DocmergeError::Write {
            path: path.to_path_buf(),
            reason,
        };

        let file = File::create(path).map_err(|e| write_err(e.to_string()))?;
        let mut writer = ZipWriter::new(BufWriter::new(file));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let document_xml = document.to_xml();
        for (name, bytes) in &self.parts {
            writer
                .start_file(name.clone(), options)
                .map_err(|e| write_err(e.to_string()))?;
            let data = if name == DOCUMENT_PART {
                document_xml.as_bytes()
            } else {
                bytes.as_slice()
            };
            writer.write_all(data).map_err(|e| write_err(e.to_string()))?;
        }
        writer.finish().map_err(|e| write_err(e.to_string()))?;
        Ok(())
    }
}
