//! Convert command - PDF conversion of pre-existing documents

use crate::context::Context;
use anyhow::{Result, bail};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

use docmerge_core::DocmergeError;
use docmerge_office::{ResolveResult, convert_to_pdf, resolve_soffice};

/// Convert every `.docx` in the output directory to PDF, skipping
/// generation entirely. Per-file failures are reported and the batch
/// continues.
pub fn run(verbose: bool) -> Result<()> {
    let ctx = Context::new(verbose)?;

    let output_dir = ctx.output_dir();
    let documents = list_documents(&output_dir)?;
    if documents.is_empty() {
        println!("No documents found in {}", output_dir.display());
        return Ok(());
    }

    let office = match resolve_soffice()? {
        ResolveResult::Resolved(info) => info,
        ResolveResult::NotFound { searched } => {
            return Err(DocmergeError::ConverterNotFound {
                searched: searched.join(", "),
            }
            .into());
        }
    };

    let pdf_dir = ctx.pdf_dir();
    println!(
        "Converting {} document(s) into {}",
        documents.len(),
        pdf_dir.display()
    );
    if verbose {
        println!(
            "{} Using LibreOffice at {} ({})",
            "→".cyan(),
            office.path.display(),
            office.source
        );
    }

    let mut failures = Vec::new();
    for (i, docx_path) in documents.iter().enumerate() {
        match convert_to_pdf(&office, docx_path, &pdf_dir) {
            Ok(pdf_path) => println!(
                "  [{}/{}] {} Converted {}",
                i + 1,
                documents.len(),
                "✓".green(),
                pdf_path.display()
            ),
            Err(e) => {
                eprintln!("  [{}/{}] {} {}", i + 1, documents.len(), "✗".red(), e);
                failures.push(docx_path.display().to_string());
            }
        }
    }

    if failures.is_empty() {
        println!(
            "{} Converted {} document(s)",
            "✓".green().bold(),
            documents.len()
        );
        Ok(())
    } else {
        bail!(
            "{} of {} conversion(s) failed",
            failures.len(),
            documents.len()
        );
    }
}

/// All `.docx` files directly in `dir`, sorted by name
fn list_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut documents: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("docx"))
                    .unwrap_or(false)
        })
        .collect();
    documents.sort();
    Ok(documents)
}
