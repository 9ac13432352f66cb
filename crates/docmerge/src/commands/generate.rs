//! Generate command - produce one populated document per workbook row

use crate::context::Context;
use anyhow::{Result, bail};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

use docmerge_core::docx::Package;
use docmerge_core::merge::{self, MergeReport};
use docmerge_core::{DocmergeError, filename};
use docmerge_core::sheet::RowSource;
use docmerge_office::{ResolveResult, convert_to_pdf, resolve_soffice};

/// Generate documents, one per row, strictly sequentially.
///
/// Failures that prevent establishing the row iteration or the template
/// abort before any output; a failure writing or converting one row is
/// reported and the remaining rows continue.
pub fn run(dry_run: bool, pdf: bool, verbose: bool) -> Result<()> {
    let ctx = Context::new(verbose)?;

    if verbose {
        println!(
            "{} Reading workbook '{}' sheet '{}'",
            "→".cyan(),
            ctx.workbook_path().display(),
            ctx.config.source.sheet
        );
    }
    let rows = RowSource::open(&ctx.workbook_path(), &ctx.config.source.sheet)?;

    if verbose {
        println!(
            "{} Loading template '{}'",
            "→".cyan(),
            ctx.template_path().display()
        );
    }
    let package = Package::open(&ctx.template_path())?;
    let template = package.document()?;

    print_template_warnings(&ctx, &template);

    let output_dir = ctx.output_dir();
    if !dry_run {
        fs::create_dir_all(&output_dir)?;
    }

    println!(
        "Generating {} document(s) into {}",
        rows.len(),
        output_dir.display()
    );
    if dry_run {
        println!("{} Dry run - no files will be created", "!".yellow());
    }

    let mut generated: Vec<PathBuf> = Vec::new();
    let mut failures: Vec<String> = Vec::new();

    for row in rows.rows() {
        let name = filename::build_name(row, &ctx.config.naming.fields);
        let output_path = output_dir.join(format!("{}.docx", name));

        if dry_run {
            println!("  Would create: {}", output_path.display());
            if pdf {
                println!(
                    "  Would convert to: {}",
                    ctx.pdf_dir().join(format!("{}.pdf", name)).display()
                );
            }
            continue;
        }

        let mut document = template.clone();
        merge::resolve_document(&mut document, row, &ctx.config.mapping);

        match package.save_with_document(&document, &output_path) {
            Ok(()) => {
                println!("  {} Created {}", "✓".green(), output_path.display());
                generated.push(output_path);
            }
            Err(e) => {
                eprintln!("  {} row {} ({}): {}", "✗".red(), row.index(), name, e);
                failures.push(format!("row {} ({})", row.index(), name));
            }
        }
    }

    if pdf && !dry_run && !generated.is_empty() {
        convert_generated(&ctx, &generated, &mut failures)?;
    }

    if dry_run {
        return Ok(());
    }

    if failures.is_empty() {
        println!(
            "{} Generated {} document(s)",
            "✓".green().bold(),
            generated.len()
        );
        Ok(())
    } else {
        eprintln!("{} Failed rows:", "✗".red().bold());
        for failure in &failures {
            eprintln!("  {}", failure);
        }
        bail!("{} of {} row(s) failed", failures.len(), rows.len());
    }
}

/// Report template tokens without a mapping entry and mapping entries the
/// template never references. Identical for every row, so reported once
/// per run.
fn print_template_warnings(ctx: &Context, template: &docmerge_core::docx::Document) {
    let tokens = merge::placeholders(template);

    let mut report = MergeReport::default();
    for token in &tokens {
        if ctx.config.mapping.contains_key(token) {
            report.referenced.insert(token.clone());
        } else {
            report.unknown.insert(token.clone());
        }
    }

    for token in &report.unknown {
        println!(
            "{} unknown placeholder «{}» has no mapping entry",
            "!".yellow(),
            token
        );
    }
    for key in report.unused(&ctx.config.mapping) {
        println!(
            "{} mapping entry '{}' is never used by the template",
            "!".yellow(),
            key
        );
    }
}

fn convert_generated(
    ctx: &Context,
    generated: &[PathBuf],
    failures: &mut Vec<String>,
) -> Result<()> {
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
        generated.len(),
        pdf_dir.display()
    );
    if ctx.verbose {
        println!(
            "{} Using LibreOffice at {} ({})",
            "→".cyan(),
            office.path.display(),
            office.source
        );
    }

    for (i, docx_path) in generated.iter().enumerate() {
        match convert_to_pdf(&office, docx_path, &pdf_dir) {
            Ok(pdf_path) => println!(
                "  [{}/{}] {} Converted {}",
                i + 1,
                generated.len(),
                "✓".green(),
                pdf_path.display()
            ),
            Err(e) => {
                eprintln!("  [{}/{}] {} {}", i + 1, generated.len(), "✗".red(), e);
                failures.push(format!("conversion of {}", docx_path.display()));
            }
        }
    }

    Ok(())
}
