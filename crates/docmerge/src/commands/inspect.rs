//! Inspect command - report columns, tokens and mapping coverage

use crate::context::Context;
use crate::output::print_json;
use anyhow::Result;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use docmerge_core::docx::Package;
use docmerge_core::merge;
use docmerge_core::sheet::RowSource;

/// Inspect command JSON output schema
#[derive(Debug, Serialize, Deserialize)]
struct InspectOutput {
    schema_version: String,
    workbook: WorkbookInfo,
    template: TemplateInfo,
    mapping: Vec<MappingEntry>,
    unused_mappings: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WorkbookInfo {
    path: String,
    sheet: String,
    rows: usize,
    columns: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TemplateInfo {
    path: String,
    tokens: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct MappingEntry {
    token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    column: Option<String>,
    status: MappingStatus,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum MappingStatus {
    Mapped,
    NotMapped,
    ColumnMissing,
}

/// Report workbook columns, template tokens and how the mapping resolves
/// them. Writes nothing.
pub fn run(json: bool, verbose: bool) -> Result<()> {
    let ctx = Context::new(verbose)?;

    let rows = RowSource::open(&ctx.workbook_path(), &ctx.config.source.sheet)?;
    let package = Package::open(&ctx.template_path())?;
    let template = package.document()?;
    let tokens = merge::placeholders(&template);

    let columns: BTreeSet<&str> = rows.columns().iter().map(String::as_str).collect();
    let mapping_entries: Vec<MappingEntry> = tokens
        .iter()
        .map(|token| match ctx.config.mapping.get(token) {
            Some(column) if columns.contains(column.as_str()) => MappingEntry {
                token: token.clone(),
                column: Some(column.clone()),
                status: MappingStatus::Mapped,
            },
            Some(column) => MappingEntry {
                token: token.clone(),
                column: Some(column.clone()),
                status: MappingStatus::ColumnMissing,
            },
            None => MappingEntry {
                token: token.clone(),
                column: None,
                status: MappingStatus::NotMapped,
            },
        })
        .collect();

    let unused_mappings: Vec<String> = ctx
        .config
        .mapping
        .keys()
        .filter(|key| !tokens.contains(key.as_str()))
        .cloned()
        .collect();

    let output = InspectOutput {
        schema_version: "1.0".to_string(),
        workbook: WorkbookInfo {
            path: ctx.workbook_path().display().to_string(),
            sheet: ctx.config.source.sheet.clone(),
            rows: rows.len(),
            columns: rows.columns().to_vec(),
        },
        template: TemplateInfo {
            path: ctx.template_path().display().to_string(),
            tokens: tokens.iter().cloned().collect(),
        },
        mapping: mapping_entries,
        unused_mappings,
    };

    if json {
        print_json(&serde_json::to_string_pretty(&output)?)?;
    } else {
        print_human_readable(&output);
    }

    Ok(())
}

fn print_human_readable(output: &InspectOutput) {
    println!("{}", "Workbook".bold());
    println!("  File: {}", output.workbook.path);
    println!("  Sheet: {}", output.workbook.sheet);
    println!("  Rows: {}", output.workbook.rows);
    println!("  Columns ({}):", output.workbook.columns.len());
    for (i, column) in output.workbook.columns.iter().enumerate() {
        println!("    {:2}. {}", i + 1, column);
    }
    println!();

    println!("{}", "Template".bold());
    println!("  File: {}", output.template.path);
    println!("  Placeholders found ({}):", output.template.tokens.len());
    for token in &output.template.tokens {
        println!("    «{}»", token);
    }
    println!();

    println!("{}", "Mapping".bold());
    for entry in &output.mapping {
        match entry.status {
            MappingStatus::Mapped => println!(
                "  {} «{}» -> '{}'",
                "✓".green(),
                entry.token,
                entry.column.as_deref().unwrap_or("")
            ),
            MappingStatus::ColumnMissing => println!(
                "  {} «{}» -> '{}' (column not found)",
                "✗".red(),
                entry.token,
                entry.column.as_deref().unwrap_or("")
            ),
            MappingStatus::NotMapped => {
                println!("  {} «{}» -> not mapped", "✗".red(), entry.token)
            }
        }
    }
    for key in &output.unused_mappings {
        println!("  {} '{}' never used by the template", "!".yellow(), key);
    }
}
