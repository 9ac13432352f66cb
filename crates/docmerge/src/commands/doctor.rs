//! Doctor command - environment health check

use crate::context::Context;
use crate::output::print_json;
use anyhow::Result;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::env;

use docmerge_core::docx::Package;
use docmerge_core::merge;
use docmerge_core::sheet::RowSource;
use docmerge_office::{ResolveResult, resolve_soffice};

/// Doctor command JSON output schema
#[derive(Debug, Serialize, Deserialize)]
struct DoctorOutput {
    schema_version: String,
    project: ProjectInfo,
    checks: Vec<Check>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ProjectInfo {
    name: String,
    root: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Check {
    id: String,
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}

/// Run environment health check
///
/// # Returns
///
/// Always returns Ok(()) - doctor always exits 0; problems are reported
/// in the output, not the exit code.
pub fn run(json: bool, verbose: bool) -> Result<()> {
    let ctx_result = Context::new(verbose);

    let mut checks = Vec::new();

    let project_info = match &ctx_result {
        Ok(ctx) => {
            checks.push(Check {
                id: "config_valid".to_string(),
                name: "Configuration file".to_string(),
                status: CheckStatus::Ok,
                message: "docmerge.toml is valid".to_string(),
            });
            ProjectInfo {
                name: ctx.config.project.name.clone(),
                root: ctx.project.root.display().to_string(),
            }
        }
        Err(e) => {
            checks.push(Check {
                id: "config_valid".to_string(),
                name: "Configuration file".to_string(),
                status: CheckStatus::Error,
                message: format!("Failed to load config: {}", e),
            });
            let current_dir = env::current_dir().unwrap_or_else(|_| ".".into());
            ProjectInfo {
                name: "unknown".to_string(),
                root: current_dir.display().to_string(),
            }
        }
    };

    if let Ok(ctx) = &ctx_result {
        checks.push(check_workbook(ctx));
        checks.push(check_template(ctx));
    }
    checks.push(check_converter());

    let output = DoctorOutput {
        schema_version: "1.0".to_string(),
        project: project_info,
        checks,
    };

    if json {
        print_json(&serde_json::to_string_pretty(&output)?)?;
    } else {
        print_human_readable(&output);
    }

    Ok(())
}

fn check_workbook(ctx: &Context) -> Check {
    match RowSource::open(&ctx.workbook_path(), &ctx.config.source.sheet) {
        Ok(rows) => Check {
            id: "workbook_readable".to_string(),
            name: "Workbook".to_string(),
            status: CheckStatus::Ok,
            message: format!(
                "{} row(s) in sheet '{}'",
                rows.len(),
                ctx.config.source.sheet
            ),
        },
        Err(e) => Check {
            id: "workbook_readable".to_string(),
            name: "Workbook".to_string(),
            status: CheckStatus::Error,
            message: e.to_string(),
        },
    }
}

fn check_template(ctx: &Context) -> Check {
    let result = Package::open(&ctx.template_path()).and_then(|pkg| pkg.document());
    match result {
        Ok(document) => Check {
            id: "template_valid".to_string(),
            name: "Template".to_string(),
            status: CheckStatus::Ok,
            message: format!(
                "{} placeholder token(s) found",
                merge::placeholders(&document).len()
            ),
        },
        Err(e) => Check {
            id: "template_valid".to_string(),
            name: "Template".to_string(),
            status: CheckStatus::Error,
            message: e.to_string(),
        },
    }
}

/// Converter absence is a capability gap, not an error: generation works
/// without it.
fn check_converter() -> Check {
    match resolve_soffice() {
        Ok(ResolveResult::Resolved(info)) => Check {
            id: "converter_available".to_string(),
            name: "LibreOffice".to_string(),
            status: CheckStatus::Ok,
            message: format!("{} ({})", info.path.display(), info.source),
        },
        Ok(ResolveResult::NotFound { searched }) => Check {
            id: "converter_available".to_string(),
            name: "LibreOffice".to_string(),
            status: CheckStatus::Warning,
            message: format!(
                "not found; PDF conversion unavailable (searched: {})",
                searched.join(", ")
            ),
        },
        Err(e) => Check {
            id: "converter_available".to_string(),
            name: "LibreOffice".to_string(),
            status: CheckStatus::Error,
            message: e.to_string(),
        },
    }
}

fn print_human_readable(output: &DoctorOutput) {
    println!("{}", "Environment Health Check".bold());
    println!();

    println!("{}", "Project:".bold());
    println!("  Name: {}", output.project.name);
    println!("  Root: {}", output.project.root);
    println!();

    println!("{}", "Checks:".bold());
    for check in &output.checks {
        let status_str = match check.status {
            CheckStatus::Ok => "✓".green(),
            CheckStatus::Warning => "⚠".yellow(),
            CheckStatus::Error => "✗".red(),
        };
        println!("  {} {}: {}", status_str, check.name.bold(), check.message);
    }
}
