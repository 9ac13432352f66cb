//! CLI command structure using clap

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "docmerge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report workbook columns, template tokens and mapping coverage
    Inspect {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate one document per workbook row
    Generate {
        /// Compute filenames and warnings without creating files
        #[arg(long)]
        dry_run: bool,

        /// Convert generated documents to PDF after creation
        #[arg(long)]
        pdf: bool,
    },

    /// Convert existing documents in the output directory to PDF
    Convert,

    /// Check environment health
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
