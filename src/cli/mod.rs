//! Command-line interface for read-context.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **annotate**: Attach reference bases and overlapping variants to every read
//! - **shards**: Show the shard keys an interval is emitted under
//!
//! ## Usage
//!
//! ```text
//! # Annotate reads from a BAM file
//! read-context annotate --reads sample.bam --variants calls.vcf.gz --reference ref.fa
//!
//! # Tab-separated reads, smaller shards, JSON output
//! read-context annotate --reads reads.tsv --reference ref.fa --shard-width 10000 --format json
//!
//! # Which shards does an interval land in?
//! read-context shards 1:2999999-3000008
//! ```

use clap::{Parser, Subcommand};

pub mod annotate;
pub mod shards;

#[derive(Parser)]
#[command(name = "read-context")]
#[command(version)]
#[command(about = "Attach reference bases and overlapping variants to aligned reads")]
#[command(
    long_about = "read-context joins aligned reads against a reference and a variant call set.\n\nThe join is sharded by genomic position:\n- Reads sharing a reference shard share one reference fetch\n- Reads and variants are paired within every shard they touch\n- Each read's result lists every overlapping variant exactly once"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the context of every read
    Annotate(annotate::AnnotateArgs),

    /// Show reference and variant shard keys for an interval
    Shards(shards::ShardsArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
