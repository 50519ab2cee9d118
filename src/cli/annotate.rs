//! Annotate command - build the context of every read.
//!
//! Reads come from a TSV, SAM or BAM file, variants from a VCF, and reference
//! bases from a FASTA loaded into memory.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;

use crate::cli::OutputFormat;
use crate::core::read::ReadRecord;
use crate::core::shard::ShardWidth;
use crate::core::variant::Variant;
use crate::pipeline::{PipelineConfig, PipelineOutput, ReadContextPipeline};
use crate::sources::alignment::{is_alignment_file, read_alignment_file};
use crate::sources::reads::parse_reads_file;
use crate::sources::reference::InMemoryReference;
use crate::sources::vcf::parse_vcf_file;

/// Longest reference string shown in text output before eliding
const TEXT_BASES_LIMIT: usize = 60;

/// Arguments for the annotate command
#[derive(Args)]
pub struct AnnotateArgs {
    /// Reads: TSV (name, contig, start, end), SAM or BAM
    #[arg(short, long, required = true)]
    pub reads: PathBuf,

    /// Variants: VCF, optionally gzip compressed
    #[arg(long)]
    pub variants: Option<PathBuf>,

    /// Reference FASTA, optionally gzip compressed
    #[arg(long, required = true)]
    pub reference: PathBuf,

    /// Bases per shard (overrides the config file)
    #[arg(short = 'w', long)]
    pub shard_width: Option<u64>,

    /// Worker threads (overrides the config file; default: all cores)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Execute the annotate command
///
/// # Errors
///
/// Returns an error if an input cannot be loaded or the join fails.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: AnnotateArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = build_config(&args)?;

    let reads = load_reads(&args.reads)?;
    let variants: Vec<Variant> = match &args.variants {
        Some(path) => parse_vcf_file(path)
            .with_context(|| format!("Failed to load variants from {}", path.display()))?,
        None => Vec::new(),
    };
    let reference = InMemoryReference::from_fasta_file(&args.reference).with_context(|| {
        format!("Failed to load reference from {}", args.reference.display())
    })?;

    if verbose {
        eprintln!(
            "Loaded {} reads, {} variants, {} reference contigs (shard width {})",
            reads.len(),
            variants.len(),
            reference.len(),
            config.shard_width,
        );
    }

    let pipeline = ReadContextPipeline::new(&reference, config);
    let output = pipeline.run(&reads, &variants)?;

    if verbose {
        eprintln!(
            "{} reference fetches ({} bases), {} variant shards, {} read/variant pairs",
            output.stats.reference_groups,
            output.stats.bases_fetched,
            output.stats.variant_shards,
            output.stats.variant_pairs,
        );
    }

    match format {
        OutputFormat::Text => print_text(&reads, &output),
        OutputFormat::Json => print_json(&reads, &output)?,
        OutputFormat::Tsv => print_tsv(&reads, &output),
    }

    Ok(())
}

fn build_config(args: &AnnotateArgs) -> anyhow::Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    if let Some(width) = args.shard_width {
        config = config.with_shard_width(ShardWidth::new(width)?);
    }
    if args.threads.is_some() {
        config = config.with_threads(args.threads)?;
    }

    Ok(config)
}

fn load_reads(path: &Path) -> anyhow::Result<Vec<ReadRecord>> {
    let reads = if is_alignment_file(path) {
        read_alignment_file(path)
    } else {
        parse_reads_file(path)
    };
    reads.with_context(|| format!("Failed to load reads from {}", path.display()))
}

fn elide(bases: &[u8]) -> String {
    if bases.len() <= TEXT_BASES_LIMIT {
        String::from_utf8_lossy(bases).into_owned()
    } else {
        format!("{}...", String::from_utf8_lossy(&bases[..TEXT_BASES_LIMIT]))
    }
}

fn print_text(reads: &[ReadRecord], output: &PipelineOutput) {
    for read in reads {
        let Some(context) = output.contexts.get(&read.id) else {
            continue;
        };

        println!("\n{} (#{}) {}", read.name, read.id, read.interval);
        println!(
            "   Reference: {} ({} bp)",
            elide(context.reference_bases().bases()),
            context.reference_bases().bases().len()
        );

        if context.variant_count() == 0 {
            println!("   Variants: none");
        } else {
            println!("   Variants: {}", context.variant_count());
            for variant in context.variants() {
                println!("      #{} {} {}", variant.id, variant.interval, variant.kind);
            }
        }
    }
}

fn print_json(reads: &[ReadRecord], output: &PipelineOutput) -> anyhow::Result<()> {
    let contexts: Vec<serde_json::Value> = reads
        .iter()
        .filter_map(|read| {
            output.contexts.get(&read.id).map(|context| {
                serde_json::json!({
                    "read": read,
                    "context": context,
                })
            })
        })
        .collect();

    let output = serde_json::json!({
        "stats": output.stats,
        "contexts": contexts,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(reads: &[ReadRecord], output: &PipelineOutput) {
    println!("read_id\tname\tinterval\treference_bases\tvariant_ids\tsnps\tindels");

    for read in reads {
        let Some(context) = output.contexts.get(&read.id) else {
            continue;
        };

        let ids = context
            .variant_ids()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let snps = context.variants().filter(|v| v.is_snp()).count();
        let indels = context.variants().filter(|v| v.is_indel()).count();

        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            read.id,
            read.name,
            read.interval,
            String::from_utf8_lossy(context.reference_bases().bases()),
            if ids.is_empty() { "." } else { ids.as_str() },
            snps,
            indels,
        );
    }
}
