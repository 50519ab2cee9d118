//! Shards command - show how an interval is keyed.

use clap::Args;

use crate::cli::OutputFormat;
use crate::core::interval::GenomicInterval;
use crate::core::shard::{ReferenceShard, ShardKey, ShardWidth, VariantShard, DEFAULT_SHARD_WIDTH};

/// Arguments for the shards command
#[derive(Args)]
pub struct ShardsArgs {
    /// Interval as contig:start-end (1-based, inclusive)
    #[arg(required = true)]
    pub interval: String,

    /// Bases per shard
    #[arg(short = 'w', long, default_value_t = DEFAULT_SHARD_WIDTH)]
    pub shard_width: u64,
}

/// Execute the shards command
///
/// # Errors
///
/// Returns an error if the interval or shard width is invalid.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: ShardsArgs, format: OutputFormat, _verbose: bool) -> anyhow::Result<()> {
    let interval: GenomicInterval = args.interval.parse()?;
    let width = ShardWidth::new(args.shard_width)?;

    let reference = ReferenceShard::for_interval(&interval, width)?;
    let variant = VariantShard::for_interval(&interval, width)?;

    match format {
        OutputFormat::Text => {
            println!("Interval: {interval} (shard width {width})");
            println!("   Reference shard: {reference}");
            println!(
                "   Variant shards: {}",
                variant
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "interval": interval.to_string(),
                "shard_width": width.get(),
                "reference_shard": reference,
                "variant_shards": variant,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("kind\tcontig\tshard_number");
            println!("reference\t{}\t{}", reference.contig(), reference.shard_number());
            for key in &variant {
                println!("variant\t{}\t{}", key.contig(), key.shard_number());
            }
        }
    }

    Ok(())
}
