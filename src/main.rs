use clap::Parser;
use tracing_subscriber::EnvFilter;

use read_context::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("read_context=debug,info")
    } else {
        EnvFilter::new("read_context=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Annotate(args) => {
            cli::annotate::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Shards(args) => {
            cli::shards::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
