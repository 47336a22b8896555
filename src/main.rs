use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use huffpack::Naming;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Suffix appended to compressed file names
    #[arg(long, global = true, default_value = ".huf")]
    suffix: String,

    /// Marker inserted into decompressed file names
    #[arg(long, global = true, default_value = "_unc")]
    marker: String,

    /// Print the bit string or decoded text to stdout
    #[arg(long, global = true)]
    print: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Compress FILE into FILE<suffix>
    Compress { file: PathBuf },
    /// Decompress FILE next to it, named after its first segment
    Decompress { file: PathBuf },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let default = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let naming = Naming {
        suffix: cli.suffix,
        marker: cli.marker,
    };

    let output = match &cli.command {
        Command::Compress { file } => huffpack::compress_with(file, &naming)
            .wrap_err_with(|| format!("failed to compress {}", file.display()))?,
        Command::Decompress { file } => huffpack::decompress_with(file, &naming)
            .wrap_err_with(|| format!("failed to decompress {}", file.display()))?,
    };

    if cli.print {
        println!("{output}");
    }

    Ok(())
}
