use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use seamflip::{Config, RunOptions, UnterminatedBlockPolicy};

#[derive(Parser)]
#[command(
    name = "seamflip",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")"),
    about = "Reverse the direction of perimeter blocks in slicer G-code"
)]
struct Cli {
    /// G-code file to rewrite (in place by default)
    input: PathBuf,

    /// Write the result here instead of replacing INPUT
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Settings file (.toml or .json)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Process and report statistics without writing
    #[arg(long)]
    dry_run: bool,

    /// Override the unterminated-block policy (pass-through|drop|reverse)
    #[arg(long, value_name = "POLICY")]
    unterminated: Option<UnterminatedBlockPolicy>,

    /// Also track machine state between objects
    #[arg(long)]
    track_outside_objects: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    seamflip::init_logging()?;

    let mut config = Config::load_or_default(cli.config.as_deref()).context("loading settings")?;
    if let Some(policy) = cli.unterminated {
        config.processing.unterminated_block = policy;
    }
    if cli.track_outside_objects {
        config.processing.track_outside_objects = true;
    }
    config.validate().context("validating settings")?;

    let options = RunOptions {
        input: cli.input,
        output: cli.output,
        dry_run: cli.dry_run,
        config,
    };
    let summary = seamflip::run(&options)
        .with_context(|| format!("processing {}", options.input.display()))?;

    let note = if summary.written {
        ""
    } else {
        " (dry run, nothing written)"
    };
    println!(
        "Processed {}: {} perimeter blocks reversed{}",
        options.input.display(),
        summary.stats.blocks_reversed,
        note
    );
    Ok(())
}
