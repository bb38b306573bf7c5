//! # seamflip
//!
//! Reverses the traversal direction of the perimeter blocks in slicer-generated G-code,
//! moving the visible seam without touching anything else in the program.
//!
//! ## Architecture
//!
//! seamflip is organized as a workspace with multiple crates:
//!
//! 1. **seamflip-core** - Movement model, numeric parsing, marker vocabulary
//! 2. **seamflip-processor** - Stream segmentation, block reversal, line synthesis
//! 3. **seamflip-settings** - Settings file loading and validation
//! 4. **seamflip** - File handling, logging and the command line binary

pub mod error;
pub mod file_io;

use std::path::PathBuf;

pub use error::{FileError, FileResult};
pub use file_io::{write_atomic, GcodeFile, SourceLine, SourceText};
pub use seamflip_processor::{process_lines, ReversalStats};
pub use seamflip_settings::{Config, OutputSettings, ProcessingOptions, UnterminatedBlockPolicy};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Reads `RUST_LOG`, defaulting to `warn`. Output goes to stderr so stdout only
/// carries the run summary.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

/// One rewrite of one file
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// File to read
    pub input: PathBuf,
    /// Where to write; `None` replaces `input`
    pub output: Option<PathBuf>,
    /// Process and report without writing anything
    pub dry_run: bool,
    /// Effective settings
    pub config: Config,
}

impl RunOptions {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            dry_run: false,
            config: Config::default(),
        }
    }

    /// Path the result goes to
    pub fn target(&self) -> &PathBuf {
        self.output.as_ref().unwrap_or(&self.input)
    }
}

/// Outcome of [`run`]
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub stats: ReversalStats,
    pub output_path: PathBuf,
    /// Whether `output_path` was written
    pub written: bool,
}

/// Read `options.input`, reverse its perimeter blocks and write the result.
///
/// Nothing is written before the whole input has been processed, and the target is
/// only ever replaced by a rename. Lines that are not rewritten keep their exact
/// original bytes and line endings.
pub fn run(options: &RunOptions) -> FileResult<RunSummary> {
    let file = GcodeFile::open(&options.input)?;
    tracing::debug!(
        "reading {} ({} bytes)",
        file.path().display(),
        file.file_size()
    );
    let source = file.read_source()?;

    let output = process_lines(source.texts(), options.config.processing);
    let stats = output.stats;
    tracing::info!(
        lines_read = stats.lines_read,
        lines_written = stats.lines_written,
        blocks_reversed = stats.blocks_reversed,
        blocks_unchanged = stats.blocks_unchanged,
        "processed {}",
        file.path().display()
    );

    let output_path = options.target().clone();
    if options.dry_run {
        return Ok(RunSummary {
            stats,
            output_path,
            written: false,
        });
    }

    let contents = source.render(&output.lines, &output.sources);
    write_atomic(&output_path, &contents, &options.config.output)?;
    tracing::info!("wrote {}", output_path.display());

    Ok(RunSummary {
        stats,
        output_path,
        written: true,
    })
}
