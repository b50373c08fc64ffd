//! txtview - Entry Point

use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use txtview::model::{AppError, TextEncoding};

/// txtview - read large text files in the terminal
#[derive(Parser, Debug)]
#[command(name = "txtview")]
#[command(version)]
#[command(about = "Terminal reader for large text files with chunked indexing and saved positions")]
pub struct Args {
    /// Path to text file (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Encoding label (utf-8, gbk, big5, utf-16le, utf-16be, ...); disables detection
    #[arg(short, long)]
    pub encoding: Option<TextEncoding>,

    /// Start at specific line number (must be positive); wins over a saved position
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub line: Option<u32>,

    /// Bytes read per indexing chunk
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub chunk_size: Option<u64>,

    /// Do not restore the saved reading position
    #[arg(long)]
    pub no_restore: bool,

    /// Open files without a text extension
    #[arg(long)]
    pub any_file: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Load configuration with full precedence chain:
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = txtview::config::load_config_with_precedence(args.config.clone())?;
        let merged = txtview::config::merge_config(config_file)?;
        let with_env = txtview::config::apply_env_overrides(merged)?;
        txtview::config::apply_cli_overrides(with_env, args.encoding, args.chunk_size, args.no_restore)
    };

    txtview::logging::init(&config.log_file_path)?;

    info!(
        config = ?config,
        "Configuration loaded and resolved"
    );

    let input_source = txtview::source::detect_input_source(args.file.clone(), args.any_file)?;

    let start_line = args.line.map(|line| line as usize);
    txtview::view::run_with_source(input_source, &config, start_line)?;

    Ok(())
}
