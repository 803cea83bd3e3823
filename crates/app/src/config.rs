//! Configuration for the huffman command line tool.
//!
//! Arguments are parsed with clap and resolved into a [`Config`] with every
//! default filled in, so a run can be repeated from its printed configuration.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing::Level;

#[derive(Debug, Parser)]
#[command(name = "huffman", version, about = "Static Huffman coding of files")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print coding statistics after the run
    #[arg(long, global = true)]
    pub print_stats: bool,

    /// Print the resolved configuration before running
    #[arg(long, global = true)]
    pub print_config: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Encode a file
    Encode {
        input: PathBuf,
        /// Defaults to encoded.huf, or encoded.txt with --format text
        output: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Format::Binary)]
        format: Format,
        /// Print the code table to stdout
        #[arg(long)]
        print_table: bool,
    },
    /// Decode a file written by `encode`
    Decode {
        input: PathBuf,
        /// Defaults to decoded.txt
        output: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Format::Binary)]
        format: Format,
    },
    /// Round-trip generated sample data through both formats
    Demo {
        /// Seed for the sample generator (default: derived from the clock)
        #[arg(long)]
        seed: Option<u64>,
        /// Sample size in bytes
        #[arg(long, default_value_t = 64 * 1024)]
        size: usize,
    },
}

/// On-disk representation of a code table and encoded stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Checksummed binary container
    Binary,
    /// Text listing with one codeword per line and the bits as 0/1 characters
    Text,
}

/// What a run does, with all paths resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Encode {
        input: PathBuf,
        output: PathBuf,
        format: Format,
        print_table: bool,
    },
    Decode {
        input: PathBuf,
        output: PathBuf,
        format: Format,
    },
    Demo {
        seed: u64,
        size: usize,
    },
}

/// Complete configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    pub action: Action,
    pub verbosity: u8,
    pub print_stats: bool,
    pub print_config: bool,
}

impl Config {
    /// Resolve parsed arguments, filling in default paths and the demo seed.
    pub fn from_cli(cli: Cli) -> Self {
        let action = match cli.command {
            Command::Encode {
                input,
                output,
                format,
                print_table,
            } => Action::Encode {
                input,
                output: output.unwrap_or_else(|| default_encoded_path(format)),
                format,
                print_table,
            },
            Command::Decode {
                input,
                output,
                format,
            } => Action::Decode {
                input,
                output: output.unwrap_or_else(|| PathBuf::from("decoded.txt")),
                format,
            },
            Command::Demo { seed, size } => Action::Demo {
                seed: seed.unwrap_or_else(clock_seed),
                size,
            },
        };

        Self {
            action,
            verbosity: cli.verbose,
            print_stats: cli.print_stats,
            print_config: cli.print_config,
        }
    }

    /// Maximum level for the log subscriber.
    pub fn log_level(&self) -> Level {
        match self.verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        match &self.action {
            Action::Encode {
                input,
                output,
                format,
                print_table,
            } => {
                println!("Mode:        encode");
                println!("Input file:  {}", input.display());
                println!("Output file: {}", output.display());
                println!("Format:      {format:?}");
                println!("Print table: {print_table}");
            }
            Action::Decode {
                input,
                output,
                format,
            } => {
                println!("Mode:        decode");
                println!("Input file:  {}", input.display());
                println!("Output file: {}", output.display());
                println!("Format:      {format:?}");
            }
            Action::Demo { seed, size } => {
                println!("Mode:        demo");
                println!("Seed:        {seed}");
                println!("Sample size: {size} bytes ({} KiB)", size / 1024);
            }
        }
        println!("Log level:   {}", self.log_level());
        println!();
    }
}

fn default_encoded_path(format: Format) -> PathBuf {
    match format {
        Format::Binary => PathBuf::from("encoded.huf"),
        Format::Text => PathBuf::from("encoded.txt"),
    }
}

fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
