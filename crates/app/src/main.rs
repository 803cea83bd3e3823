//! huffman: encode and decode files with a static Huffman code.
//!
//! This binary only moves bytes between files and the `huffman-core` engine;
//! all coding happens in the library.

mod config;
mod input_gen;

use std::fs;
use std::path::Path;

use clap::Parser;
use color_eyre::eyre::{ensure, WrapErr};
use huffman_core::{
    framing::{self, parse_container, serialize_container},
    huffman::{build_code_from_frequencies, decode, encode, CodeTable, FrequencyTable},
    listing::{parse_listing, write_listing},
    metrics::CodingStats,
};
use tracing::info;

use crate::config::{Action, Cli, Config, Format};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let config = Config::from_cli(Cli::parse());

    tracing_subscriber::fmt()
        .with_max_level(config.log_level())
        .with_writer(std::io::stderr)
        .init();

    if config.print_config {
        config.print();
    }

    match &config.action {
        Action::Encode {
            input,
            output,
            format,
            print_table,
        } => encode_file(&config, input, output, *format, *print_table),
        Action::Decode {
            input,
            output,
            format,
        } => decode_file(input, output, *format),
        Action::Demo { seed, size } => run_demo(&config, *seed, *size),
    }
}

fn encode_file(
    config: &Config,
    input: &Path,
    output: &Path,
    format: Format,
    print_table: bool,
) -> color_eyre::Result<()> {
    let data = fs::read(input).wrap_err_with(|| format!("reading {}", input.display()))?;
    let mut stats = CodingStats::new();

    let freqs = FrequencyTable::from_bytes(&data);
    let table = build_code_from_frequencies(&freqs)?;
    let stream = encode(&data, &table)?;
    stats.record(&freqs, &table, &stream);

    let encoded = match format {
        Format::Binary => {
            let raw_len = u32::try_from(data.len()).wrap_err("input larger than 4 GiB")?;
            serialize_container(raw_len, &table, &stream)
        }
        Format::Text => write_listing(&freqs, &table, &stream).into_bytes(),
    };
    stats.container_bytes = encoded.len() as u64;
    fs::write(output, &encoded).wrap_err_with(|| format!("writing {}", output.display()))?;
    stats.complete();

    info!(
        input = %input.display(),
        output = %output.display(),
        bytes = data.len(),
        encoded = encoded.len(),
        "encoded file"
    );

    if print_table {
        print_code_table(&freqs, &table);
    }
    if config.print_stats {
        stats.print_summary();
    }
    Ok(())
}

fn decode_file(input: &Path, output: &Path, format: Format) -> color_eyre::Result<()> {
    let data = match format {
        Format::Binary => {
            let bytes = fs::read(input).wrap_err_with(|| format!("reading {}", input.display()))?;
            let container = parse_container(&bytes)?;
            framing::decompress(&container)?
        }
        Format::Text => {
            let text = fs::read_to_string(input)
                .wrap_err_with(|| format!("reading {}", input.display()))?;
            let (table, stream) = parse_listing(&text)?;
            decode(&stream, &table)?
        }
    };
    fs::write(output, &data).wrap_err_with(|| format!("writing {}", output.display()))?;

    info!(
        input = %input.display(),
        output = %output.display(),
        bytes = data.len(),
        "decoded file"
    );
    Ok(())
}

/// Round-trip generated sample data through both formats and verify it.
fn run_demo(config: &Config, seed: u64, size: usize) -> color_eyre::Result<()> {
    println!("Generating {size} bytes of sample data (seed {seed})");
    let data = input_gen::generate_sample_data(seed, size);

    let mut stats = CodingStats::new();
    let freqs = FrequencyTable::from_bytes(&data);
    let table = build_code_from_frequencies(&freqs)?;
    let stream = encode(&data, &table)?;
    stats.record(&freqs, &table, &stream);

    let container = framing::compress(&data)?;
    stats.container_bytes = container.len() as u64;
    let restored = framing::decompress(&parse_container(&container)?)?;
    ensure!(restored == data, "binary container round trip changed the data");

    let listing = write_listing(&freqs, &table, &stream);
    let (listed_table, listed_stream) = parse_listing(&listing)?;
    ensure!(
        decode(&listed_stream, &listed_table)? == data,
        "text listing round trip changed the data"
    );
    stats.complete();

    println!(
        "Round trip OK: {} bytes -> {} byte container, {} byte listing",
        data.len(),
        container.len(),
        listing.len()
    );
    if config.print_stats {
        stats.print_summary();
    }
    Ok(())
}

/// Print the table like the listing does, with counts and readable symbols.
fn print_code_table(freqs: &FrequencyTable, table: &CodeTable) {
    println!("{}", table.len());
    for symbol in freqs.by_descending_weight() {
        let Some(code) = table.get(symbol.byte) else {
            continue;
        };
        println!(
            "{}\t{}\t{:.6}\t{}",
            std::ascii::escape_default(symbol.byte),
            symbol.count,
            symbol.probability(freqs.total()),
            code
        );
    }
}
