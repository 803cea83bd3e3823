//! Coding statistics.
//!
//! Records how well a code compressed one input: sizes, code lengths,
//! the entropy bound for the observed frequencies, and timing.
//!
//! # Thread Safety
//!
//! `CodingStats` is plain data, filled in by the single operation it
//! describes. Concurrent encodes each keep their own.

use std::time::{Duration, Instant};

use crate::huffman::{CodeTable, EncodedStream, FrequencyTable};

/// Statistics for one encode or decode run.
#[derive(Debug, Clone)]
pub struct CodingStats {
    // === Timing ===
    pub start_time: Instant,

    /// Set by [`CodingStats::complete`]
    pub end_time: Option<Instant>,

    // === Input ===
    /// Number of input symbols (bytes)
    pub input_bytes: u64,

    /// Distinct byte values in the input
    pub distinct_symbols: usize,

    /// Sum over symbols of count * codeword length
    pub weighted_code_bits: u64,

    /// Shannon entropy of the input, in bits per symbol
    pub entropy_bits_per_symbol: f64,

    // === Output ===
    /// Valid bits in the encoded stream
    pub encoded_bits: u64,

    /// Bytes of the persisted container (table + stream + header)
    pub container_bytes: u64,
}

impl CodingStats {
    /// Create empty stats with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            input_bytes: 0,
            distinct_symbols: 0,
            weighted_code_bits: 0,
            entropy_bits_per_symbol: 0.0,
            encoded_bits: 0,
            container_bytes: 0,
        }
    }

    /// Fill in everything derivable from the frequencies, table and stream.
    pub fn record(&mut self, freqs: &FrequencyTable, table: &CodeTable, stream: &EncodedStream) {
        self.input_bytes = freqs.total();
        self.distinct_symbols = freqs.distinct();
        self.weighted_code_bits = freqs
            .symbols()
            .map(|s| s.count * table.get(s.byte).map_or(0, |c| c.len() as u64))
            .sum();
        self.entropy_bits_per_symbol = entropy(freqs);
        self.encoded_bits = stream.bit_len() as u64;
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Container size relative to the input (container / raw).
    ///
    /// Returns 0.0 if the input was empty.
    pub fn compression_ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.container_bytes as f64 / self.input_bytes as f64
        }
    }

    /// Mean codeword length in bits per input symbol.
    pub fn average_code_length(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.weighted_code_bits as f64 / self.input_bytes as f64
        }
    }

    /// Entropy divided by average code length, 1.0 for a perfect code.
    pub fn efficiency(&self) -> f64 {
        let average = self.average_code_length();
        if average == 0.0 {
            0.0
        } else {
            self.entropy_bits_per_symbol / average
        }
    }

    /// Input bytes per second.
    pub fn throughput_bps(&self) -> f64 {
        let duration_secs = self.duration().as_secs_f64();
        if duration_secs == 0.0 {
            0.0
        } else {
            self.input_bytes as f64 / duration_secs
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Coding Summary ===");
        println!("Duration: {} ms", self.duration().as_millis());
        println!();
        println!("Input: {} bytes, {} distinct symbols", self.input_bytes, self.distinct_symbols);
        println!("Encoded: {} bits ({} bytes)", self.encoded_bits, self.encoded_bits.div_ceil(8));
        println!("Container: {} bytes", self.container_bytes);
        println!("Ratio: {:.1}%", self.compression_ratio() * 100.0);
        println!();
        println!("=== Code ===");
        println!("Average code length: {:.4} bits/symbol", self.average_code_length());
        println!("Entropy: {:.4} bits/symbol", self.entropy_bits_per_symbol);
        println!("Efficiency: {:.2}%", self.efficiency() * 100.0);
        println!();
        println!("Throughput: {:.2} MB/s", self.throughput_bps() / 1_000_000.0);
    }

    /// Export stats as `key=value` lines (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             input_bytes={}\n\
             distinct_symbols={}\n\
             encoded_bits={}\n\
             container_bytes={}\n\
             compression_ratio={:.4}\n\
             average_code_length={:.4}\n\
             entropy_bits_per_symbol={:.4}\n",
            self.duration().as_millis(),
            self.input_bytes,
            self.distinct_symbols,
            self.encoded_bits,
            self.container_bytes,
            self.compression_ratio(),
            self.average_code_length(),
            self.entropy_bits_per_symbol,
        )
    }
}

impl Default for CodingStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Shannon entropy of the byte distribution, in bits per symbol.
pub fn entropy(freqs: &FrequencyTable) -> f64 {
    let total = freqs.total();
    freqs
        .symbols()
        .map(|s| s.probability(total))
        .map(|p| -p * p.log2())
        .sum()
}
