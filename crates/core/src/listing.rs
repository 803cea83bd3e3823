//! Human-readable text listing of a code table and encoded stream.
//!
//! # Listing Format
//!
//! ```text
//! 4
//! 61	0.555556	1
//! 62	0.222222	01
//! 63	0.111111	001
//! 64	0.111111	000
//!
//! 101001000
//! ```
//!
//! The first line is the number of table entries. Each entry line holds the
//! symbol as two hex digits, its probability and its codeword, separated by
//! tabs, ordered by descending probability. A blank line separates the table
//! from the encoded bits, written as `0`/`1` characters on one line.
//!
//! Probabilities are informational. The parser ignores them and loads the
//! codewords verbatim.

use std::fmt::Write;

use crate::error::{FramingError, Result};
use crate::huffman::{CodeTable, Codeword, EncodedStream, FrequencyTable};

/// One entry per byte value at most.
const MAX_ENTRIES: usize = 256;

/// Render `table` and `stream` as a listing, with probabilities from `freqs`.
pub fn write_listing(freqs: &FrequencyTable, table: &CodeTable, stream: &EncodedStream) -> String {
    let mut out = String::with_capacity(16 * table.len() + stream.bit_len() + 8);
    // writing into a String cannot fail
    let _ = writeln!(out, "{}", table.len());
    for symbol in freqs.by_descending_weight() {
        if let Some(code) = table.get(symbol.byte) {
            let _ = writeln!(
                out,
                "{:02x}\t{:.6}\t{}",
                symbol.byte,
                symbol.probability(freqs.total()),
                code
            );
        }
    }
    // entries the frequency table doesn't know about still have to round-trip
    for (byte, code) in table.iter().filter(|(b, _)| freqs.count(*b) == 0) {
        let _ = writeln!(out, "{:02x}\t{:.6}\t{}", byte, 0.0, code);
    }
    out.push('\n');
    out.push_str(&stream.to_bit_string());
    out.push('\n');
    out
}

/// Parse a listing written by [`write_listing`].
///
/// # Errors
/// - `FramingError::MalformedListing` on any syntax error
/// - `HuffmanError::CorruptTable` if the codewords are not prefix-free
pub fn parse_listing(text: &str) -> Result<(CodeTable, EncodedStream)> {
    let mut lines = text.lines().enumerate().map(|(i, line)| (i + 1, line));

    let (line_no, header) = lines.next().ok_or_else(|| malformed(1, "missing entry count"))?;
    let count: usize = header
        .trim()
        .parse()
        .map_err(|_| malformed(line_no, format!("invalid entry count {header:?}")))?;
    if count > MAX_ENTRIES {
        return Err(malformed(
            line_no,
            format!("entry count {count} exceeds {MAX_ENTRIES}"),
        ));
    }

    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        let (line_no, line) = lines
            .next()
            .ok_or_else(|| malformed(line_no + entries.len() + 1, "missing table entry"))?;
        entries.push(parse_entry(line_no, line)?);
    }

    match lines.next() {
        Some((_, "")) => {}
        Some((line_no, _)) => return Err(malformed(line_no, "expected blank line after table")),
        None => return Err(malformed(count + 2, "missing blank line after table")),
    }

    let (bits_line, bits) = lines.next().unwrap_or((count + 3, ""));
    let stream = Codeword::parse(bits.trim_end())
        .map(|c| EncodedStream::from_bits(c.bits().iter().copied()))
        .ok_or_else(|| malformed(bits_line, "encoded bits must be 0 or 1"))?;

    if let Some((line_no, extra)) = lines.find(|(_, l)| !l.trim().is_empty()) {
        return Err(malformed(line_no, format!("unexpected trailing content {extra:?}")));
    }

    Ok((CodeTable::from_entries(entries)?, stream))
}

fn parse_entry(line_no: usize, line: &str) -> Result<(u8, Codeword)> {
    let mut fields = line.split('\t');
    let (Some(symbol), Some(probability), Some(code), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(malformed(line_no, "expected symbol, probability and codeword"));
    };

    let symbol = u8::from_str_radix(symbol, 16)
        .map_err(|_| malformed(line_no, format!("invalid symbol {symbol:?}")))?;
    probability
        .parse::<f64>()
        .map_err(|_| malformed(line_no, format!("invalid probability {probability:?}")))?;
    let code = Codeword::parse(code)
        .ok_or_else(|| malformed(line_no, format!("invalid codeword {code:?}")))?;
    Ok((symbol, code))
}

fn malformed(line: usize, reason: impl Into<String>) -> crate::error::Error {
    FramingError::MalformedListing {
        line,
        reason: reason.into(),
    }
    .into()
}
