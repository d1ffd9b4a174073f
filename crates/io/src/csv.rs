// Delimited text import/export

use std::path::Path;

use encoding_rs::Encoding;

/// Field delimiter of inventory exports.
pub const INVENTORY_DELIMITER: u8 = b';';

pub const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Read an inventory export: `;`-delimited, every record as wide as the first.
pub fn read_table(path: &Path, encoding: &'static Encoding) -> Result<Vec<Vec<String>>, String> {
    read_table_with_delimiter(path, encoding, INVENTORY_DELIMITER, false)
}

/// Read a recorded-equipment file. The delimiter is sniffed and records may
/// have any width; only the first cell of each record is of interest.
pub fn read_recorded_table(
    path: &Path,
    encoding: &'static Encoding,
) -> Result<Vec<Vec<String>>, String> {
    let content = read_file_decoded(path, encoding)?;
    parse_table(&content, sniff_delimiter(&content), true)
        .map_err(|e| format!("failed to read CSV file '{}': {e}", path.display()))
}

pub fn read_table_with_delimiter(
    path: &Path,
    encoding: &'static Encoding,
    delimiter: u8,
    flexible: bool,
) -> Result<Vec<Vec<String>>, String> {
    let content = read_file_decoded(path, encoding)?;
    parse_table(&content, delimiter, flexible)
        .map_err(|e| format!("failed to read CSV file '{}': {e}", path.display()))
}

/// Read a file and decode it. A leading byte-order mark is stripped.
pub fn read_file_decoded(path: &Path, encoding: &'static Encoding) -> Result<String, String> {
    let bytes = std::fs::read(path)
        .map_err(|e| format!("failed to open CSV file '{}': {e}", path.display()))?;
    let (decoded, _, _) = encoding.decode(&bytes);
    Ok(decoded.into_owned())
}

pub fn parse_table(content: &str, delimiter: u8, flexible: bool) -> Result<Vec<Vec<String>>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(flexible)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| e.to_string())?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Delimiters a scanner export may use, in order of preference on a tie.
const RECORDED_DELIMITERS: &[u8] = &[b';', b'\t', b',', b'|'];

/// Records inspected when sniffing.
const SNIFF_SAMPLE_RECORDS: usize = 10;

/// Pick the delimiter of a recorded-equipment file.
///
/// Scanner exports are ragged: most rows hold just the identifier, some carry
/// a free-text note or a timestamp after it. So the winner is the candidate
/// that splits the most sampled records, not the one with the most uniform
/// width. Quoted fields are honoured, so commas inside a quoted note do not
/// count for `,`. When nothing splits, the file is single-column and comma is
/// returned, which keeps each whole line in the first cell.
pub fn sniff_delimiter(content: &str) -> u8 {
    let mut best = b',';
    let mut best_split = 0usize;

    for &delim in RECORDED_DELIMITERS {
        let split = csv::ReaderBuilder::new()
            .delimiter(delim)
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes())
            .records()
            .take(SNIFF_SAMPLE_RECORDS)
            .filter_map(Result::ok)
            .filter(|record| record.len() > 1)
            .count();

        // Strictly greater: earlier candidates win ties.
        if split > best_split {
            best_split = split;
            best = delim;
        }
    }

    best
}

/// Prefix `bytes` with a UTF-8 byte-order mark unless one is already there.
pub fn prepend_bom(bytes: Vec<u8>) -> Vec<u8> {
    if bytes.starts_with(UTF8_BOM) {
        return bytes;
    }
    let mut out = Vec::with_capacity(bytes.len() + UTF8_BOM.len());
    out.extend_from_slice(UTF8_BOM);
    out.extend_from_slice(&bytes);
    out
}

/// Serialize `rows` as `;`-delimited UTF-8 text.
pub fn encode_table(rows: &[Vec<String>]) -> Result<Vec<u8>, String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(INVENTORY_DELIMITER)
        .terminator(csv::Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(Vec::new());

    for row in rows {
        writer
            .write_record(row)
            .map_err(|e| format!("failed to write into CSV file: {e}"))?;
    }

    writer
        .into_inner()
        .map_err(|e| format!("failed to write into CSV file: {e}"))
}

/// Write `rows` to `path` (created or truncated) with a UTF-8 byte-order mark,
/// which spreadsheet applications need to pick the right encoding.
pub fn write_table(path: &Path, rows: &[Vec<String>]) -> Result<(), String> {
    let bytes = prepend_bom(encode_table(rows)?);
    std::fs::write(path, bytes)
        .map_err(|e| format!("failed to write CSV file '{}': {e}", path.display()))
}
