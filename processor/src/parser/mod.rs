//! CSV loader with encoding and delimiter auto-detection.
//!
//! Reads the award data file into a [`RecordTable`]. Empty fields become
//! `Null`; nothing else is coerced.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::error::{LoadError, LoadResult};
use crate::models::{Record, RecordTable};

/// Bytes sniffed for encoding detection. The full SBIR export is ~65 MB.
const ENCODING_SAMPLE_SIZE: usize = 256 * 1024;

const UTF8_BOM: char = '\u{feff}';

/// A loaded table with the settings used to read it
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: RecordTable,
    /// Detected encoding
    pub encoding: String,
    /// Detected or forced delimiter
    pub delimiter: char,
}

/// Detect the encoding of a leading sample using chardet.
///
/// A sample that stops inside a multibyte UTF-8 character is cut back to the
/// last complete one, so the cut alone never makes UTF-8 look like Latin-1.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let mut sample = &bytes[..bytes.len().min(ENCODING_SAMPLE_SIZE)];
    if let Err(e) = std::str::from_utf8(sample) {
        if e.error_len().is_none() {
            sample = &sample[..e.valid_up_to()];
        }
    }
    let charset = chardet::detect(sample).0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes with the given encoding.
///
/// Input that is valid UTF-8 as a whole is always read as UTF-8, whatever
/// the sniffed encoding. Otherwise Latin-1 and UTF-8 guesses decode as
/// Windows-1252 and other encodings are looked up by label.
pub fn decode_content(bytes: &[u8], encoding: &str) -> LoadResult<String> {
    let text = match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => match encoding.to_lowercase().as_str() {
            "utf-8" | "utf8" | "ascii" | "iso-8859-1" | "latin-1" | "latin1"
            | "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
            other => encoding_rs::Encoding::for_label(other.as_bytes())
                .map(|enc| enc.decode(bytes).0.into_owned())
                .ok_or_else(|| LoadError::Encoding(other.to_string()))?,
        },
    };

    Ok(match text.strip_prefix(UTF8_BOM) {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

/// Pick the separator that occurs most often in the header line.
/// Falls back to a comma.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse delimited text into a table.
///
/// Short rows are padded with `Null`. A row with more fields than the
/// header is an error.
pub fn parse_table(content: &str, delimiter: char) -> LoadResult<RecordTable> {
    if content.trim().is_empty() {
        return Err(LoadError::EmptyFile);
    }

    let delimiter = u8::try_from(delimiter).map_err(|_| LoadError::Parse {
        line: 1,
        message: format!("Delimiter '{}' is not a single-byte character", delimiter),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_parse_error(&e, 1))?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::NoHeaders);
    }
    let headers = dedup_headers(headers);

    let mut rows = Vec::new();
    for (label, result) in reader.records().enumerate() {
        let record = result.map_err(|e| csv_parse_error(&e, label as u64 + 2))?;

        if record.len() > headers.len() {
            let line = record.position().map(|p| p.line()).unwrap_or(label as u64 + 2);
            return Err(LoadError::Parse {
                line,
                message: format!("Expected {} fields, saw {}", headers.len(), record.len()),
            });
        }

        let values = record.iter().map(to_cell).collect();
        rows.push(Record::new(label, values));
    }

    Ok(RecordTable::new(headers, rows))
}

/// Rename repeated headers to `name.1`, `name.2`, ... so every column name
/// is unique, the way pandas does. A generated name that is already taken
/// gets its own suffix (`a`, `a.1`, `a` becomes `a`, `a.1`, `a.1.1`).
pub fn dedup_headers(headers: Vec<String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(headers.len());

    for header in headers {
        let mut name = header;
        let mut count = counts.get(&name).copied().unwrap_or(0);
        while count > 0 {
            counts.insert(name.clone(), count + 1);
            name = format!("{}.{}", name, count);
            count = counts.get(&name).copied().unwrap_or(0);
        }
        counts.insert(name.clone(), count + 1);
        out.push(name);
    }

    out
}

fn to_cell(field: &str) -> Value {
    if field.is_empty() {
        Value::Null
    } else {
        Value::String(field.to_string())
    }
}

fn csv_parse_error(err: &csv::Error, fallback_line: u64) -> LoadError {
    let line = err.position().map(|p| p.line()).unwrap_or(fallback_line);
    LoadError::Parse {
        line,
        message: err.to_string(),
    }
}

/// Load raw bytes, detecting encoding and (unless forced) the delimiter.
pub fn load_bytes(bytes: &[u8], delimiter: Option<char>) -> LoadResult<LoadedTable> {
    if bytes.is_empty() {
        return Err(LoadError::EmptyFile);
    }

    let encoding = if std::str::from_utf8(bytes).is_ok() {
        "utf-8".to_string()
    } else {
        detect_encoding(bytes)
    };
    let content = decode_content(bytes, &encoding)?;
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(&content));
    let table = parse_table(&content, delimiter)?;

    Ok(LoadedTable {
        table,
        encoding,
        delimiter,
    })
}

/// Load a CSV file from disk.
///
/// # Example
/// ```ignore
/// let loaded = load_file("award_data_no_abstract.csv", None)?;
/// println!("{} rows, delimiter '{}'", loaded.table.len(), loaded.delimiter);
/// ```
pub fn load_file<P: AsRef<Path>>(path: P, delimiter: Option<char>) -> LoadResult<LoadedTable> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_bytes(&bytes, delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_simple_csv() {
        let table = parse_table("Program,State\nSBIR,CA\nSTTR,NY\n", ',').unwrap();

        assert_eq!(table.columns(), &["Program".to_string(), "State".to_string()]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0, "Program"), Some(&json!("SBIR")));
        assert_eq!(table.get(1, "State"), Some(&json!("NY")));
    }

    #[test]
    fn test_quoted_values_keep_commas() {
        let csv = "Company,State\n\"Acme, Inc.\",CA\n";
        let table = parse_table(csv, ',').unwrap();
        assert_eq!(table.get(0, "Company"), Some(&json!("Acme, Inc.")));
    }

    #[test]
    fn test_empty_field_is_null() {
        let table = parse_table("a,b,c\n1,,3\n", ',').unwrap();
        assert_eq!(table.get(0, "b"), Some(&Value::Null));
    }

    #[test]
    fn test_values_are_not_trimmed_or_coerced() {
        let table = parse_table("Zip,Amount\n 92128 ,0150000.00\n", ',').unwrap();
        assert_eq!(table.get(0, "Zip"), Some(&json!(" 92128 ")));
        assert_eq!(table.get(0, "Amount"), Some(&json!("0150000.00")));
    }

    #[test]
    fn test_short_row_padded() {
        let table = parse_table("a,b,c\n1,2\n", ',').unwrap();
        assert_eq!(table.get(0, "c"), Some(&Value::Null));
    }

    #[test]
    fn test_long_row_is_error() {
        let err = parse_table("a,b\n1,2\n1,2,3\n", ',').unwrap_err();
        match err {
            LoadError::Parse { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("Expected 2 fields, saw 3"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_row_labels_are_input_positions() {
        let table = parse_table("a\n1\n2\n3\n", ',').unwrap();
        let labels: Vec<usize> = table.rows().iter().map(|r| r.label).collect();
        assert_eq!(labels, vec![0, 1, 2]);
    }

    #[test]
    fn test_repeated_headers_are_renamed() {
        let table = parse_table("Duns,Program,Duns,Duns\nA,SBIR,B,C\n", ',').unwrap();
        assert_eq!(
            table.columns(),
            &["Duns", "Program", "Duns.1", "Duns.2"].map(String::from)
        );
        assert_eq!(table.get(0, "Duns.1"), Some(&json!("B")));
    }

    #[test]
    fn test_dedup_skips_taken_names() {
        let headers = ["a", "a.1", "a"].map(String::from).to_vec();
        assert_eq!(dedup_headers(headers), ["a", "a.1", "a.1.1"].map(String::from).to_vec());
    }

    #[test]
    fn test_empty_input_error() {
        assert!(matches!(parse_table("", ','), Err(LoadError::EmptyFile)));
        assert!(matches!(load_bytes(b"", None), Err(LoadError::EmptyFile)));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
        assert_eq!(detect_delimiter("single\n1"), ',');
    }

    #[test]
    fn test_bom_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"Program,State\nSBIR,CA\n");
        let loaded = load_bytes(&bytes, None).unwrap();
        assert_eq!(loaded.table.columns()[0], "Program");
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_utf8_char_across_sample_cut() {
        let header = "Company,State\n";
        let pad = ENCODING_SAMPLE_SIZE - 1 - header.len() - ",CA\n".len() - "Soci".len();
        let content = format!("{}{},CA\nSoci\u{e9}t\u{e9},CA\n", header, "x".repeat(pad));
        // The first byte of "é" is the last byte of the sniffed sample.
        let cut = content.find('\u{e9}').unwrap();
        assert_eq!(cut, ENCODING_SAMPLE_SIZE - 1);

        assert_eq!(detect_encoding(content.as_bytes()), "utf-8");
        let loaded = load_bytes(content.as_bytes(), None).unwrap();
        assert_eq!(loaded.encoding, "utf-8");
        let last = loaded.table.len() - 1;
        assert_eq!(loaded.table.get(last, "Company"), Some(&json!("Société")));
    }

    #[test]
    fn test_valid_utf8_ignores_latin1_guess() {
        let decoded = decode_content("Société".as_bytes(), "iso-8859-1").unwrap();
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_invalid_utf8_falls_back() {
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "utf-8").unwrap();
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_file("/definitely/not/here.csv", None).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }
}
