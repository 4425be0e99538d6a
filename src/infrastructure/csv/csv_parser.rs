// ============================================================
// CSV PARSER
// ============================================================
// Line-oriented CSV tokenizer with byte decoding

use encoding_rs::{Encoding, WINDOWS_1252};

use crate::domain::csv::{Row, Table};

/// Decode raw CSV bytes.
///
/// A byte-order mark picks the encoding (and is dropped). Without one the bytes
/// are read as UTF-8, falling back to Windows-1252 when they are not valid UTF-8.
pub fn decode_bytes(bytes: &[u8]) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (content, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return content.into_owned();
    }

    match std::str::from_utf8(bytes) {
        Ok(content) => content.to_string(),
        Err(_) => {
            let (content, _, _) = WINDOWS_1252.decode(bytes);
            content.into_owned()
        }
    }
}

/// Split one CSV line into trimmed cells.
///
/// Commas inside double quotes do not split. Inside quotes, `""` is a literal
/// quote. An unterminated quote simply runs to the end of the line.
/// Always yields at least one cell.
pub fn parse_row(line: &str) -> Row {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }

    cells.push(current.trim().to_string());
    cells
}

/// Parse a whole CSV document: first line is the header row, the rest are data.
///
/// Lines that parse to a single empty cell (blank lines) are dropped; every
/// other line is kept whatever its cell count.
pub fn parse_table(content: &str) -> Table {
    let content = content.trim();
    if content.is_empty() {
        return Table::default();
    }

    let mut lines = content.split('\n');
    let headers = lines.next().map(parse_row).unwrap_or_default();
    let rows = lines
        .map(parse_row)
        .filter(|row| !is_blank_row(row))
        .collect();

    Table::new(headers, rows)
}

fn is_blank_row(row: &Row) -> bool {
    row.len() == 1 && row[0].is_empty()
}
