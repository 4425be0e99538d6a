// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Byte decoding and line tokenizing

mod csv_parser;

pub use csv_parser::{decode_bytes, parse_table};
