// src/process/mod.rs
pub mod csv;
pub mod normalize;

pub use self::csv::{format_record, parse, quote_field, render_table, tokenize, RawRow};
pub use normalize::{
    format_timestamp, normalize, normalize_at, normalize_row, to_grade_number, CbcMeta, Entry,
    Meta, OutputDocument,
};
