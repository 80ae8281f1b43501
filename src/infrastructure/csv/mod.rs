// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Logical-line assembly, tokenizing and record parsing

mod csv_parser;
mod line_assembler;
mod tokenizer;

pub use csv_parser::CsvParser;
pub use line_assembler::{LogicalLine, LogicalLines};
pub use tokenizer::{tokenize_line, tokenize_with};
