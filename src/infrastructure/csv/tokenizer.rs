// ============================================================
// CSV LINE TOKENIZER
// ============================================================
// Split one logical CSV line into fields

use std::mem::take;

/// Split one logical line into fields using a comma separator.
///
/// The line must already be assembled (see `LogicalLines`): a quoted field
/// that never closes swallows the rest of the line.
pub fn tokenize_line(line: &str) -> Vec<String> {
    tokenize_with(line, ',')
}

/// Split one logical line into fields.
///
/// Single left-to-right scan. Inside a quoted field `""` yields one literal
/// quote; any other quote toggles the quoted state and is dropped, so the
/// enclosing quotes never reach the field. Each field is trimmed.
pub fn tokenize_with(line: &str, sep: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes && matches!(chars.peek(), Some('"')) {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = !in_quotes;
                }
            }
            c if c == sep && !in_quotes => fields.push(finish_field(&take(&mut field))),
            _ => field.push(ch),
        }
    }

    fields.push(finish_field(&field));
    fields
}

fn finish_field(raw: &str) -> String {
    raw.trim().to_string()
}
