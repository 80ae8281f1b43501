// ============================================================
// LOGICAL LINE ASSEMBLER
// ============================================================
// Re-join physical lines that belong to one quoted field

use std::borrow::Cow;
use std::str::Split;

/// One logical CSV line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogicalLine<'a> {
    /// Balanced quotes; safe to tokenize
    Complete(Cow<'a, str>),
    /// Input ended while a quoted field was still open
    Unterminated(String),
}

/// Iterator over the logical lines of a CSV text.
///
/// A physical line with an odd number of quotes opens an accumulator; the
/// following physical lines are appended (joined with `\n`) until the
/// accumulated quote count is even again. A trailing `\r` is dropped from
/// every physical line.
pub struct LogicalLines<'a> {
    physical: Split<'a, char>,
}

impl<'a> LogicalLines<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            physical: text.split('\n'),
        }
    }
}

impl<'a> Iterator for LogicalLines<'a> {
    type Item = LogicalLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = strip_cr(self.physical.next()?);
        let mut quotes = count_quotes(first);
        if quotes % 2 == 0 {
            return Some(LogicalLine::Complete(Cow::Borrowed(first)));
        }

        let mut acc = first.to_string();
        for line in self.physical.by_ref() {
            let line = strip_cr(line);
            acc.push('\n');
            acc.push_str(line);
            quotes += count_quotes(line);
            if quotes % 2 == 0 {
                return Some(LogicalLine::Complete(Cow::Owned(acc)));
            }
        }

        Some(LogicalLine::Unterminated(acc))
    }
}

fn strip_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

fn count_quotes(line: &str) -> usize {
    line.bytes().filter(|&b| b == b'"').count()
}
