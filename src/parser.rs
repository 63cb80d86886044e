use std::collections::VecDeque;
use std::io::{Cursor, Read};

use csv::{Position, ReaderBuilder, StringRecord};

use crate::error::{FilterError, Result};

/// Field delimiter shared by both datasets
pub const DELIMITER: u8 = b';';

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A single dataset row with position tracking
#[derive(Debug, Clone)]
pub struct Row {
    pub line: u64,
    record: StringRecord,
}

impl Row {
    /// A blank line, which has no fields at all
    fn blank(line: u64) -> Self {
        Row {
            line,
            record: StringRecord::new(),
        }
    }

    /// Field at `index`, or `MissingField` if the row is too short
    pub fn field(&self, index: usize) -> Result<&str> {
        self.record.get(index).ok_or(FilterError::MissingField {
            line: self.line,
            index,
            found: self.record.len(),
        })
    }

    /// Rebuild the row from the given columns, joined by `;`
    pub fn project(&self, columns: &[usize]) -> Result<String> {
        let mut projected = String::new();
        for (i, &column) in columns.iter().enumerate() {
            if i > 0 {
                projected.push(DELIMITER as char);
            }
            projected.push_str(self.field(column)?);
        }
        Ok(projected)
    }

    pub fn len(&self) -> usize {
        self.record.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }
}

/// Rows of a buffered dataset, blank lines included
pub struct Rows {
    reader: csv::Reader<Cursor<Vec<u8>>>,
    pending: VecDeque<Row>,
    finished: bool,
}

impl Iterator for Rows {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(row) = self.pending.pop_front() {
            return Some(Ok(row));
        }
        if self.finished {
            return None;
        }

        // csv discards blank lines before a record, recover them from the
        // bytes between the previous record and this one
        let start = self.reader.position().clone();
        let mut record = StringRecord::new();
        let more = match self.reader.read_record(&mut record) {
            Ok(more) => more,
            Err(err) => {
                self.finished = true;
                return Some(Err(err.into()));
            }
        };

        let line = blank_lines(self.reader.get_ref().get_ref(), &start, &mut self.pending);
        if more {
            self.pending.push_back(Row { line, record });
        } else {
            self.finished = true;
        }
        self.pending.pop_front().map(Ok)
    }
}

/// Queue a blank row for each empty line starting at `start`
///
/// Returns the line number of the first non-blank line.
fn blank_lines(input: &[u8], start: &Position, blanks: &mut VecDeque<Row>) -> u64 {
    let mut pos = start.byte() as usize;
    let mut line = start.line();

    if pos == 0 && input.starts_with(UTF8_BOM) {
        pos = UTF8_BOM.len();
    }
    // `\n` left over from the previous record's `\r\n` terminator
    if pos > 0 && input[pos - 1] == b'\r' && input.get(pos) == Some(&b'\n') {
        pos += 1;
        line += 1;
    }

    loop {
        match input.get(pos) {
            Some(b'\n') => {
                blanks.push_back(Row::blank(line));
                pos += 1;
                line += 1;
            }
            Some(b'\r') => {
                blanks.push_back(Row::blank(line));
                pos += 1;
                if input.get(pos) == Some(&b'\n') {
                    pos += 1;
                    line += 1;
                }
            }
            _ => return line,
        }
    }
}

/// Parse a semicolon-delimited dataset row by row
///
/// The format is:
/// ```text
/// header;columns;...
/// value;value;"quoted; value";...
/// ```
///
/// The header is yielded as the first row, like any other. Fields may be
/// quoted with `"` so that embedded `;` (GeoJSON shapes in the country file)
/// do not shift column positions. Rows may differ in length. A blank line is
/// yielded as a row with no fields, so reading any column from it fails. A
/// leading UTF-8 BOM is dropped.
///
/// The whole input is buffered before the first row is parsed.
pub fn parse_rows<R: Read>(mut input: R) -> Result<Rows> {
    let mut buffer = Vec::new();
    input.read_to_end(&mut buffer)?;

    let reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_reader(Cursor::new(buffer));

    Ok(Rows {
        reader,
        pending: VecDeque::new(),
        finished: false,
    })
}
