/// Tabular text parser and record materializer for spreadsheet CSV exports.
///
/// The input is split into physical lines first, so a quoted field cannot span
/// lines. Within a line:
/// - `,` outside quotes separates fields
/// - `"` toggles quote state; `""` inside quotes is one literal `"`
/// - whitespace is trimmed from the unquoted parts of a field only
///
/// Parsing is pure: the same text always yields the same rows.
use crate::error::AppError;
use crate::model::{FieldValue, Record};

/// Split `text` into rows of fields. The first row is the header.
pub fn parse_rows(text: &str) -> Result<Vec<Vec<String>>, AppError> {
    let lines: Vec<&str> = text
        .trim()
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    if lines.len() < 2 {
        return Err(AppError::MalformedInput(format!(
            "CSV must have at least a header row and one data row (found {} line{})",
            lines.len(),
            if lines.len() == 1 { "" } else { "s" }
        )));
    }

    Ok(lines.into_iter().map(parse_line).collect())
}

/// Parse `text` and zip every data row with the header row.
pub fn parse_records(text: &str) -> Result<Vec<Record>, AppError> {
    let rows = parse_rows(text)?;
    let (header, data) = rows
        .split_first()
        .ok_or_else(|| AppError::MalformedInput("missing header row".to_string()))?;

    Ok(data.iter().map(|row| materialize(header, row)).collect())
}

/// Build a record from one data row. Short rows are padded with empty strings;
/// cells past the last header are dropped.
pub fn materialize(header: &[String], row: &[String]) -> Record {
    let mut record = Record::default();
    for (index, key) in header.iter().enumerate() {
        let raw = row.get(index).map(String::as_str).unwrap_or("");
        record.insert(key.clone(), coerce(raw));
    }
    record
}

/// Numeric only when non-empty, whitespace-free and a finite number in full.
pub fn coerce(raw: &str) -> FieldValue {
    if raw.is_empty() || raw.chars().any(char::is_whitespace) {
        return FieldValue::Text(raw.to_string());
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => FieldValue::Number {
            value,
            raw: raw.to_string(),
        },
        _ => FieldValue::Text(raw.to_string()),
    }
}

fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = FieldBuf::default();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                field.push_quoted('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field).finish()),
            _ if in_quotes => field.push_quoted(ch),
            _ => field.text.push(ch),
        }
    }

    // An unterminated quote runs to the end of the line.
    fields.push(field.finish());
    fields
}

/// Field under construction. `quoted` is the byte span written while inside
/// quotes; trimming never reaches into it.
#[derive(Default)]
struct FieldBuf {
    text: String,
    quoted: Option<(usize, usize)>,
}

impl FieldBuf {
    fn push_quoted(&mut self, ch: char) {
        let start = self.quoted.map_or(self.text.len(), |(start, _)| start);
        self.text.push(ch);
        self.quoted = Some((start, self.text.len()));
    }

    fn finish(self) -> String {
        match self.quoted {
            None => self.text.trim().to_string(),
            Some((start, end)) => {
                let mut out = String::with_capacity(self.text.len());
                out.push_str(self.text[..start].trim_start());
                out.push_str(&self.text[start..end]);
                out.push_str(self.text[end..].trim_end());
                out
            }
        }
    }
}
