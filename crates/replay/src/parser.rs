use chrono::NaiveDateTime;

use crate::types::RawHit;

const MIN_FIELDS: usize = 10;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Splits one comma-separated record with optional double-quoted fields.
/// Inside a quoted field, `""` escapes a literal quote and commas are data.
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;
    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(ch),
            }
        } else {
            match ch {
                '"' => in_quotes = true,
                ',' => fields.push(std::mem::take(&mut field)),
                _ => field.push(ch),
            }
        }
    }
    fields.push(field);
    fields
}

fn placeholder(value: &str) -> Option<String> {
    if value == "-" {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parses one raw log record into a [`RawHit`].
///
/// Records with fewer than ten fields or an unparsable timestamp yield
/// `None`; a malformed line never aborts the file.
pub fn parse_line(line: &str) -> Option<RawHit> {
    let fields = split_record(line);
    if fields.len() < MIN_FIELDS {
        return None;
    }
    let accessed_at = NaiveDateTime::parse_from_str(&fields[0], TIMESTAMP_FORMAT).ok()?;
    Some(RawHit {
        accessed_at,
        path: fields[1].clone(),
        host: fields[2].clone(),
        ip: fields[3].clone(),
        protocol: fields[4].clone(),
        method: fields[5].clone(),
        port: fields[6].clone(),
        status: fields[7].clone(),
        user_agent: placeholder(&fields[8]),
        referer: placeholder(&fields[9]),
    })
}
