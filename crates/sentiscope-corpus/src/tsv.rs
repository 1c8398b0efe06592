//! Tab-separated value parsing
//!
//! Records are split on TAB and newline. Double-quoted fields may contain
//! either delimiter, and `""` inside quotes is a literal quote.

/// Split TSV text into records of fields.
///
/// A leading byte order mark is ignored. A trailing `\r` before a newline
/// is dropped. Lines that are completely empty produce no record.
pub fn records(input: &str) -> Vec<Vec<String>> {
    let input = input.strip_prefix('\u{FEFF}').unwrap_or(input);
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut field_started = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if !field_started => {
                in_quotes = true;
                field_started = true;
            }
            '\t' => {
                record.push(std::mem::take(&mut field));
                field_started = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                finish_record(&mut records, &mut record, &mut field);
                field_started = false;
            }
            _ => {
                field.push(c);
                field_started = true;
            }
        }
    }

    finish_record(&mut records, &mut record, &mut field);
    records
}

fn finish_record(records: &mut Vec<Vec<String>>, record: &mut Vec<String>, field: &mut String) {
    if record.is_empty() && field.is_empty() {
        return;
    }
    record.push(std::mem::take(field));
    records.push(std::mem::take(record));
}

/// Index of the named column in a header row
pub fn column_index(header: &[String], name: &str) -> Option<usize> {
    header.iter().position(|h| h.trim() == name)
}
