//! RFC 4180 field escaping and record splitting

/// A parsed CSV record and the 1-based line it starts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRecord {
    pub line: u64,
    pub fields: Vec<String>,
}

/// Escapes a field for CSV according to RFC 4180.
///
/// Fields containing commas, double quotes, or newlines are quoted.
/// Double quotes within the field are escaped by doubling them.
pub fn escape_field(s: &str) -> String {
    let needs_quoting = s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r');

    if needs_quoting {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Renders one row terminated by `\n`
pub fn render_row(fields: &[&str]) -> String {
    let mut row = fields
        .iter()
        .map(|f| escape_field(f))
        .collect::<Vec<_>>()
        .join(",");
    row.push('\n');
    row
}

/// Splits CSV text into records
///
/// Accepts `\n` and `\r\n` line endings and quoted fields spanning lines.
/// Blank lines are skipped.
///
/// # Errors
///
/// Returns the offending line and a reason for a stray quote, text after a
/// closing quote, or an unterminated quoted field.
pub fn parse_records(text: &str) -> Result<Vec<CsvRecord>, (u64, String)> {
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quoted_field = false;
    let mut line: u64 = 1;
    let mut record_line: u64 = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() && !quoted_field => {
                in_quotes = true;
                quoted_field = true;
            }
            '"' => return Err((line, "unexpected quote in field".to_string())),
            ',' => {
                fields.push(std::mem::take(&mut field));
                quoted_field = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                if !fields.is_empty() || !field.is_empty() || quoted_field {
                    fields.push(std::mem::take(&mut field));
                    records.push(CsvRecord {
                        line: record_line,
                        fields: std::mem::take(&mut fields),
                    });
                }
                quoted_field = false;
                line += 1;
                record_line = line;
            }
            _ if quoted_field => {
                return Err((line, "unexpected text after closing quote".to_string()));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err((record_line, "unterminated quoted field".to_string()));
    }
    if !fields.is_empty() || !field.is_empty() || quoted_field {
        fields.push(field);
        records.push(CsvRecord {
            line: record_line,
            fields,
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_field_plain() {
        assert_eq!(escape_field("System.IO"), "System.IO");
    }

    #[test]
    fn test_escape_field_with_comma_and_quote() {
        assert_eq!(escape_field("Read(Byte[], Int32)"), "\"Read(Byte[], Int32)\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_render_row() {
        assert_eq!(render_row(&["a", "b,c", ""]), "a,\"b,c\",\n");
    }

    #[test]
    fn test_parse_simple_records() {
        let records = parse_records("a,b\nc,d\n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fields, vec!["a", "b"]);
        assert_eq!(records[1].line, 2);
    }

    #[test]
    fn test_parse_quoted_fields() {
        let records = parse_records("\"a,1\",\"say \"\"hi\"\"\",\"two\nlines\"\nnext,row\n").unwrap();
        assert_eq!(records[0].fields, vec!["a,1", "say \"hi\"", "two\nlines"]);
        assert_eq!(records[1].line, 3);
    }

    #[test]
    fn test_parse_crlf_and_blank_lines() {
        let records = parse_records("a,b\r\n\r\nc,d").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fields, vec!["a", "b"]);
        assert_eq!(records[1].fields, vec!["c", "d"]);
        assert_eq!(records[1].line, 3);
    }

    #[test]
    fn test_parse_trailing_empty_field() {
        let records = parse_records("a,\n").unwrap();
        assert_eq!(records[0].fields, vec!["a", ""]);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_records("a,\"open\n").unwrap_err().0, 1);
        assert!(parse_records("a,b\"c\n").is_err());
        assert!(parse_records("\"a\"b,c\n").is_err());
    }

    #[test]
    fn test_escape_then_parse_preserves_awkward_text() {
        let fields = ["plain", "with,comma", "with \"quote\"", "multi\nline", ""];
        let row = render_row(&fields);
        let records = parse_records(&row).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].fields, fields);
    }
}
