/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Minimal quote-aware CSV line splitter.
//!
//! A `"` toggles an "inside quotes" flag and is itself dropped; a `,` outside
//! quotes ends a field.  There is no escaped-quote form (`""` simply toggles
//! twice), so this is intentionally narrower than RFC 4180.
//!
//! Commas nested in an unquoted `(...)` group are also literal, so a lecture
//! cell such as `Algo(CS101,Lecture)` survives without quoting.

use super::CsvError;

/// Splits `line` into exactly `expected` fields.
///
/// # Errors
/// [`CsvError::ColumnCount`] when the line yields any other number of fields.
pub fn split_line(line: &str, expected: usize) -> Result<Vec<String>, CsvError> {
    let mut fields = Vec::with_capacity(expected);
    let mut current = String::new();
    let mut in_quotes = false;
    let mut depth = 0usize;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes && depth == 0 => fields.push(std::mem::take(&mut current)),
            _ => {
                if !in_quotes {
                    match c {
                        '(' => depth += 1,
                        ')' => depth = depth.saturating_sub(1),
                        _ => {}
                    }
                }
                current.push(c);
            }
        }
    }
    fields.push(current);

    if fields.len() != expected {
        return Err(CsvError::ColumnCount {
            expected,
            found: fields.len(),
            line: line.to_string(),
        });
    }
    Ok(fields)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields() {
        let f = split_line("a,b,c", 3).unwrap();
        assert_eq!(f, vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_fields_are_kept() {
        let f = split_line(",,", 3).unwrap();
        assert_eq!(f, vec!["", "", ""]);
    }

    #[test]
    fn commas_inside_quotes_do_not_split() {
        let f = split_line(r#"9-10,"Algo(CS101,Lecture)",---"#, 3).unwrap();
        assert_eq!(f, vec!["9-10", "Algo(CS101,Lecture)", "---"]);
    }

    #[test]
    fn doubled_quote_is_not_an_escape() {
        // `""` toggles in and straight back out, contributing nothing.
        let f = split_line(r#"a""b,c"#, 2).unwrap();
        assert_eq!(f, vec!["ab", "c"]);
    }

    #[test]
    fn commas_inside_parentheses_do_not_split() {
        let f = split_line("9-10,Algo(CS101,Lecture),---", 3).unwrap();
        assert_eq!(f, vec!["9-10", "Algo(CS101,Lecture)", "---"]);
    }

    #[test]
    fn stray_closing_parenthesis_does_not_underflow() {
        let f = split_line("a),b", 2).unwrap();
        assert_eq!(f, vec!["a)", "b"]);
    }

    #[test]
    fn wrong_field_count_reports_line() {
        let err = split_line("9-10,---,---", 6).unwrap_err();
        assert_eq!(
            err,
            CsvError::ColumnCount {
                expected: 6,
                found: 3,
                line: "9-10,---,---".into(),
            }
        );
    }
}
