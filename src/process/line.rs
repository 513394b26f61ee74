/// Split one CSV line into trimmed fields.
///
/// - A comma inside a `"…"` span is kept as text.
/// - `""` inside a quoted span becomes a single `"`.
/// - Quote characters that open or close a span are dropped.
///
/// Never fails: an unterminated quote simply runs to the end of the line.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                // escaped quote
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());

    fields
}

/// Strip one leading and one trailing `"` (each only if present), then trim.
pub fn strip_quotes(raw: &str) -> &str {
    let s = raw.strip_prefix('"').unwrap_or(raw);
    let s = s.strip_suffix('"').unwrap_or(s);
    s.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_fields_are_trimmed() {
        assert_eq!(parse_line("a, b ,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_field_count_is_commas_plus_one() {
        for line in ["", "x", "x,y", ",,", "a,,b, ,"] {
            let commas = line.matches(',').count();
            assert_eq!(parse_line(line).len(), commas + 1, "line {:?}", line);
        }
    }

    #[test]
    fn test_quoted_comma_is_not_a_delimiter() {
        assert_eq!(parse_line(r#""Smith, John",42"#), vec!["Smith, John", "42"]);
    }

    #[test]
    fn test_doubled_quotes_collapse() {
        assert_eq!(
            parse_line(r#""She said ""hi""",1"#),
            vec![r#"She said "hi""#, "1"]
        );
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        assert_eq!(parse_line(r#"a,"b,c"#), vec!["a", "b,c"]);
    }

    #[test]
    fn test_quotes_mid_field_toggle_without_emitting() {
        assert_eq!(parse_line(r#"ab"c,d"e,f"#), vec!["abc,de", "f"]);
    }

    #[test]
    fn test_doubled_quote_outside_span_is_empty_span() {
        // `""` while not quoted opens and closes a span with nothing in it
        assert_eq!(parse_line(r#"a""b,c"#), vec!["ab", "c"]);
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes(r#""x""#), "x");
        assert_eq!(strip_quotes(r#"" x "#), "x");
        assert_eq!(strip_quotes(r#"x""#), "x");
        assert_eq!(strip_quotes(r#"""x"""#), r#""x""#);
        assert_eq!(strip_quotes(r#"""#), "");
        assert_eq!(strip_quotes("  y  "), "y");
    }
}
