// File: src/escape.rs
// Purpose: HTML and JS string escaping used by the element serializer and script compiler

/// Escapes text for HTML content and quoted attribute values.
///
/// Neutralizes `&`, `<`, `>`, `"` and `'`.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Attribute values use the same quote-safe escaping as text
pub fn escape_attr(input: &str) -> String {
    escape_html(input)
}

/// Escapes a value for embedding inside a single-quoted JS string literal.
///
/// `</` is split so the literal can never close a surrounding `<script>`.
pub fn escape_js(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            '<' if chars.peek() == Some(&'/') => out.push_str("<\\"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unescape_html(input: &str) -> String {
        input
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#x27;", "'")
            .replace("&amp;", "&")
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<script>alert('xss')</script>"),
            "&lt;script&gt;alert(&#x27;xss&#x27;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_escape_attr_quotes() {
        assert_eq!(escape_attr("value=\"hello\""), "value=&quot;hello&quot;");
    }

    #[test]
    fn test_no_escape_needed() {
        assert_eq!(escape_html("hello world"), "hello world");
    }

    #[test]
    fn test_escaped_attr_has_no_raw_specials() {
        let escaped = escape_attr(r#"a"b&c<d>e"#);
        for c in ['"', '<', '>'] {
            assert!(!escaped.contains(c), "raw {c} in {escaped}");
        }
        assert!(!escaped.replace("&amp;", "").replace("&quot;", "").replace("&lt;", "").replace("&gt;", "").contains('&'));
    }

    #[test]
    fn test_round_trip() {
        for text in ["a & b", "<p class=\"x\">'hi'</p>", "&amp; already", "plain"] {
            assert_eq!(unescape_html(&escape_html(text)), text);
        }
    }

    #[test]
    fn test_escape_js_quotes_and_backslashes() {
        assert_eq!(escape_js(r"it's a \ test"), r"it\'s a \\ test");
        assert_eq!(escape_js("line\nbreak"), "line\\nbreak");
    }

    #[test]
    fn test_escape_js_script_close() {
        assert_eq!(escape_js("</script>"), "<\\/script>");
    }
}
