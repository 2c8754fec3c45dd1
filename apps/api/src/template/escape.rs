//! LaTeX escaping for user-supplied text.
//!
//! Every value that originates outside this codebase (form fields, AI-generated
//! text) passes through `escape` before it reaches a template, so reserved
//! characters can never produce malformed or injected markup. The scan is a
//! single pass over the input: replacements are emitted directly and never
//! re-examined, so already-escaped output cannot be escaped twice.

/// Escapes the ten LaTeX reserved characters in `input`.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\textbackslash{}"),
            '&' => out.push_str("\\&"),
            '%' => out.push_str("\\%"),
            '$' => out.push_str("\\$"),
            '#' => out.push_str("\\#"),
            '_' => out.push_str("\\_"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escapes a URL for use as the target argument of `\href`.
///
/// Inside `\href`'s URL argument only `%` and `#` need escaping; escaping the
/// full reserved set would corrupt the link target (underscores are common in
/// repository URLs and must pass through verbatim).
pub fn escape_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for ch in url.chars() {
        match ch {
            '%' => out.push_str("\\%"),
            '#' => out.push_str("\\#"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_each_reserved_character() {
        assert_eq!(escape("a & b"), "a \\& b");
        assert_eq!(escape("100%"), "100\\%");
        assert_eq!(escape("$5"), "\\$5");
        assert_eq!(escape("#1"), "\\#1");
        assert_eq!(escape("snake_case"), "snake\\_case");
        assert_eq!(escape("{x}"), "\\{x\\}");
        assert_eq!(escape("~/dir"), "\\textasciitilde{}/dir");
        assert_eq!(escape("a^b"), "a\\textasciicircum{}b");
        assert_eq!(escape("C:\\path"), "C:\\textbackslash{}path");
    }

    #[test]
    fn test_escape_passes_plain_text_through() {
        assert_eq!(escape("Senior Rust Engineer"), "Senior Rust Engineer");
        assert_eq!(escape(""), "");
    }

    #[test]
    fn test_escape_is_single_pass() {
        // The backslash introduced by escaping '&' must not itself be escaped.
        assert_eq!(escape("&"), "\\&");
        // A literal backslash followed by an ampersand escapes independently.
        assert_eq!(escape("\\&"), "\\textbackslash{}\\&");
    }

    #[test]
    fn test_escape_handles_mixed_resume_text() {
        let input = "Cut p99 latency by 40% & saved $1M (see notes_2024)";
        let escaped = escape(input);
        assert_eq!(
            escaped,
            "Cut p99 latency by 40\\% \\& saved \\$1M (see notes\\_2024)"
        );
    }

    #[test]
    fn test_escape_url_only_touches_percent_and_hash() {
        assert_eq!(
            escape_url("https://example.com/a_b?q=1#frag"),
            "https://example.com/a_b?q=1\\#frag"
        );
        assert_eq!(escape_url("https://x.dev/100%25"), "https://x.dev/100\\%25");
    }
}
