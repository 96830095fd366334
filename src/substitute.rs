//! Literal token substitution for document text.
//!
//! Tokens have the concrete form `{name}`. Replacement is a global literal
//! string replacement; replacement values are never re-scanned for tokens,
//! so no nested or recursive expansion takes place. Token names containing
//! `{` or `}` are undefined input and are not validated.

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

/// Line-break idiom inserted between consecutive text runs when a value
/// spans multiple lines.
const LINE_BREAK: &str = "</w:t><w:br/><w:t>";

// Static initialization: automaton is built only once, thread-safe
static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::new(["&", "<", ">", "\"", "'"]).expect("Failed to build XML escaper")
});

/// Escape XML special characters.
///
/// # Examples
///
/// ```
/// use docx_template::substitute::escape_xml;
/// assert_eq!(escape_xml("a & b"), "a &amp; b");
/// assert_eq!(escape_xml("<tag>\"hi\"</tag>"), "&lt;tag&gt;&quot;hi&quot;&lt;/tag&gt;");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    XML_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
}

/// Replace every occurrence of `{name}` in `text` with `value`.
///
/// When `escape` is set, XML special characters in `value` are replaced with
/// their entity equivalents before insertion. Substituting a token that is
/// not present is a no-op.
pub fn substitute(text: &str, name: &str, value: &str, escape: bool) -> String {
    let pattern = format!("{{{name}}}");
    if escape {
        text.replace(&pattern, &escape_xml(value))
    } else {
        text.replace(&pattern, value)
    }
}

/// Replace every occurrence of `{name}` with a multi-line `value`.
///
/// The value is escaped first (when requested), then split on `\n` and
/// rejoined with an explicit line-break element between consecutive text
/// runs. The final replacement runs with escaping disabled, since escaping
/// afterwards would corrupt the inserted markup.
pub fn substitute_multiline(text: &str, name: &str, value: &str, escape: bool) -> String {
    let value = if escape {
        escape_xml(value)
    } else {
        value.to_string()
    };
    let joined = value.split('\n').collect::<Vec<_>>().join(LINE_BREAK);
    substitute(text, name, &joined, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_basic() {
        assert_eq!(substitute("Dear {name},", "name", "Ada", false), "Dear Ada,");
    }

    #[test]
    fn test_substitute_all_occurrences() {
        assert_eq!(substitute("{x} and {x}", "x", "y", false), "y and y");
    }

    #[test]
    fn test_absent_token_is_noop() {
        let text = "Dear {name},";
        assert_eq!(substitute(text, "missing", "value", false), text);
    }

    #[test]
    fn test_escaping_enabled() {
        let out = substitute("v={v}", "v", "<a & \"b\" 'c'>", true);
        assert_eq!(out, "v=&lt;a &amp; &quot;b&quot; &apos;c&apos;&gt;");
        for raw in ['<', '>', '&', '"', '\''] {
            assert!(!out.contains(raw), "raw {raw:?} leaked into output");
        }
    }

    #[test]
    fn test_escaping_disabled() {
        assert_eq!(substitute("v={v}", "v", "<b&c>", false), "v=<b&c>");
    }

    #[test]
    fn test_value_not_rescanned() {
        // A replacement value containing brace syntax is inserted verbatim
        let out = substitute("{a}", "a", "{b}", false);
        assert_eq!(out, "{b}");
        assert_eq!(substitute(&out, "b", "x", false), "x");
    }

    #[test]
    fn test_multiline_breaks_and_segments() {
        let out = substitute_multiline("<w:t>{v}</w:t>", "v", "a\nb\nc", false);
        assert_eq!(out, "<w:t>a</w:t><w:br/><w:t>b</w:t><w:br/><w:t>c</w:t>");
        assert_eq!(out.matches("<w:br/>").count(), 2);
    }

    #[test]
    fn test_multiline_single_line() {
        let out = substitute_multiline("<w:t>{v}</w:t>", "v", "only", false);
        assert_eq!(out, "<w:t>only</w:t>");
    }

    #[test]
    fn test_multiline_escapes_before_splitting() {
        let out = substitute_multiline("<w:t>{v}</w:t>", "v", "a<b\nc&d", true);
        assert_eq!(out, "<w:t>a&lt;b</w:t><w:br/><w:t>c&amp;d</w:t>");
    }
}
