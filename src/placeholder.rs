//! Placeholder repair for Word markup.
//!
//! Word frequently splits what is logically one `{name}` placeholder across
//! several formatting runs: spell-check and autocorrect boundaries insert
//! `<w:r>`/`<w:t>` tags between the braces. This pass strips the markup
//! inside every brace-delimited span so that a literal search for `{name}`
//! finds the token again.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

// Shortest span between a `{` and the next `}`. An unmatched `{` never
// matches and is left untouched.
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^}]+\}").expect("Failed to compile placeholder pattern"));

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("Failed to compile tag pattern"));

/// Collapse markup inside every `{...}` span, keeping only the text content.
///
/// Idempotent: a cleaned span contains no tags to strip, so running the pass
/// twice produces the same result as running it once.
///
/// # Examples
///
/// ```
/// use docx_template::placeholder::normalize;
/// assert_eq!(normalize("{na<w:t>me}"), "{name}");
/// assert_eq!(normalize("no placeholders"), "no placeholders");
/// ```
pub fn normalize(text: &str) -> Cow<'_, str> {
    PLACEHOLDER.replace_all(text, |caps: &regex::Captures| {
        TAG.replace_all(&caps[0], "").into_owned()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(normalize("Dear {name}, hello"), "Dear {name}, hello");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_split_placeholder_rejoined() {
        assert_eq!(normalize("{na<w:t>me}"), "{name}");
        assert_eq!(
            normalize("{fi</w:t></w:r><w:r><w:t>rst}"),
            "{first}"
        );
    }

    #[test]
    fn test_multiple_placeholders() {
        assert_eq!(
            normalize("{a<w:t>b} and {c</w:t>d}"),
            "{ab} and {cd}"
        );
    }

    #[test]
    fn test_unmatched_brace_untouched() {
        assert_eq!(normalize("open {brace only"), "open {brace only");
        assert_eq!(normalize("{no<w:t>close"), "{no<w:t>close");
    }

    #[test]
    fn test_surrounding_markup_kept() {
        assert_eq!(
            normalize("<w:t>Dear {na<x>me},</w:t>"),
            "<w:t>Dear {name},</w:t>"
        );
    }

    #[test]
    fn test_idempotent() {
        let input = "<w:p>{fi<w:x>rst} {second} {th</w:t>ird}</w:p>";
        let once = normalize(input).into_owned();
        let twice = normalize(&once).into_owned();
        assert_eq!(once, twice);
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(s in "\\PC*") {
            let once = normalize(&s).into_owned();
            let twice = normalize(&once).into_owned();
            prop_assert_eq!(once, twice);
        }
    }
}
