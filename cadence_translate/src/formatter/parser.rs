//! Splits a translation string into atoms: runs of literal text and
//! brace-delimited meta directives, honoring `\{`/`\}` escapes on both
//! sides of the brace.
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // One of:
    //   a run of anything that isn't an unescaped `{` or `}`
    //   a `{...}` span whose interior has no unescaped `{` or `}`
    static ref ATOM_RE: Regex = Regex::new(
        r"(?:\\\{|\\\}|[^{}])+|\{(?:\\\{|\\\}|[^{}])*\}"
    ).unwrap();
}

/// Splits `translation` into trimmed, non-empty atoms. A translation that
/// is entirely digits is instead wrapped as a single glue meta so that
/// adjacent digit strokes glue together without a space.
pub fn atoms(translation: &str) -> Vec<String> {
    if !translation.is_empty() && translation.chars().all(|c| c.is_ascii_digit()) {
        return vec![format!("{{&{}}}", translation)];
    }

    ATOM_RE
        .find_iter(translation)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Returns the meta body of `atom` (the text between `{` and `}`) if it is
/// brace-delimited, else `None`.
pub fn meta_body(atom: &str) -> Option<&str> {
    if atom.starts_with('{') && atom.ends_with('}') && atom.len() >= 2 {
        Some(&atom[1..atom.len() - 1])
    } else {
        None
    }
}

/// Replaces escaped meta delimiters with their literal form.
pub fn unescape(atom: &str) -> String {
    atom.replace("\\{", "{").replace("\\}", "}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_text_and_meta() {
        assert_eq!(atoms("hello {^ing} world"), vec!["hello", "{^ing}", "world"]);
    }

    #[test]
    fn test_digit_only_translation_becomes_glue_atom() {
        assert_eq!(atoms("123"), vec!["{&123}"]);
    }

    #[test]
    fn test_escaped_braces_stay_in_one_atom() {
        assert_eq!(atoms(r"\{literal\}"), vec![r"\{literal\}"]);
    }

    #[test]
    fn test_empty_translation_has_no_atoms() {
        assert_eq!(atoms(""), Vec::<String>::new());
    }

    #[test]
    fn test_meta_body_extraction() {
        assert_eq!(meta_body("{^ed}"), Some("^ed"));
        assert_eq!(meta_body("plain"), None);
    }

    #[test]
    fn test_unescape_restores_literal_braces() {
        assert_eq!(unescape(r"\{hi\}"), "{hi}");
    }
}
