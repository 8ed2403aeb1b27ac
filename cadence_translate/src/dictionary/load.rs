//! Loads dictionary files.
//!
//! # File format
//! A dictionary file is a single JSON object. Each key is a stroke or a
//! series of strokes joined by `/` (e.g. `"TPHO/WEUD"`), in their canonical
//! RTFCRE form. Each value is a translation string, which may contain
//! literal text interspersed with brace-delimited meta atoms (`{^s}`,
//! `{&a}`, `{-|}`, `{#Return}`, `{PLOVER:TOGGLE}`, ...). This crate does not
//! interpret meta atoms at load time; the dictionary only needs to validate
//! that the key decomposes into chords. See [`crate::formatter`] for atom
//! parsing.
//!
//! Loading several files layers them: later files' entries override earlier
//! ones on key collision, matching how a user dictionary sits on top of a
//! base dictionary stack.
use super::Dictionary;
use serde_json::{Error as JsonError, Value};
use std::{error::Error, fmt, fs, path::Path};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DictionaryLoadError {
    #[error("could not read dictionary file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Parse(#[from] ParseError),
}

#[derive(Debug, PartialEq)]
pub enum ParseError {
    NotAnObject,
    EmptyStroke(String),
    NonStringValue(String),
    Json(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::NotAnObject => write!(f, "dictionary file is not a JSON object"),
            ParseError::EmptyStroke(key) => write!(f, "empty stroke in key {:?}", key),
            ParseError::NonStringValue(key) => {
                write!(f, "translation for {:?} is not a string", key)
            }
            ParseError::Json(msg) => write!(f, "invalid JSON: {}", msg),
        }
    }
}

impl Error for ParseError {}

impl From<JsonError> for ParseError {
    fn from(e: JsonError) -> Self {
        ParseError::Json(e.to_string())
    }
}

/// Loads and layers dictionary files in order, later paths taking priority.
pub fn load_dict<P: AsRef<Path>>(paths: &[P]) -> Result<Dictionary, DictionaryLoadError> {
    let mut dict = Dictionary::new();
    for path in paths {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| DictionaryLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let layer = parse_dict(&contents)?;
        dict.extend(layer);
    }
    Ok(dict)
}

fn parse_dict(contents: &str) -> Result<Dictionary, ParseError> {
    let value: Value = serde_json::from_str(contents)?;
    let object = value.as_object().ok_or(ParseError::NotAnObject)?;

    let mut dict = Dictionary::new();
    for (key, value) in object {
        let strokes = parse_key(key)?;
        let translation = value
            .as_str()
            .ok_or_else(|| ParseError::NonStringValue(key.clone()))?;
        dict.set(strokes, translation.to_string());
    }
    Ok(dict)
}

fn parse_key(key: &str) -> Result<Vec<String>, ParseError> {
    let strokes: Vec<String> = key.split('/').map(|s| s.to_string()).collect();
    if strokes.iter().any(|s| s.is_empty()) {
        return Err(ParseError::EmptyStroke(key.to_string()));
    }
    Ok(strokes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_dict() {
        let contents = r#"
        {
            "TP": "if",
            "KPA": "{}{-|}",
            "-T/WUPB": "The One"
        }
        "#;
        let dict = parse_dict(contents).unwrap();
        assert_eq!(dict.get(&["TP".to_string()]), Some("if"));
        assert_eq!(dict.get(&["KPA".to_string()]), Some("{}{-|}"));
        assert_eq!(
            dict.get(&["-T".to_string(), "WUPB".to_string()]),
            Some("The One")
        );
        assert_eq!(dict.longest_key(), 2);
    }

    #[test]
    fn test_rejects_non_object() {
        assert_eq!(parse_dict("[1, 2, 3]").unwrap_err(), ParseError::NotAnObject);
    }

    #[test]
    fn test_rejects_non_string_value() {
        let contents = r#"{ "TP": 5 }"#;
        assert_eq!(
            parse_dict(contents).unwrap_err(),
            ParseError::NonStringValue("TP".to_string())
        );
    }

    #[test]
    fn test_rejects_empty_stroke_in_key() {
        assert_eq!(
            parse_key("TP//KPA").unwrap_err(),
            ParseError::EmptyStroke("TP//KPA".to_string())
        );
    }

    #[test]
    fn test_layering_overrides_earlier_entries() {
        let base = parse_dict(r#"{"TP": "if", "KPA": "and"}"#).unwrap();
        let user = parse_dict(r#"{"TP": "TP-override"}"#).unwrap();
        let mut merged = Dictionary::new();
        merged.extend(base);
        merged.extend(user);
        assert_eq!(merged.get(&["TP".to_string()]), Some("TP-override"));
        assert_eq!(merged.get(&["KPA".to_string()]), Some("and"));
    }
}
