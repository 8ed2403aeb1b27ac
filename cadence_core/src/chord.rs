//! Canonical representation of a single steno chord (a set of simultaneously
//! pressed keys) and the RTFCRE string used to key the dictionary.
use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed total order over the steno layout. `S1-` and `S2-` are two
/// physical keys that both collapse onto the canonical `S-` slot (mirroring
/// how a split-S keyboard bank is wired); together with the 22 other slots
/// below this is the 24-symbol closed set a [`Chord`] accepts.
const KEY_ORDER: &[&str] = &[
    "#", "S-", "T-", "K-", "P-", "W-", "H-", "R-", "A-", "O-", "*", "-E", "-U", "-F", "-R", "-P",
    "-B", "-L", "-G", "-T", "-S", "-D", "-Z",
];

/// Symbols that normalize onto another canonical slot before anything else
/// runs. Currently only the split-S bank.
const KEY_ALIASES: &[(&str, &str)] = &[("S1-", "S-"), ("S2-", "S-")];

/// `#key -> number-bar replacement` substitution table.
const NUMBER_MAP: &[(&str, &str)] = &[
    ("S-", "1-"),
    ("T-", "2-"),
    ("P-", "3-"),
    ("H-", "4-"),
    ("A-", "5-"),
    ("O-", "0-"),
    ("-F", "-6"),
    ("-P", "-7"),
    ("-L", "-8"),
    ("-T", "-9"),
];

/// Keys whose presence suppresses the medial hyphen in the rendered RTFCRE,
/// checked against the (possibly number-substituted) key set.
const IMPLICIT_HYPHEN: &[&str] = &["A-", "O-", "5-", "0-", "-E", "-U", "*"];

/// A key symbol that isn't in the closed 24-symbol steno alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownChordKey(pub String);

impl fmt::Display for UnknownChordKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown steno key symbol: {:?}", self.0)
    }
}

impl std::error::Error for UnknownChordKey {}

/// A single canonicalized steno chord.
///
/// Constructing a `Chord` is infallible with respect to the *shape* of the
/// key set (duplicates, ordering, numbers) but panics (via [`Chord::new`]'s
/// `Result`-returning sibling) if asked to canonicalize an unrecognized key
/// symbol: the set of valid symbols is closed, so an unknown one is a
/// programming error at the machine-driver boundary, not a runtime event a
/// well-behaved caller should ever see.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chord {
    keys: Vec<String>,
    rtfcre: String,
    is_correction: bool,
}

impl Chord {
    /// Build a chord from an unordered set of key symbols.
    pub fn new<I, S>(keys: I) -> Result<Self, UnknownChordKey>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut canonical: Vec<&'static str> = Vec::new();
        for raw in keys {
            let raw = raw.as_ref();
            let resolved = KEY_ALIASES
                .iter()
                .find(|(alias, _)| *alias == raw)
                .map(|(_, canon)| *canon)
                .or_else(|| KEY_ORDER.iter().find(|k| **k == raw).copied())
                .ok_or_else(|| UnknownChordKey(raw.to_string()))?;
            if !canonical.contains(&resolved) {
                canonical.push(resolved);
            }
        }

        canonical.sort_by_key(|k| KEY_ORDER.iter().position(|o| o == k).unwrap());

        let has_number_bar = canonical.contains(&"#");
        let mut keys: Vec<String> = canonical.iter().map(|s| s.to_string()).collect();
        if has_number_bar {
            let any_mapped = keys
                .iter()
                .any(|k| NUMBER_MAP.iter().any(|(from, _)| from == k));
            if any_mapped {
                for key in keys.iter_mut() {
                    if let Some((_, to)) = NUMBER_MAP.iter().find(|(from, _)| from == key) {
                        *key = to.to_string();
                    }
                }
                keys.retain(|k| k != "#");
            }
        }

        let rtfcre = Self::compute_rtfcre(&keys);
        let is_correction = rtfcre == "*";

        Ok(Chord {
            keys,
            rtfcre,
            is_correction,
        })
    }

    /// Build directly from an already-canonical RTFCRE string, used by the
    /// translator when synthesizing a raw/undo chord that never went through
    /// key-set construction (e.g. from a dictionary key loaded off disk).
    pub fn from_rtfcre(rtfcre: &str) -> Self {
        let is_correction = rtfcre == "*";
        Chord {
            keys: Vec::new(),
            rtfcre: rtfcre.to_string(),
            is_correction,
        }
    }

    fn strip_hyphens(key: &str) -> &str {
        key.trim_start_matches('-').trim_end_matches('-')
    }

    fn compute_rtfcre(keys: &[String]) -> String {
        let implicit_hyphen = keys.iter().any(|k| IMPLICIT_HYPHEN.contains(&k.as_str()));

        if implicit_hyphen {
            keys.iter().map(|k| Self::strip_hyphens(k)).collect()
        } else {
            let pre: String = keys
                .iter()
                .filter(|k| k.ends_with('-') || k.as_str() == "#")
                .map(|k| Self::strip_hyphens(k))
                .collect();
            let post: String = keys
                .iter()
                .filter(|k| k.starts_with('-'))
                .map(|k| Self::strip_hyphens(k))
                .collect();
            if post.is_empty() {
                pre
            } else {
                format!("{}-{}", pre, post)
            }
        }
    }

    pub fn rtfcre(&self) -> &str {
        &self.rtfcre
    }

    pub fn is_correction(&self) -> bool {
        self.is_correction
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.rtfcre)
    }
}
