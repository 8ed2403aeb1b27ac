//! English orthographic suffix inflection: rule-based by default, with a
//! table of irregulars loaded from an asset file overriding the rules.
use std::collections::HashMap;
use std::path::Path;

const CONSONANTS: &str = "bcdfghjklmnpqrstvwxzBCDFGHJKLMNPQRSTVWXZ";
const VOWELS: &str = "aeiouAEIOU";
const W: &str = "wW";
const Y: &str = "yY";
const PLURAL_SPECIAL: &str = "sxzSXZ";

fn last_char(word: &str, from_end: usize) -> Option<char> {
    let chars: Vec<char> = word.chars().collect();
    if chars.len() <= from_end {
        None
    } else {
        Some(chars[chars.len() - 1 - from_end])
    }
}

fn drop_last_char(word: &str) -> String {
    let mut chars: Vec<char> = word.chars().collect();
    chars.pop();
    chars.into_iter().collect()
}

/// Shared preparation step for `-ed`/`-er`/`-est`/`-ing`: drops a silent
/// trailing `e` before a vowel-led suffix, doubles the final consonant of a
/// CVC word (unless it ends in `w`), and turns a consonant-led trailing `y`
/// into `i` (the caller undoes this last case for `-ing`).
fn prep_for_simple_suffix(word: &str) -> String {
    let chars: Vec<char> = word.chars().collect();
    if chars.len() < 2 {
        return word.to_string();
    }
    let third_to_last = last_char(word, 2);
    let second_to_last = last_char(word, 1).unwrap();
    let last = last_char(word, 0).unwrap();

    if VOWELS.contains(second_to_last) || CONSONANTS.contains(second_to_last) {
        if VOWELS.contains(last) {
            if let Some(t) = third_to_last {
                if VOWELS.contains(t) || CONSONANTS.contains(t) {
                    return drop_last_char(word);
                }
            }
        } else if CONSONANTS.contains(last)
            && !W.contains(last)
            && VOWELS.contains(second_to_last)
            && third_to_last.map(|t| !VOWELS.contains(t)).unwrap_or(false)
        {
            return format!("{}{}", word, last);
        } else if Y.contains(last) && CONSONANTS.contains(second_to_last) {
            return format!("{}i", drop_last_char(word));
        }
    }
    word.to_string()
}

fn rule_add_s(word: &str) -> String {
    let chars: Vec<char> = word.chars().collect();
    if chars.len() < 2 {
        return format!("{}s", word);
    }
    let a = chars[chars.len() - 2];
    let b = chars[chars.len() - 1];
    if PLURAL_SPECIAL.contains(b) {
        format!("{}es", word)
    } else if Y.contains(b) && CONSONANTS.contains(a) {
        format!("{}ies", drop_last_char(word))
    } else {
        format!("{}s", word)
    }
}

fn rule_add_ed(word: &str) -> String {
    format!("{}ed", prep_for_simple_suffix(word))
}

fn rule_add_er(word: &str) -> String {
    format!("{}er", prep_for_simple_suffix(word))
}

fn rule_add_est(word: &str) -> String {
    format!("{}est", prep_for_simple_suffix(word))
}

fn rule_add_ing(word: &str) -> String {
    if word.chars().last().map(|c| Y.contains(c)).unwrap_or(false) {
        format!("{}ing", word)
    } else {
        format!("{}ing", prep_for_simple_suffix(word))
    }
}

/// Irregular-inflection overrides, loaded from a table file where regular
/// rule output would be wrong (e.g. "panic" -> "panicked", not "paniced").
#[derive(Debug, Default, Clone)]
pub struct Orthography {
    add_s: HashMap<String, String>,
    add_ed: HashMap<String, String>,
    add_er: HashMap<String, String>,
    add_est: HashMap<String, String>,
    add_ing: HashMap<String, String>,
}

impl Orthography {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses the asset file format: one entry per line,
    /// `WORD TAG: infl1, infl2 | infl3 | ...` where `TAG` is `N`, `A`, or
    /// `V`, selecting which inflection slots the line carries. Malformed
    /// lines are skipped silently, matching the source table's loader.
    pub fn load(path: impl AsRef<Path>) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(_) => Self::empty(),
        }
    }

    pub fn parse(contents: &str) -> Self {
        let mut table = Orthography::default();
        for line in contents.lines() {
            table.parse_line(line);
        }
        table
    }

    fn parse_line(&mut self, line: &str) {
        let colon = match line.find(':') {
            Some(i) => i,
            None => return,
        };
        let (first, second) = (&line[..colon], &line[colon + 1..]);

        let mut word_part = first.split_whitespace();
        let word = match word_part.next() {
            Some(w) => w,
            None => return,
        };
        let tag = match word_part.next().and_then(|t| t.chars().next()) {
            Some(t) => t,
            None => return,
        };

        let inflections: Vec<String> = second
            .split('|')
            .filter_map(|group| group.split_whitespace().next())
            .map(|s| s.trim_end_matches(|c| ",~<!?".contains(c)).to_string())
            .collect();

        match tag {
            'N' => {
                if let Some(s) = inflections.first() {
                    if s != word && s.ends_with('s') && *s != rule_add_s(word) {
                        self.add_s.insert(word.to_string(), s.clone());
                    }
                }
            }
            'A' => {
                if inflections.len() != 2 {
                    return;
                }
                let er = &inflections[0];
                if er != word && er.ends_with("er") && *er != rule_add_er(word) {
                    self.add_er.insert(word.to_string(), er.clone());
                }
                let est = &inflections[1];
                if est != word && est.ends_with("est") && *est != rule_add_est(word) {
                    self.add_est.insert(word.to_string(), est.clone());
                }
            }
            'V' => {
                if inflections.len() != 3 && inflections.len() != 4 {
                    return;
                }
                let ed = &inflections[0];
                if ed != word && ed.ends_with("ed") && *ed != rule_add_ed(word) {
                    self.add_ed.insert(word.to_string(), ed.clone());
                }
                let ing = &inflections[inflections.len() - 2];
                if ing != word && ing.ends_with("ing") && *ing != rule_add_ing(word) {
                    self.add_ing.insert(word.to_string(), ing.clone());
                }
                let s = &inflections[inflections.len() - 1];
                if s != word && s.ends_with('s') && *s != rule_add_s(word) {
                    self.add_s.insert(word.to_string(), s.clone());
                }
            }
            _ => {}
        }
    }

    pub fn add_s_suffix(&self, word: &str) -> String {
        self.add_s
            .get(word)
            .cloned()
            .unwrap_or_else(|| rule_add_s(word))
    }

    pub fn add_ed_suffix(&self, word: &str) -> String {
        self.add_ed
            .get(word)
            .cloned()
            .unwrap_or_else(|| rule_add_ed(word))
    }

    pub fn add_er_suffix(&self, word: &str) -> String {
        self.add_er
            .get(word)
            .cloned()
            .unwrap_or_else(|| rule_add_er(word))
    }

    pub fn add_est_suffix(&self, word: &str) -> String {
        self.add_est
            .get(word)
            .cloned()
            .unwrap_or_else(|| rule_add_est(word))
    }

    pub fn add_ing_suffix(&self, word: &str) -> String {
        self.add_ing
            .get(word)
            .cloned()
            .unwrap_or_else(|| rule_add_ing(word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_s_suffix_rules() {
        assert_eq!(rule_add_s("cat"), "cats");
        assert_eq!(rule_add_s("fox"), "foxes");
        assert_eq!(rule_add_s("try"), "tries");
    }

    #[test]
    fn test_ed_suffix_doubles_cvc_consonant() {
        assert_eq!(rule_add_ed("stop"), "stopped");
    }

    #[test]
    fn test_ed_suffix_drops_silent_e() {
        assert_eq!(rule_add_ed("make"), "maked");
    }

    #[test]
    fn test_ing_suffix_keeps_trailing_y() {
        assert_eq!(rule_add_ing("play"), "playing");
    }

    #[test]
    fn test_ing_suffix_drops_silent_e() {
        assert_eq!(rule_add_ing("make"), "making");
    }

    #[test]
    fn test_er_suffix_y_to_i() {
        assert_eq!(rule_add_er("happy"), "happier");
    }

    #[test]
    fn test_table_override_wins_over_rule() {
        let table = Orthography::parse("panic V: panicked, ~ | panicking, ~ | panics,\n");
        assert_eq!(table.add_ed_suffix("panic"), "panicked");
        assert_eq!(table.add_ing_suffix("panic"), "panicking");
        assert_eq!(table.add_s_suffix("panic"), "panics");
    }

    #[test]
    fn test_malformed_line_is_skipped() {
        let table = Orthography::parse("not a valid line at all\n");
        assert_eq!(table.add_ed_suffix("walk"), "walked");
    }

    #[test]
    fn test_adjective_tag_registers_er_and_est() {
        let table = Orthography::parse("big A: bigger | biggest\n");
        assert_eq!(table.add_er_suffix("big"), "bigger");
        assert_eq!(table.add_est_suffix("big"), "biggest");
    }
}
