//! Turns each stroke's translation into an ordered stream of edit actions
//! and renders the minimal diff against what was already on screen.
mod orthography;
mod parser;

pub use orthography::Orthography;

use crate::translator::Translation;
use cadence_core::{Action, Output};

const SPACE: &str = " ";

pub struct Formatter {
    output: Box<dyn Output>,
    orthography: Orthography,
}

impl Formatter {
    pub fn new(output: Box<dyn Output>) -> Self {
        Formatter {
            output,
            orthography: Orthography::empty(),
        }
    }

    pub fn set_output(&mut self, output: Box<dyn Output>) {
        self.output = output;
    }

    pub fn set_orthography(&mut self, orthography: Orthography) {
        self.orthography = orthography;
    }

    /// Computes `formatting` for every translation in `do_`, chaining from
    /// `prev`'s last action (or a zero-state default), then renders the
    /// diff against `undo`'s existing formatting: backspacing and
    /// re-sending only past the longest common prefix.
    pub fn format(&mut self, undo: &[Translation], do_: &mut [Translation], prev: Option<&Translation>) {
        let mut last_action = last_action_of(prev);
        for t in do_.iter_mut() {
            t.formatting = match &t.english {
                Some(english) => translation_to_actions(english, &last_action, &self.orthography),
                None => raw_to_actions(&t.rtfcre[0], &last_action, &self.orthography),
            };
            last_action = t.formatting.last().cloned().unwrap_or(last_action);
        }

        let old: Vec<Action> = undo.iter().flat_map(|t| t.formatting.iter().cloned()).collect();
        let new: Vec<Action> = do_.iter().flat_map(|t| t.formatting.iter().cloned()).collect();

        let common = old
            .iter()
            .zip(new.iter())
            .take_while(|(a, b)| a == b)
            .count();

        undo_actions(&old[common..], &mut *self.output);
        render_actions(&new[common..], &mut *self.output);
    }
}

fn last_action_of(prev: Option<&Translation>) -> Action {
    prev.and_then(|t| t.formatting.last().cloned())
        .unwrap_or_default()
}

fn undo_actions(actions: &[Action], output: &mut dyn Output) {
    for a in actions.iter().rev() {
        if !a.text.is_empty() {
            output.send_backspaces(a.text.chars().count() as u32);
        }
        if !a.replace.is_empty() {
            output.send_string(&a.replace);
        }
    }
}

fn render_actions(actions: &[Action], output: &mut dyn Output) {
    for a in actions {
        if !a.replace.is_empty() {
            output.send_backspaces(a.replace.chars().count() as u32);
        }
        if !a.text.is_empty() {
            output.send_string(&a.text);
        }
        if !a.combo.is_empty() {
            output.send_key_combination(&a.combo);
        }
        if !a.command.is_empty() {
            output.send_engine_command(&a.command);
        }
    }
}

/// A translation made of only digits is raw but still glues to its
/// neighbors; anything else raw is emitted as plain (space-prefixed) text.
fn raw_to_actions(stroke: &str, last_action: &Action, orthography: &Orthography) -> Vec<Action> {
    let no_dash = stroke.replacen('-', "", 1);
    if !no_dash.is_empty() && no_dash.chars().all(|c| c.is_ascii_digit()) {
        translation_to_actions(&no_dash, last_action, orthography)
    } else {
        vec![Action {
            text: format!("{}{}", SPACE, stroke),
            ..Action::default()
        }]
    }
}

fn translation_to_actions(
    translation: &str,
    last_action: &Action,
    orthography: &Orthography,
) -> Vec<Action> {
    let atoms = parser::atoms(translation);
    if atoms.is_empty() {
        return vec![last_action.copy_state()];
    }

    let mut actions = Vec::with_capacity(atoms.len());
    let mut last_action = last_action.clone();
    for atom in &atoms {
        let action = atom_to_action(atom, &last_action, orthography);
        last_action = action.clone();
        actions.push(action);
    }
    actions
}

fn rightmost_word(s: &str) -> String {
    s.split_whitespace().last().unwrap_or("").to_string()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn atom_to_action(atom: &str, last_action: &Action, orthography: &Orthography) -> Action {
    let last_word = &last_action.word;
    let last_glue = last_action.glue;
    let last_attach = last_action.attach;
    let last_capitalize = last_action.capitalize;

    let meta = match parser::meta_body(atom) {
        Some(m) => parser::unescape(m),
        None => {
            let mut text = parser::unescape(atom);
            if last_capitalize {
                text = capitalize(&text);
            }
            let space = if last_attach { "" } else { SPACE };
            let full = format!("{}{}", space, text);
            return Action {
                word: rightmost_word(&full),
                text: full,
                ..Action::default()
            };
        }
    };

    if let Some(suffix) = suffix_inflection(&meta, last_word, orthography) {
        let common = common_prefix_len(last_word, &suffix);
        return Action {
            replace: last_word.chars().skip(common).collect(),
            text: suffix.chars().skip(common).collect(),
            word: suffix,
            ..Action::default()
        };
    }

    match meta.as_str() {
        "," | ":" | ";" => Action {
            text: meta.clone(),
            ..Action::default()
        },
        "." | "!" | "?" => Action {
            text: meta.clone(),
            capitalize: true,
            ..Action::default()
        },
        "-|" => {
            let mut a = last_action.copy_state();
            a.capitalize = true;
            a
        }
        _ if meta.starts_with("PLOVER:") => {
            let mut a = last_action.copy_state();
            a.command = meta["PLOVER:".len()..].to_string();
            a
        }
        _ if meta.starts_with('&') => {
            let glue = last_glue || last_attach;
            let space = if glue { "" } else { SPACE };
            let mut text = meta[1..].to_string();
            if last_capitalize {
                text = capitalize(&text);
            }
            let full = format!("{}{}", space, text);
            Action {
                glue: true,
                word: rightmost_word(&format!("{}{}", last_word, full)),
                text: full,
                ..Action::default()
            }
        }
        _ if meta.starts_with('^') || meta.ends_with('^') => {
            let begins = meta.starts_with('^');
            let ends = meta.ends_with('^');
            let mut body = meta.as_str();
            if begins {
                body = &body[1..];
            }
            if ends && body.len() >= 1 {
                body = &body[..body.len().saturating_sub(1)];
            }
            let space = if begins || last_attach { "" } else { SPACE };
            let mut text = body.to_string();
            if last_capitalize {
                text = capitalize(&text);
            }
            let full = format!("{}{}", space, text);
            Action {
                attach: ends,
                word: rightmost_word(&format!("{}{}", last_word, full)),
                text: full,
                ..Action::default()
            }
        }
        _ if meta.starts_with('#') => {
            let mut a = last_action.copy_state();
            a.combo = meta[1..].to_string();
            a
        }
        _ => last_action.copy_state(),
    }
}

fn suffix_inflection(meta: &str, word: &str, orthography: &Orthography) -> Option<String> {
    match meta {
        "^s" => Some(orthography.add_s_suffix(word)),
        "^ed" => Some(orthography.add_ed_suffix(word)),
        "^er" => Some(orthography.add_er_suffix(word)),
        "^ing" => Some(orthography.add_ing_suffix(word)),
        _ => None,
    }
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::Chord;

    fn raw(chord: &str) -> Translation {
        Translation {
            strokes: vec![Chord::new(vec![chord.to_string()]).unwrap()],
            rtfcre: vec![chord.to_string()],
            english: None,
            replaced: Vec::new(),
            formatting: Vec::new(),
        }
    }

    fn dict(rtfcre: &[&str], english: &str) -> Translation {
        Translation {
            strokes: rtfcre
                .iter()
                .map(|k| Chord::new(vec![k.to_string()]).unwrap())
                .collect(),
            rtfcre: rtfcre.iter().map(|s| s.to_string()).collect(),
            english: Some(english.to_string()),
            replaced: Vec::new(),
            formatting: Vec::new(),
        }
    }

    #[test]
    fn test_plain_text_gets_leading_space() {
        let mut fmt = Formatter::new(Box::new(cadence_core::NullOutput::default()));
        let mut do_ = vec![dict(&["S"], "hello")];
        fmt.format(&[], &mut do_, None);
        assert_eq!(do_[0].formatting[0].text, " hello");
    }

    #[test]
    fn test_digit_glue_atoms_attach_without_space() {
        let mut fmt = Formatter::new(Box::new(cadence_core::NullOutput::default()));
        let mut do_ = vec![raw("1")];
        fmt.format(&[], &mut do_, None);
        assert_eq!(do_[0].formatting[0].text, " 1");

        let prev = do_[0].clone();
        let mut do2 = vec![raw("2")];
        fmt.format(&[], &mut do2, Some(&prev));
        assert_eq!(do2[0].formatting[0].text, "2");
    }

    #[test]
    fn test_suffix_inflection_replaces_common_suffix() {
        let mut fmt = Formatter::new(Box::new(cadence_core::NullOutput::default()));
        let mut do1 = vec![dict(&["S"], "make")];
        fmt.format(&[], &mut do1, None);
        let prev = do1[0].clone();

        let mut do2 = vec![dict(&["T"], "{^ing}")];
        fmt.format(&[], &mut do2, Some(&prev));
        let action = &do2[0].formatting[0];
        assert_eq!(action.replace, "e");
        assert_eq!(action.text, "ing");
        assert_eq!(action.word, "making");
    }

    #[test]
    fn test_capitalize_then_attach() {
        // "stop" is a plain CVC word, so the bare rule (no table override)
        // already doubles the final consonant: stop -> stopped.
        let mut fmt = Formatter::new(Box::new(cadence_core::NullOutput::default()));
        let mut d1 = vec![dict(&["K"], "{-|}")];
        fmt.format(&[], &mut d1, None);
        let p1 = d1[0].clone();

        let mut d2 = vec![dict(&["E"], "stop")];
        fmt.format(&[], &mut d2, Some(&p1));
        assert_eq!(d2[0].formatting[0].text, " Stop");
        let p2 = d2[0].clone();

        let mut d3 = vec![dict(&["D"], "{^ed}")];
        fmt.format(&[], &mut d3, Some(&p2));
        let action = &d3[0].formatting[0];
        assert_eq!(action.replace, "");
        assert_eq!(action.text, "ped");
        assert_eq!(action.word, "Stopped");
    }

    #[test]
    fn test_unknown_meta_is_a_noop_carrying_state() {
        let mut fmt = Formatter::new(Box::new(cadence_core::NullOutput::default()));
        let mut do_ = vec![dict(&["S"], "{@bogus}")];
        fmt.format(&[], &mut do_, None);
        let action = &do_[0].formatting[0];
        assert!(action.text.is_empty());
        assert!(action.replace.is_empty());
    }

    #[test]
    fn test_diff_minimization_skips_common_prefix() {
        use std::cell::RefCell;
        use std::rc::Rc;

        struct Recording {
            calls: Rc<RefCell<Vec<String>>>,
        }
        impl Output for Recording {
            fn send_backspaces(&mut self, n: u32) {
                self.calls.borrow_mut().push(format!("bs({})", n));
            }
            fn send_string(&mut self, s: &str) {
                self.calls.borrow_mut().push(format!("str({})", s));
            }
            fn send_key_combination(&mut self, c: &str) {
                self.calls.borrow_mut().push(format!("combo({})", c));
            }
            fn send_engine_command(&mut self, c: &str) {
                self.calls.borrow_mut().push(format!("cmd({})", c));
            }
        }

        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut fmt = Formatter::new(Box::new(Recording { calls: calls.clone() }));

        let mut do1 = vec![dict(&["S"], "hi")];
        fmt.format(&[], &mut do1, None);
        let short = do1[0].clone();
        calls.borrow_mut().clear();

        let mut do2 = vec![dict(&["S", "T"], "hit")];
        fmt.format(&[short.clone()], &mut do2, None);

        assert_eq!(*calls.borrow(), vec!["bs(3)".to_string(), "str( hit)".to_string()]);
    }
}
