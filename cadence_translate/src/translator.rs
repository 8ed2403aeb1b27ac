//! The stateful longest-match lookup at the heart of the engine: feed it
//! chords one at a time, it maintains a bounded window of recent
//! translations and notifies listeners of what changed.
use crate::dictionary::Dictionary;
use crate::formatter::Formatter;
use cadence_core::{Action, Chord, Output};
use log::trace;
use std::collections::VecDeque;

/// One chord's worth of translated output, possibly spanning several
/// strokes when a later stroke completes a multi-stroke dictionary entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Translation {
    pub strokes: Vec<Chord>,
    pub rtfcre: Vec<String>,
    pub english: Option<String>,
    pub replaced: Vec<Translation>,
    pub formatting: Vec<Action>,
}

impl Translation {
    fn raw(chord: Chord) -> Self {
        Translation {
            rtfcre: vec![chord.rtfcre().to_string()],
            strokes: vec![chord],
            english: None,
            replaced: Vec::new(),
            formatting: Vec::new(),
        }
    }

    pub fn is_undoable(&self) -> bool {
        !self.strokes.is_empty()
    }
}

/// A snapshot of `(translations, tail)`, for saving and restoring context
/// (e.g. when the embedder temporarily swaps in a different dictionary for
/// an editing dialog) without replaying stroke history.
#[derive(Debug, Clone, Default)]
pub struct TranslatorState {
    translations: VecDeque<Translation>,
    tail: Option<Translation>,
}

type Listener = Box<dyn FnMut(&[Translation], &[Translation], Option<&Translation>)>;

/// Holds the dictionary, the bounded translation window, and the formatter
/// that turns each stroke's effect into emitted keystrokes. The formatter is
/// owned directly rather than reached through the generic listener list: its
/// output must be rendered synchronously, in order, before any other
/// observer sees the stroke (see `translate`).
pub struct Translator {
    dictionary: Dictionary,
    translations: VecDeque<Translation>,
    tail: Option<Translation>,
    undo_length: usize,
    formatter: Formatter,
    listeners: Vec<Listener>,
}

impl Translator {
    pub fn new(output: Box<dyn Output>) -> Self {
        Translator {
            dictionary: Dictionary::new(),
            translations: VecDeque::new(),
            tail: None,
            undo_length: 100,
            formatter: Formatter::new(output),
            listeners: Vec::new(),
        }
    }

    pub fn set_dictionary(&mut self, dictionary: Dictionary) {
        self.dictionary = dictionary;
    }

    pub fn set_orthography(&mut self, orthography: crate::formatter::Orthography) {
        self.formatter.set_orthography(orthography);
    }

    pub fn set_output(&mut self, output: Box<dyn Output>) {
        self.formatter.set_output(output);
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn add_translation(&mut self, key: Vec<String>, value: String) {
        self.dictionary.set(key, value);
    }

    pub fn add_translations(&mut self, mapping: Vec<(Vec<String>, String)>) {
        for (key, value) in mapping {
            self.dictionary.set(key, value);
        }
    }

    pub fn remove_translations(&mut self, keys: &[Vec<String>]) {
        for key in keys {
            self.dictionary.delete(key);
        }
    }

    pub fn set_undo_length(&mut self, n: usize) {
        self.undo_length = n.max(1);
        self.trim();
    }

    pub fn add_listener(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn remove_all_listeners(&mut self) {
        self.listeners.clear();
    }

    pub fn get_state(&self) -> TranslatorState {
        TranslatorState {
            translations: self.translations.clone(),
            tail: self.tail.clone(),
        }
    }

    pub fn set_state(&mut self, state: TranslatorState) {
        self.translations = state.translations;
        self.tail = state.tail;
    }

    pub fn clear_state(&mut self) {
        self.translations.clear();
        self.tail = None;
    }

    /// The translation immediately preceding whatever is about to be
    /// emitted: the last of `translations`, or `tail` if the window is
    /// currently empty.
    fn prev(&self) -> Option<&Translation> {
        self.translations.back().or(self.tail.as_ref())
    }

    /// Feeds one chord through the longest-match algorithm. Computes
    /// `(undo, do)`, hands them to the formatter (which assigns fresh
    /// `formatting` to every `do` entry and renders the diff against
    /// `undo`'s old formatting to the output sink), appends `do` to the
    /// window, then notifies every other listener.
    pub fn translate(&mut self, chord: Chord) {
        trace!("translate: {}", chord.rtfcre());
        let (undo, mut do_) = if chord.is_correction() {
            self.translate_correction()
        } else {
            self.translate_normal(chord)
        };

        let prev = self.prev().cloned();
        self.formatter.format(&undo, &mut do_, prev.as_ref());

        for t in &do_ {
            self.translations.push_back(t.clone());
        }
        self.trim();

        for listener in self.listeners.iter_mut() {
            listener(&undo, &do_, prev.as_ref());
        }
    }

    /// Pops the most recent translation and, if it had supplanted earlier
    /// ones, restores them. Does not push anything back itself; `translate`
    /// does that uniformly for both branches after formatting.
    fn translate_correction(&mut self) -> (Vec<Translation>, Vec<Translation>) {
        match self.translations.pop_back() {
            None => (Vec::new(), Vec::new()),
            Some(t) => {
                let restored = t.replaced.clone();
                (vec![t], restored)
            }
        }
    }

    fn translate_normal(&mut self, chord: Chord) -> (Vec<Translation>, Vec<Translation>) {
        let longest = self.dictionary.longest_key();
        let max_k = longest.min(self.translations.len() + 1).saturating_sub(1);

        let mut k = max_k;
        loop {
            let window_start = self.translations.len() - k;
            let mut rtfcre: Vec<String> = self
                .translations
                .range(window_start..)
                .flat_map(|t| t.rtfcre.iter().cloned())
                .collect();
            rtfcre.push(chord.rtfcre().to_string());

            if let Some(value) = self.dictionary.get(&rtfcre) {
                trace!("dictionary hit for {:?} ({} stroke(s) replaced)", rtfcre, k);
                let value = value.to_string();
                let replaced: Vec<Translation> =
                    self.translations.split_off(window_start).into_iter().collect();
                let mut strokes: Vec<Chord> = replaced
                    .iter()
                    .flat_map(|t| t.strokes.iter().cloned())
                    .collect();
                strokes.push(chord);

                let new_translation = Translation {
                    strokes,
                    rtfcre,
                    english: Some(value),
                    replaced: replaced.clone(),
                    formatting: Vec::new(),
                };
                return (replaced, vec![new_translation]);
            }

            if k == 0 {
                break;
            }
            k -= 1;
        }

        trace!("no dictionary match, emitting raw translation");
        (Vec::new(), vec![Translation::raw(chord)])
    }

    fn trim(&mut self) {
        while self.translations.len() > self.undo_length {
            if let Some(evicted) = self.translations.pop_front() {
                self.tail = Some(evicted);
            }
        }
    }
}
