//! The thin coordinator binding a chord source to a translator/formatter
//! pair and an output sink. This is the only piece of the crate a machine
//! driver or a GUI embedder needs to know about.
pub mod config;

use cadence_core::{Chord, Output};
use cadence_translate::{load_dict, Dictionary, DictionaryLoadError, Orthography, Translator};
use log::{debug, info};
use std::path::Path;

/// Errors the engine's own setup can produce. Everything past setup either
/// succeeds or falls through to a raw translation; see
/// [`cadence_core::UnknownChordKey`] for the one place this crate panics.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Dictionary(#[from] DictionaryLoadError),
}

/// Owns exactly one translator (which in turn owns exactly one formatter)
/// and exposes the operations an embedder needs: feeding chords in,
/// editing the dictionary, and toggling diagnostic logging.
pub struct Engine {
    translator: Translator,
    log_strokes: bool,
    log_translations: bool,
}

impl Engine {
    /// Builds the translator from one or more dictionary files, later files
    /// overriding earlier ones on key collision, and binds `output` as the
    /// sink the formatter renders into.
    pub fn new<P: AsRef<Path>>(
        dict_paths: &[P],
        output: Box<dyn Output>,
    ) -> Result<Self, EngineError> {
        let dictionary = load_dict(dict_paths)?;
        let mut translator = Translator::new(output);
        translator.set_dictionary(dictionary);
        Ok(Engine {
            translator,
            log_strokes: false,
            log_translations: false,
        })
    }

    /// Feeds one chord through the translator, which synchronously drives
    /// the formatter and thus the output sink. The only method the
    /// machine-driver boundary calls on the hot path.
    pub fn process_chord(&mut self, chord: Chord) {
        self.translator.translate(chord);
    }

    pub fn add_translation(&mut self, key: Vec<String>, value: String) {
        self.translator.add_translation(key, value);
    }

    pub fn add_translations(&mut self, mapping: Vec<(Vec<String>, String)>) {
        self.translator.add_translations(mapping);
    }

    pub fn remove_translations(&mut self, keys: &[Vec<String>]) {
        self.translator.remove_translations(keys);
    }

    pub fn dictionary(&self) -> &Dictionary {
        self.translator.dictionary()
    }

    pub fn set_orthography(&mut self, orthography: Orthography) {
        self.translator.set_orthography(orthography);
    }

    pub fn set_undo_length(&mut self, n: usize) {
        self.translator.set_undo_length(n);
    }

    /// Swaps the output sink at runtime, e.g. to go silent in command-only
    /// mode without tearing down translator state.
    pub fn set_output(&mut self, output: Box<dyn Output>) {
        self.translator.set_output(output);
    }

    /// Toggles per-stroke diagnostic logging, independent of whether text
    /// is being emitted.
    pub fn set_log_strokes(&mut self, enabled: bool) {
        self.log_strokes = enabled;
        self.rebuild_listeners();
    }

    /// Toggles per-translation diagnostic logging.
    pub fn set_log_translations(&mut self, enabled: bool) {
        self.log_translations = enabled;
        self.rebuild_listeners();
    }

    /// Installs a listener per enabled logging flag. This is a second,
    /// independent subscription on the translator: logging never touches
    /// the formatter/output listener the translator owns directly, and
    /// toggling logging never needs to know whether output is live.
    fn rebuild_listeners(&mut self) {
        self.translator.remove_all_listeners();

        if self.log_strokes {
            self.translator.add_listener(Box::new(|undo, do_, _prev| {
                debug!(
                    "stroke: {} translation(s) undone, {} emitted",
                    undo.len(),
                    do_.len()
                );
            }));
        }

        if self.log_translations {
            self.translator.add_listener(Box::new(|_undo, do_, _prev| {
                for t in do_ {
                    info!("translation: {:?} -> {:?}", t.rtfcre, t.english);
                }
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::{Chord, NullOutput};

    fn chord(keys: &[&str]) -> Chord {
        Chord::new(keys.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    fn new_engine() -> Engine {
        Engine::new::<&str>(&[], Box::new(NullOutput::default())).unwrap()
    }

    #[test]
    fn test_new_with_no_dict_paths_starts_empty() {
        let engine = new_engine();
        assert_eq!(engine.dictionary().longest_key(), 0);
    }

    #[test]
    fn test_new_reports_missing_dict_file() {
        let result = Engine::new(&["/nonexistent/path/dict.json"], Box::new(NullOutput::default()));
        assert!(result.is_err());
    }

    #[test]
    fn test_add_and_remove_translation_round_trip() {
        let mut engine = new_engine();
        engine.add_translation(vec!["S".to_string()], "hi".to_string());
        assert_eq!(engine.dictionary().get(&["S".to_string()]), Some("hi"));

        engine.remove_translations(&[vec!["S".to_string()]]);
        assert_eq!(engine.dictionary().get(&["S".to_string()]), None);
    }

    #[test]
    fn test_process_chord_drives_translator() {
        let mut engine = new_engine();
        engine.add_translation(vec!["S".to_string()], "hello".to_string());
        // this only checks it doesn't panic; the rendered text is covered by
        // cadence_translate's own integration tests.
        engine.process_chord(chord(&["S"]));
    }

    #[test]
    fn test_toggling_logging_does_not_disturb_translation() {
        let mut engine = new_engine();
        engine.set_log_strokes(true);
        engine.set_log_translations(true);
        engine.add_translation(vec!["S".to_string()], "hi".to_string());
        engine.process_chord(chord(&["S"]));
        assert_eq!(engine.dictionary().get(&["S".to_string()]), Some("hi"));

        engine.set_log_strokes(false);
        engine.set_log_translations(false);
        engine.process_chord(chord(&["T"]));
    }
}
