//! The machine-driver contract: anything that can produce [`Chord`] values
//! in real time off some physical or virtual stenotype.
use crate::Chord;

/// A stenography machine (or equivalent). Implementors own whatever thread
/// or event loop is needed to read hardware and call `on_chord` as strokes
/// arrive; this crate places no constraint on how that happens beyond "one
/// call per stroke."
pub trait Machine {
    type Config;
    type Error;

    fn new(config: Self::Config) -> Result<Self, Self::Error>
    where
        Self: Sized;

    /// Start listening, invoking `on_chord` for every stroke until the
    /// machine is dropped or the underlying connection closes.
    fn listen<F>(&mut self, on_chord: F)
    where
        F: FnMut(Chord);
}
