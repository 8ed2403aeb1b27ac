//! A `Machine` that reads one stroke per line from stdin, as
//! whitespace-separated steno key symbols (e.g. `S- T- -R`). Meant for
//! manual testing of the translator/formatter pipeline without hardware.
use cadence_core::{Chord, Machine, UnknownChordKey};
use log::warn;
use std::io::{self, Write};

#[derive(Debug, Default)]
pub struct StdinMachine;

impl Machine for StdinMachine {
    type Config = ();
    type Error = io::Error;

    fn new(_config: Self::Config) -> Result<Self, Self::Error> {
        Ok(StdinMachine)
    }

    /// Prompts for and reads lines until stdin is closed. Lines that don't
    /// parse into a valid chord are reported and re-prompted rather than
    /// ending the session.
    fn listen<F>(&mut self, mut on_chord: F)
    where
        F: FnMut(Chord),
    {
        loop {
            print!("Stroke> ");
            if io::stdout().flush().is_err() {
                return;
            }

            let mut input = String::new();
            match io::stdin().read_line(&mut input) {
                Ok(0) => return,
                Ok(_) => {}
                Err(_) => return,
            }

            let keys: Vec<&str> = input.split_whitespace().collect();
            if keys.is_empty() {
                continue;
            }

            match Chord::new(keys) {
                Ok(chord) => on_chord(chord),
                Err(UnknownChordKey(key)) => {
                    warn!("unrecognized steno key {:?}, ignoring stroke", key);
                }
            }
        }
    }
}
