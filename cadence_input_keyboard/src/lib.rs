//! A `Machine` that treats an ordinary QWERTY keyboard as a steno machine,
//! grabbing raw key events system-wide and grouping simultaneously-held keys
//! into a single chord once every key in the group has been released.
#[macro_use]
extern crate lazy_static;

use cadence_core::{Chord, Machine};
use log::warn;
use rdev::{Event, EventType};
use std::{
    collections::HashSet,
    fmt,
    hash::Hash,
    sync::{
        mpsc,
        mpsc::{Receiver, Sender},
        Arc, Mutex,
    },
};

#[derive(Debug, PartialEq, Eq, Hash)]
struct Key(String);

impl Key {
    fn new(key: rdev::Key) -> Self {
        Self(format!("{:?}", key))
    }
}

/// Failure to start listening to the system keyboard.
#[derive(Debug)]
pub struct KeyboardError(String);

impl fmt::Display for KeyboardError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "couldn't listen to system events: {}", self.0)
    }
}

impl std::error::Error for KeyboardError {}

/// Listens to the keyboard as a steno machine.
///
/// Only one keyboard machine should be created at a time; the grab is
/// installed once, globally, on first use (see `PASSER`).
pub struct KeyboardMachine {
    down_keys: HashSet<Key>,
    up_keys: HashSet<Key>,
    chord_keys: Option<Vec<String>>,
}

impl Default for KeyboardMachine {
    fn default() -> Self {
        Self {
            down_keys: HashSet::new(),
            up_keys: HashSet::new(),
            chord_keys: None,
        }
    }
}

impl KeyboardMachine {
    fn handle_key(&mut self, key: Key, is_down: bool) {
        if is_down {
            self.down_keys.insert(key);
        } else {
            self.down_keys.remove(&key);
            self.up_keys.insert(key);

            // the chord is complete once every key that was held is back up
            if self.down_keys.is_empty() {
                let keys = convert_chord(&Layout::steno_qwerty(), &self.up_keys);
                if keys.is_some() {
                    self.chord_keys = keys;
                }
                self.up_keys.clear();
            }
        }
    }

    /// Returns the chord that has been formed, if any, moving it out of the
    /// machine.
    fn take_chord(&mut self) -> Option<Vec<String>> {
        self.chord_keys.take()
    }
}

/// A mapping from hardware keys to steno key symbols.
struct Layout {
    left_keys: Vec<(Key, &'static str)>,
    center_left_keys: Vec<(Key, &'static str)>,
    star_keys: Vec<Key>,
    center_right_keys: Vec<(Key, &'static str)>,
    right_keys: Vec<(Key, &'static str)>,
    num_keys: Vec<Key>,
}

impl Layout {
    fn steno_qwerty() -> Self {
        Self {
            left_keys: vec![
                (Key::new(rdev::Key::KeyQ), "S-"),
                (Key::new(rdev::Key::KeyA), "S-"),
                (Key::new(rdev::Key::KeyW), "T-"),
                (Key::new(rdev::Key::KeyS), "K-"),
                (Key::new(rdev::Key::KeyE), "P-"),
                (Key::new(rdev::Key::KeyD), "W-"),
                (Key::new(rdev::Key::KeyR), "H-"),
                (Key::new(rdev::Key::KeyF), "R-"),
            ],
            center_left_keys: vec![
                (Key::new(rdev::Key::KeyC), "A-"),
                (Key::new(rdev::Key::KeyV), "O-"),
            ],
            star_keys: vec![
                Key::new(rdev::Key::KeyT),
                Key::new(rdev::Key::KeyG),
                Key::new(rdev::Key::KeyY),
                Key::new(rdev::Key::KeyH),
            ],
            center_right_keys: vec![
                (Key::new(rdev::Key::KeyN), "-E"),
                (Key::new(rdev::Key::KeyM), "-U"),
            ],
            right_keys: vec![
                (Key::new(rdev::Key::KeyU), "-F"),
                (Key::new(rdev::Key::KeyJ), "-R"),
                (Key::new(rdev::Key::KeyI), "-P"),
                (Key::new(rdev::Key::KeyK), "-B"),
                (Key::new(rdev::Key::KeyO), "-L"),
                (Key::new(rdev::Key::KeyL), "-G"),
                (Key::new(rdev::Key::KeyP), "-T"),
                (Key::new(rdev::Key::SemiColon), "-S"),
                (Key::new(rdev::Key::LeftBracket), "-D"),
                (Key::new(rdev::Key::Quote), "-Z"),
            ],
            num_keys: vec![
                Key::new(rdev::Key::Num1),
                Key::new(rdev::Key::Num2),
                Key::new(rdev::Key::Num3),
                Key::new(rdev::Key::Num4),
                Key::new(rdev::Key::Num5),
                Key::new(rdev::Key::Num6),
                Key::new(rdev::Key::Num7),
                Key::new(rdev::Key::Num8),
                Key::new(rdev::Key::Num9),
                Key::new(rdev::Key::Num0),
                Key::new(rdev::Key::Minus),
                Key::new(rdev::Key::KeyX),
                Key::new(rdev::Key::Comma),
            ],
        }
    }
}

/// Converts the set of keys held down for one chord into the steno key
/// symbols `Chord::new` expects. Returns `None` if none of the held keys
/// mapped to anything.
fn convert_chord(layout: &Layout, keys: &HashSet<Key>) -> Option<Vec<String>> {
    let mut chord_keys: Vec<String> = Vec::new();

    for (k, symbol) in &layout.left_keys {
        if keys.contains(k) {
            chord_keys.push(symbol.to_string());
        }
    }
    for (k, symbol) in &layout.center_left_keys {
        if keys.contains(k) {
            chord_keys.push(symbol.to_string());
        }
    }
    for k in &layout.star_keys {
        if keys.contains(k) {
            chord_keys.push("*".to_string());
        }
    }
    for (k, symbol) in &layout.center_right_keys {
        if keys.contains(k) {
            chord_keys.push(symbol.to_string());
        }
    }
    for (k, symbol) in &layout.right_keys {
        if keys.contains(k) {
            chord_keys.push(symbol.to_string());
        }
    }
    for k in &layout.num_keys {
        if keys.contains(k) {
            chord_keys.push("#".to_string());
        }
    }

    if chord_keys.is_empty() {
        None
    } else {
        Some(chord_keys)
    }
}

lazy_static! {
    // Bridges rdev::grab's fn-pointer callback to whatever closure `listen`
    // was called with.
    static ref PASSER: (
        Arc<Mutex<Sender<(Key, bool)>>>,
        Arc<Mutex<Receiver<(Key, bool)>>>
    ) = {
        std::thread::spawn(|| {
            if let Err(e) = rdev::grab(handle_event) {
                panic!("couldn't listen to system events: {:?}", e);
            }
        });

        let (sender, receiver) = mpsc::channel();
        (Arc::new(Mutex::new(sender)), Arc::new(Mutex::new(receiver)))
    };
}

impl Machine for KeyboardMachine {
    type Config = ();
    type Error = KeyboardError;

    fn new(_config: Self::Config) -> Result<Self, Self::Error> {
        Ok(KeyboardMachine::default())
    }

    fn listen<F>(&mut self, mut on_chord: F)
    where
        F: FnMut(Chord),
    {
        loop {
            {
                let receiver = PASSER.1.lock().unwrap();
                if let Ok((key, is_down)) = receiver.recv() {
                    self.handle_key(key, is_down);
                } else {
                    return;
                }
            }

            if let Some(keys) = self.take_chord() {
                match Chord::new(keys) {
                    Ok(chord) => on_chord(chord),
                    Err(e) => warn!("{}", e),
                }
            }
        }
    }
}

/// Handles one native event. Used as a fn pointer in `rdev::grab`, which
/// rules out capturing state directly; the channel in `PASSER` is the
/// workaround. We never see keystrokes we ourselves dispatched: those go out
/// via a separate session, while this listens at the HID layer.
fn handle_event(event: Event) -> Option<Event> {
    let (key, is_down) = match event.event_type {
        EventType::KeyPress(key) => (key, true),
        EventType::KeyRelease(key) => (key, false),
        _ => return Some(event),
    };

    let sender = PASSER.0.lock().unwrap();
    sender.send((Key::new(key), is_down)).unwrap();

    // suppress the event so it doesn't also reach other applications
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(keys: Vec<rdev::Key>) -> Option<Chord> {
        convert_chord(
            &Layout::steno_qwerty(),
            &keys.into_iter().map(Key::new).collect::<HashSet<_>>(),
        )
        .map(|keys| Chord::new(keys).unwrap())
    }

    #[test]
    fn test_convert_chord_basic() {
        assert_eq!(
            convert(vec![rdev::Key::KeyQ, rdev::Key::KeyA, rdev::Key::KeyT, rdev::Key::KeyG])
                .unwrap()
                .rtfcre(),
            "S*"
        );
        assert_eq!(
            convert(vec![rdev::Key::KeyQ, rdev::Key::KeyC, rdev::Key::KeyU])
                .unwrap()
                .rtfcre(),
            "SAF"
        );
        assert!(convert(vec![rdev::Key::BackSlash]).is_none());
    }

    #[test]
    fn test_handle_key_forms_chord_on_release() {
        let mut m = KeyboardMachine::default();
        m.handle_key(Key::new(rdev::Key::KeyQ), true);
        assert!(m.take_chord().is_none());
        m.handle_key(Key::new(rdev::Key::KeyW), true);
        assert!(m.take_chord().is_none());
        m.handle_key(Key::new(rdev::Key::KeyQ), false);
        assert!(m.take_chord().is_none());
        m.handle_key(Key::new(rdev::Key::KeyW), false);

        let keys = m.take_chord().unwrap();
        assert_eq!(Chord::new(keys).unwrap().rtfcre(), "ST");
    }

    #[test]
    fn test_handle_key_ignores_unmapped_keys() {
        let mut m = KeyboardMachine::default();
        m.handle_key(Key::new(rdev::Key::KeyQ), true);
        m.handle_key(Key::new(rdev::Key::BackSlash), true);
        m.handle_key(Key::new(rdev::Key::BackSlash), false);
        m.handle_key(Key::new(rdev::Key::KeyQ), false);

        let keys = m.take_chord().unwrap();
        assert_eq!(Chord::new(keys).unwrap().rtfcre(), "S");
    }

    #[test]
    fn test_handle_key_multiple_chords() {
        let mut m = KeyboardMachine::default();
        m.handle_key(Key::new(rdev::Key::KeyQ), true);
        m.handle_key(Key::new(rdev::Key::KeyW), true);
        m.handle_key(Key::new(rdev::Key::KeyW), false);
        m.handle_key(Key::new(rdev::Key::KeyQ), false);
        assert_eq!(
            Chord::new(m.take_chord().unwrap()).unwrap().rtfcre(),
            "ST"
        );

        m.handle_key(Key::new(rdev::Key::KeyU), true);
        m.handle_key(Key::new(rdev::Key::KeyI), true);
        m.handle_key(Key::new(rdev::Key::KeyI), false);
        m.handle_key(Key::new(rdev::Key::KeyU), false);
        assert_eq!(
            Chord::new(m.take_chord().unwrap()).unwrap().rtfcre(),
            "-FP"
        );
    }
}
