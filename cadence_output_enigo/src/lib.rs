//! An `Output` that drives the real keyboard via `enigo`, replaying
//! backspaces, literal text, and key combinations as synthetic input.
use cadence_core::Output;
use enigo::{Enigo, Key, KeyboardControllable};
use std::{process::Command as ProcessCommand, thread, time::Duration};

// NOTE: enigo imposes its own ~20ms delay per key event, so these are mostly
// vestigial, but keeping them named makes the call sites self-documenting.
const BACKSPACE_DELAY: u64 = 2;
const KEY_DELAY: u64 = 5;
const KEY_HOLD_DELAY: u64 = 2;

/// A combo descriptor is a space-separated list of key names, e.g.
/// `"Control Shift Left"`, where every token but the last is held down as a
/// modifier and the last is the key that's clicked. `"Shell: cmd arg1 arg2"`
/// instead runs `cmd` as a subprocess, for launching external editing tools.
pub struct EnigoOutput {
    enigo: Enigo,
}

impl Default for EnigoOutput {
    fn default() -> Self {
        Self { enigo: Enigo::new() }
    }
}

impl EnigoOutput {
    pub fn new() -> Self {
        Self::default()
    }

    fn type_with_delay(&mut self, text: &str, delay: u64) {
        for c in text.chars() {
            self.enigo.key_sequence(&c.to_string());
            thread::sleep(Duration::from_millis(delay));
        }
    }

    fn backspace(&mut self, num: u32, delay: u64) {
        for _ in 0..num {
            self.enigo.key_click(Key::Backspace);
            thread::sleep(Duration::from_millis(delay));
        }
    }

    fn key_combo(&mut self, keys: &[Key], delay: u64) {
        for k in keys {
            self.enigo.key_down(*k);
            thread::sleep(Duration::from_millis(delay));
        }
        for k in keys {
            self.enigo.key_up(*k);
        }
    }
}

impl Output for EnigoOutput {
    fn send_backspaces(&mut self, n: u32) {
        if n > 0 {
            self.backspace(n, BACKSPACE_DELAY);
        }
    }

    fn send_string(&mut self, s: &str) {
        if !s.is_empty() {
            self.type_with_delay(s, KEY_DELAY);
        }
    }

    fn send_key_combination(&mut self, combo: &str) {
        if let Some(shell) = combo.strip_prefix("Shell:") {
            let mut parts = shell.split_whitespace();
            if let Some(cmd) = parts.next() {
                dispatch_shell(cmd, parts.map(String::from).collect());
            }
            return;
        }

        let keys: Vec<Key> = combo.split_whitespace().filter_map(key_from_name).collect();
        if !keys.is_empty() {
            self.key_combo(&keys, KEY_HOLD_DELAY);
        }
    }

    fn send_engine_command(&mut self, command: &str) {
        // engine-level commands (undo, mode switches, ...) are handled by
        // the embedder's engine, not the keystroke sink.
        log::debug!("ignoring engine command at the output layer: {}", command);
    }
}

fn key_from_name(name: &str) -> Option<Key> {
    Some(match name {
        "Backspace" => Key::Backspace,
        "CapsLock" => Key::CapsLock,
        "Delete" => Key::Delete,
        "Down" => Key::DownArrow,
        "End" => Key::End,
        "Escape" => Key::Escape,
        "Home" => Key::Home,
        "Left" => Key::LeftArrow,
        "PageDown" => Key::PageDown,
        "PageUp" => Key::PageUp,
        "Return" | "Enter" => Key::Return,
        "Right" => Key::RightArrow,
        "Space" => Key::Space,
        "Tab" => Key::Tab,
        "Up" => Key::Raw(0x7e), // matches a known enigo quirk on some platforms
        "Control" => Key::Control,
        "Alt" => Key::Alt,
        "Meta" => Key::Meta,
        "Option" => Key::Option,
        "Shift" => Key::Shift,
        single if single.chars().count() == 1 => Key::Layout(single.chars().next().unwrap()),
        _ => return None,
    })
}

fn dispatch_shell(cmd: &str, args: Vec<String>) {
    if let Err(e) = ProcessCommand::new(cmd).args(args).spawn() {
        log::warn!("could not execute shell command {:?}: {}", cmd, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_name_recognizes_modifiers_and_letters() {
        assert!(matches!(key_from_name("Control"), Some(Key::Control)));
        assert!(matches!(key_from_name("a"), Some(Key::Layout('a'))));
        assert!(key_from_name("nonsense_token").is_none());
    }
}
