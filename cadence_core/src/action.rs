//! A single unit of output and text-cursor state transition, emitted by the
//! formatter for each atom of a translation.

/// State and instruction fields produced while walking a translation's
/// atoms. State fields describe the cursor-side text context *after* this
/// action; instruction fields describe what to actually emit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Action {
    // State fields.
    /// The next emission should not insert a leading space.
    pub attach: bool,
    /// The next emission, if it is also glue, should not insert a space.
    pub glue: bool,
    /// The rightmost word as currently known, used by suffix inflection.
    pub word: String,
    /// The next text emission should uppercase its first character.
    pub capitalize: bool,

    // Instruction fields.
    /// Literal text to send.
    pub text: String,
    /// Text to backspace-then-resend, for in-place rewrites.
    pub replace: String,
    /// A key-combination descriptor to send.
    pub combo: String,
    /// An engine-level command name to dispatch.
    pub command: String,
}

impl Action {
    /// An action that carries this action's state fields forward with empty
    /// instruction fields — used whenever an atom only changes context
    /// (e.g. `{-|}`) without emitting anything of its own.
    pub fn copy_state(&self) -> Self {
        Action {
            attach: self.attach,
            glue: self.glue,
            word: self.word.clone(),
            capitalize: self.capitalize,
            ..Action::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_state_clears_instructions() {
        let a = Action {
            attach: true,
            glue: true,
            word: "hello".to_string(),
            capitalize: true,
            text: "hi".to_string(),
            replace: "by".to_string(),
            combo: "C-a".to_string(),
            command: "UNDO".to_string(),
        };
        let copy = a.copy_state();
        assert_eq!(copy.attach, a.attach);
        assert_eq!(copy.glue, a.glue);
        assert_eq!(copy.word, a.word);
        assert_eq!(copy.capitalize, a.capitalize);
        assert!(copy.text.is_empty());
        assert!(copy.replace.is_empty());
        assert!(copy.combo.is_empty());
        assert!(copy.command.is_empty());
    }

    #[test]
    fn test_default_is_zero_state() {
        let a = Action::default();
        assert_eq!(a, Action::copy_state(&a));
    }
}
