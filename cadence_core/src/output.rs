//! The output sink contract consumed by the formatter.

/// Everything the formatter needs from the host to make an evolving document
/// match the stroke history. The output sink is not permitted to fail:
/// failures (e.g. the OS refusing a synthetic keystroke) are the embedder's
/// problem to surface, not this trait's.
pub trait Output {
    fn send_backspaces(&mut self, n: u32);
    fn send_string(&mut self, s: &str);
    fn send_key_combination(&mut self, combo: &str);
    fn send_engine_command(&mut self, command: &str);
}

/// An output that discards everything. Used when the engine is in
/// command-only mode: strokes still dispatch engine commands, but no text
/// or key combination ever reaches the host.
#[derive(Debug, Default)]
pub struct NullOutput;

impl Output for NullOutput {
    fn send_backspaces(&mut self, _n: u32) {}
    fn send_string(&mut self, _s: &str) {}
    fn send_key_combination(&mut self, _combo: &str) {}
    fn send_engine_command(&mut self, _command: &str) {}
}
