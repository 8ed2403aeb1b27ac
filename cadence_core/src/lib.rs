mod action;
mod chord;
mod machine;
mod output;

pub use action::Action;
pub use chord::{Chord, UnknownChordKey};
pub use machine::Machine;
pub use output::{NullOutput, Output};
