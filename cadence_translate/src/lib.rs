pub mod dictionary;
pub mod formatter;
pub mod translator;

pub use dictionary::{load_dict, Dictionary, DictionaryLoadError};
pub use formatter::{Formatter, Orthography};
pub use translator::{Translation, Translator, TranslatorState};
