//! TOML configuration: which input machine and output sink to wire up, the
//! dictionary stack, and the undo-history length. Missing fields fall back
//! to documented defaults rather than failing to parse.
use cadence_core::Output;
use cadence_output_enigo::EnigoOutput;
use log::info;
use serde::Deserialize;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub input_machine: InputMachineType,
    #[serde(default)]
    pub output_dispatcher: OutputDispatchType,
    #[serde(default)]
    pub dicts: Vec<String>,
    #[serde(default)]
    pub orthography: Option<String>,
    #[serde(default = "default_undo_length")]
    pub undo_length: usize,
}

fn default_undo_length() -> usize {
    100
}

impl Config {
    /// Builds the output sink the config selects. `force_stdout` lets a CLI
    /// `--dry-run` flag override the config without editing it, matching
    /// the override pattern used for the config's other selectable pieces.
    pub fn get_output(&self, force_stdout: bool) -> Box<dyn Output> {
        let dispatcher = if force_stdout {
            info!("overriding config to output to stdout");
            &OutputDispatchType::Stdout
        } else {
            &self.output_dispatcher
        };
        info!("output to: {:?}", dispatcher);
        match dispatcher {
            OutputDispatchType::Enigo => Box::new(EnigoOutput::new()) as Box<dyn Output>,
            OutputDispatchType::Stdout => Box::new(StdoutOutput::default()) as Box<dyn Output>,
        }
    }

    /// Resolves the configured dictionary file names against `base_path`
    /// (the directory the config file itself lives in).
    pub fn get_dicts(&self, base_path: &Path) -> Vec<PathBuf> {
        self.dicts.iter().map(|p| base_path.join(p)).collect()
    }

    pub fn get_orthography_path(&self, base_path: &Path) -> Option<PathBuf> {
        self.orthography.as_ref().map(|p| base_path.join(p))
    }
}

/// Parses a config file already read into memory.
pub fn load(raw_str: &str) -> Result<Config, ConfigError> {
    toml::from_str::<Config>(raw_str).map_err(ConfigError::Parse)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize)]
pub enum InputMachineType {
    Stdin,
    Keyboard,
    Geminipr { port: String },
}

impl Default for InputMachineType {
    fn default() -> Self {
        Self::Stdin
    }
}

#[derive(Debug, Deserialize)]
pub enum OutputDispatchType {
    Enigo,
    Stdout,
}

impl Default for OutputDispatchType {
    fn default() -> Self {
        Self::Stdout
    }
}

/// A dry-run sink: prints what would have been sent to the real keyboard
/// instead of sending it.
#[derive(Default)]
struct StdoutOutput;

impl Output for StdoutOutput {
    fn send_backspaces(&mut self, n: u32) {
        println!("[backspace x{}]", n);
    }

    fn send_string(&mut self, s: &str) {
        print!("{}", s);
        let _ = std::io::stdout().flush();
    }

    fn send_key_combination(&mut self, combo: &str) {
        println!("[combo {}]", combo);
    }

    fn send_engine_command(&mut self, command: &str) {
        println!("[command {}]", command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let cfg = load("").unwrap();
        assert!(matches!(cfg.input_machine, InputMachineType::Stdin));
        assert!(matches!(cfg.output_dispatcher, OutputDispatchType::Stdout));
        assert!(cfg.dicts.is_empty());
        assert_eq!(cfg.undo_length, 100);
    }

    #[test]
    fn test_geminipr_machine_carries_port() {
        let cfg = load(
            r#"
            [input_machine]
            Geminipr = { port = "/dev/ttyUSB0" }
            "#,
        )
        .unwrap();
        match cfg.input_machine {
            InputMachineType::Geminipr { port } => assert_eq!(port, "/dev/ttyUSB0"),
            other => panic!("expected Geminipr, got {:?}", other),
        }
    }

    #[test]
    fn test_dict_paths_resolve_against_base_path() {
        let cfg = load(r#"dicts = ["base.json", "user.json"]"#).unwrap();
        let resolved = cfg.get_dicts(Path::new("/etc/cadence"));
        assert_eq!(
            resolved,
            vec![
                PathBuf::from("/etc/cadence/base.json"),
                PathBuf::from("/etc/cadence/user.json"),
            ]
        );
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(load("not valid [ toml").is_err());
    }
}
