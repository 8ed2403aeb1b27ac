use cadence_core::Machine;
use cadence_engine::config::{self, InputMachineType};
use cadence_engine::Engine;
use cadence_input_geminipr::GeminiprMachine;
use cadence_input_keyboard::KeyboardMachine;
use cadence_input_stdin::StdinMachine;
use cadence_translate::Orthography;
use clap::{App, Arg};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process;

fn main() {
    env_logger::init();

    let matches = App::new("cadence")
        .about("A stenographic text-input engine")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .takes_value(true)
                .help("Path to a TOML config file"),
        )
        .arg(
            Arg::with_name("dry-run")
                .long("dry-run")
                .help("Print actions to stdout instead of the real keyboard"),
        )
        .arg(
            Arg::with_name("stdin")
                .long("stdin")
                .help("Read strokes from stdin regardless of what the config selects"),
        )
        .get_matches();

    let config_path = matches
        .value_of("config")
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    let raw_config = std::fs::read_to_string(&config_path).unwrap_or_default();
    let cfg = match config::load(&raw_config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("failed to parse config at {:?}: {}", config_path, e);
            process::exit(1);
        }
    };

    let base_path: PathBuf = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let dict_paths = cfg.get_dicts(&base_path);
    let output = cfg.get_output(matches.is_present("dry-run"));

    let mut engine = match Engine::new(&dict_paths, output) {
        Ok(engine) => engine,
        Err(e) => {
            error!("failed to load dictionaries: {}", e);
            process::exit(1);
        }
    };

    engine.set_undo_length(cfg.undo_length);
    if let Some(path) = cfg.get_orthography_path(&base_path) {
        engine.set_orthography(Orthography::load(path));
    }
    engine.set_log_strokes(true);
    engine.set_log_translations(true);

    info!("cadence starting up");

    let input = if matches.is_present("stdin") {
        InputMachineType::Stdin
    } else {
        cfg.input_machine
    };

    match input {
        InputMachineType::Stdin => match StdinMachine::new(()) {
            Ok(mut machine) => machine.listen(|chord| engine.process_chord(chord)),
            Err(e) => {
                error!("failed to start stdin machine: {}", e);
                process::exit(1);
            }
        },
        InputMachineType::Keyboard => match KeyboardMachine::new(()) {
            Ok(mut machine) => machine.listen(|chord| engine.process_chord(chord)),
            Err(e) => {
                error!("failed to start keyboard machine: {}", e);
                process::exit(1);
            }
        },
        InputMachineType::Geminipr { port } => match GeminiprMachine::new(port) {
            Ok(mut machine) => machine.listen(|chord| engine.process_chord(chord)),
            Err(e) => {
                error!("failed to connect to the geminipr machine: {}", e);
                process::exit(1);
            }
        },
    }
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cadence")
        .join("config.toml")
}
