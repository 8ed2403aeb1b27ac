//! A `Machine` driven by a GeminiPR-protocol serial stenotype (e.g. a
//! Georgi or any machine emulating the Gemini PR wire format).
use cadence_core::{Chord, Machine};
use log::{info, warn};
use serialport::SerialPortSettings;
use std::{fmt, io::ErrorKind, io::Read, thread, time::Duration};

mod raw_stroke;
use raw_stroke::RawStroke;

const READ_RATE_MS: u64 = 50;
const BUF_SIZE: usize = 6;

/// Failure to open or maintain the serial connection.
#[derive(Debug)]
pub struct GeminiprError(String);

impl fmt::Display for GeminiprError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "geminipr machine error: {}", self.0)
    }
}

impl std::error::Error for GeminiprError {}

pub struct GeminiprMachine {
    port: Box<dyn serialport::SerialPort>,
}

impl Machine for GeminiprMachine {
    type Config = String;
    type Error = GeminiprError;

    fn new(port_name: Self::Config) -> Result<Self, Self::Error> {
        let settings = SerialPortSettings::default();
        let port = serialport::open_with_settings(&port_name, &settings)
            .map_err(|e| GeminiprError(format!("failed to open {:?}: {}", port_name, e)))?;
        Ok(GeminiprMachine { port })
    }

    /// Reads fixed-size packets until the port disconnects, converting each
    /// to a chord and handing it to `on_chord`. A read timeout just means
    /// there's nothing new yet, so it's not an error worth stopping over.
    fn listen<F>(&mut self, mut on_chord: F)
    where
        F: FnMut(Chord),
    {
        let sleep_time = Duration::from_millis(READ_RATE_MS);
        let mut buf = [0u8; BUF_SIZE];

        loop {
            match self.port.read_exact(&mut buf) {
                Ok(()) => {
                    let keys = RawStroke::parse_raw(&buf).into_keys();
                    if keys.is_empty() {
                        continue;
                    }
                    match Chord::new(keys) {
                        Ok(chord) => on_chord(chord),
                        Err(e) => warn!("{}", e),
                    }
                }
                Err(e) => match e.kind() {
                    ErrorKind::TimedOut => thread::sleep(sleep_time),
                    ErrorKind::BrokenPipe => {
                        info!("machine disconnected, stopping");
                        return;
                    }
                    _ => {
                        warn!("error reading from machine: {}", e);
                        return;
                    }
                },
            }
        }
    }
}
