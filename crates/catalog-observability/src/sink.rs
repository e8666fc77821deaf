//! Log output targets.

use std::sync::{Arc, Mutex};

use crate::logging::LogLevel;

/// Destination for formatted log lines.
pub trait LogSink: Send + Sync + 'static {
    fn write(&self, level: LogLevel, line: &str);
}

/// Browser console on `wasm32`, stderr elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

#[cfg(target_arch = "wasm32")]
impl LogSink for ConsoleSink {
    fn write(&self, level: LogLevel, line: &str) {
        use wasm_bindgen::JsValue;
        use web_sys::console;

        let line = JsValue::from_str(line);
        match level {
            LogLevel::Trace | LogLevel::Debug => console::debug_1(&line),
            LogLevel::Info => console::info_1(&line),
            LogLevel::Warn => console::warn_1(&line),
            LogLevel::Error => console::error_1(&line),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl LogSink for ConsoleSink {
    fn write(&self, _level: LogLevel, line: &str) {
        eprintln!("{}", line);
    }
}

/// Keeps lines in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl LogSink for MemorySink {
    fn write(&self, _level: LogLevel, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}
