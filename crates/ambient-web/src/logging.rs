//! `tracing` output routed to the browser console.
//!
//! The subscriber is the ordinary `fmt` layer without timestamps or ANSI
//! escapes; each formatted event is buffered and handed to a sink once the
//! formatter drops its writer, so one event becomes one console entry at the
//! matching level.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

/// Receives one formatted event.
pub type Sink = fn(Level, &str);

#[derive(Clone, Copy)]
pub struct ConsoleMakeWriter {
    sink: Sink,
}

impl ConsoleMakeWriter {
    pub fn new(sink: Sink) -> Self {
        Self { sink }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn browser() -> Self {
        Self::new(browser_console)
    }

    fn writer(&self, level: Level) -> ConsoleWriter {
        ConsoleWriter {
            sink: self.sink,
            level,
            buffer: Vec::new(),
        }
    }
}

pub struct ConsoleWriter {
    sink: Sink,
    level: Level,
    buffer: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.buffer);
        let text = text.trim_end();
        if !text.is_empty() {
            (self.sink)(self.level, text);
        }
    }
}

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.writer(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        self.writer(*meta.level())
    }
}

/// Installs the global subscriber. Debug builds log at `debug`, release
/// builds at `info`. A second call keeps the first subscriber.
pub fn init(writer: ConsoleMakeWriter) {
    let max_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_max_level(max_level)
        .without_time()
        .with_ansi(false)
        .with_target(false)
        .try_init();
}

#[cfg(target_arch = "wasm32")]
fn browser_console(level: Level, text: &str) {
    use web_sys::console;

    let message = wasm_bindgen::JsValue::from_str(text);
    match level {
        Level::ERROR => console::error_1(&message),
        Level::WARN => console::warn_1(&message),
        Level::INFO => console::info_1(&message),
        _ => console::debug_1(&message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::Write;

    thread_local! {
        static CAPTURED: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
    }

    fn capture(level: Level, text: &str) {
        CAPTURED.with(|captured| captured.borrow_mut().push((level, text.to_owned())));
    }

    fn take_captured() -> Vec<(Level, String)> {
        CAPTURED.with(|captured| captured.take())
    }

    #[test]
    fn one_entry_per_writer_at_its_level() {
        let make = ConsoleMakeWriter::new(capture);
        {
            let mut writer = make.writer(Level::WARN);
            write!(writer, "frame draw ").unwrap();
            writeln!(writer, "failed").unwrap();
        }
        drop(make.writer(Level::DEBUG));

        assert_eq!(take_captured(), vec![(Level::WARN, "frame draw failed".to_string())]);
    }

    #[test]
    fn formatted_events_reach_the_sink() {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(ConsoleMakeWriter::new(capture))
            .with_max_level(Level::DEBUG)
            .without_time()
            .with_ansi(false)
            .with_target(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(effect = "RayField", "mount failed");
            tracing::debug!("effect stopped");
        });

        let captured = take_captured();
        assert_eq!(captured.len(), 2);
        assert_eq!(captured[0].0, Level::ERROR);
        assert!(captured[0].1.contains("mount failed"));
        assert!(captured[0].1.contains("effect=\"RayField\""));
        assert_eq!(captured[1].0, Level::DEBUG);
    }
}
