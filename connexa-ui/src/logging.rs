//! `tracing` output for the browser: one `console.log` call per event.

use std::io;

use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

struct ConsoleMakeWriter;

/// Buffers one formatted event and hands it to the console when dropped.
struct ConsoleWriter(Vec<u8>);

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter(Vec::new())
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.0);
        let line = line.trim_end();
        if !line.is_empty() {
            web_sys::console::log_1(&line.into());
        }
    }
}

pub fn init() {
    let level = if cfg!(debug_assertions) { Level::DEBUG } else { Level::INFO };
    // No clock on wasm32-unknown-unknown; timestamps come from the devtools.
    let installed = tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .without_time()
        .with_ansi(false)
        .with_max_level(level)
        .try_init();
    if let Err(e) = installed {
        web_sys::console::warn_1(&format!("tracing already initialised: {e}").into());
    }
}
