use std::io;

use tracing::{Level, Metadata, Subscriber};
use tracing_subscriber::{Registry, filter::Targets, fmt::MakeWriter, reload};
use wasm_bindgen::JsValue;

use crate::tracing::*;

/// Sends formatted events to the browser console, one console call per
/// event, picking the console method from the event level.
#[derive(Clone, Copy, Default)]
pub struct ConsoleMakeWriter;

pub struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let message = String::from_utf8_lossy(&self.buffer);
        let message = JsValue::from_str(message.trim_end());
        match self.level {
            Level::ERROR => web_sys::console::error_1(&message),
            Level::WARN => web_sys::console::warn_1(&message),
            Level::INFO => web_sys::console::info_1(&message),
            Level::DEBUG => web_sys::console::debug_1(&message),
            Level::TRACE => web_sys::console::log_1(&message),
        }
        self.buffer.clear();
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            level: Level::INFO,
            buffer: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            level: *meta.level(),
            buffer: Vec::new(),
        }
    }
}

/// Handle used to swap the console filter once the configuration is read.
pub(super) type FilterHandle = reload::Handle<Targets, Registry>;

/// Parses the configured console filter, falling back to `info` for every
/// target when it cannot be read.
pub(super) fn console_filter(directives: &str) -> Targets {
    match directives.parse::<Targets>() {
        Ok(targets) => targets,
        Err(err) => {
            warn!("ignored invalid log filter {directives:?}: {err}");
            default_filter()
        }
    }
}

fn default_filter() -> Targets {
    Targets::new().with_default(Level::INFO)
}

/// A registry with one fmt layer writing to `writer`, filtered at `info`
/// until the returned handle reloads it.
pub(super) fn subscriber<W>(
    writer: W,
) -> (impl Subscriber + Send + Sync + 'static, FilterHandle)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    use tracing_subscriber::{fmt, prelude::*};

    let (filter, handle) = reload::Layer::new(default_filter());
    let layer = fmt::layer()
        .without_time()
        .with_target(true)
        .with_writer(writer)
        .with_filter(filter);

    (tracing_subscriber::registry().with(layer), handle)
}

/// Installs console logging. Returns `None` when a subscriber is already
/// set, in which case the filter stays as it is.
pub(super) fn logging() -> Option<FilterHandle> {
    let (subscriber, handle) = subscriber(ConsoleMakeWriter);
    match tracing::subscriber::set_global_default(subscriber) {
        Ok(()) => Some(handle),
        Err(_) => {
            trace!(TraceLevel::DEBUG, "logging already installed");
            None
        }
    }
}

pub(super) fn apply_filter(handle: Option<&FilterHandle>, directives: &str) {
    let Some(handle) = handle else {
        return;
    };
    if let Err(err) = handle.reload(console_filter(directives)) {
        trace!(TraceLevel::ERROR, "failed to apply log filter: {err}");
    }
}
