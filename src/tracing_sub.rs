use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::Level;

/// Per-event writer handed out by [`SubscriberMakeWriter`].
pub struct DelegatingWriter {
    inner: DelegatingInner,
}

enum DelegatingInner {
    File(Arc<Mutex<File>>),
    // the TUI owns stdout/stderr, so without a log file output is dropped
    Sink(io::Sink),
}

fn poisoned() -> io::Error {
    io::Error::other("log file lock poisoned")
}

impl Write for DelegatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            DelegatingInner::File(f) => f.lock().map_err(|_| poisoned())?.write(buf),
            DelegatingInner::Sink(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            DelegatingInner::File(f) => f.lock().map_err(|_| poisoned())?.flush(),
            DelegatingInner::Sink(s) => s.flush(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SubscriberMakeWriter {
    file: Option<Arc<Mutex<File>>>,
}

impl SubscriberMakeWriter {
    /// Writer that discards everything.
    pub fn sink() -> Self {
        Self::default()
    }

    /// Append to `path`, creating it if needed.
    pub fn file(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Some(Arc::new(Mutex::new(file))),
        })
    }

    fn writer(&self) -> DelegatingWriter {
        let inner = match &self.file {
            Some(file) => DelegatingInner::File(Arc::clone(file)),
            None => DelegatingInner::Sink(io::sink()),
        };
        DelegatingWriter { inner }
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = DelegatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.writer()
    }
}

/// Install the global fmt subscriber, writing to `log_file` when given and
/// discarding output otherwise. Later calls leave the first subscriber in
/// place.
pub fn init(log_file: Option<&Path>, level: Level) -> io::Result<()> {
    let writer = match log_file {
        Some(path) => SubscriberMakeWriter::file(path)?,
        None => SubscriberMakeWriter::sink(),
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_thread_names(false)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    #[test]
    fn file_writer_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wm.log");
        std::fs::write(&path, "first\n").unwrap();
        let make = SubscriberMakeWriter::file(&path).unwrap();
        let mut w = make.make_writer();
        w.write_all(b"second\n").unwrap();
        w.flush().unwrap();
        drop(w);
        let mut again = make.make_writer();
        again.write_all(b"third\n").unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "first\nsecond\nthird\n");
    }

    #[test]
    fn sink_swallows_output() {
        let make = SubscriberMakeWriter::sink();
        let mut w = make.make_writer();
        assert_eq!(w.write(b"dropped").unwrap(), 7);
        w.flush().unwrap();
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("wm.log");
        assert!(SubscriberMakeWriter::file(&path).is_err());
        assert!(init(Some(&path), Level::DEBUG).is_err());
    }
}
