//! Sinks - destinations for serialized log lines
//!
//! Anything that can accept a byte buffer can be a [`Sink`]: stdout, a file,
//! an in-memory buffer, or the rotation engine. Sinks are shared as
//! [`SharedSink`] handles and are written through `&self`, so each sink
//! guards its own state.

mod multi;

pub use multi::MultiWriter;

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::SinkResult;

/// A destination for serialized log lines
pub trait Sink: Send + Sync {
    /// Write the whole buffer, returning the number of bytes accepted
    fn write(&self, buf: &[u8]) -> SinkResult<usize>;

    /// Flush buffered output
    fn flush(&self) -> SinkResult<()> {
        Ok(())
    }
}

/// Shared sink handle; identity is the pointed-to allocation
pub type SharedSink = Arc<dyn Sink>;

/// Whether two handles point at the same sink
pub fn same_sink(a: &SharedSink, b: &SharedSink) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

/// Adapter that turns any [`std::io::Write`] into a [`Sink`]
#[derive(Debug)]
pub struct IoSink<W> {
    inner: Mutex<W>,
}

impl<W: Write + Send> IoSink<W> {
    /// Wrap a writer
    pub fn new(inner: W) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }

    /// Unwrap the writer
    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }
}

impl<W: Write + Send> Sink for IoSink<W> {
    fn write(&self, buf: &[u8]) -> SinkResult<usize> {
        self.inner.lock().write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&self) -> SinkResult<()> {
        self.inner.lock().flush()?;
        Ok(())
    }
}

/// Process standard output
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn write(&self, buf: &[u8]) -> SinkResult<usize> {
        std::io::stdout().lock().write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&self) -> SinkResult<()> {
        std::io::stdout().lock().flush()?;
        Ok(())
    }
}

/// Growable in-memory buffer; clones share the same buffer
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far
    pub fn contents(&self) -> Vec<u8> {
        self.buf.lock().clone()
    }

    /// Everything written so far, lossily decoded and split into lines
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.buf.lock())
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Drop everything written so far
    pub fn clear(&self) {
        self.buf.lock().clear();
    }
}

impl Sink for MemorySink {
    fn write(&self, buf: &[u8]) -> SinkResult<usize> {
        self.buf.lock().extend_from_slice(buf);
        Ok(buf.len())
    }
}
