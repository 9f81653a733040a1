//! Mutex-guarded output sink.
//!
//! All protocol output funnels through one [`SafeSink`]. The mutex is
//! the only thing standing between concurrent producers and interleaved
//! line fragments on stdout, so the inner writer is never exposed: the
//! sole public operations are an atomic `write` and a one-shot `close`.

use std::io::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::errors::SinkError;

enum State {
    Open(Box<dyn Write + Send>),
    Closed,
}

/// Concurrency-safe wrapper around a single byte sink.
///
/// Guarantees per call: full mutual exclusion against other `write` and
/// `close` calls, and no silent partial writes (either every byte
/// reaches the underlying writer or the call errors). There is no
/// buffering across calls, so calls cannot be reordered.
pub struct SafeSink {
    inner: Mutex<State>,
}

impl SafeSink {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            inner: Mutex::new(State::Open(Box::new(writer))),
        }
    }

    /// Write `bytes` atomically with respect to concurrent callers.
    pub fn write(&self, bytes: &[u8]) -> Result<(), SinkError> {
        match &mut *self.lock() {
            State::Open(writer) => {
                writer.write_all(bytes)?;
                Ok(())
            }
            State::Closed => Err(SinkError::Closed),
        }
    }

    /// Flush and release the underlying writer.
    ///
    /// Subsequent `write` or `close` calls fail with [`SinkError::Closed`].
    pub fn close(&self) -> Result<(), SinkError> {
        let mut guard = self.lock();
        match std::mem::replace(&mut *guard, State::Closed) {
            State::Open(mut writer) => {
                writer.flush()?;
                Ok(())
            }
            State::Closed => Err(SinkError::Closed),
        }
    }

    // A panicking producer poisons the mutex; the sink state is still
    // consistent (write_all completed or errored), so recover the guard.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Test writer backed by a shared buffer, clonable for inspection.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> Vec<u8> {
            self.0.lock().unwrap().clone()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Accepts at most `max` bytes per write call.
    struct Choppy {
        buf: SharedBuf,
        max: usize,
    }

    impl Write for Choppy {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(self.max);
            self.buf.write(&buf[..n])
        }

        fn flush(&mut self) -> io::Result<()> {
            self.buf.flush()
        }
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe gone"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_delivers_all_bytes() {
        let buf = SharedBuf::default();
        let sink = SafeSink::new(buf.clone());
        sink.write(b"hello\n").unwrap();
        sink.write(b"world\n").unwrap();
        assert_eq!(buf.contents(), b"hello\nworld\n");
    }

    #[test]
    fn partial_writes_are_completed() {
        let buf = SharedBuf::default();
        let sink = SafeSink::new(Choppy {
            buf: buf.clone(),
            max: 3,
        });
        sink.write(b"a long line that needs many partial writes\n")
            .unwrap();
        assert_eq!(
            buf.contents(),
            b"a long line that needs many partial writes\n"
        );
    }

    #[test]
    fn write_after_close_fails_closed() {
        let buf = SharedBuf::default();
        let sink = SafeSink::new(buf.clone());
        sink.write(b"before\n").unwrap();
        sink.close().unwrap();

        let err = sink.write(b"after\n").unwrap_err();
        assert!(matches!(err, SinkError::Closed));
        // Nothing leaked past the close.
        assert_eq!(buf.contents(), b"before\n");
    }

    #[test]
    fn close_is_one_shot() {
        let sink = SafeSink::new(SharedBuf::default());
        sink.close().unwrap();
        assert!(matches!(sink.close().unwrap_err(), SinkError::Closed));
    }

    #[test]
    fn io_failure_surfaces_as_sink_error() {
        let sink = SafeSink::new(FailingWriter);
        let err = sink.write(b"doomed\n").unwrap_err();
        assert!(matches!(err, SinkError::Io(_)));
    }

    #[test]
    fn concurrent_writes_do_not_tear() {
        let buf = SharedBuf::default();
        let sink = SafeSink::new(Choppy {
            buf: buf.clone(),
            max: 5,
        });

        std::thread::scope(|scope| {
            for worker in 0..4 {
                let sink = &sink;
                scope.spawn(move || {
                    for i in 0..200 {
                        let line = format!("worker={worker} line={i:04}\n");
                        sink.write(line.as_bytes()).unwrap();
                    }
                });
            }
        });

        let contents = String::from_utf8(buf.contents()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 4 * 200);
        for line in lines {
            assert!(
                line.starts_with("worker=") && line.contains(" line="),
                "torn line: {line:?}"
            );
        }
    }
}
