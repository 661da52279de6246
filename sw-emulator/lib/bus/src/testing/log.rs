/*++

Licensed under the Apache-2.0 license.

File Name:

    log.rs

Abstract:

    File contains a shared text buffer for capturing logs inside unit tests.

--*/
use std::{
    cell::{Ref, RefCell},
    fmt::Write,
    ops::Deref,
    rc::Rc,
};

/// A type for logging actions without needing &mut self. Useful for logging
/// actions that occur in "fake" Bus trait implementations, or for capturing
/// the output of a model's log sink in tests.
///
/// When `Log` is cloned, the clones all share the same underlying buffer.
///
/// # Example
///
/// ```
/// use caravel_emu_bus::testing::Log;
/// use std::fmt::Write;
///
/// let log = Log::new();
/// writeln!(log.w(), "Line 1").unwrap();
/// std::io::Write::write_all(&mut log.clone(), b"Line 2\n").unwrap();
/// assert_eq!("Line 1\nLine 2\n", &*log.as_str());
/// assert_eq!("Line 1\nLine 2\n", log.take());
/// assert_eq!("", log.take());
/// ```
#[derive(Clone)]
pub struct Log {
    log: Rc<RefCell<String>>,
}
impl Log {
    /// Construct an empty `Log`.
    pub fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(String::new())),
        }
    }

    /// Access the contents of the log without modifying it.
    pub fn as_str(&self) -> impl Deref<Target = str> + '_ {
        Ref::map(self.log.borrow(), String::as_str)
    }

    /// Replaces the existing contents of the log with an empty string, and
    /// returns the previous contents.
    pub fn take(&self) -> String {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    /// Returns a writer that can be used with write!() or writeln!().
    pub fn w(&self) -> impl Write + '_ {
        LogWriter { log: &self.log }
    }
}
impl Default for Log {
    fn default() -> Self {
        Self::new()
    }
}

/// Byte-oriented sink; invalid UTF-8 is replaced rather than rejected.
impl std::io::Write for Log {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.log
            .borrow_mut()
            .push_str(&String::from_utf8_lossy(buf));
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

struct LogWriter<'a> {
    log: &'a RefCell<String>,
}
impl Write for LogWriter<'_> {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        self.log.borrow_mut().push_str(s);
        Ok(())
    }
}
