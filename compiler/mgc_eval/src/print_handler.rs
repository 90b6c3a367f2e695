//! Where `print` and `println` output goes.
//!
//! The driver writes to stdout; tests capture into a buffer and assert on it.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

pub enum PrintHandler {
    /// Write through to stdout, flushing after each call so prompts interleave
    /// correctly.
    Stdout,
    /// Accumulate into a string.
    Buffer(Mutex<String>),
    /// Drop everything.
    Silent,
}

impl PrintHandler {
    pub fn println(&self, text: &str) {
        match self {
            PrintHandler::Stdout => write_through(&mut std::io::stdout().lock(), text, "\n"),
            PrintHandler::Buffer(buf) => {
                let mut buf = buf.lock();
                buf.push_str(text);
                buf.push('\n');
            }
            PrintHandler::Silent => {}
        }
    }

    pub fn print(&self, text: &str) {
        match self {
            PrintHandler::Stdout => write_through(&mut std::io::stdout().lock(), text, ""),
            PrintHandler::Buffer(buf) => buf.lock().push_str(text),
            PrintHandler::Silent => {}
        }
    }

    /// Captured output. Empty unless this is a buffer.
    pub fn output(&self) -> String {
        match self {
            PrintHandler::Buffer(buf) => buf.lock().clone(),
            PrintHandler::Stdout | PrintHandler::Silent => String::new(),
        }
    }

    /// Return the captured output and empty the buffer.
    pub fn take_output(&self) -> String {
        match self {
            PrintHandler::Buffer(buf) => std::mem::take(&mut *buf.lock()),
            PrintHandler::Stdout | PrintHandler::Silent => String::new(),
        }
    }

    pub fn clear(&self) {
        if let PrintHandler::Buffer(buf) = self {
            buf.lock().clear();
        }
    }
}

/// A closed or broken stdout is not an evaluation error, so write failures
/// are dropped here for both `print` and `println`.
fn write_through(out: &mut impl Write, text: &str, terminator: &str) {
    let _ = out
        .write_all(text.as_bytes())
        .and_then(|()| out.write_all(terminator.as_bytes()))
        .and_then(|()| out.flush());
}

pub type SharedPrintHandler = Arc<PrintHandler>;

pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Stdout)
}

pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Buffer(Mutex::new(String::new())))
}

pub fn silent_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Silent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
    }

    #[test]
    fn write_through_appends_terminator() {
        let mut out = Vec::new();
        write_through(&mut out, "hi", "\n");
        write_through(&mut out, "there", "");
        assert_eq!(out, b"hi\nthere");
    }

    #[test]
    fn write_through_ignores_a_closed_pipe() {
        write_through(&mut ClosedPipe, "lost", "\n");
        write_through(&mut ClosedPipe, "lost", "");
    }

    #[test]
    fn buffer_collects_print_and_println() {
        let handler = buffer_handler();
        handler.print("a");
        handler.print("b");
        handler.println("c");
        handler.println("");
        assert_eq!(handler.output(), "abc\n\n");
    }

    #[test]
    fn take_output_empties_the_buffer() {
        let handler = buffer_handler();
        handler.println("first");
        assert_eq!(handler.take_output(), "first\n");
        handler.println("second");
        assert_eq!(handler.output(), "second\n");
        handler.clear();
        assert_eq!(handler.output(), "");
    }

    #[test]
    fn silent_and_stdout_capture_nothing() {
        let handler = silent_handler();
        handler.println("dropped");
        assert_eq!(handler.output(), "");
        assert_eq!(stdout_handler().take_output(), "");
    }
}
