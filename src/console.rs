use std::io::{self, Write};

/// Output sink for user-facing text: a regular stream and an error stream.
pub trait Console {
    fn print(&mut self, text: &str);

    fn eprint(&mut self, text: &str);

    fn println(&mut self, line: &str) {
        self.print(line);
        self.print("\n");
    }

    fn eprintln(&mut self, line: &str) {
        self.eprint(line);
        self.eprint("\n");
    }
}

/// Process stdout/stderr. Stdout is flushed after every write so progress
/// dots show up while a job is still running.
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn print(&mut self, text: &str) {
        let mut stdout = io::stdout().lock();
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }

    fn eprint(&mut self, text: &str) {
        let _ = io::stderr().lock().write_all(text.as_bytes());
    }
}

/// Captures both streams in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct BufferConsole {
    pub out: String,
    pub err: String,
}

#[cfg(test)]
impl Console for BufferConsole {
    fn print(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn eprint(&mut self, text: &str) {
        self.err.push_str(text);
    }
}
