//! Terminal boundary: prompts, pauses and screen clearing.

use std::io::{self, BufRead, Write};

/// ANSI: clear screen, cursor to top-left.
const CLEAR_SEQUENCE: &str = "\x1B[2J\x1B[1;1H";

pub struct Console<R, W> {
    input: R,
    output: W,
    clear_screen: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, clear_screen: bool) -> Self {
        Self {
            input,
            output,
            clear_screen,
        }
    }

    /// Print `message` and read one line without its line ending.
    ///
    /// Returns `None` once input is exhausted.
    pub fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Wait for Enter. Returns `false` once input is exhausted.
    pub fn pause(&mut self, message: &str) -> io::Result<bool> {
        Ok(self.prompt(message)?.is_some())
    }

    pub fn clear(&mut self) -> io::Result<()> {
        if self.clear_screen {
            write!(self.output, "{}", CLEAR_SEQUENCE)?;
            self.output.flush()?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.output
    }
}

impl<R, W: Write> Write for Console<R, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }
}
