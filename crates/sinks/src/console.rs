//! Console sink
//!
//! Writes every record to stderr with markup rendered as ANSI colors. This
//! is also the fallback destination when a file sink write fails: reporting
//! a logging failure must never go through the failing path.

use std::io::{self, Write};

use fanlog_config::Level;

use crate::markup;

/// Colorized stderr sink
#[derive(Debug, Default)]
pub struct ConsoleSink {
    /// Emit plain text instead of ANSI colors
    plain: bool,
}

impl ConsoleSink {
    /// Create a console sink with colors enabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a console sink that strips markup instead of rendering it
    pub fn plain() -> Self {
        Self { plain: true }
    }

    /// Write one formatted line, rendering markup for the given level
    ///
    /// Errors writing to stderr are ignored; there is nowhere left to
    /// report them.
    pub fn write_line(&self, line: &str, level: Level) {
        let rendered = if self.plain {
            markup::strip(line)
        } else {
            markup::render(line, level)
        };
        let mut stderr = io::stderr().lock();
        let _ = stderr.write_all(rendered.as_bytes());
        let _ = stderr.write_all(b"\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_does_not_panic() {
        let sink = ConsoleSink::new();
        sink.write_line("<green>ok</green>", Level::Info);
        ConsoleSink::plain().write_line("<green>ok</green>", Level::Info);
    }
}
