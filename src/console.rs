use std::io::{self, BufRead, Write};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*{1,2}").expect("emphasis pattern is valid"));

/// Drop `**bold**` and `*italic*` markers, keeping the words.
pub fn strip_emphasis(text: &str) -> String {
    EMPHASIS.replace_all(text, "").into_owned()
}

/// The game's only view of the outside world.
pub trait Console {
    fn write_line(&mut self, line: &str) -> Result<()>;

    /// Show `prompt` and block for one line. `None` means input is closed.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    fn clear_screen(&mut self) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Terminal console
// ---------------------------------------------------------------------------

pub struct StdConsole {
    clear: bool,
}

impl StdConsole {
    pub fn new(clear: bool) -> Self {
        Self { clear }
    }
}

impl Console for StdConsole {
    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(io::stdout(), "{line}").context("failed to write to stdout")
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        let mut stdout = io::stdout();
        write!(stdout, "{prompt}").context("failed to write prompt")?;
        stdout.flush().context("failed to flush stdout")?;

        let mut input = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut input)
            .context("failed to read from stdin")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(input))
    }

    fn clear_screen(&mut self) -> Result<()> {
        if self.clear {
            // ANSI: erase display, cursor home.
            let mut stdout = io::stdout();
            write!(stdout, "\x1B[2J\x1B[1;1H").context("failed to clear screen")?;
            stdout.flush().context("failed to flush stdout")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Scripted console for tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub use scripted::ScriptedConsole;
