//! Per-program transcript of the protocol exchange

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Transcript file for one program in one game.
///
/// Sent lines are prefixed with `>`, received lines with `<`, and anything
/// the program printed on stderr is copied in as-is. A write error is
/// reported once and further writes are dropped; a broken transcript must
/// not end the game.
pub struct ProtocolLog {
    path: PathBuf,
    out: BufWriter<File>,
    failed: bool,
}

impl ProtocolLog {
    /// Create (or truncate) the transcript at `path`.
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            out: BufWriter::new(file),
            failed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Comment line, used for the launch command
    pub fn record_header(&mut self, text: &str) {
        self.write(|out| writeln!(out, "# {}", text));
    }

    pub fn record_sent(&mut self, command: &str) {
        self.write(|out| writeln!(out, ">{}", command));
    }

    /// `line` still carries its line ending
    pub fn record_received(&mut self, line: &str) {
        self.write(|out| write!(out, "<{}", line));
    }

    pub fn record_stderr(&mut self, bytes: &[u8]) {
        self.write(|out| out.write_all(bytes));
    }

    pub fn flush(&mut self) {
        self.write(|out| out.flush());
    }

    fn write(&mut self, op: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>) {
        if self.failed {
            return;
        }
        if let Err(e) = op(&mut self.out) {
            warn!(path = %self.path.display(), error = %e, "protocol log write failed, disabling log");
            self.failed = true;
        }
    }
}
