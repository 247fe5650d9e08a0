//! Protocol client for one external Hex program
//!
//! A [`ProtocolClient`] starts a program, sends it commands one at a time and
//! frames the answers. Everything exchanged is written to a transcript file.
//!
//! The program's stderr is read by a background thread and forwarded over a
//! channel. Before each stdout line is read, whatever stderr output has
//! already arrived is copied into the transcript. This never waits, so a
//! program that is chatty on stderr but slow on stdout cannot stall the
//! exchange; the flip side is that stderr written during a long answer may
//! only show up in the transcript at a later command.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;
use std::process::{Child, ChildStderr, ChildStdin, ChildStdout, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::error::{ProgramDied, SpawnError};
use crate::game::{Side, UNKNOWN};
use crate::launch::{draw_seed, LaunchCommand};
use crate::log::ProtocolLog;
use crate::reply::{is_terminator, Reply};

const STDERR_CHUNK: usize = 8192;

/// How long `shutdown` waits for a program to exit after `quit`
const QUIT_GRACE: Duration = Duration::from_millis(500);

/// How long dropping a client waits for the last stderr output
const FINAL_DRAIN: Duration = Duration::from_millis(50);

/// Connection to one running program.
///
/// The client is either alive or dead. It dies when a write fails or when
/// the program's stdout ends before an answer is complete, and never comes
/// back: every later command returns [`Reply::Died`] without touching the
/// process. Denials leave the client alive.
///
/// Dropping the client kills the program if it is still running.
pub struct ProtocolClient {
    side: Side,
    command: LaunchCommand,
    seed: u32,
    verbose: bool,
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    stderr: Receiver<Vec<u8>>,
    log: ProtocolLog,
    dead: bool,
    deny_reason: Option<String>,
}

impl ProtocolClient {
    /// Start `launch` with a freshly drawn seed.
    ///
    /// The transcript is written to `log_path`, starting with the resolved
    /// command line. With `verbose` all traffic is echoed to stdout.
    pub fn open(
        launch: &LaunchCommand,
        log_path: &Path,
        side: Side,
        verbose: bool,
    ) -> Result<Self, SpawnError> {
        Self::open_with_seed(launch, log_path, side, verbose, draw_seed())
    }

    /// Like [`ProtocolClient::open`] with a caller-chosen seed
    pub fn open_with_seed(
        launch: &LaunchCommand,
        log_path: &Path,
        side: Side,
        verbose: bool,
        seed: u32,
    ) -> Result<Self, SpawnError> {
        let command = launch.resolve(seed);
        let resolved = command.to_string();
        if verbose {
            println!("Creating program: {}", resolved);
        }
        debug!(%side, %command, seed, "starting program");

        let mut log = ProtocolLog::create(log_path).map_err(|source| SpawnError::Log {
            path: log_path.to_path_buf(),
            source,
        })?;
        log.record_header(&resolved);
        log.flush();

        let mut child = command
            .to_command()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| SpawnError::Spawn {
                command: resolved.clone(),
                source,
            })?;

        let (Some(stdin), Some(stdout), Some(stderr)) =
            (child.stdin.take(), child.stdout.take(), child.stderr.take())
        else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(SpawnError::MissingPipes(resolved));
        };

        Ok(Self {
            side,
            command,
            seed,
            verbose,
            child,
            stdin,
            stdout: BufReader::new(stdout),
            stderr: spawn_stderr_reader(stderr),
            log,
            dead: false,
            deny_reason: None,
        })
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// The command line actually executed, seed already substituted
    pub fn command(&self) -> &LaunchCommand {
        &self.command
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn log_path(&self) -> &Path {
        self.log.path()
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Reason given with the most recent denial
    pub fn deny_reason(&self) -> Option<&str> {
        self.deny_reason.as_deref()
    }

    /// Check whether the process has exited on its own and mark the client
    /// dead if so. Returns true while the client is alive.
    pub fn check_alive(&mut self) -> bool {
        if self.dead {
            return false;
        }
        match self.child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                debug!(side = %self.side, %status, "program exited");
                self.mark_dead();
                false
            }
            Err(e) => {
                warn!(side = %self.side, error = %e, "failed to query program status");
                self.mark_dead();
                false
            }
        }
    }

    /// Send one command and wait for its complete answer.
    ///
    /// Blocks until the terminating blank line arrives or the program is
    /// found dead. There is no timeout.
    pub fn send_command(&mut self, text: &str) -> Reply {
        if self.dead {
            return Reply::Died;
        }

        if let Err(e) = self.write_command(text) {
            debug!(side = %self.side, error = %e, "write to program failed");
            return self.died();
        }

        let reply = self.read_answer();
        self.log.flush();
        reply
    }

    /// `name` followed by `version`, joined by a space.
    ///
    /// A denied `name` gives `"?"`; a denied `version` gives the bare name.
    pub fn name(&mut self) -> Result<String, ProgramDied> {
        let mut name = match self.send_command("name") {
            Reply::Ok(name) => name.trim().to_string(),
            Reply::Denied(_) => return Ok(UNKNOWN.to_string()),
            Reply::Died => return Err(self.died_error()),
        };
        match self.send_command("version") {
            Reply::Ok(version) => {
                name.push(' ');
                name.push_str(version.trim());
            }
            Reply::Denied(_) => {}
            Reply::Died => return Err(self.died_error()),
        }
        Ok(name)
    }

    /// The program's opinion of the game result, `"?"` if it won't say
    pub fn final_score(&mut self) -> Result<String, ProgramDied> {
        self.query("final_score")
    }

    /// Time left on the program's clock, `"?"` if it won't say
    pub fn time_remaining(&mut self) -> Result<String, ProgramDied> {
        self.query("time_left")
    }

    /// Ask the program to quit and wait briefly for it to exit.
    ///
    /// The answer to `quit` is not waited for. The process is killed if it
    /// is still running after the grace period. The client is dead
    /// afterwards.
    pub fn shutdown(&mut self) {
        if !self.dead {
            if let Err(e) = self.write_command("quit") {
                debug!(side = %self.side, error = %e, "failed to send quit");
            }
        }

        let deadline = Instant::now() + QUIT_GRACE;
        loop {
            match self.child.try_wait() {
                Ok(Some(_)) => break,
                Ok(None) if Instant::now() < deadline => thread::sleep(Duration::from_millis(10)),
                _ => {
                    debug!(side = %self.side, "program ignored quit, killing it");
                    let _ = self.child.kill();
                    let _ = self.child.wait();
                    break;
                }
            }
        }
        self.mark_dead();
        self.drain_stderr();
    }

    /// Copy stderr output that has already arrived into the transcript.
    ///
    /// Never waits for more output.
    pub fn drain_stderr(&mut self) {
        while let Ok(chunk) = self.stderr.try_recv() {
            self.log.record_stderr(&chunk);
        }
        self.log.flush();
    }

    fn write_command(&mut self, text: &str) -> io::Result<()> {
        self.log.record_sent(text);
        if self.verbose {
            println!("{}< {}", self.side.tag(), text);
        }
        writeln!(self.stdin, "{}", text)?;
        self.stdin.flush()
    }

    fn query(&mut self, command: &str) -> Result<String, ProgramDied> {
        match self.send_command(command) {
            Reply::Ok(answer) => Ok(answer.trim().to_string()),
            Reply::Denied(_) => Ok(UNKNOWN.to_string()),
            Reply::Died => Err(self.died_error()),
        }
    }

    fn read_answer(&mut self) -> Reply {
        let mut lines = Vec::new();
        loop {
            self.drain_stderr();

            let mut line = String::new();
            match self.stdout.read_line(&mut line) {
                Ok(0) => return self.died(),
                Ok(_) => {}
                Err(e) => {
                    debug!(side = %self.side, error = %e, "read from program failed");
                    return self.died();
                }
            }

            self.log.record_received(&line);
            if self.verbose {
                print!("{}> {}", self.side.tag(), line);
            }

            if is_terminator(&line) {
                break;
            }
            lines.push(line);
        }

        let reply = Reply::from_lines(&lines);
        if let Reply::Denied(reason) = &reply {
            debug!(side = %self.side, %reason, "command denied");
            self.deny_reason = Some(reason.clone());
        }
        reply
    }

    fn died(&mut self) -> Reply {
        if !self.dead {
            warn!(side = %self.side, command = %self.command, "program died");
        }
        self.mark_dead();
        self.drain_stderr();
        Reply::Died
    }

    fn mark_dead(&mut self) {
        self.dead = true;
    }

    fn died_error(&self) -> ProgramDied {
        ProgramDied { side: self.side }
    }
}

impl Drop for ProtocolClient {
    fn drop(&mut self) {
        if matches!(self.child.try_wait(), Ok(None)) {
            let _ = self.child.kill();
        }
        let _ = self.child.wait();

        // Pick up what the program wrote right before it went away
        loop {
            match self.stderr.recv_timeout(FINAL_DRAIN) {
                Ok(chunk) => self.log.record_stderr(&chunk),
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => break,
            }
        }
        self.log.flush();
    }
}

fn spawn_stderr_reader(mut stderr: ChildStderr) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    // Not joined: a grandchild holding the pipe open must not block teardown
    thread::spawn(move || {
        let mut buf = [0u8; STDERR_CHUNK];
        loop {
            match stderr.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
    });
    rx
}
