//! Program launch commands and seed substitution

use rand::Rng;
use std::fmt;
use std::process::Command;

use crate::error::LaunchError;

/// Substring replaced by a fresh random seed before a program is started.
pub const SEED_PLACEHOLDER: &str = "%SRAND";

/// Seeds are drawn from `0..SEED_LIMIT`.
pub const SEED_LIMIT: u32 = 1_000_000;

/// Draw a seed for one program instance.
pub fn draw_seed() -> u32 {
    rand::thread_rng().gen_range(0..SEED_LIMIT)
}

/// A program to start, as an argument vector.
///
/// Programs are executed directly, never through a shell, so arguments
/// reach the child exactly as they are stored here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    program: String,
    args: Vec<String>,
}

impl LaunchCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a command line into program and arguments.
    ///
    /// Words are separated by whitespace; single or double quotes group
    /// words containing spaces. No other shell syntax is understood.
    pub fn parse(line: &str) -> Result<Self, LaunchError> {
        let mut words = Vec::new();
        let mut current = String::new();
        let mut in_word = false;
        let mut quote: Option<char> = None;

        for c in line.chars() {
            match quote {
                Some(q) if c == q => quote = None,
                Some(_) => current.push(c),
                None if c == '"' || c == '\'' => {
                    quote = Some(c);
                    in_word = true;
                }
                None if c.is_whitespace() => {
                    if in_word {
                        words.push(std::mem::take(&mut current));
                        in_word = false;
                    }
                }
                None => {
                    current.push(c);
                    in_word = true;
                }
            }
        }

        if quote.is_some() {
            return Err(LaunchError::UnterminatedQuote(line.to_string()));
        }
        if in_word {
            words.push(current);
        }

        let mut words = words.into_iter();
        let program = words.next().ok_or(LaunchError::Empty)?;
        Ok(Self {
            program,
            args: words.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn has_seed_placeholder(&self) -> bool {
        std::iter::once(&self.program)
            .chain(&self.args)
            .any(|word| word.contains(SEED_PLACEHOLDER))
    }

    /// Copy of this command with every seed placeholder replaced by `seed`.
    pub fn resolve(&self, seed: u32) -> Self {
        let seed = seed.to_string();
        let substitute = |word: &String| word.replace(SEED_PLACEHOLDER, &seed);
        Self {
            program: substitute(&self.program),
            args: self.args.iter().map(substitute).collect(),
        }
    }

    pub(crate) fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

/// Renders the command in the form [`LaunchCommand::parse`] reads back.
///
/// Words that are empty or contain whitespace or quotes are quoted.
impl fmt::Display for LaunchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_word(f, &self.program)?;
        for arg in &self.args {
            f.write_str(" ")?;
            write_word(f, arg)?;
        }
        Ok(())
    }
}

fn write_word(f: &mut fmt::Formatter<'_>, word: &str) -> fmt::Result {
    let plain = !word.is_empty()
        && !word
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '\'');
    if plain {
        f.write_str(word)
    } else if word.contains('"') {
        // A word holding both quote characters has no exact rendering
        write!(f, "'{}'", word)
    } else {
        write!(f, "\"{}\"", word)
    }
}

#[cfg(test)]
#[path = "launch_tests.rs"]
mod launch_tests;
