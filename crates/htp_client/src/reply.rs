//! Response framing for the HTP line protocol

/// First character of every successful response.
pub const SUCCESS_MARKER: char = '=';

/// Outcome of a single command sent to a program.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The command succeeded; carries the payload.
    Ok(String),
    /// The program refused the command; carries its reason.
    /// The program is still usable.
    Denied(String),
    /// The program's streams are gone. Nothing more can be sent to it.
    Died,
}

impl Reply {
    pub fn is_ok(&self) -> bool {
        matches!(self, Reply::Ok(_))
    }

    pub fn is_died(&self) -> bool {
        matches!(self, Reply::Died)
    }

    /// Payload of a successful reply
    pub fn ok(self) -> Option<String> {
        match self {
            Reply::Ok(payload) => Some(payload),
            _ => None,
        }
    }

    /// Frame a complete answer.
    ///
    /// `lines` are the lines read before the terminator, each with its
    /// line ending still attached.
    pub fn from_lines(lines: &[String]) -> Reply {
        let Some(first) = lines.first() else {
            return Reply::Denied("empty response".to_string());
        };

        if let Some(rest) = first.strip_prefix(SUCCESS_MARKER) {
            if lines.len() == 1 {
                Reply::Ok(rest.trim().to_string())
            } else {
                Reply::Ok(lines[1..].concat())
            }
        } else {
            // Reason is everything after the marker and its separator
            let text = lines.concat();
            let start = text.char_indices().nth(2).map_or(text.len(), |(i, _)| i);
            Reply::Denied(text[start..].trim().to_string())
        }
    }
}

/// True for the blank line that ends every answer.
pub fn is_terminator(line: &str) -> bool {
    line == "\n" || line == "\r\n"
}

#[cfg(test)]
#[path = "reply_tests.rs"]
mod reply_tests;
