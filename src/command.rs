//! Text commands read from the serial console.
//!
//! Input is a stream of whitespace-separated tokens. A token starting with a
//! keyword begins a command; the keywords are tried in this order:
//!
//! | keyword | arguments                     | command                   |
//! |---------|-------------------------------|---------------------------|
//! | `test`  |                               | [`Command::Test`]         |
//! | `save`  |                               | [`Command::Save`]         |
//! | `load`  |                               | [`Command::Load`]         |
//! | `code`  | count `0..=6`, then the rows  | [`Command::Code`]         |
//! | `br`    | brightness `0..=255`          | [`Command::Brightness`]   |
//! | `cl`    | up to 6 hex digits (`RRGGBB`) | [`Command::Color`]        |
//!
//! A malformed command is dropped after its arguments are consumed, and an
//! unknown token is skipped. Neither is an error.
//!
//! ```rust
//! use colaruco::command::{Command, CommandParser};
//! use colaruco::led_strip::rgb_from_u32;
//!
//! let mut parser = CommandParser::new();
//! let commands: Vec<Command> = b"cl FF0000\nbr 999\nsave\n"
//!     .iter()
//!     .filter_map(|&byte| parser.feed(byte))
//!     .collect();
//! // `br 999` is out of range and dropped.
//! assert_eq!(commands, [Command::Color(rgb_from_u32(0xFF0000)), Command::Save]);
//! ```

use heapless::{String, Vec};

use crate::fmt::log_warn;
use crate::led_strip::{Rgb, rgb_from_u32};
use crate::marker::{LogicalCode, MAX_CODE_SIZE};

/// Longest token the parser keeps; longer tokens are malformed.
pub const MAX_TOKEN_LEN: usize = 16;

/// Hex digits read from a `cl` argument.
const COLOR_DIGITS: usize = 6;

/// One accepted console command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run the diagnostic clear, then show the marker again.
    Test,
    /// Persist the current settings.
    Save,
    /// Restore the last saved settings.
    Load,
    /// Replace the marker pattern.
    Code(LogicalCode),
    /// Replace the brightness.
    Brightness(u8),
    /// Replace the marker color.
    Color(Rgb),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Keyword {
    Test,
    Save,
    Load,
    Code,
    Brightness,
    Color,
}

impl Keyword {
    const PREFIXES: [(&'static str, Self); 6] = [
        ("test", Self::Test),
        ("save", Self::Save),
        ("load", Self::Load),
        ("code", Self::Code),
        ("br", Self::Brightness),
        ("cl", Self::Color),
    ];

    fn match_prefix(token: &str) -> Option<Self> {
        Self::PREFIXES
            .iter()
            .find(|(prefix, _)| token.starts_with(prefix))
            .map(|(_, keyword)| *keyword)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum ParseState {
    /// Waiting for a keyword
    Keyword,
    /// Got `code`, waiting for the row count
    CodeCount,
    /// Reading code rows; `valid` drops to false on the first bad row
    CodeRows {
        expected: u8,
        rows: Vec<u8, { MAX_CODE_SIZE as usize }>,
        valid: bool,
    },
    /// Got `br`, waiting for the value
    Brightness,
    /// Got `cl`, waiting for the hex color
    Color,
}

/// Byte-at-a-time command parser.
#[derive(Clone, Debug)]
pub struct CommandParser {
    state: ParseState,
    token: String<MAX_TOKEN_LEN>,
    overlong: bool,
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandParser {
    /// A parser waiting for a keyword.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ParseState::Keyword,
            token: String::new(),
            overlong: false,
        }
    }

    /// Drop any partial token and pending command.
    pub fn reset(&mut self) {
        self.state = ParseState::Keyword;
        self.token.clear();
        self.overlong = false;
    }

    /// Feed one input byte.
    ///
    /// Returns a command when this byte ends the token that completes it.
    /// Tokens end at ASCII whitespace, so the last command of a stream needs a
    /// trailing newline or space.
    pub fn feed(&mut self, byte: u8) -> Option<Command> {
        if byte.is_ascii_whitespace() {
            return self.end_token();
        }
        // Non-ASCII bytes can never be part of a valid token.
        let pushed = byte.is_ascii() && self.token.push(char::from(byte)).is_ok();
        if !pushed {
            self.overlong = true;
        }
        None
    }

    fn end_token(&mut self) -> Option<Command> {
        if self.token.is_empty() && !self.overlong {
            return None;
        }
        let token = if self.overlong {
            log_warn!("Command: dropping malformed token");
            None
        } else {
            Some(self.token.clone())
        };
        self.token.clear();
        self.overlong = false;
        self.accept(token.as_deref())
    }

    /// Advance the state machine by one complete token; `None` is a malformed token.
    fn accept(&mut self, token: Option<&str>) -> Option<Command> {
        let state = core::mem::replace(&mut self.state, ParseState::Keyword);
        match state {
            ParseState::Keyword => {
                let Some(keyword) = token.and_then(Keyword::match_prefix) else {
                    log_warn!("Command: unknown token {=str}", token.unwrap_or("?"));
                    return None;
                };
                match keyword {
                    Keyword::Test => Some(Command::Test),
                    Keyword::Save => Some(Command::Save),
                    Keyword::Load => Some(Command::Load),
                    Keyword::Code => {
                        self.state = ParseState::CodeCount;
                        None
                    }
                    Keyword::Brightness => {
                        self.state = ParseState::Brightness;
                        None
                    }
                    Keyword::Color => {
                        self.state = ParseState::Color;
                        None
                    }
                }
            }
            ParseState::CodeCount => {
                match token.and_then(parse_u8).filter(|count| *count <= MAX_CODE_SIZE) {
                    Some(0) => LogicalCode::new(&[]).ok().map(Command::Code),
                    Some(expected) => {
                        self.state = ParseState::CodeRows {
                            expected,
                            rows: Vec::new(),
                            valid: true,
                        };
                        None
                    }
                    None => {
                        log_warn!("Command: bad code size");
                        None
                    }
                }
            }
            ParseState::CodeRows {
                expected,
                mut rows,
                mut valid,
            } => {
                let row = token.and_then(parse_u8);
                valid &= row.is_some();
                // Bad rows still count so the remaining rows are consumed.
                if rows.push(row.unwrap_or(0)).is_err() {
                    valid = false;
                }
                if rows.len() < usize::from(expected) {
                    self.state = ParseState::CodeRows {
                        expected,
                        rows,
                        valid,
                    };
                    return None;
                }
                if !valid {
                    log_warn!("Command: bad code row");
                    return None;
                }
                LogicalCode::new(&rows).ok().map(Command::Code)
            }
            ParseState::Brightness => {
                let brightness = token.and_then(parse_u8);
                if brightness.is_none() {
                    log_warn!("Command: bad brightness");
                }
                brightness.map(Command::Brightness)
            }
            ParseState::Color => {
                let color = token.and_then(parse_hex_color);
                if color.is_none() {
                    log_warn!("Command: bad color");
                }
                color.map(Command::Color)
            }
        }
    }
}

fn parse_u8(token: &str) -> Option<u8> {
    if !token.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Parse the first six characters of `token` as a hex `RRGGBB` color.
fn parse_hex_color(token: &str) -> Option<Rgb> {
    let digits = token.get(..COLOR_DIGITS.min(token.len()))?;
    if !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok().map(rgb_from_u32)
}
