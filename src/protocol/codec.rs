//! Line-oriented command encoding and hex payload framing
//!
//! Requests are ASCII lines `<verb> <arg>...\r\n`. Replies to reads are
//! `2*N` hex characters followed by a single framing byte.

use crate::core::types::{BridgeError, BridgeResult};
use std::fmt;

/// Line terminator expected by the bridge's command parser
pub const TERMINATOR: &[u8; 2] = b"\r\n";

/// Framing byte the bridge appends after every payload
pub const FRAME_DELIMITER: u8 = b'\n';

/// Largest payload a single read may request (16 MiB)
pub const MAX_READ_SIZE: usize = 0x0100_0000;

/// Command verbs understood by the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Configure,
    Peek,
    Poke,
    PeekMain,
    PokeMain,
    PeekAbsolute,
    PokeAbsolute,
    PointerPeek,
    PointerPoke,
    Click,
    Press,
    Release,
    SetStick,
}

impl Verb {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Verb::Configure => "configure",
            Verb::Peek => "peek",
            Verb::Poke => "poke",
            Verb::PeekMain => "peekMain",
            Verb::PokeMain => "pokeMain",
            Verb::PeekAbsolute => "peekAbsolute",
            Verb::PokeAbsolute => "pokeAbsolute",
            Verb::PointerPeek => "pointerPeek",
            Verb::PointerPoke => "pointerPoke",
            Verb::Click => "click",
            Verb::Press => "press",
            Verb::Release => "release",
            Verb::SetStick => "setStick",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single command argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// Number rendered as `0x` + uppercase hex
    Hex(u64),
    /// Raw bytes rendered as `0x` + uppercase hex, in memory order
    Bytes(Vec<u8>),
    /// Signed decimal, used for stick axes
    Decimal(i64),
    /// Bare word such as a button name
    Word(String),
}

impl Arg {
    pub fn word(word: impl Into<String>) -> Self {
        Arg::Word(word.into())
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Hex(value) => write!(f, "0x{value:X}"),
            Arg::Bytes(bytes) => write!(f, "0x{}", hex::encode_upper(bytes)),
            Arg::Decimal(value) => write!(f, "{value}"),
            Arg::Word(word) => f.write_str(word),
        }
    }
}

/// An outbound request, built per call and discarded after sending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    verb: String,
    args: Vec<Arg>,
}

impl Command {
    /// Creates a command; the verb is passed through unchecked
    pub fn new(verb: impl Into<String>) -> Self {
        Command {
            verb: verb.into(),
            args: Vec::new(),
        }
    }

    /// Creates a command for a known verb
    pub fn verb(verb: Verb) -> Self {
        Command::new(verb.as_str())
    }

    /// Appends an argument
    pub fn arg(mut self, arg: Arg) -> Self {
        self.args.push(arg);
        self
    }

    /// Appends several arguments
    pub fn args(mut self, args: impl IntoIterator<Item = Arg>) -> Self {
        self.args.extend(args);
        self
    }

    pub fn verb_str(&self) -> &str {
        &self.verb
    }

    pub fn arguments(&self) -> &[Arg] {
        &self.args
    }

    /// Encodes the command as bytes ready for the socket
    pub fn encode(&self) -> Vec<u8> {
        encode_command(&self.verb, &self.args)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.verb)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Joins `verb` and `args` with single spaces and appends the terminator
pub fn encode_command(verb: &str, args: &[Arg]) -> Vec<u8> {
    let mut line = String::from(verb);
    for arg in args {
        line.push(' ');
        line.push_str(&arg.to_string());
    }
    let mut bytes = line.into_bytes();
    bytes.extend_from_slice(TERMINATOR);
    bytes
}

/// Number of bytes the bridge sends back for a read of `expected_len` bytes.
///
/// `None` when the frame length does not fit in `usize`.
pub const fn frame_len(expected_len: usize) -> Option<usize> {
    match expected_len.checked_mul(2) {
        Some(hex_len) => hex_len.checked_add(1),
        None => None,
    }
}

/// Frame length for a read the transport is willing to issue
pub fn read_frame_len(size: usize) -> BridgeResult<usize> {
    if size > MAX_READ_SIZE {
        return Err(BridgeError::InvalidValueType(format!(
            "read of {size} bytes exceeds the {MAX_READ_SIZE}-byte limit"
        )));
    }
    frame_len(size).ok_or_else(|| {
        BridgeError::InvalidValueType(format!("read of {size} bytes cannot be framed"))
    })
}

/// Decodes one reply frame into exactly `expected_len` bytes
pub fn decode_payload(raw_frame: &[u8], expected_len: usize) -> BridgeResult<Vec<u8>> {
    let Some(expected_frame) = frame_len(expected_len) else {
        return Err(BridgeError::malformed(format!(
            "no frame can carry {expected_len} bytes"
        )));
    };
    if raw_frame.len() != expected_frame {
        return Err(BridgeError::malformed(format!(
            "expected a {expected_frame}-byte frame for {expected_len} bytes, got {}",
            raw_frame.len()
        )));
    }

    let payload = &raw_frame[..raw_frame.len() - 1];
    hex::decode(payload).map_err(|e| BridgeError::malformed(format!("invalid hex payload: {e}")))
}

/// Builds the frame the bridge would send for `bytes`
pub fn encode_payload(bytes: &[u8]) -> Vec<u8> {
    let mut frame = hex::encode(bytes).into_bytes();
    frame.push(FRAME_DELIMITER);
    frame
}
