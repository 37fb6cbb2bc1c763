//! Wire protocol of the debug bridge
//!
//! This module is pure: it builds command lines and decodes reply frames
//! without touching the network.
//! - `codec` renders commands and decodes hex payload frames
//! - `resolver` maps addressing modes onto peek/poke commands

pub mod codec;
pub mod resolver;

pub use codec::{
    decode_payload, encode_command, encode_payload, frame_len, read_frame_len, Arg, Command,
    Verb, FRAME_DELIMITER, MAX_READ_SIZE, TERMINATOR,
};
pub use resolver::{resolve, resolve_read, resolve_write, Access};
