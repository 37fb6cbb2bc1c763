//! Turns an [`AddressSpec`] into the command that reads or writes it

use super::codec::{Arg, Command, Verb};
use crate::core::types::AddressSpec;

/// What the resolved command does at the target address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access<'a> {
    /// Read `size` bytes
    Read(usize),
    /// Write the given bytes
    Write(&'a [u8]),
}

impl Access<'_> {
    /// Number of bytes moved by the access
    pub fn len(&self) -> usize {
        match self {
            Access::Read(size) => *size,
            Access::Write(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn payload_arg(&self) -> Arg {
        match self {
            Access::Read(size) => Arg::Hex(*size as u64),
            Access::Write(data) => Arg::Bytes(data.to_vec()),
        }
    }
}

fn verb_for(spec: &AddressSpec, access: &Access<'_>) -> Verb {
    let read = matches!(access, Access::Read(_));
    match (spec, read) {
        (AddressSpec::Absolute(_), true) => Verb::Peek,
        (AddressSpec::Absolute(_), false) => Verb::Poke,
        (AddressSpec::MainRelative(_), true) => Verb::PeekMain,
        (AddressSpec::MainRelative(_), false) => Verb::PokeMain,
        (AddressSpec::Untranslated(_), true) => Verb::PeekAbsolute,
        (AddressSpec::Untranslated(_), false) => Verb::PokeAbsolute,
        (AddressSpec::PointerChain(_), true) => Verb::PointerPeek,
        (AddressSpec::PointerChain(_), false) => Verb::PointerPoke,
    }
}

/// Builds the command for one access.
///
/// Plain addresses become `(address, size|data)`; pointer chains become
/// `(size|data, hop_1, ..., hop_n)`. Chains are validated when they are
/// parsed, so resolution itself cannot fail.
pub fn resolve(spec: &AddressSpec, access: Access<'_>) -> Command {
    let command = Command::verb(verb_for(spec, &access));
    match spec {
        AddressSpec::Absolute(address)
        | AddressSpec::MainRelative(address)
        | AddressSpec::Untranslated(address) => command
            .arg(Arg::Hex(address.as_u64()))
            .arg(access.payload_arg()),
        AddressSpec::PointerChain(chain) => command
            .arg(access.payload_arg())
            .args(chain.hops().iter().map(|&hop| Arg::Hex(hop))),
    }
}

/// Shorthand for a read command
pub fn resolve_read(spec: &AddressSpec, size: usize) -> Command {
    resolve(spec, Access::Read(size))
}

/// Shorthand for a write command
pub fn resolve_write(spec: &AddressSpec, data: &[u8]) -> Command {
    resolve(spec, Access::Write(data))
}
