//! Remote address types: plain addresses, pointer chains and addressing modes

use super::error::{BridgeError, BridgeResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Represents an address in the target's memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub u64);

impl Address {
    /// Creates a new address from a raw value
    pub const fn new(value: u64) -> Self {
        Address(value)
    }

    /// Returns the raw value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Parses a hex number with an optional `0x`/`0X` prefix
fn parse_hex(s: &str) -> Option<u64> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}

impl FromStr for Address {
    type Err = BridgeError;

    /// Addresses are always hexadecimal, with or without a `0x` prefix
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        parse_hex(s)
            .map(Address::new)
            .ok_or_else(|| BridgeError::invalid_spec(format!("not a hex address: {s:?}")))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

impl fmt::UpperHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

impl From<u64> for Address {
    fn from(value: u64) -> Self {
        Address::new(value)
    }
}

/// An ordered list of pointer hops.
///
/// The first hop is the base slot relative to the main module; each later
/// hop is a byte offset applied after dereferencing the previous result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointerChain {
    hops: Vec<u64>,
}

impl PointerChain {
    /// Creates a chain from explicit hops
    pub fn new(hops: Vec<u64>) -> BridgeResult<Self> {
        if hops.is_empty() {
            return Err(BridgeError::invalid_spec("pointer chain has no hops"));
        }
        Ok(PointerChain { hops })
    }

    /// The hops in dereference order
    pub fn hops(&self) -> &[u64] {
        &self.hops
    }

    /// Number of hops
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    /// Always false; a chain is never built empty
    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }
}

impl FromStr for PointerChain {
    type Err = BridgeError;

    /// Parses bracket notation such as `[[main+0x42D6110]+0x10]+0x8`.
    ///
    /// Every opening bracket must be closed, every closing bracket except
    /// the last must be followed by `+offset`, and an optional final
    /// `+offset` may trail the last bracket.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let depth = text.chars().take_while(|&c| c == '[').count();
        if depth == 0 {
            return Err(BridgeError::invalid_spec(format!(
                "pointer chain must start with '[': {s:?}"
            )));
        }

        let rest = &text[depth..];
        let rest = rest.strip_prefix("main+").unwrap_or(rest);

        let mut hops = Vec::with_capacity(depth + 1);
        let mut segments = rest.split(']');

        let base = segments.next().unwrap_or_default();
        hops.push(parse_hop(base, 0, s)?);

        for level in 1..=depth {
            let segment = segments.next().ok_or_else(|| {
                BridgeError::invalid_spec(format!("unbalanced brackets in {s:?}"))
            })?;
            // The segment after the last ']' is the optional trailing offset
            if level == depth && segment.is_empty() {
                break;
            }
            let offset = segment.strip_prefix('+').ok_or_else(|| {
                BridgeError::invalid_spec(format!("expected '+offset' after ']' in {s:?}"))
            })?;
            hops.push(parse_hop(offset, level, s)?);
        }

        if segments.next().is_some() {
            return Err(BridgeError::invalid_spec(format!(
                "unbalanced brackets in {s:?}"
            )));
        }

        PointerChain::new(hops)
    }
}

fn parse_hop(token: &str, level: usize, chain: &str) -> BridgeResult<u64> {
    if token.contains('[') {
        return Err(BridgeError::invalid_spec(format!(
            "unbalanced brackets in {chain:?}"
        )));
    }
    parse_hex(token).ok_or_else(|| {
        BridgeError::invalid_spec(format!("hop {level} is not a hex number: {token:?}"))
    })
}

impl fmt::Display for PointerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (base, rest) = self.hops.split_first().ok_or(fmt::Error)?;
        let (inner, last) = match rest.split_last() {
            Some((last, inner)) => (inner, Some(last)),
            None => (&[][..], None),
        };
        for _ in 0..=inner.len() {
            f.write_str("[")?;
        }
        write!(f, "main+0x{base:X}]")?;
        for hop in inner {
            write!(f, "+0x{hop:X}]")?;
        }
        if let Some(last) = last {
            write!(f, "+0x{last:X}")?;
        }
        Ok(())
    }
}

/// How a read or write locates its target bytes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", content = "target", rename_all = "snake_case")]
pub enum AddressSpec {
    /// Heap address as understood by the bridge (`peek`/`poke`)
    Absolute(Address),
    /// Offset from the main executable's base (`peekMain`/`pokeMain`)
    MainRelative(Address),
    /// Address in the target's full virtual address space (`peekAbsolute`/`pokeAbsolute`)
    Untranslated(Address),
    /// Dereference chain starting at the main module (`pointerPeek`/`pointerPoke`)
    PointerChain(PointerChain),
}

impl AddressSpec {
    /// Shorthand for [`AddressSpec::Absolute`]
    pub fn absolute(address: u64) -> Self {
        AddressSpec::Absolute(Address::new(address))
    }

    /// Shorthand for [`AddressSpec::MainRelative`]
    pub fn main(address: u64) -> Self {
        AddressSpec::MainRelative(Address::new(address))
    }

    /// Shorthand for [`AddressSpec::Untranslated`]
    pub fn untranslated(address: u64) -> Self {
        AddressSpec::Untranslated(Address::new(address))
    }

    /// Parses a pointer chain in bracket notation
    pub fn pointer(chain: &str) -> BridgeResult<Self> {
        chain.parse().map(AddressSpec::PointerChain)
    }
}

impl fmt::Display for AddressSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressSpec::Absolute(addr) => write!(f, "heap+{addr}"),
            AddressSpec::MainRelative(addr) => write!(f, "main+{addr}"),
            AddressSpec::Untranslated(addr) => write!(f, "{addr}"),
            AddressSpec::PointerChain(chain) => write!(f, "{chain}"),
        }
    }
}
