//! Controller inputs forwarded to the bridge

use crate::core::types::{BridgeError, BridgeResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Buttons accepted by `click`, `press` and `release`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    A,
    B,
    X,
    Y,
    L,
    R,
    Zl,
    Zr,
    Plus,
    Minus,
    LStick,
    RStick,
    DUp,
    DDown,
    DLeft,
    DRight,
    Home,
    Capture,
}

impl Button {
    pub const ALL: [Button; 18] = [
        Button::A,
        Button::B,
        Button::X,
        Button::Y,
        Button::L,
        Button::R,
        Button::Zl,
        Button::Zr,
        Button::Plus,
        Button::Minus,
        Button::LStick,
        Button::RStick,
        Button::DUp,
        Button::DDown,
        Button::DLeft,
        Button::DRight,
        Button::Home,
        Button::Capture,
    ];

    /// Name used on the wire
    pub const fn as_str(&self) -> &'static str {
        match self {
            Button::A => "A",
            Button::B => "B",
            Button::X => "X",
            Button::Y => "Y",
            Button::L => "L",
            Button::R => "R",
            Button::Zl => "ZL",
            Button::Zr => "ZR",
            Button::Plus => "PLUS",
            Button::Minus => "MINUS",
            Button::LStick => "LSTICK",
            Button::RStick => "RSTICK",
            Button::DUp => "DUP",
            Button::DDown => "DDOWN",
            Button::DLeft => "DLEFT",
            Button::DRight => "DRIGHT",
            Button::Home => "HOME",
            Button::Capture => "CAPTURE",
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Button {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Button::ALL
            .into_iter()
            .find(|button| button.as_str() == upper)
            .ok_or_else(|| BridgeError::InvalidValueType(format!("unknown button: {s:?}")))
    }
}

/// Analog sticks accepted by `setStick`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stick {
    Left,
    Right,
}

impl Stick {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Stick::Left => "LEFT",
            Stick::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Stick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deflection of one stick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickPosition {
    pub x: i16,
    pub y: i16,
}

/// Last positions sent for both sticks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StickState {
    left: StickPosition,
    right: StickPosition,
}

impl StickState {
    pub fn get(&self, stick: Stick) -> StickPosition {
        match stick {
            Stick::Left => self.left,
            Stick::Right => self.right,
        }
    }

    /// Updates the given axes, keeps the others, and returns the merged position
    pub fn merge(&mut self, stick: Stick, x: Option<i16>, y: Option<i16>) -> StickPosition {
        let slot = match stick {
            Stick::Left => &mut self.left,
            Stick::Right => &mut self.right,
        };
        if let Some(x) = x {
            slot.x = x;
        }
        if let Some(y) = y {
            slot.y = y;
        }
        *slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_names() {
        assert_eq!(Button::Zl.to_string(), "ZL");
        assert_eq!(Button::DRight.to_string(), "DRIGHT");
        assert_eq!("plus".parse::<Button>().unwrap(), Button::Plus);
        assert_eq!(" capture ".parse::<Button>().unwrap(), Button::Capture);
        assert!("TURBO".parse::<Button>().is_err());
    }

    #[test]
    fn test_every_button_parses_back() {
        for button in Button::ALL {
            assert_eq!(button.as_str().parse::<Button>().unwrap(), button);
        }
    }

    #[test]
    fn test_stick_merge_keeps_other_axis() {
        let mut state = StickState::default();
        assert_eq!(
            state.merge(Stick::Left, Some(100), None),
            StickPosition { x: 100, y: 0 }
        );
        assert_eq!(
            state.merge(Stick::Left, None, Some(-300)),
            StickPosition { x: 100, y: -300 }
        );
        assert_eq!(state.get(Stick::Right), StickPosition::default());
    }
}
