//! Module: buttons
//!
//! Purpose: Decode the resistive button ladder. Three buttons share one
//! analog input; each combination lands in its own voltage band.
//!
//! Architecture:
//! - One 8-bit sample per model tick (25 Hz), no explicit debounce: the
//!   call rate is the debounce window
//! - Level bitmask (currently pressed) + click bitmask (pending rising edges)
//! - Clicks are read-and-clear, per button
//!
//! Safety: Safe. No unsafe blocks. Copy types only.

/// Logical buttons wired on the ladder.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    /// Ignition position ON.
    On = 0,
    /// Ignition position START (only reachable while ON is held).
    Start = 1,
    /// Horn.
    Horn = 2,
}

impl Button {
    /// Number of buttons on the ladder.
    pub const COUNT: usize = 3;

    /// All buttons, in bit order.
    pub const ALL: [Button; Self::COUNT] = [Button::On, Button::Start, Button::Horn];

    /// Bit mask of this button inside [`ButtonLevels`].
    #[inline]
    pub const fn mask(self) -> u8 {
        1 << (self as u8)
    }
}

/// Set of buttons packed in one byte.
///
/// Bit layout:
/// - Bit 0: ON
/// - Bit 1: START
/// - Bit 2: HORN
/// - Bits 3-7: always zero
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ButtonLevels(u8);

impl ButtonLevels {
    /// No button pressed.
    pub const NONE: Self = Self(0);

    /// Mask of the defined button bits.
    pub const DEFINED: u8 = (1 << Button::COUNT) - 1;

    /// Build from raw bits, dropping undefined bits.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::DEFINED)
    }

    /// Raw bits.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether `button` is in the set.
    #[inline]
    pub const fn contains(self, button: Button) -> bool {
        (self.0 & button.mask()) != 0
    }

    /// Buttons present in `self` but not in `previous`.
    #[inline]
    pub const fn rising_from(self, previous: Self) -> Self {
        Self::from_bits(!previous.0 & self.0)
    }
}

/// Ladder band upper bounds (inclusive), in ADC counts.
///
/// Anything above the last bound means all three buttons.
const LADDER_BANDS: [(u8, ButtonLevels); 4] = [
    (23, ButtonLevels::NONE),
    (63, ButtonLevels::from_bits(Button::On.mask())),
    (99, ButtonLevels::from_bits(Button::On.mask() | Button::Horn.mask())),
    (186, ButtonLevels::from_bits(Button::On.mask() | Button::Start.mask())),
];

const LADDER_TOP: ButtonLevels =
    ButtonLevels::from_bits(Button::On.mask() | Button::Start.mask() | Button::Horn.mask());

/// Map one ladder reading to the set of pressed buttons.
#[inline]
pub fn decode_ladder(sample: u8) -> ButtonLevels {
    LADDER_BANDS
        .iter()
        .find(|(upper, _)| sample <= *upper)
        .map(|&(_, levels)| levels)
        .unwrap_or(LADDER_TOP)
}

/// Button decoder state.
///
/// # Example
///
/// ```
/// use tractor_ecu::buttons::{Button, ButtonDecoder};
///
/// let mut buttons = ButtonDecoder::new();
/// buttons.set_level(60); // ON pressed
///
/// assert!(buttons.is_pressed(Button::On));
/// assert!(buttons.is_clicked(Button::On));
/// assert!(!buttons.is_clicked(Button::On)); // already consumed
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ButtonDecoder {
    level: ButtonLevels,
    clicked: ButtonLevels,
}

impl ButtonDecoder {
    /// Create a decoder with nothing pressed and no pending click.
    pub const fn new() -> Self {
        Self {
            level: ButtonLevels::NONE,
            clicked: ButtonLevels::NONE,
        }
    }

    /// Feed one ladder sample.
    ///
    /// Rising edges are OR'ed into the pending clicks; clicks already pending
    /// stay pending until read.
    pub fn set_level(&mut self, sample: u8) {
        let level = decode_ladder(sample);
        let rising = level.rising_from(self.level);
        self.clicked = ButtonLevels::from_bits(self.clicked.bits() | rising.bits());
        self.level = level;
    }

    /// Whether `button` is currently pressed. No side effect.
    #[inline]
    pub fn is_pressed(&self, button: Button) -> bool {
        self.level.contains(button)
    }

    /// Whether `button` was clicked since the last call for that button.
    ///
    /// Clears only this button's click.
    #[inline]
    pub fn is_clicked(&mut self, button: Button) -> bool {
        let clicked = self.clicked.contains(button);
        self.clicked = ButtonLevels::from_bits(self.clicked.bits() & !button.mask());
        clicked
    }

    /// Currently pressed buttons.
    #[inline]
    pub fn levels(&self) -> ButtonLevels {
        self.level
    }

    /// Pending clicks, without consuming them.
    #[inline]
    pub fn pending_clicks(&self) -> ButtonLevels {
        self.clicked
    }
}

impl Default for ButtonDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_edges() {
        assert_eq!(decode_ladder(0), ButtonLevels::NONE);
        assert_eq!(decode_ladder(23), ButtonLevels::NONE);
        assert_eq!(decode_ladder(24).bits(), Button::On.mask());
        assert_eq!(decode_ladder(63).bits(), Button::On.mask());
        assert_eq!(
            decode_ladder(64).bits(),
            Button::On.mask() | Button::Horn.mask()
        );
        assert_eq!(
            decode_ladder(100).bits(),
            Button::On.mask() | Button::Start.mask()
        );
        assert_eq!(decode_ladder(186).bits(), Button::On.mask() | Button::Start.mask());
        assert_eq!(decode_ladder(187).bits(), ButtonLevels::DEFINED);
        assert_eq!(decode_ladder(255).bits(), ButtonLevels::DEFINED);
    }

    #[test]
    fn test_from_bits_masks_undefined() {
        assert_eq!(ButtonLevels::from_bits(0xFF).bits(), 0x07);
    }

    #[test]
    fn test_click_survives_release() {
        let mut buttons = ButtonDecoder::new();
        buttons.set_level(70); // ON + HORN
        buttons.set_level(0);

        assert!(!buttons.is_pressed(Button::Horn));
        assert!(buttons.is_clicked(Button::Horn));
    }
}
