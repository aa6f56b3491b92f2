// File:    rotor.rs
// Author:  apezoo
// Date:    2025-07-17
//
// Description: Rotor wiring and the offset substitution applied at each rotor position.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Rotors: a fixed wiring plus a turnover notch.

use crate::alphabet::Letter;
use crate::error::ConfigError;
use crate::wiring::Wiring;

/// The static description of one rotor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RotorSpec {
    name: String,
    wiring: Wiring,
    notch: Letter,
}

impl RotorSpec {
    /// Creates a rotor from an already validated wiring.
    #[must_use]
    pub fn new(name: impl Into<String>, wiring: Wiring, notch: Letter) -> Self {
        Self {
            name: name.into(),
            wiring,
            notch,
        }
    }

    /// Parses a rotor from its 26-letter wiring string and notch letter.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the wiring is not a permutation or the
    /// notch is not a letter.
    pub fn parse(name: impl Into<String>, wiring: &str, notch: char) -> Result<Self, ConfigError> {
        let wiring = Wiring::parse(wiring)?;
        let notch = Letter::from_char(notch).ok_or(ConfigError::InvalidLetter(notch))?;
        Ok(Self::new(name, wiring, notch))
    }

    /// Display name, e.g. `"III"`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The rotor wiring.
    #[must_use]
    pub const fn wiring(&self) -> &Wiring {
        &self.wiring
    }

    /// The position at which this rotor carries into its left neighbour.
    #[must_use]
    pub const fn notch(&self) -> Letter {
        self.notch
    }

    /// Substitution with current flowing right to left, rotor turned to `position`.
    #[must_use]
    pub const fn forward(&self, input: Letter, position: Letter) -> Letter {
        self.wiring.forward(input.shift_by(position)).unshift_by(position)
    }

    /// Substitution with current flowing left to right, rotor turned to `position`.
    #[must_use]
    pub const fn backward(&self, input: Letter, position: Letter) -> Letter {
        self.wiring.backward(input.shift_by(position)).unshift_by(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter(c: char) -> Letter {
        Letter::from_char(c).unwrap()
    }

    fn rotor_iii() -> RotorSpec {
        RotorSpec::parse("III", "BDFHJLCPRTXVZNYEIWGAKMUSQO", 'V').unwrap()
    }

    #[test]
    fn test_forward_at_rest() {
        let rotor = rotor_iii();
        assert_eq!(rotor.forward(letter('A'), letter('A')), letter('B'));
    }

    #[test]
    fn test_forward_with_offset() {
        // At position B, A enters on contact B, leaves on D, which is C once unshifted.
        let rotor = rotor_iii();
        assert_eq!(rotor.forward(letter('A'), letter('B')), letter('C'));
    }

    #[test]
    fn test_backward_undoes_forward_at_every_position() {
        let rotor = rotor_iii();
        for position in Letter::all() {
            for input in Letter::all() {
                let out = rotor.forward(input, position);
                assert_eq!(rotor.backward(out, position), input);
            }
        }
    }

    #[test]
    fn test_parse_rejects_bad_notch() {
        let err = RotorSpec::parse("X", "BDFHJLCPRTXVZNYEIWGAKMUSQO", '#').unwrap_err();
        assert_eq!(err, ConfigError::InvalidLetter('#'));
    }

    #[test]
    fn test_accessors() {
        let rotor = rotor_iii();
        assert_eq!(rotor.name(), "III");
        assert_eq!(rotor.notch(), letter('V'));
        assert_eq!(rotor.wiring().to_string(), "BDFHJLCPRTXVZNYEIWGAKMUSQO");
    }
}
