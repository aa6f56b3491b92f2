// File:    wiring.rs
// Author:  apezoo
// Date:    2025-07-17
//
// Description: Validated permutation tables used by rotors and reflectors.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Substitution tables over the machine alphabet.

use crate::alphabet::{ALPHABET_LEN, Letter};
use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// A bijection of the alphabet together with its inverse.
///
/// Construction rejects anything that is not a permutation, so lookups in
/// both directions never fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Wiring {
    forward: [Letter; ALPHABET_LEN],
    backward: [Letter; ALPHABET_LEN],
}

impl Wiring {
    /// Builds a wiring from a 26-letter string, where the letter at index `i`
    /// is the output for input `i`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the string is not 26 letters long, holds a
    /// non-letter, or repeats a letter.
    pub fn parse(table: &str) -> Result<Self, ConfigError> {
        let letters = table
            .chars()
            .map(Letter::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_letters(&letters)
    }

    /// Builds a wiring from its output letters in input order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::WiringLength`] or
    /// [`ConfigError::WiringNotPermutation`] when `letters` is not a
    /// permutation of the alphabet.
    pub fn from_letters(letters: &[Letter]) -> Result<Self, ConfigError> {
        if letters.len() != ALPHABET_LEN {
            return Err(ConfigError::WiringLength(letters.len()));
        }
        let mut forward = [Letter::wrapping(0); ALPHABET_LEN];
        let mut backward = [Letter::wrapping(0); ALPHABET_LEN];
        let mut seen = [false; ALPHABET_LEN];
        for (input, &output) in Letter::all().zip(letters) {
            if seen[output.index()] {
                return Err(ConfigError::WiringNotPermutation(output.to_char()));
            }
            seen[output.index()] = true;
            forward[input.index()] = output;
            backward[output.index()] = input;
        }
        Ok(Self { forward, backward })
    }

    /// The identity permutation.
    #[must_use]
    pub fn identity() -> Self {
        let forward: [Letter; ALPHABET_LEN] = std::array::from_fn(Letter::wrapping);
        Self {
            forward,
            backward: forward,
        }
    }

    /// Output for `input` in the forward direction.
    #[must_use]
    pub const fn forward(&self, input: Letter) -> Letter {
        self.forward[input.index()]
    }

    /// Output for `input` in the backward direction (the inverse table).
    #[must_use]
    pub const fn backward(&self, input: Letter) -> Letter {
        self.backward[input.index()]
    }

    /// Returns `true` when the table equals its own inverse.
    #[must_use]
    pub fn is_involution(&self) -> bool {
        self.forward == self.backward
    }

    /// The first letter mapped to itself, if any.
    #[must_use]
    pub fn fixed_point(&self) -> Option<Letter> {
        Letter::all().find(|&l| self.forward(l) == l)
    }
}

impl FromStr for Wiring {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Wiring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for letter in &self.forward {
            write!(f, "{letter}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROTOR_I: &str = "EKMFLGDQVZNTOWYHXUSPAIBRCJ";

    fn letter(c: char) -> Letter {
        Letter::from_char(c).unwrap()
    }

    #[test]
    fn test_parse_and_lookup() {
        let wiring = Wiring::parse(ROTOR_I).unwrap();
        assert_eq!(wiring.forward(letter('A')), letter('E'));
        assert_eq!(wiring.forward(letter('Z')), letter('J'));
        assert_eq!(wiring.backward(letter('E')), letter('A'));
        assert_eq!(wiring.to_string(), ROTOR_I);
    }

    #[test]
    fn test_backward_inverts_forward() {
        let wiring = Wiring::parse(ROTOR_I).unwrap();
        for l in Letter::all() {
            assert_eq!(wiring.backward(wiring.forward(l)), l);
        }
    }

    #[test]
    fn test_duplicate_output_rejected() {
        let err = Wiring::parse("AACDEFGHIJKLMNOPQRSTUVWXYZ").unwrap_err();
        assert_eq!(err, ConfigError::WiringNotPermutation('A'));
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert_eq!(
            Wiring::parse("ABC").unwrap_err(),
            ConfigError::WiringLength(3)
        );
    }

    #[test]
    fn test_non_letter_rejected() {
        assert_eq!(
            Wiring::parse("ABCDEFGHIJKLMNOPQRSTUVWXY1").unwrap_err(),
            ConfigError::InvalidLetter('1')
        );
    }

    #[test]
    fn test_identity() {
        let id = Wiring::identity();
        assert!(id.is_involution());
        assert_eq!(id.fixed_point(), Some(letter('A')));
        assert_eq!(id.to_string(), crate::alphabet::ALPHABET);
    }

    #[test]
    fn test_involution_detection() {
        let reflector_b = Wiring::parse("YRUHQSLDPXNGOKMIEBFZCWVJAT").unwrap();
        assert!(reflector_b.is_involution());
        assert_eq!(reflector_b.fixed_point(), None);
        assert!(!Wiring::parse(ROTOR_I).unwrap().is_involution());
    }
}
