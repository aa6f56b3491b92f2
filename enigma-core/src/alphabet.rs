// File:    alphabet.rs
// Author:  apezoo
// Date:    2025-07-17
//
// Description: The 26-letter alphabet that indexes every substitution table of the machine.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! The A–Z alphabet and the [`Letter`] index type.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of symbols in the machine alphabet.
pub const ALPHABET_LEN: usize = SIZE as usize;

const SIZE: u8 = 26;

/// The alphabet in index order.
pub const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// One symbol of the alphabet, stored as its index `0..26`.
///
/// Serializes as its uppercase character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "char", try_from = "char")]
pub struct Letter(u8);

impl Letter {
    /// Builds a letter from its index, or `None` when `index >= 26`.
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if index < SIZE {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Builds a letter from any index, reduced modulo 26.
    #[must_use]
    pub const fn wrapping(index: usize) -> Self {
        Self(ALPHABET.as_bytes()[index % ALPHABET_LEN] - b'A')
    }

    /// Parses an ASCII letter. Lowercase maps to the same letter as uppercase.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'A'..='Z' => Some(Self(c as u8 - b'A')),
            'a'..='z' => Some(Self(c as u8 - b'a')),
            _ => None,
        }
    }

    /// The index of this letter, `0..26`.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The index of this letter as a byte, `0..26`.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// The uppercase character for this letter.
    #[must_use]
    pub const fn to_char(self) -> char {
        (b'A' + self.0) as char
    }

    /// Rotates the letter forward by `offset` positions, wrapping at Z.
    #[must_use]
    pub const fn shift(self, offset: u8) -> Self {
        Self((self.0 + offset % SIZE) % SIZE)
    }

    /// Rotates the letter forward by the index of `offset`.
    #[must_use]
    pub const fn shift_by(self, offset: Self) -> Self {
        self.shift(offset.0)
    }

    /// Rotates the letter backward by `offset` positions, wrapping at A.
    #[must_use]
    pub const fn unshift(self, offset: u8) -> Self {
        Self((self.0 + SIZE - offset % SIZE) % SIZE)
    }

    /// Rotates the letter backward by the index of `offset`.
    #[must_use]
    pub const fn unshift_by(self, offset: Self) -> Self {
        self.unshift(offset.0)
    }

    /// Iterates over A..=Z in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..SIZE).map(Self)
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl From<Letter> for char {
    fn from(letter: Letter) -> Self {
        letter.to_char()
    }
}

impl TryFrom<char> for Letter {
    type Error = ConfigError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Self::from_char(c).ok_or(ConfigError::InvalidLetter(c))
    }
}

/// Returns `true` for characters the machine enciphers (ASCII letters).
#[must_use]
pub const fn is_cipher_symbol(c: char) -> bool {
    c.is_ascii_alphabetic()
}

/// Formats text into groups of `size` letters separated by spaces, dropping
/// every non-letter. A `size` of zero leaves the letters ungrouped.
#[must_use]
pub fn group_letters(text: &str, size: usize) -> String {
    let letters: Vec<char> = text
        .chars()
        .filter_map(Letter::from_char)
        .map(Letter::to_char)
        .collect();
    if size == 0 {
        return letters.into_iter().collect();
    }
    letters
        .chunks(size)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_char_accepts_both_cases() {
        assert_eq!(Letter::from_char('A').map(Letter::index), Some(0));
        assert_eq!(Letter::from_char('z').map(Letter::index), Some(25));
        assert_eq!(Letter::from_char('q'), Letter::from_char('Q'));
    }

    #[test]
    fn test_from_char_rejects_non_letters() {
        for c in [' ', '1', '.', 'Ä', '\n'] {
            assert_eq!(Letter::from_char(c), None, "{c:?} should be rejected");
        }
    }

    #[test]
    fn test_new_range() {
        assert!(Letter::new(25).is_some());
        assert!(Letter::new(26).is_none());
    }

    #[test]
    fn test_wrapping() {
        assert_eq!(Letter::wrapping(26).to_char(), 'A');
        assert_eq!(Letter::wrapping(51).to_char(), 'Z');
    }

    #[test]
    fn test_shift_wraps() {
        let z = Letter::from_char('Z').unwrap();
        assert_eq!(z.shift(1).to_char(), 'A');
        assert_eq!(z.shift(27).to_char(), 'A');
        let a = Letter::from_char('A').unwrap();
        assert_eq!(a.unshift(1).to_char(), 'Z');
        assert_eq!(a.shift(5).unshift(5), a);
    }

    #[test]
    fn test_shift_by_letter_offsets() {
        let y = Letter::from_char('Y').unwrap();
        let d = Letter::from_char('D').unwrap();
        assert_eq!(y.shift_by(d).to_char(), 'B');
        assert_eq!(y.shift_by(d).unshift_by(d), y);
        assert_eq!(y.as_u8(), 24);
        // Large offsets reduce modulo 26 without overflowing.
        assert_eq!(y.shift(u8::MAX).to_char(), 'T');
        assert_eq!(y.unshift(u8::MAX).to_char(), 'D');
    }

    #[test]
    fn test_all_is_alphabet() {
        let collected: String = Letter::all().map(Letter::to_char).collect();
        assert_eq!(collected, ALPHABET);
    }

    #[test]
    fn test_serde_as_char() {
        let letter = Letter::from_char('K').unwrap();
        assert_eq!(serde_json::to_string(&letter).unwrap(), "\"K\"");
        let back: Letter = serde_json::from_str("\"k\"").unwrap();
        assert_eq!(back, letter);
        assert!(serde_json::from_str::<Letter>("\"7\"").is_err());
    }

    #[test]
    fn test_group_letters() {
        assert_eq!(group_letters("ilbda jmtaz!", 5), "ILBDA JMTAZ");
        assert_eq!(group_letters("ABCDEFG", 3), "ABC DEF G");
        assert_eq!(group_letters("A B C", 0), "ABC");
        assert_eq!(group_letters("", 5), "");
    }
}
