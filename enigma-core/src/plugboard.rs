// File:    plugboard.rs
// Author:  apezoo
// Date:    2025-07-17
//
// Description: The plugboard (Steckerbrett) swapping letter pairs before and after the rotors.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Plugboard: a partial involution of the alphabet.

use crate::alphabet::{ALPHABET_LEN, Letter};
use crate::error::ConfigError;

/// Maximum number of cables: every cable uses two of the 26 letters.
pub const MAX_PAIRS: usize = ALPHABET_LEN / 2;

/// Letter swaps applied on entry to and exit from the rotor stack.
///
/// Unplugged letters map to themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Plugboard {
    table: [Letter; ALPHABET_LEN],
}

impl Default for Plugboard {
    fn default() -> Self {
        Self {
            table: std::array::from_fn(Letter::wrapping),
        }
    }
}

impl Plugboard {
    /// An empty plugboard.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a plugboard from letter pairs.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a letter is reused or paired with itself.
    pub fn from_letter_pairs(pairs: &[(Letter, Letter)]) -> Result<Self, ConfigError> {
        if pairs.len() > MAX_PAIRS {
            return Err(ConfigError::TooManyPlugPairs(pairs.len()));
        }
        let mut board = Self::default();
        let mut used = [false; ALPHABET_LEN];
        for &(a, b) in pairs {
            if a == b {
                return Err(ConfigError::PlugboardSelfPair(a.to_char()));
            }
            for l in [a, b] {
                if used[l.index()] {
                    return Err(ConfigError::PlugboardLetterReused(l.to_char()));
                }
                used[l.index()] = true;
            }
            board.table[a.index()] = b;
            board.table[b.index()] = a;
        }
        Ok(board)
    }

    /// Builds a plugboard from two-letter strings such as `["AB", "CD"]`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a pair is malformed, a letter is reused,
    /// or there are more than 13 pairs.
    pub fn from_pairs<S: AsRef<str>>(pairs: &[S]) -> Result<Self, ConfigError> {
        let pairs = pairs
            .iter()
            .map(|p| parse_pair(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_letter_pairs(&pairs)
    }

    /// Swaps `input` with its partner, or returns it unchanged.
    #[must_use]
    pub const fn swap(&self, input: Letter) -> Letter {
        self.table[input.index()]
    }

    /// The plugged pairs, each with the smaller letter first, in alphabet order.
    #[must_use]
    pub fn pairs(&self) -> Vec<(Letter, Letter)> {
        Letter::all()
            .filter_map(|l| {
                let partner = self.swap(l);
                (l < partner).then_some((l, partner))
            })
            .collect()
    }

    /// The pairs formatted as two-letter strings.
    #[must_use]
    pub fn pair_strings(&self) -> Vec<String> {
        self.pairs()
            .into_iter()
            .map(|(a, b)| format!("{a}{b}"))
            .collect()
    }
}

/// Parses a two-letter pair such as `"AB"`.
pub(crate) fn parse_pair(pair: &str) -> Result<(Letter, Letter), ConfigError> {
    let mut chars = pair.trim().chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(a), Some(b), None) => {
            let a_letter = Letter::from_char(a).ok_or(ConfigError::InvalidLetter(a))?;
            let b_letter = Letter::from_char(b).ok_or(ConfigError::InvalidLetter(b))?;
            Ok((a_letter, b_letter))
        }
        _ => Err(ConfigError::PlugboardPairShape(pair.to_string())),
    }
}
