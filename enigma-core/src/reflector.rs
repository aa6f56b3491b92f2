// File:    reflector.rs
// Author:  apezoo
// Date:    2025-07-17
//
// Description: The reflector that turns the rotor stack into a round trip.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Reflectors: involutions of the alphabet without fixed points.

use crate::alphabet::{ALPHABET_LEN, Letter};
use crate::error::ConfigError;
use crate::wiring::Wiring;

/// A fixed-point-free involution: 13 disjoint letter swaps.
///
/// This is what keeps a letter from ever enciphering to itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReflectorSpec {
    name: String,
    wiring: Wiring,
}

impl ReflectorSpec {
    /// Validates `wiring` as a reflector.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReflectorFixedPoint`] or
    /// [`ConfigError::ReflectorNotInvolution`].
    pub fn new(name: impl Into<String>, wiring: Wiring) -> Result<Self, ConfigError> {
        if let Some(fixed) = wiring.fixed_point() {
            return Err(ConfigError::ReflectorFixedPoint(fixed.to_char()));
        }
        if let Some(from) = Letter::all().find(|&l| wiring.forward(wiring.forward(l)) != l) {
            return Err(ConfigError::ReflectorNotInvolution {
                from: from.to_char(),
                to: wiring.forward(from).to_char(),
            });
        }
        Ok(Self {
            name: name.into(),
            wiring,
        })
    }

    /// Parses a reflector from a 26-letter table.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the table is not a permutation, has a
    /// fixed point, or is not an involution.
    pub fn parse(name: impl Into<String>, table: &str) -> Result<Self, ConfigError> {
        Self::new(name, Wiring::parse(table)?)
    }

    /// Builds a reflector from 13 two-letter pairs such as `["AY", "BR", ...]`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the pairs do not cover the alphabet
    /// exactly once.
    pub fn from_pairs<S: AsRef<str>>(
        name: impl Into<String>,
        pairs: &[S],
    ) -> Result<Self, ConfigError> {
        let mut table: [Option<Letter>; ALPHABET_LEN] = [None; ALPHABET_LEN];
        for pair in pairs {
            let (a, b) = crate::plugboard::parse_pair(pair.as_ref())?;
            for (from, to) in [(a, b), (b, a)] {
                if table[from.index()].is_some() {
                    return Err(ConfigError::WiringNotPermutation(from.to_char()));
                }
                table[from.index()] = Some(to);
            }
        }
        // A letter left unpaired would reflect onto itself.
        let letters = Letter::all()
            .map(|l| table[l.index()].unwrap_or(l))
            .collect::<Vec<_>>();
        Self::new(name, Wiring::from_letters(&letters)?)
    }

    /// Display name, e.g. `"B"`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The reflector wiring.
    #[must_use]
    pub const fn wiring(&self) -> &Wiring {
        &self.wiring
    }

    /// Reflects a letter.
    #[must_use]
    pub const fn reflect(&self, input: Letter) -> Letter {
        self.wiring.forward(input)
    }
}
