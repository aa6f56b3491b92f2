// File:    catalog.rs
// Author:  apezoo
// Date:    2025-07-17
//
// Description: Historical rotor and reflector wirings used as demonstration settings.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Wirings of the Enigma I rotors and reflectors.
//!
//! Notch letters are the turnover positions: a rotor showing its notch letter
//! carries into its left neighbour on the next key press.

use crate::error::ConfigError;
use crate::reflector::ReflectorSpec;
use crate::rotor::RotorSpec;

/// A catalog rotor: name, wiring and notch letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotorPreset {
    /// Roman numeral name.
    pub name: &'static str,
    /// Wiring table, input A first.
    pub wiring: &'static str,
    /// Turnover letter.
    pub notch: char,
}

/// A catalog reflector: name and wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReflectorPreset {
    /// Reflector name.
    pub name: &'static str,
    /// Wiring table, input A first.
    pub wiring: &'static str,
}

/// Rotors I to V.
pub const ROTORS: [RotorPreset; 5] = [
    RotorPreset {
        name: "I",
        wiring: "EKMFLGDQVZNTOWYHXUSPAIBRCJ",
        notch: 'Q',
    },
    RotorPreset {
        name: "II",
        wiring: "AJDKSIRUXBLHWTMCQGZNPYVOFE",
        notch: 'E',
    },
    RotorPreset {
        name: "III",
        wiring: "BDFHJLCPRTXVZNYEIWGAKMUSQO",
        notch: 'V',
    },
    RotorPreset {
        name: "IV",
        wiring: "ESOVPZJAYQUIRHXLNFTGKDCMWB",
        notch: 'J',
    },
    RotorPreset {
        name: "V",
        wiring: "VZBRGITYUPSDNHLXAWMJQOFECK",
        notch: 'Z',
    },
];

/// Reflectors B and C.
pub const REFLECTORS: [ReflectorPreset; 2] = [
    ReflectorPreset {
        name: "B",
        wiring: "YRUHQSLDPXNGOKMIEBFZCWVJAT",
    },
    ReflectorPreset {
        name: "C",
        wiring: "FVPJIAOYEDRZXWGCTKUQSBNMHL",
    },
];

/// Looks up a catalog rotor by name (case-insensitive).
///
/// # Errors
///
/// Returns [`ConfigError::UnknownPreset`] if no rotor has that name.
pub fn rotor(name: &str) -> Result<RotorSpec, ConfigError> {
    let preset = ROTORS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))?;
    RotorSpec::parse(preset.name, preset.wiring, preset.notch)
}

/// Looks up a catalog reflector by name (case-insensitive).
///
/// # Errors
///
/// Returns [`ConfigError::UnknownPreset`] if no reflector has that name.
pub fn reflector(name: &str) -> Result<ReflectorSpec, ConfigError> {
    let preset = REFLECTORS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))?;
    ReflectorSpec::parse(preset.name, preset.wiring)
}
