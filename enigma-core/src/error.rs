// File:    error.rs
// Author:  apezoo
// Date:    2025-07-17
//
// Description: Error types shared by the machine, key sheet and key generation modules.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Error types for the Enigma core library.

use thiserror::Error;

/// A machine configuration that violates one of the table invariants.
///
/// Raised once at construction; the caller has to fix the settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A machine needs at least one rotor.
    #[error("a machine needs at least one rotor")]
    NoRotors,
    /// A wiring table does not have one entry per alphabet letter.
    #[error("wiring must have 26 letters, got {0}")]
    WiringLength(usize),
    /// A wiring table maps two inputs to the same output.
    #[error("wiring is not a permutation: '{0}' appears more than once")]
    WiringNotPermutation(char),
    /// A character outside A–Z was found in a table or setting.
    #[error("'{0}' is not a letter of the machine alphabet")]
    InvalidLetter(char),
    /// The reflector maps a letter to itself.
    #[error("reflector maps '{0}' to itself")]
    ReflectorFixedPoint(char),
    /// The reflector is not its own inverse.
    #[error("reflector is not an involution: '{from}' maps to '{to}' but not back")]
    ReflectorNotInvolution {
        /// Input letter.
        from: char,
        /// Output letter whose image is not `from`.
        to: char,
    },
    /// A plugboard letter appears in more than one pair.
    #[error("plugboard letter '{0}' is used by more than one pair")]
    PlugboardLetterReused(char),
    /// A plugboard pair connects a letter with itself.
    #[error("plugboard pair connects '{0}' with itself")]
    PlugboardSelfPair(char),
    /// A plugboard pair is not written as exactly two letters.
    #[error("plugboard pair '{0}' must be exactly two letters")]
    PlugboardPairShape(String),
    /// More plug pairs were requested than the alphabet can hold.
    #[error("at most 13 plug pairs fit the alphabet, got {0}")]
    TooManyPlugPairs(usize),
    /// The number of start positions does not match the number of rotors.
    #[error("expected {expected} rotor positions, got {actual}")]
    PositionCount {
        /// Number of rotors in the machine.
        expected: usize,
        /// Number of positions supplied.
        actual: usize,
    },
    /// A start position is outside `0..26`.
    #[error("rotor position {0} is outside 0..26")]
    PositionOutOfRange(u8),
    /// A rotor or reflector name is not in the catalog.
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
    /// More distinct rotors were requested than the catalog provides.
    #[error("the catalog has {available} rotors, {requested} were requested")]
    NotEnoughRotors {
        /// Rotors requested.
        requested: usize,
        /// Rotors available.
        available: usize,
    },
}

/// Errors produced by the Enigma core library.
#[derive(Debug, Error)]
pub enum EnigmaError {
    /// The machine configuration is invalid.
    #[error("invalid machine configuration: {0}")]
    Configuration(#[from] ConfigError),
    /// Strict mode rejected a character the machine cannot encipher.
    #[error("'{symbol}' at position {index} is not a letter; strict mode only accepts A-Z")]
    InvalidSymbol {
        /// The rejected character.
        symbol: char,
        /// Its character index in the input.
        index: usize,
    },
    /// Reading or writing a key sheet failed.
    #[error("key sheet I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// A key sheet could not be parsed or serialized.
    #[error("key sheet is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for the Enigma core library.
pub type Result<T> = std::result::Result<T, EnigmaError>;
