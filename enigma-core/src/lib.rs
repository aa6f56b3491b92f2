// File:    lib.rs
// Author:  apezoo
// Date:    2025-07-17
//
// Description: The main library crate for enigma-core, orchestrating the cipher engine, key sheets and key generation.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! # Enigma Core Library
//!
//! This library simulates the Enigma rotor cipher machine: a plugboard, a
//! stack of rotors stepping like an odometer, and a reflector that sends the
//! signal back through the rotors. Enciphering and deciphering are the same
//! operation, and no letter ever enciphers to itself.
//!
//! Every key press can also be traced stage by stage, which is what
//! visualizations of the machine are built on.
//!
//! ```
//! use enigma_core::key_sheet::KeySheet;
//!
//! let sheet = KeySheet::from_presets(&["I", "II", "III"], "B", &[], "AAA").unwrap();
//! let machine = sheet.build_machine().unwrap();
//!
//! let (ciphertext, _) = machine.process_text("AAAAA").unwrap();
//! assert_eq!(ciphertext, "BDZGO");
//!
//! let (plaintext, _) = machine.process_text(&ciphertext).unwrap();
//! assert_eq!(plaintext, "AAAAA");
//! ```

/// The machine alphabet and letter helpers.
pub mod alphabet;
/// Historical rotor and reflector wirings.
pub mod catalog;
/// Error types.
pub mod error;
/// Random key sheet generation.
pub mod key_generator;
/// Serializable machine settings and their persistence.
pub mod key_sheet;
/// The cipher engine.
pub mod machine;
/// The plugboard.
pub mod plugboard;
/// Reflectors.
pub mod reflector;
/// Rotors.
pub mod rotor;
/// Stage-by-stage signal traces.
pub mod trace;
/// Permutation tables.
pub mod wiring;

pub use alphabet::Letter;
pub use error::{ConfigError, EnigmaError, Result};
pub use machine::{Encipher, Keystroke, Machine, MachineBuilder, Stepping, SymbolPolicy};
