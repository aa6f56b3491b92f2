// File:    key_generator.rs
// Author:  apezoo
// Date:    2025-07-17
//
// Description: Provides functionality for generating random key sheets from the rotor catalog.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use crate::alphabet::{ALPHABET_LEN, Letter};
use crate::catalog::{REFLECTORS, ROTORS};
use crate::error::{ConfigError, Result};
use crate::key_sheet::{KeySheet, ReflectorSetting, RotorSetting};
use crate::machine::Stepping;
use crate::plugboard::MAX_PAIRS;
use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use uuid::Uuid;

/// Shape of the key sheets produced by [`generate_key_sheet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyOptions {
    /// Number of distinct catalog rotors to place in the machine.
    pub rotors: usize,
    /// Number of plugboard cables.
    pub plug_pairs: usize,
    /// Stepping mode recorded in the sheet.
    pub stepping: Stepping,
}

impl Default for KeyOptions {
    fn default() -> Self {
        Self {
            rotors: 3,
            plug_pairs: 10,
            stepping: Stepping::Odometer,
        }
    }
}

/// Generates a random key sheet.
///
/// Rotors are drawn without replacement from the catalog, the reflector and
/// start positions uniformly, and the plug pairs from a shuffled alphabet.
/// The sheet id is always a fresh UUID, even with a seeded `rng`.
///
/// # Arguments
///
/// * `rng` - The randomness source. Pass a seeded generator for reproducible settings.
/// * `options` - How many rotors and plug pairs to use.
///
/// # Errors
///
/// Returns a configuration error if `options` asks for no rotors, more rotors
/// than the catalog holds, or more than 13 plug pairs.
pub fn generate_key_sheet<R: Rng + ?Sized>(rng: &mut R, options: &KeyOptions) -> Result<KeySheet> {
    if options.rotors == 0 {
        return Err(ConfigError::NoRotors.into());
    }
    if options.rotors > ROTORS.len() {
        return Err(ConfigError::NotEnoughRotors {
            requested: options.rotors,
            available: ROTORS.len(),
        }
        .into());
    }
    if options.plug_pairs > MAX_PAIRS {
        return Err(ConfigError::TooManyPlugPairs(options.plug_pairs).into());
    }

    let mut rotor_order: Vec<usize> = (0..ROTORS.len()).collect();
    rotor_order.shuffle(rng);
    let rotors = rotor_order
        .iter()
        .take(options.rotors)
        .map(|&i| RotorSetting {
            name: ROTORS[i].name.to_string(),
            wiring: ROTORS[i].wiring.to_string(),
            notch: ROTORS[i].notch,
        })
        .collect();

    let reflector = &REFLECTORS[rng.random_range(0..REFLECTORS.len())];

    let mut letters: Vec<Letter> = Letter::all().collect();
    letters.shuffle(rng);
    let plugboard = letters
        .chunks_exact(2)
        .take(options.plug_pairs)
        .map(|pair| format!("{}{}", pair[0], pair[1]))
        .collect();

    let positions = (0..options.rotors)
        .map(|_| rng.random_range(0..ALPHABET_LEN))
        .map(|index| Letter::wrapping(index).to_char())
        .collect();

    let sheet = KeySheet {
        id: Uuid::new_v4().to_string(),
        rotors,
        reflector: ReflectorSetting {
            name: reflector.name.to_string(),
            wiring: reflector.wiring.to_string(),
        },
        plugboard,
        positions,
        stepping: options.stepping,
    };
    debug!(
        "generated key sheet '{}' with {} rotors and {} plug pairs",
        sheet.id, options.rotors, options.plug_pairs
    );
    Ok(sheet)
}
