use crate::catalog;
use crate::error::Result;
use crate::machine::{Machine, MachineBuilder, Stepping, SymbolPolicy};
use crate::plugboard::Plugboard;
use crate::reflector::ReflectorSpec;
use crate::rotor::RotorSpec;
use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// One rotor slot of a key sheet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RotorSetting {
    /// Informational name, e.g. `"III"`.
    #[serde(default)]
    pub name: String,
    /// The 26-letter wiring table.
    pub wiring: String,
    /// The turnover letter.
    pub notch: char,
}

/// The reflector of a key sheet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReflectorSetting {
    /// Informational name, e.g. `"B"`.
    #[serde(default)]
    pub name: String,
    /// The 26-letter wiring table.
    pub wiring: String,
}

/// The daily settings of a machine, in a form that can be stored and shared.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct KeySheet {
    /// A unique identifier for the key sheet.
    pub id: String,
    /// The rotors, left to right.
    pub rotors: Vec<RotorSetting>,
    /// The reflector.
    pub reflector: ReflectorSetting,
    /// Plugboard cables as two-letter strings.
    #[serde(default)]
    pub plugboard: Vec<String>,
    /// Start positions as window letters, left to right.
    pub positions: String,
    /// The stepping mode.
    #[serde(default)]
    pub stepping: Stepping,
}

impl KeySheet {
    /// Builds a key sheet from catalog names.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for unknown names or invalid plug pairs.
    pub fn from_presets(
        rotors: &[&str],
        reflector: &str,
        plugboard: &[&str],
        positions: &str,
    ) -> Result<Self> {
        let rotors = rotors
            .iter()
            .map(|name| catalog::rotor(name))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let reflector = catalog::reflector(reflector)?;
        let plugboard = Plugboard::from_pairs(plugboard)?;
        let sheet = Self {
            id: Uuid::new_v4().to_string(),
            rotors: rotors.iter().map(rotor_setting).collect(),
            reflector: reflector_setting(&reflector),
            plugboard: plugboard.pair_strings(),
            positions: positions.trim().to_uppercase(),
            stepping: Stepping::default(),
        };
        // Fail now rather than when the sheet is first used.
        sheet.build_machine()?;
        Ok(sheet)
    }

    /// Captures a machine's configuration and current positions.
    #[must_use]
    pub fn from_machine(machine: &Machine) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            rotors: machine.rotors().iter().map(rotor_setting).collect(),
            reflector: reflector_setting(machine.reflector()),
            plugboard: machine.plugboard().pair_strings(),
            positions: machine.window(),
            stepping: machine.stepping(),
        }
    }

    /// Validates the sheet and builds a machine at its start positions.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any table or setting is invalid.
    pub fn build_machine(&self) -> Result<Machine> {
        self.build_machine_with(SymbolPolicy::default())
    }

    /// Like [`build_machine`](Self::build_machine) with an explicit
    /// non-letter policy.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any table or setting is invalid.
    pub fn build_machine_with(&self, policy: SymbolPolicy) -> Result<Machine> {
        let reflector = ReflectorSpec::parse(&self.reflector.name, &self.reflector.wiring)?;
        let mut builder = MachineBuilder::new(reflector)
            .plugboard(Plugboard::from_pairs(&self.plugboard)?)
            .window(&self.positions)?
            .stepping(self.stepping)
            .policy(policy);
        for rotor in &self.rotors {
            builder = builder.rotor(RotorSpec::parse(
                &rotor.name,
                &rotor.wiring,
                rotor.notch,
            )?);
        }
        builder.build()
    }

    /// SHA-256 of the canonical settings, as lowercase hex.
    ///
    /// Two sheets that configure the same machine share a fingerprint, no
    /// matter their ids, names or plug pair order.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the sheet is invalid.
    pub fn fingerprint(&self) -> Result<String> {
        Ok(machine_fingerprint(&self.build_machine()?))
    }
}

/// SHA-256 of a machine's canonical settings, as lowercase hex.
#[must_use]
pub fn machine_fingerprint(machine: &Machine) -> String {
    let rotors = machine
        .rotors()
        .iter()
        .map(|r| format!("{}/{}", r.wiring(), r.notch()))
        .collect::<Vec<_>>()
        .join(",");
    let canonical = format!(
        "rotors={rotors};reflector={};plugboard={};positions={};stepping={:?}",
        machine.reflector().wiring(),
        machine.plugboard().pair_strings().join(","),
        machine.window(),
        machine.stepping(),
    );
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn rotor_setting(rotor: &RotorSpec) -> RotorSetting {
    RotorSetting {
        name: rotor.name().to_string(),
        wiring: rotor.wiring().to_string(),
        notch: rotor.notch().to_char(),
    }
}

fn reflector_setting(reflector: &ReflectorSpec) -> ReflectorSetting {
    ReflectorSetting {
        name: reflector.name().to_string(),
        wiring: reflector.wiring().to_string(),
    }
}

/// Loads a key sheet from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_key_sheet(path: &Path) -> Result<KeySheet> {
    let sheet_str = fs::read_to_string(path)?;
    let sheet: KeySheet = serde_json::from_str(&sheet_str)?;
    debug!("loaded key sheet '{}' from '{}'", sheet.id, path.display());
    Ok(sheet)
}

/// Saves a key sheet as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if the sheet cannot be serialized or written.
pub fn save_key_sheet(path: &Path, sheet: &KeySheet) -> Result<()> {
    let sheet_str = serde_json::to_string_pretty(sheet)?;
    fs::write(path, sheet_str)?;
    debug!("saved key sheet '{}' to '{}'", sheet.id, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, EnigmaError};

    #[test]
    fn test_from_presets_builds() {
        let sheet = KeySheet::from_presets(&["I", "II", "III"], "B", &["AB"], "aaa").unwrap();
        assert_eq!(sheet.positions, "AAA");
        assert_eq!(sheet.rotors[2].notch, 'V');
        let machine = sheet.build_machine().unwrap();
        assert_eq!(machine.window(), "AAA");
    }

    #[test]
    fn test_from_presets_rejects_unknown_rotor() {
        let err = KeySheet::from_presets(&["I", "IX"], "B", &[], "AA").unwrap_err();
        assert!(matches!(
            err,
            EnigmaError::Configuration(ConfigError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_from_presets_rejects_position_mismatch() {
        let err = KeySheet::from_presets(&["I", "II"], "B", &[], "AAA").unwrap_err();
        assert!(matches!(
            err,
            EnigmaError::Configuration(ConfigError::PositionCount { .. })
        ));
    }

    #[test]
    fn test_fingerprint_ignores_id_and_pair_order() {
        let a = KeySheet::from_presets(&["I", "II", "III"], "B", &["AB", "CD"], "AAA").unwrap();
        let mut b = a.clone();
        b.id = "other".to_string();
        b.plugboard = vec!["DC".to_string(), "BA".to_string()];
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        assert_eq!(a.fingerprint().unwrap().len(), 64);
    }

    #[test]
    fn test_fingerprint_tracks_positions() {
        let a = KeySheet::from_presets(&["I", "II", "III"], "B", &[], "AAA").unwrap();
        let b = KeySheet::from_presets(&["I", "II", "III"], "B", &[], "AAB").unwrap();
        assert_ne!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
    }

    #[test]
    fn test_from_machine_round_trips_settings() {
        let sheet = KeySheet::from_presets(&["IV", "V", "I"], "C", &["QZ"], "XYZ").unwrap();
        let machine = sheet.build_machine().unwrap();
        let captured = KeySheet::from_machine(&machine);
        assert_eq!(captured.rotors, sheet.rotors);
        assert_eq!(captured.reflector, sheet.reflector);
        assert_eq!(captured.plugboard, sheet.plugboard);
        assert_eq!(captured.positions, "XYZ");
    }

    #[test]
    fn test_stepping_defaults_when_missing() {
        let json = r#"{
            "id": "x",
            "rotors": [{ "wiring": "EKMFLGDQVZNTOWYHXUSPAIBRCJ", "notch": "Q" }],
            "reflector": { "wiring": "YRUHQSLDPXNGOKMIEBFZCWVJAT" },
            "positions": "A"
        }"#;
        let sheet: KeySheet = serde_json::from_str(json).unwrap();
        assert_eq!(sheet.stepping, Stepping::Odometer);
        assert!(sheet.plugboard.is_empty());
        assert!(sheet.build_machine().is_ok());
    }
}
