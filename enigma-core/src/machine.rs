// File:    machine.rs
// Author:  apezoo
// Date:    2025-07-17
//
// Description: The cipher engine: rotor stepping and the full plugboard/rotor/reflector signal path.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! The Enigma machine.
//!
//! A [`Machine`] is an immutable value: the validated configuration (shared
//! behind an [`Arc`]) plus the current rotor positions. Pressing a key returns
//! the lit lamp together with a *new* machine whose rotors have advanced, so
//! independent simulations never share mutable state.
//!
//! Rotors and positions are listed left to right, as read through the
//! machine window; the signal enters at the rightmost rotor.

use crate::alphabet::Letter;
use crate::error::{ConfigError, EnigmaError, Result};
use crate::plugboard::Plugboard;
use crate::reflector::ReflectorSpec;
use crate::rotor::RotorSpec;
use crate::trace::{SignalPath, Stage, Trace};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// How the rotors advance on each key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stepping {
    /// Odometer stepping with single carry: the rightmost rotor always
    /// advances, and a rotor that was at its notch also advances its left
    /// neighbour. There is no double step.
    #[default]
    Odometer,
    /// The historical pawl mechanism: a rotor at its notch advances both its
    /// left neighbour and itself, which makes the middle rotor step twice in
    /// a row at turnover.
    DoubleStep,
}

/// What to do with characters outside A–Z.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolPolicy {
    /// Copy them to the output unchanged, without stepping the rotors.
    #[default]
    PassThrough,
    /// Reject them with [`EnigmaError::InvalidSymbol`].
    Strict,
}

#[derive(Debug)]
struct Config {
    rotors: Vec<RotorSpec>,
    reflector: ReflectorSpec,
    plugboard: Plugboard,
    stepping: Stepping,
    policy: SymbolPolicy,
}

/// A configured machine at a particular rotor position.
#[derive(Debug, Clone)]
pub struct Machine {
    config: Arc<Config>,
    positions: Vec<Letter>,
}

/// The result of pressing one key.
#[derive(Debug, Clone)]
pub struct Keystroke {
    /// The character typed.
    pub input: char,
    /// The lamp lit, or the input itself for a passed-through symbol.
    pub output: char,
    /// The machine after the key press.
    pub next: Machine,
}

impl Keystroke {
    /// Returns `true` if the key was enciphered (and the rotors moved).
    #[must_use]
    pub const fn enciphered(&self) -> bool {
        crate::alphabet::is_cipher_symbol(self.input)
    }
}

impl Machine {
    /// Builds a machine with odometer stepping and pass-through symbols.
    ///
    /// `start_positions` holds one value in `0..26` per rotor, left to right.
    ///
    /// # Errors
    ///
    /// Returns [`EnigmaError::Configuration`] if there are no rotors, the
    /// number of positions differs from the number of rotors, or a position
    /// is out of range.
    pub fn new(
        rotors: Vec<RotorSpec>,
        reflector: ReflectorSpec,
        plugboard: Plugboard,
        start_positions: &[u8],
    ) -> Result<Self> {
        let mut builder = MachineBuilder::new(reflector)
            .plugboard(plugboard)
            .positions(start_positions);
        for rotor in rotors {
            builder = builder.rotor(rotor);
        }
        builder.build()
    }

    /// Starts a [`MachineBuilder`].
    #[must_use]
    pub fn builder(reflector: ReflectorSpec) -> MachineBuilder {
        MachineBuilder::new(reflector)
    }

    /// The same configuration turned to other rotor positions.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::PositionCount`] if the count does not match.
    pub fn with_positions(&self, positions: &[Letter]) -> Result<Self> {
        if positions.len() != self.rotor_count() {
            return Err(ConfigError::PositionCount {
                expected: self.rotor_count(),
                actual: positions.len(),
            }
            .into());
        }
        Ok(Self {
            config: Arc::clone(&self.config),
            positions: positions.to_vec(),
        })
    }

    /// Number of rotors.
    #[must_use]
    pub fn rotor_count(&self) -> usize {
        self.config.rotors.len()
    }

    /// The rotors, left to right.
    #[must_use]
    pub fn rotors(&self) -> &[RotorSpec] {
        &self.config.rotors
    }

    /// The reflector.
    #[must_use]
    pub fn reflector(&self) -> &ReflectorSpec {
        &self.config.reflector
    }

    /// The plugboard.
    #[must_use]
    pub fn plugboard(&self) -> &Plugboard {
        &self.config.plugboard
    }

    /// The stepping mode.
    #[must_use]
    pub fn stepping(&self) -> Stepping {
        self.config.stepping
    }

    /// The non-letter policy.
    #[must_use]
    pub fn policy(&self) -> SymbolPolicy {
        self.config.policy
    }

    /// Current rotor positions, left to right.
    #[must_use]
    pub fn positions(&self) -> &[Letter] {
        &self.positions
    }

    /// Current rotor positions as window letters, e.g. `"ADU"`.
    #[must_use]
    pub fn window(&self) -> String {
        self.positions.iter().map(|l| l.to_char()).collect()
    }

    /// Presses one key.
    ///
    /// Letters step the rotors and are then enciphered; anything else is
    /// returned unchanged with the rotors left where they are, unless the
    /// machine is strict.
    ///
    /// # Errors
    ///
    /// Returns [`EnigmaError::InvalidSymbol`] for a non-letter on a strict
    /// machine.
    pub fn process_letter(&self, input: char) -> Result<Keystroke> {
        self.press(input, 0).map(|(keystroke, _)| keystroke)
    }

    /// Presses one key and records the signal path.
    ///
    /// The trace is `None` for a passed-through symbol.
    ///
    /// # Errors
    ///
    /// Same as [`process_letter`](Self::process_letter).
    pub fn trace_letter(&self, input: char) -> Result<(Keystroke, Option<Trace>)> {
        let (keystroke, letter) = self.press(input, 0)?;
        let trace = letter.map(|letter| Trace {
            input: letter,
            positions: keystroke.next.positions.clone(),
            entries: keystroke.next.signal_path(letter).collect(),
        });
        Ok((keystroke, trace))
    }

    /// Walks the signal path of `input` at the current positions, one stage
    /// per iteration, without stepping.
    ///
    /// Pair it with the machine returned by a key press to replay what that
    /// key press did.
    #[must_use]
    pub const fn signal_path(&self, input: Letter) -> SignalPath<'_> {
        SignalPath::new(self, input)
    }

    /// Enciphers characters lazily, threading the machine state through.
    ///
    /// Replaying the same input from the same machine yields the same
    /// output. Use [`Encipher::into_machine`] to continue a stream.
    pub fn process_sequence<I>(&self, input: I) -> Encipher<I::IntoIter>
    where
        I: IntoIterator<Item = char>,
    {
        Encipher {
            machine: self.clone(),
            input: input.into_iter(),
            index: 0,
            failed: false,
        }
    }

    /// Enciphers a whole string and returns the machine after its last letter.
    ///
    /// # Errors
    ///
    /// Returns [`EnigmaError::InvalidSymbol`] for the first non-letter on a
    /// strict machine.
    pub fn process_text(&self, text: &str) -> Result<(String, Self)> {
        let mut stream = self.process_sequence(text.chars());
        let output = stream.by_ref().collect::<Result<String>>()?;
        Ok((output, stream.into_machine()))
    }

    fn press(&self, input: char, index: usize) -> Result<(Keystroke, Option<Letter>)> {
        let Some(letter) = Letter::from_char(input) else {
            if self.config.policy == SymbolPolicy::Strict {
                return Err(EnigmaError::InvalidSymbol {
                    symbol: input,
                    index,
                });
            }
            let keystroke = Keystroke {
                input,
                output: input,
                next: self.clone(),
            };
            return Ok((keystroke, None));
        };
        let next = self.stepped();
        let output = next.encipher(letter);
        let keystroke = Keystroke {
            input,
            output: output.to_char(),
            next,
        };
        Ok((keystroke, Some(letter)))
    }

    /// The machine after one key press worth of rotor movement.
    fn stepped(&self) -> Self {
        let rotors = &self.config.rotors;
        let before = &self.positions;
        let last = before.len() - 1;
        let mut advance = vec![false; before.len()];
        advance[last] = true;
        match self.config.stepping {
            Stepping::Odometer => {
                for i in (1..=last).rev() {
                    if !(advance[i] && before[i] == rotors[i].notch()) {
                        break;
                    }
                    advance[i - 1] = true;
                }
            }
            Stepping::DoubleStep => {
                for i in (1..=last).rev() {
                    if before[i] == rotors[i].notch() {
                        advance[i] = true;
                        advance[i - 1] = true;
                    }
                }
            }
        }
        let positions = before
            .iter()
            .zip(&advance)
            .map(|(&p, &step)| if step { p.shift(1) } else { p })
            .collect::<Vec<_>>();
        if advance[..last].iter().any(|&a| a) {
            trace!(
                "turnover: {} -> {}",
                self.window(),
                positions.iter().map(|l| l.to_char()).collect::<String>()
            );
        }
        Self {
            config: Arc::clone(&self.config),
            positions,
        }
    }

    fn encipher(&self, input: Letter) -> Letter {
        self.signal_path(input)
            .last()
            .map_or(input, |entry| entry.letter)
    }

    pub(crate) fn apply_stage(&self, stage: Stage, input: Letter) -> Letter {
        let config = &self.config;
        match stage {
            Stage::PlugboardIn | Stage::PlugboardOut => config.plugboard.swap(input),
            Stage::RotorForward(i) => config.rotors[i].forward(input, self.positions[i]),
            Stage::Reflector => config.reflector.reflect(input),
            Stage::RotorBackward(i) => config.rotors[i].backward(input, self.positions[i]),
        }
    }
}

impl fmt::Display for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self
            .config
            .rotors
            .iter()
            .map(RotorSpec::name)
            .collect::<Vec<_>>()
            .join("-");
        write!(
            f,
            "{} | {} | {} | {}",
            self.config.reflector.name(),
            names,
            self.window(),
            self.config.plugboard.pair_strings().join(" ")
        )
    }
}

/// Lazy encipherment of a character stream.
///
/// Created by [`Machine::process_sequence`]. Yields one `Result<char>` per
/// input character; after a strict-mode error it yields nothing more.
#[derive(Debug, Clone)]
pub struct Encipher<I> {
    machine: Machine,
    input: I,
    index: usize,
    failed: bool,
}

impl<I> Encipher<I> {
    /// The machine as it stands after the characters consumed so far.
    #[must_use]
    pub const fn machine(&self) -> &Machine {
        &self.machine
    }

    /// Consumes the adapter, returning the machine to continue from.
    #[must_use]
    pub fn into_machine(self) -> Machine {
        self.machine
    }
}

impl<I: Iterator<Item = char>> Iterator for Encipher<I> {
    type Item = Result<char>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let c = self.input.next()?;
        let index = self.index;
        self.index += 1;
        match self.machine.press(c, index) {
            Ok((keystroke, _)) => {
                self.machine = keystroke.next;
                Some(Ok(keystroke.output))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            self.input.size_hint()
        }
    }
}

impl<I: std::iter::FusedIterator<Item = char>> std::iter::FusedIterator for Encipher<I> {}

/// Step-by-step construction of a [`Machine`].
#[derive(Debug, Clone)]
pub struct MachineBuilder {
    rotors: Vec<RotorSpec>,
    reflector: ReflectorSpec,
    plugboard: Plugboard,
    positions: Option<Vec<u8>>,
    stepping: Stepping,
    policy: SymbolPolicy,
}

impl MachineBuilder {
    /// A builder with no rotors, an empty plugboard and default modes.
    #[must_use]
    pub fn new(reflector: ReflectorSpec) -> Self {
        Self {
            rotors: Vec::new(),
            reflector,
            plugboard: Plugboard::empty(),
            positions: None,
            stepping: Stepping::default(),
            policy: SymbolPolicy::default(),
        }
    }

    /// Adds a rotor to the right of those already added.
    #[must_use]
    pub fn rotor(mut self, rotor: RotorSpec) -> Self {
        self.rotors.push(rotor);
        self
    }

    /// Sets the plugboard.
    #[must_use]
    pub const fn plugboard(mut self, plugboard: Plugboard) -> Self {
        self.plugboard = plugboard;
        self
    }

    /// Sets the start positions, left to right. Defaults to all `A`.
    #[must_use]
    pub fn positions(mut self, positions: &[u8]) -> Self {
        self.positions = Some(positions.to_vec());
        self
    }

    /// Sets the start positions from window letters such as `"AAZ"`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLetter`] for a non-letter.
    pub fn window(self, window: &str) -> std::result::Result<Self, ConfigError> {
        let positions = parse_window(window)?
            .into_iter()
            .map(Letter::as_u8)
            .collect::<Vec<_>>();
        Ok(self.positions(&positions))
    }

    /// Sets the stepping mode.
    #[must_use]
    pub const fn stepping(mut self, stepping: Stepping) -> Self {
        self.stepping = stepping;
        self
    }

    /// Sets the non-letter policy.
    #[must_use]
    pub const fn policy(mut self, policy: SymbolPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Validates the configuration and builds the machine.
    ///
    /// # Errors
    ///
    /// Returns [`EnigmaError::Configuration`] if there are no rotors or the
    /// positions do not fit the rotors.
    pub fn build(self) -> Result<Machine> {
        if self.rotors.is_empty() {
            return Err(ConfigError::NoRotors.into());
        }
        let count = self.rotors.len();
        let raw = self.positions.unwrap_or_else(|| vec![0; count]);
        if raw.len() != count {
            return Err(ConfigError::PositionCount {
                expected: count,
                actual: raw.len(),
            }
            .into());
        }
        let positions = raw
            .into_iter()
            .map(|p| Letter::new(p).ok_or(ConfigError::PositionOutOfRange(p)))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let machine = Machine {
            config: Arc::new(Config {
                rotors: self.rotors,
                reflector: self.reflector,
                plugboard: self.plugboard,
                stepping: self.stepping,
                policy: self.policy,
            }),
            positions,
        };
        debug!("machine ready: {machine} ({:?})", machine.stepping());
        Ok(machine)
    }
}

/// Parses window letters such as `"AAZ"` into positions.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidLetter`] for a non-letter.
pub fn parse_window(window: &str) -> std::result::Result<Vec<Letter>, ConfigError> {
    window.trim().chars().map(Letter::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn machine(window: &str) -> Machine {
        Machine::builder(catalog::reflector("B").unwrap())
            .rotor(catalog::rotor("I").unwrap())
            .rotor(catalog::rotor("II").unwrap())
            .rotor(catalog::rotor("III").unwrap())
            .window(window)
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_first_letter_from_aaa() {
        let keystroke = machine("AAA").process_letter('A').unwrap();
        assert_eq!(keystroke.output, 'B');
        assert_eq!(keystroke.next.window(), "AAB");
    }

    #[test]
    fn test_odometer_carry() {
        // III turns over at V.
        let keystroke = machine("AAV").process_letter('A').unwrap();
        assert_eq!(keystroke.next.window(), "ABW");
    }

    #[test]
    fn test_odometer_has_no_double_step() {
        // II sits on its notch E; without a carry from III it stays put.
        let keystroke = machine("ADU").process_letter('A').unwrap();
        assert_eq!(keystroke.next.window(), "ADV");
        let keystroke = keystroke.next.process_letter('A').unwrap();
        assert_eq!(keystroke.next.window(), "AEW");
        let keystroke = keystroke.next.process_letter('A').unwrap();
        assert_eq!(keystroke.next.window(), "AEX");
    }

    #[test]
    fn test_carry_chain_reaches_leftmost() {
        // II at E and III at V: both carry on the same key press.
        let keystroke = machine("AEV").process_letter('A').unwrap();
        assert_eq!(keystroke.next.window(), "BFW");
    }

    #[test]
    fn test_double_step_mode() {
        let base = machine("ADU");
        let machine = Machine::builder(base.reflector().clone())
            .rotor(base.rotors()[0].clone())
            .rotor(base.rotors()[1].clone())
            .rotor(base.rotors()[2].clone())
            .window("ADU")
            .unwrap()
            .stepping(Stepping::DoubleStep)
            .build()
            .unwrap();
        let (output, end) = machine.process_text("AAAAA").unwrap();
        assert_eq!(output, "DQICM");
        assert_eq!(end.window(), "BFZ");
    }

    #[test]
    fn test_non_letter_does_not_step() {
        let m = machine("AAA");
        let keystroke = m.process_letter(' ').unwrap();
        assert_eq!(keystroke.output, ' ');
        assert!(!keystroke.enciphered());
        assert_eq!(keystroke.next.window(), "AAA");
    }

    #[test]
    fn test_lowercase_is_enciphered() {
        let keystroke = machine("AAA").process_letter('a').unwrap();
        assert_eq!(keystroke.output, 'B');
    }

    #[test]
    fn test_strict_rejects_non_letters() {
        let strict = Machine::builder(catalog::reflector("B").unwrap())
            .rotor(catalog::rotor("I").unwrap())
            .policy(SymbolPolicy::Strict)
            .build()
            .unwrap();
        let err = strict.process_text("AB C").unwrap_err();
        assert!(matches!(
            err,
            EnigmaError::InvalidSymbol {
                symbol: ' ',
                index: 2
            }
        ));
    }

    #[test]
    fn test_encipher_fuses_after_error() {
        let strict = Machine::builder(catalog::reflector("B").unwrap())
            .rotor(catalog::rotor("I").unwrap())
            .policy(SymbolPolicy::Strict)
            .build()
            .unwrap();
        let mut stream = strict.process_sequence("A1B".chars());
        assert!(stream.next().unwrap().is_ok());
        assert!(stream.next().unwrap().is_err());
        assert!(stream.next().is_none());
        assert_eq!(stream.machine().window(), "B");
    }

    #[test]
    fn test_encipher_stays_exhausted() {
        fn assert_fused<T: std::iter::FusedIterator>(_: &T) {}
        let mut stream = machine("AAA").process_sequence("AB".chars());
        assert_fused(&stream);
        assert_eq!(stream.by_ref().count(), 2);
        assert!(stream.next().is_none());
        assert!(stream.next().is_none());
        assert_eq!(stream.machine().window(), "AAC");
    }

    #[test]
    fn test_trace_has_all_stages() {
        let (keystroke, trace) = machine("AAA").trace_letter('A').unwrap();
        let trace = trace.unwrap();
        assert_eq!(trace.len(), 9);
        assert_eq!(trace.output().to_char(), keystroke.output);
        assert_eq!(trace.positions, keystroke.next.positions());
        let stages = trace.iter().map(|e| e.stage).collect::<Vec<_>>();
        assert_eq!(
            stages,
            vec![
                Stage::PlugboardIn,
                Stage::RotorForward(2),
                Stage::RotorForward(1),
                Stage::RotorForward(0),
                Stage::Reflector,
                Stage::RotorBackward(0),
                Stage::RotorBackward(1),
                Stage::RotorBackward(2),
                Stage::PlugboardOut,
            ]
        );
    }

    #[test]
    fn test_trace_letters_for_a_at_aab() {
        let (_, trace) = machine("AAA").trace_letter('A').unwrap();
        let letters: String = trace.unwrap().iter().map(|e| e.letter.to_char()).collect();
        assert_eq!(letters, "ACDFSSEBB");
    }

    #[test]
    fn test_trace_absent_for_pass_through() {
        let (_, trace) = machine("AAA").trace_letter('-').unwrap();
        assert!(trace.is_none());
    }

    #[test]
    fn test_signal_path_is_lazy_and_exact() {
        let m = machine("AAB");
        let mut path = m.signal_path(Letter::wrapping(0));
        assert_eq!(path.len(), 9);
        path.next();
        assert_eq!(path.len(), 8);
    }

    #[test]
    fn test_validation_errors() {
        let reflector = catalog::reflector("B").unwrap();
        let rotor = catalog::rotor("I").unwrap();
        assert!(matches!(
            Machine::new(vec![], reflector.clone(), Plugboard::empty(), &[]),
            Err(EnigmaError::Configuration(ConfigError::NoRotors))
        ));
        assert!(matches!(
            Machine::new(
                vec![rotor.clone()],
                reflector.clone(),
                Plugboard::empty(),
                &[0, 0],
            ),
            Err(EnigmaError::Configuration(ConfigError::PositionCount {
                expected: 1,
                actual: 2
            }))
        ));
        let out_of_range = Machine::new(vec![rotor], reflector, Plugboard::empty(), &[26]);
        assert!(matches!(
            out_of_range.unwrap_err(),
            EnigmaError::Configuration(ConfigError::PositionOutOfRange(26))
        ));
    }

    #[test]
    fn test_with_positions_shares_config() {
        let m = machine("AAA");
        let moved = m.with_positions(&parse_window("QEV").unwrap()).unwrap();
        assert_eq!(moved.window(), "QEV");
        assert!(Arc::ptr_eq(&m.config, &moved.config));
        assert!(m.with_positions(&parse_window("QE").unwrap()).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(machine("ABC").to_string(), "B | I-II-III | ABC | ");
    }

    #[test]
    fn test_machine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Machine>();
    }
}
