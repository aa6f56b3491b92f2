// File:    trace.rs
// Author:  apezoo
// Date:    2025-07-17
//
// Description: Stage-by-stage record of one letter's path through the machine, for visualizations.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Signal traces.
//!
//! A letter passes through `2N + 3` stages on a machine with `N` rotors:
//! plugboard in, each rotor right to left, the reflector, each rotor left to
//! right, plugboard out. [`SignalPath`] walks those stages lazily;
//! [`Trace`] is the collected result.

use crate::alphabet::Letter;
use serde::{Serialize, Serializer};
use std::fmt;

/// One stage of the signal path.
///
/// Rotor indices count from the leftmost rotor, starting at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Plugboard on the way in.
    PlugboardIn,
    /// A rotor with current flowing right to left.
    RotorForward(usize),
    /// The reflector.
    Reflector,
    /// A rotor with current flowing left to right.
    RotorBackward(usize),
    /// Plugboard on the way out.
    PlugboardOut,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlugboardIn => write!(f, "plugboard-in"),
            Self::RotorForward(i) => write!(f, "rotor-{}-forward", i + 1),
            Self::Reflector => write!(f, "reflector"),
            Self::RotorBackward(i) => write!(f, "rotor-{}-backward", i + 1),
            Self::PlugboardOut => write!(f, "plugboard-out"),
        }
    }
}

impl Serialize for Stage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The letter leaving one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TraceEntry {
    /// The stage.
    pub stage: Stage,
    /// The letter after the stage.
    pub letter: Letter,
}

/// The collected signal path of one key press.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trace {
    /// The key pressed.
    pub input: Letter,
    /// Rotor positions (left to right) the letter was enciphered at, i.e.
    /// after stepping.
    pub positions: Vec<Letter>,
    /// The stages in signal order.
    pub entries: Vec<TraceEntry>,
}

impl Trace {
    /// The lamp that lights up, i.e. the letter after the last stage.
    #[must_use]
    pub fn output(&self) -> Letter {
        self.entries.last().map_or(self.input, |e| e.letter)
    }

    /// Iterates over the stages in signal order.
    pub fn iter(&self) -> std::slice::Iter<'_, TraceEntry> {
        self.entries.iter()
    }

    /// Number of stages.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no stage was recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a TraceEntry;
    type IntoIter = std::slice::Iter<'a, TraceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Computes the stages of a signal path one at a time.
///
/// Created by [`Machine::signal_path`](crate::machine::Machine::signal_path).
/// Nothing is computed until the iterator is advanced.
#[derive(Debug, Clone)]
pub struct SignalPath<'a> {
    machine: &'a crate::machine::Machine,
    current: Letter,
    step: usize,
}

impl<'a> SignalPath<'a> {
    pub(crate) const fn new(machine: &'a crate::machine::Machine, input: Letter) -> Self {
        Self {
            machine,
            current: input,
            step: 0,
        }
    }

    fn stage_at(&self, step: usize) -> Option<Stage> {
        let n = self.machine.rotor_count();
        match step {
            0 => Some(Stage::PlugboardIn),
            s if s <= n => Some(Stage::RotorForward(n - s)),
            s if s == n + 1 => Some(Stage::Reflector),
            s if s <= 2 * n + 1 => Some(Stage::RotorBackward(s - n - 2)),
            s if s == 2 * n + 2 => Some(Stage::PlugboardOut),
            _ => None,
        }
    }
}

impl Iterator for SignalPath<'_> {
    type Item = TraceEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let stage = self.stage_at(self.step)?;
        self.current = self.machine.apply_stage(stage, self.current);
        self.step += 1;
        Some(TraceEntry {
            stage,
            letter: self.current,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let total = 2 * self.machine.rotor_count() + 3;
        let remaining = total.saturating_sub(self.step);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SignalPath<'_> {}

impl std::iter::FusedIterator for SignalPath<'_> {}
