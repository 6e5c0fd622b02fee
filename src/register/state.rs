//! Cut-state lifecycle values and aggregate counters.

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

/// Lifecycle state of one grass object.
///
/// The ordering is load-bearing: register writes only ever move a key
/// to a strictly greater state unless a downgrade is explicitly
/// requested.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum GrassState {
    Uncut,
    /// Struck with a cutting hit but not actually severed by the game.
    ShouldBeCut,
    Cut,
}

impl GrassState {
    /// All states in ascending order
    pub const ALL: [Self; 3] = [Self::Uncut, Self::ShouldBeCut, Self::Cut];

    /// Numeric value used in the save format
    pub fn value(self) -> u8 {
        match self {
            Self::Uncut => 0,
            Self::ShouldBeCut => 1,
            Self::Cut => 2,
        }
    }

    /// Inverse of [`value`](Self::value)
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Uncut),
            1 => Some(Self::ShouldBeCut),
            2 => Some(Self::Cut),
            _ => None,
        }
    }
}

impl fmt::Display for GrassState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uncut => "Uncut",
            Self::ShouldBeCut => "ShouldBeCut",
            Self::Cut => "Cut",
        };
        write!(f, "{name}")
    }
}

/// Count of grass per state, kept for the whole world and per scene
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrassStats {
    counts: [u32; GrassState::ALL.len()],
}

impl GrassStats {
    /// Empty counter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Total grass across all states
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Number of grass currently in `state`
    pub fn in_state(&self, state: GrassState) -> u32 {
        self.counts[state.value() as usize]
    }

    /// Apply one register write: decrement the old bucket when a prior
    /// state existed, increment the new one.
    pub fn handle_update(&mut self, old_state: Option<GrassState>, new_state: GrassState) {
        if let Some(old) = old_state {
            self.counts[old.value() as usize] -= 1;
        }
        self.counts[new_state.value() as usize] += 1;
    }
}

impl Index<GrassState> for GrassStats {
    type Output = u32;

    fn index(&self, state: GrassState) -> &u32 {
        &self.counts[state.value() as usize]
    }
}

impl fmt::Display for GrassStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GrassStats(")?;
        for state in GrassState::ALL {
            write!(f, "{state}={}, ", self.in_state(state))?;
        }
        write!(f, ")")
    }
}
