//! Reference-counted capability activation.
//!
//! Any number of feature modules may request the same capability; a
//! capability stays active while at least one caller wants it or a
//! dependent capability is itself active. Every toggle re-evaluates
//! the whole activation vector and reports only the edges, so side
//! effects (hook wiring, subscriptions) run exactly once per actual
//! transition and never on a no-op toggle.
//!
//! The graph itself is pure bookkeeping; [`crate::runtime::GrassCore`]
//! applies the side effects for each reported transition.

use std::collections::HashSet;
use std::fmt;

/// One toggleable feature, in fixed registration order.
///
/// Dependencies form a static chain: activating `Cuts` keeps `RawCuts`
/// active, activating `UniqueCuts` keeps `Cuts` (and therefore
/// `RawCuts`) active. The weedkiller capabilities are independent
/// leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Collision hooks + raw tier: every deduplicated physical cut
    RawCuts,
    /// Verified tier: cuts of recognized grass
    Cuts,
    /// Unique tier: first-time cuts, recorded in the register
    UniqueCuts,
    /// Destroy blacklisted grass on scene activation
    WeedKiller,
    /// Detach the weedkiller blacklist from the shared register
    DisconnectWeedKiller,
}

impl Capability {
    /// Every capability, in registration (and transition) order
    pub const ALL: [Self; 5] = [
        Self::RawCuts,
        Self::Cuts,
        Self::UniqueCuts,
        Self::WeedKiller,
        Self::DisconnectWeedKiller,
    ];

    fn index(self) -> usize {
        match self {
            Self::RawCuts => 0,
            Self::Cuts => 1,
            Self::UniqueCuts => 2,
            Self::WeedKiller => 3,
            Self::DisconnectWeedKiller => 4,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RawCuts => "RawCuts",
            Self::Cuts => "Cuts",
            Self::UniqueCuts => "UniqueCuts",
            Self::WeedKiller => "WeedKiller",
            Self::DisconnectWeedKiller => "DisconnectWeedKiller",
        };
        write!(f, "{name}")
    }
}

/// Stable identity token for one feature module.
///
/// Every module toggling capabilities must pass its own token and
/// never reuse another module's; one module's vote being withdrawn must
/// not disable a capability another module still holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallerId(pub &'static str);

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An activation edge produced by one toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Enabled(Capability),
    Disabled(Capability),
}

/// Caller sets and dependency-aware activation for all capabilities
#[derive(Debug, Default)]
pub struct EnableGraph {
    callers: [HashSet<CallerId>; Capability::ALL.len()],
}

impl EnableGraph {
    /// Graph with every capability inactive
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `capability` is currently active, dependents included
    pub fn is_active(&self, capability: Capability) -> bool {
        let has_callers = !self.callers[capability.index()].is_empty();
        match capability {
            Capability::RawCuts => has_callers || self.is_active(Capability::Cuts),
            Capability::Cuts => has_callers || self.is_active(Capability::UniqueCuts),
            Capability::UniqueCuts
            | Capability::WeedKiller
            | Capability::DisconnectWeedKiller => has_callers,
        }
    }

    /// Number of callers currently requesting `capability`
    pub fn caller_count(&self, capability: Capability) -> usize {
        self.callers[capability.index()].len()
    }

    /// Add or remove one caller's vote for `capability`.
    ///
    /// Returns the activation edges this toggle produced, in
    /// registration order; at most one edge per capability per call,
    /// and none at all for no-op toggles.
    pub fn set(
        &mut self,
        capability: Capability,
        caller: CallerId,
        enabled: bool,
    ) -> Vec<Transition> {
        log::debug!("{caller} passed {enabled} to {capability}");

        let before = self.snapshot();
        if enabled {
            self.callers[capability.index()].insert(caller);
        } else {
            self.callers[capability.index()].remove(&caller);
        }
        let after = self.snapshot();

        let mut transitions = Vec::new();
        for (i, cap) in Capability::ALL.into_iter().enumerate() {
            if !before[i] && after[i] {
                log::info!("enabling {cap}...");
                transitions.push(Transition::Enabled(cap));
            } else if before[i] && !after[i] {
                log::info!("disabling {cap}...");
                transitions.push(Transition::Disabled(cap));
            }
        }
        transitions
    }

    fn snapshot(&self) -> [bool; Capability::ALL.len()] {
        let mut actives = [false; Capability::ALL.len()];
        for (i, cap) in Capability::ALL.into_iter().enumerate() {
            actives[i] = self.is_active(cap);
        }
        actives
    }
}
