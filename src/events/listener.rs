//! Collision-hook deduplication.
//!
//! The host fires a trigger-enter callback once per grass-related
//! component on an object, and the physics "should this cut" decision
//! runs without knowing which object triggered it. The listener
//! bridges the two with a scratch stack pushed around each trigger
//! callback, then collapses the noisy trigger stream into one raw cut
//! per logical event: sibling-component repeats inside a short window
//! are dropped, as are triggers from objects the host already marked
//! fully cut.
//!
//! Deliberately only the last forwarded event is remembered, not a
//! full history. That catches the common case (several components on
//! one object firing within the same physics step) while still firing
//! a fresh raw event when the player legitimately returns to the same
//! object after a scene reload.

use crate::core::error::Error;
use crate::register::GrassKey;
use crate::world::WorldObject;

/// Default suppression window in simulated seconds
pub const DEFAULT_SUPPRESSION_WINDOW: f32 = 0.1;

#[derive(Debug, Clone)]
struct ScratchEntry {
    key: GrassKey,
    already_marked_cut: bool,
}

/// Turns raw trigger invocations into at most one cut per logical event
pub struct CutListener {
    scratch: Vec<ScratchEntry>,
    last_forwarded: Option<(GrassKey, f64)>,
    suppression_window: f32,
}

impl CutListener {
    /// Listener with the given suppression window in simulated seconds
    pub fn new(suppression_window: f32) -> Self {
        Self {
            scratch: Vec::new(),
            last_forwarded: None,
            suppression_window,
        }
    }

    /// Current suppression window in simulated seconds
    pub fn suppression_window(&self) -> f32 {
        self.suppression_window
    }

    /// Change the suppression window; applies from the next event on
    pub fn set_suppression_window(&mut self, window: f32) {
        self.suppression_window = window;
    }

    /// Stash the object whose trigger callback is about to run.
    ///
    /// Exactly one entry should be live at a time; more means the host
    /// re-entered a collision callback, which is tolerated (the stack
    /// keeps the entries straight) but logged.
    pub fn begin_collision(&mut self, object: &dyn WorldObject) {
        if !self.scratch.is_empty() {
            log::warn!(
                "collision scratch already holds {} entries; nested collision callbacks?",
                self.scratch.len()
            );
        }
        self.scratch.push(ScratchEntry {
            key: GrassKey::from_object(object),
            already_marked_cut: object.is_already_marked_cut(),
        });
    }

    /// Release the stash; must run on every exit path of the trigger
    /// callback that called [`begin_collision`](Self::begin_collision).
    pub fn end_collision(&mut self) {
        if self.scratch.pop().is_none() {
            log::warn!("end_collision called with an empty scratch stack");
        }
    }

    /// Evaluate the physics decision for the stashed object.
    ///
    /// Returns the key of a raw cut event to forward, or `None` when
    /// the trigger is suppressed. `now` is the current simulated time.
    pub fn handle_should_cut(&mut self, should_cut: bool, now: f64) -> Option<GrassKey> {
        if !should_cut {
            return None;
        }

        let Some(entry) = self.scratch.last() else {
            // Wiring bug in an upstream hook; degrade to "unknown
            // object" and drop the event rather than crash.
            log::error!("dropping cut event: {}", Error::EmptyScratch);
            return None;
        };

        if entry.already_marked_cut {
            log::trace!("suppressing stale trigger for already-cut {}", entry.key);
            return None;
        }

        let key = entry.key.clone();
        if let Some((last_key, expiry)) = &self.last_forwarded {
            if *last_key == key && now < *expiry {
                log::trace!("suppressing sibling-component duplicate for {key}");
                return None;
            }
        }

        self.last_forwarded = Some((key.clone(), now + f64::from(self.suppression_window)));
        Some(key)
    }
}

impl Default for CutListener {
    fn default() -> Self {
        Self::new(DEFAULT_SUPPRESSION_WINDOW)
    }
}

impl std::fmt::Debug for CutListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CutListener")
            .field("scratch_depth", &self.scratch.len())
            .field("last_forwarded", &self.last_forwarded)
            .field("suppression_window", &self.suppression_window)
            .finish()
    }
}
