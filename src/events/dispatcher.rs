//! Three-tier cut-event cascade.
//!
//! Every deduplicated cut enters at the raw tier. The verified tier
//! forwards only keys on the curated known-grass list; the unique tier
//! taps the raw stream directly (so first-cut detection is independent
//! of the allow-list) and records first-time cuts in the register.
//!
//! The dispatcher is passive plumbing: external listeners attach and
//! detach freely, while the inter-tier links are flipped solely by the
//! capability-activation graph.

use super::signal::{Signal, SubscriberId};
use crate::register::{GrassKey, GrassRegister};
use crate::world::KnownGrass;

/// Fan-out point for the raw/verified/unique cut streams
pub struct EventDispatcher {
    raw: Signal<GrassKey>,
    verified: Signal<GrassKey>,
    unique: Signal<GrassKey>,
    verified_link: bool,
    unique_link: bool,
}

impl EventDispatcher {
    /// Dispatcher with no listeners and both inter-tier links down
    pub fn new() -> Self {
        Self {
            raw: Signal::new(),
            verified: Signal::new(),
            unique: Signal::new(),
            verified_link: false,
            unique_link: false,
        }
    }

    /// Listen to every deduplicated cut, grass or not
    pub fn subscribe_raw(&mut self, listener: impl FnMut(&GrassKey) + 'static) -> SubscriberId {
        self.raw.subscribe(listener)
    }

    /// Listen to cuts of recognized grass only
    pub fn subscribe_verified(
        &mut self,
        listener: impl FnMut(&GrassKey) + 'static,
    ) -> SubscriberId {
        self.verified.subscribe(listener)
    }

    /// Listen to first-time cuts only
    pub fn subscribe_unique(
        &mut self,
        listener: impl FnMut(&GrassKey) + 'static,
    ) -> SubscriberId {
        self.unique.subscribe(listener)
    }

    /// Detach a raw listener
    pub fn unsubscribe_raw(&mut self, id: SubscriberId) -> bool {
        self.raw.unsubscribe(id)
    }

    /// Detach a verified listener
    pub fn unsubscribe_verified(&mut self, id: SubscriberId) -> bool {
        self.verified.unsubscribe(id)
    }

    /// Detach a unique listener
    pub fn unsubscribe_unique(&mut self, id: SubscriberId) -> bool {
        self.unique.unsubscribe(id)
    }

    /// Wire or unwire the raw → verified filter
    pub fn set_verified_link(&mut self, wired: bool) {
        self.verified_link = wired;
    }

    /// Wire or unwire the raw → unique first-cut check
    pub fn set_unique_link(&mut self, wired: bool) {
        self.unique_link = wired;
    }

    /// Whether the raw → verified filter is wired
    pub fn verified_link(&self) -> bool {
        self.verified_link
    }

    /// Whether the raw → unique check is wired
    pub fn unique_link(&self) -> bool {
        self.unique_link
    }

    /// Push one deduplicated cut through the cascade
    pub fn dispatch_raw(
        &mut self,
        key: &GrassKey,
        register: &mut GrassRegister,
        known_grass: &dyn KnownGrass,
    ) {
        log::debug!("CUT    | {key}");
        self.raw.emit(key);

        if self.verified_link && known_grass.contains(key) {
            log::debug!("GRASS  | {key}");
            self.verified.emit(key);
        }

        if self.unique_link && !register.contains(key) {
            if !register.try_cut(key) {
                // Contains said no but the write was still refused; the
                // register already held an equal or greater state.
                log::error!("tried to cut grass {key} but the register refused the write");
            }
            log::debug!("UNIQUE | {key}");
            self.unique.emit(key);
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("raw", &self.raw)
            .field("verified", &self.verified)
            .field("unique", &self.unique)
            .field("verified_link", &self.verified_link)
            .field("unique_link", &self.unique_link)
            .finish()
    }
}
