//! Long-lived context wiring the subsystems together.
//!
//! [`GrassCore`] owns the clock, register, dispatcher, deduplicator,
//! weedkiller, and activation graph, and is the single object a host
//! constructs at startup and passes to its callbacks. Capability side
//! effects (hook wiring, tier links, blacklist swaps) are applied here,
//! keeping the activation graph itself pure bookkeeping.

pub mod config;

pub use config::GrassCoreConfig;

use crate::core::time::SimClock;
use crate::core::types::Result;
use crate::enable::{CallerId, Capability, EnableGraph, Transition};
use crate::events::{CutListener, EventDispatcher};
use crate::register::{GrassRegister, GrassStats};
use crate::weedkiller::WeedKiller;
use crate::world::{KnownGrass, SceneHost, WorldObject};

/// Owner of every subsystem, constructed once at startup
pub struct GrassCore {
    config: GrassCoreConfig,
    clock: SimClock,
    register: GrassRegister,
    dispatcher: EventDispatcher,
    listener: CutListener,
    weedkiller: WeedKiller,
    enable: EnableGraph,
    known_grass: Box<dyn KnownGrass>,
    collision_hooks_active: bool,
    weedkiller_active: bool,
}

impl GrassCore {
    /// Build the core around the host's known-grass predicate.
    ///
    /// Everything starts inactive; feature modules opt in through the
    /// capability toggle surface.
    pub fn new(config: GrassCoreConfig, known_grass: impl KnownGrass + 'static) -> Self {
        let listener = CutListener::new(config.suppression_window);
        Self {
            config,
            clock: SimClock::new(),
            register: GrassRegister::new(),
            dispatcher: EventDispatcher::new(),
            listener,
            weedkiller: WeedKiller::new(),
            enable: EnableGraph::new(),
            known_grass: Box::new(known_grass),
            collision_hooks_active: false,
            weedkiller_active: false,
        }
    }

    /* Capability toggle surface */

    /// Add or remove `caller`'s vote for a capability, applying every
    /// resulting activation edge.
    pub fn set_capability(&mut self, capability: Capability, caller: CallerId, enabled: bool) {
        for transition in self.enable.set(capability, caller, enabled) {
            self.apply_transition(transition);
        }
    }

    /// Whether a capability is currently active
    pub fn capability_active(&self, capability: Capability) -> bool {
        self.enable.is_active(capability)
    }

    /// Request (or release) the raw cut stream
    pub fn set_raw_cuts_enabled(&mut self, caller: CallerId, enabled: bool) {
        self.set_capability(Capability::RawCuts, caller, enabled);
    }

    /// Request (or release) the verified cut stream
    pub fn set_cuts_enabled(&mut self, caller: CallerId, enabled: bool) {
        self.set_capability(Capability::Cuts, caller, enabled);
    }

    /// Request (or release) the unique cut stream
    pub fn set_unique_cuts_enabled(&mut self, caller: CallerId, enabled: bool) {
        self.set_capability(Capability::UniqueCuts, caller, enabled);
    }

    /// Request (or release) blacklist destruction on scene activation.
    ///
    /// Note that releasing does not guarantee the weedkiller stops:
    /// another module may still be requesting it.
    pub fn set_weedkiller_enabled(&mut self, caller: CallerId, enabled: bool) {
        self.set_capability(Capability::WeedKiller, caller, enabled);
    }

    /// Detach (or reattach) the weedkiller blacklist from the register
    pub fn set_disconnect_weedkiller(&mut self, caller: CallerId, enabled: bool) {
        self.set_capability(Capability::DisconnectWeedKiller, caller, enabled);
    }

    fn apply_transition(&mut self, transition: Transition) {
        match transition {
            Transition::Enabled(Capability::RawCuts) => self.collision_hooks_active = true,
            Transition::Disabled(Capability::RawCuts) => self.collision_hooks_active = false,
            Transition::Enabled(Capability::Cuts) => self.dispatcher.set_verified_link(true),
            Transition::Disabled(Capability::Cuts) => self.dispatcher.set_verified_link(false),
            Transition::Enabled(Capability::UniqueCuts) => self.dispatcher.set_unique_link(true),
            Transition::Disabled(Capability::UniqueCuts) => {
                self.dispatcher.set_unique_link(false);
            }
            Transition::Enabled(Capability::WeedKiller) => self.weedkiller_active = true,
            Transition::Disabled(Capability::WeedKiller) => self.weedkiller_active = false,
            Transition::Enabled(Capability::DisconnectWeedKiller) => self.weedkiller.disconnect(),
            Transition::Disabled(Capability::DisconnectWeedKiller) => self.weedkiller.reconnect(),
        }
    }

    /* Host callback surface */

    /// Advance the simulated clock; call once per physics/update step
    pub fn tick(&mut self, dt: f32) {
        self.clock.tick(dt);
    }

    /// Process one collision trigger.
    ///
    /// `decide` is the host's physics decision for this collision; its
    /// verdict is returned unchanged so the host can pass it through.
    /// The instigating object is stashed around the decision and
    /// released on every path. When the raw-cuts capability is
    /// inactive the decision still runs but nothing is tracked.
    pub fn handle_collision(
        &mut self,
        object: &dyn WorldObject,
        decide: impl FnOnce() -> bool,
    ) -> bool {
        if !self.collision_hooks_active {
            return decide();
        }

        self.listener.begin_collision(object);
        let should_cut = decide();
        let forwarded = self.listener.handle_should_cut(should_cut, self.clock.now());
        self.listener.end_collision();

        if let Some(key) = forwarded {
            self.dispatcher
                .dispatch_raw(&key, &mut self.register, self.known_grass.as_ref());
        }
        should_cut
    }

    /// React to a scene becoming active
    pub fn handle_scene_changed(&mut self, scene_name: &str, host: &mut dyn SceneHost) {
        if !self.weedkiller_active {
            return;
        }
        self.weedkiller.destroy_blacklisted_grass(
            scene_name,
            &self.register,
            self.known_grass.as_ref(),
            host,
        );
    }

    /* Save/load surface */

    /// Serialize the register for the host's save file
    pub fn save_state(&self) -> String {
        self.register.serialize()
    }

    /// Replace the register contents with saved data
    pub fn load_state(&mut self, blob: &str) -> Result<()> {
        self.register.clear();
        self.register.deserialize(blob)
    }

    /* Accessors */

    /// Current configuration
    pub fn config(&self) -> &GrassCoreConfig {
        &self.config
    }

    /// Change the suppression window at runtime
    pub fn set_suppression_window(&mut self, window: f32) {
        self.config.suppression_window = window;
        self.listener.set_suppression_window(window);
    }

    /// The simulated clock
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// World-wide cut statistics
    pub fn stats(&self) -> &GrassStats {
        self.register.stats()
    }

    /// The cut-state register
    pub fn register(&self) -> &GrassRegister {
        &self.register
    }

    /// Mutable register access for direct state writes
    pub fn register_mut(&mut self) -> &mut GrassRegister {
        &mut self.register
    }

    /// The event cascade, for attaching tier listeners
    pub fn dispatcher_mut(&mut self) -> &mut EventDispatcher {
        &mut self.dispatcher
    }

    /// The weedkiller, for filling an independent blacklist
    pub fn weedkiller_mut(&mut self) -> &mut WeedKiller {
        &mut self.weedkiller
    }

    /// Whether collision triggers are currently being tracked
    pub fn collision_hooks_active(&self) -> bool {
        self.collision_hooks_active
    }
}

impl std::fmt::Debug for GrassCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrassCore")
            .field("config", &self.config)
            .field("clock", &self.clock)
            .field("register", &self.register)
            .field("dispatcher", &self.dispatcher)
            .field("listener", &self.listener)
            .field("collision_hooks_active", &self.collision_hooks_active)
            .field("weedkiller_active", &self.weedkiller_active)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec2;
    use crate::register::{GrassKey, GrassState};
    use crate::world::StaticObject;
    use std::cell::RefCell;
    use std::rc::Rc;

    const FEATURE: CallerId = CallerId("test_feature");
    const OTHER: CallerId = CallerId("other_feature");

    fn is_grass(key: &GrassKey) -> bool {
        key.object_name.starts_with("grass")
    }

    fn core() -> GrassCore {
        GrassCore::new(GrassCoreConfig::default(), is_grass)
    }

    fn grass(name: &str) -> StaticObject {
        StaticObject::new("Town", name, Vec2::new(1.0, 1.0))
    }

    #[test]
    fn test_inactive_core_tracks_nothing() {
        let mut core = core();
        assert!(!core.collision_hooks_active());
        assert!(core.handle_collision(&grass("grass_1"), || true));
        assert_eq!(core.stats().total(), 0);
    }

    #[test]
    fn test_unique_cuts_end_to_end() {
        let mut core = core();
        let unique_seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&unique_seen);
        core.dispatcher_mut()
            .subscribe_unique(move |key| sink.borrow_mut().push(key.clone()));

        core.set_unique_cuts_enabled(FEATURE, true);
        assert!(core.collision_hooks_active());

        // Two sibling components in one step, then a later re-trigger
        // of a now-registered object.
        core.handle_collision(&grass("grass_1"), || true);
        core.handle_collision(&grass("grass_1"), || true);
        core.tick(0.5);
        core.handle_collision(&grass("grass_1"), || true);

        assert_eq!(unique_seen.borrow().len(), 1);
        assert_eq!(core.stats()[GrassState::Cut], 1);
    }

    #[test]
    fn test_verified_respects_known_grass() {
        let mut core = core();
        let verified = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&verified);
        core.dispatcher_mut()
            .subscribe_verified(move |_| *sink.borrow_mut() += 1);

        core.set_cuts_enabled(FEATURE, true);
        core.handle_collision(&grass("grass_1"), || true);
        core.handle_collision(&StaticObject::new("Town", "crate", Vec2::ZERO), || true);

        assert_eq!(*verified.borrow(), 1);
    }

    #[test]
    fn test_disable_tears_down_tracking() {
        let mut core = core();
        core.set_cuts_enabled(FEATURE, true);
        core.set_cuts_enabled(OTHER, true);

        // One caller leaving keeps everything wired.
        core.set_cuts_enabled(FEATURE, false);
        assert!(core.collision_hooks_active());
        assert!(core.dispatcher_mut().verified_link());

        core.set_cuts_enabled(OTHER, false);
        assert!(!core.collision_hooks_active());
        assert!(!core.dispatcher_mut().verified_link());
    }

    #[test]
    fn test_decision_verdict_passes_through() {
        let mut core = core();
        core.set_raw_cuts_enabled(FEATURE, true);
        assert!(!core.handle_collision(&grass("grass_1"), || false));
        assert!(core.handle_collision(&grass("grass_1"), || true));
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut core = core();
        core.set_unique_cuts_enabled(FEATURE, true);
        core.handle_collision(&grass("grass_1"), || true);

        let blob = core.save_state();
        let mut fresh = self::core();
        fresh.load_state(&blob).expect("load failed");
        assert_eq!(fresh.stats()[GrassState::Cut], 1);

        // Loading replaces, not merges.
        let mut stale = self::core();
        stale.register_mut().try_cut(&GrassKey::new("Field", "x", Vec2::ZERO));
        stale.load_state(&blob).expect("load failed");
        assert!(!stale.register().contains(&GrassKey::new("Field", "x", Vec2::ZERO)));
    }

    struct FakeScene {
        objects: Vec<StaticObject>,
        destroyed: Vec<GrassKey>,
    }

    impl SceneHost for FakeScene {
        fn for_each_object(&self, f: &mut dyn FnMut(&dyn WorldObject)) {
            for object in &self.objects {
                f(object);
            }
        }

        fn destroy_object(&mut self, key: &GrassKey) {
            self.destroyed.push(key.clone());
        }
    }

    #[test]
    fn test_weedkiller_scene_flow() {
        let mut core = core();
        core.register_mut().try_cut(&GrassKey::new("Town", "grass_1", Vec2::ZERO));

        let mut scene = FakeScene {
            objects: vec![StaticObject::new("Town", "grass_1", Vec2::ZERO)],
            destroyed: Vec::new(),
        };

        // Inactive: scene changes do nothing.
        core.handle_scene_changed("Town", &mut scene);
        assert!(scene.destroyed.is_empty());

        core.set_weedkiller_enabled(FEATURE, true);
        core.handle_scene_changed("Town", &mut scene);
        assert_eq!(scene.destroyed.len(), 1);

        // Disconnecting swaps in an empty blacklist.
        scene.destroyed.clear();
        core.set_disconnect_weedkiller(FEATURE, true);
        core.handle_scene_changed("Town", &mut scene);
        assert!(scene.destroyed.is_empty());

        // Reconnecting restores register-driven destruction.
        core.set_disconnect_weedkiller(FEATURE, false);
        core.handle_scene_changed("Town", &mut scene);
        assert_eq!(scene.destroyed.len(), 1);
    }

    #[test]
    fn test_suppression_window_reconfigurable() {
        let mut core = core();
        core.set_unique_cuts_enabled(FEATURE, true);
        core.set_suppression_window(2.0);

        let raw = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&raw);
        core.dispatcher_mut().subscribe_raw(move |_| *sink.borrow_mut() += 1);

        core.handle_collision(&grass("grass_1"), || true);
        core.tick(1.0);
        core.handle_collision(&grass("grass_1"), || true);
        assert_eq!(*raw.borrow(), 1);
    }
}
