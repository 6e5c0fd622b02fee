//! Persistent cut-state register.
//!
//! The canonical record of which grass has been cut. Entries map a
//! [`GrassKey`] to a [`GrassState`], partitioned by scene for lookup
//! locality (the scene is already part of the key, so the partitioning
//! is an optimization, not a correctness requirement). Writes are
//! monotonic upgrades by default, which makes merging save data from
//! multiple sources safe: a late or duplicate `ShouldBeCut` can never
//! erase a confirmed `Cut`.

pub mod key;
pub mod state;

pub use key::{GrassKey, NUM_SERIALIZATION_TOKENS};
pub use state::{GrassState, GrassStats};

use std::collections::HashMap;
use std::path::Path;

use crate::core::error::Error;
use crate::core::types::Result;
use crate::events::signal::{Signal, SubscriberId};

/// Version token leading every serialized blob
pub const SERIALIZATION_VERSION: &str = "1";

/// Tokens per serialized entry: 4 identity tokens plus the state value
const ENTRY_TOKENS: usize = NUM_SERIALIZATION_TOKENS + 1;

/// Per-scene map type shared with the weedkiller blacklist
pub type SceneStates = HashMap<GrassKey, GrassState>;

/// Canonical per-scene store of grass cut-state
pub struct GrassRegister {
    grass_states: HashMap<String, SceneStates>,
    global_stats: GrassStats,
    scene_stats: HashMap<String, GrassStats>,
    stats_changed: Signal<GrassStats>,
}

impl GrassRegister {
    /// Empty register
    pub fn new() -> Self {
        Self {
            grass_states: HashMap::new(),
            global_stats: GrassStats::new(),
            scene_stats: HashMap::new(),
            stats_changed: Signal::new(),
        }
    }

    /// Normalize a key before any lookup or write.
    ///
    /// Currently the identity transform. Kept as an explicit seam so a
    /// future normalization (renamed scenes, snapped positions) only
    /// has to change one place.
    pub fn canonical(&self, key: &GrassKey) -> GrassKey {
        key.clone()
    }

    /// Record `new_state` for `key` if it is an upgrade.
    ///
    /// Applies the write when no state is stored yet, when `new_state`
    /// is strictly greater than the stored state, or unconditionally
    /// with `allow_downgrade`. Returns whether the write happened.
    pub fn try_set(
        &mut self,
        key: &GrassKey,
        new_state: GrassState,
        allow_downgrade: bool,
    ) -> bool {
        let canonical = self.canonical(key);

        let scene_states = self
            .grass_states
            .entry(canonical.scene_name.clone())
            .or_default();
        let old_state = scene_states.get(&canonical).copied();

        let is_upgrade = old_state.map_or(true, |old| new_state > old);
        if !is_upgrade && !allow_downgrade {
            return false;
        }

        scene_states.insert(canonical.clone(), new_state);
        self.scene_stats
            .entry(canonical.scene_name.clone())
            .or_default()
            .handle_update(old_state, new_state);
        self.global_stats.handle_update(old_state, new_state);

        log::debug!("updated state of '{canonical}' to {new_state} (was {old_state:?})");
        log::trace!("... serialized key: {}", canonical.serialize().join(";"));

        let stats = self.global_stats;
        self.stats_changed.emit(&stats);
        true
    }

    /// Shorthand for recording a confirmed cut
    pub fn try_cut(&mut self, key: &GrassKey) -> bool {
        self.try_set(key, GrassState::Cut, false)
    }

    /// Whether any state is recorded for `key`
    pub fn contains(&self, key: &GrassKey) -> bool {
        let canonical = self.canonical(key);
        self.grass_states
            .get(&canonical.scene_name)
            .is_some_and(|scene| scene.contains_key(&canonical))
    }

    /// World-wide counters
    pub fn stats(&self) -> &GrassStats {
        &self.global_stats
    }

    /// Counters for one scene, if any grass was recorded there
    pub fn scene_stats(&self, scene_name: &str) -> Option<&GrassStats> {
        self.scene_stats.get(scene_name)
    }

    /// State map for one scene, if any grass was recorded there
    pub fn scene_states(&self, scene_name: &str) -> Option<&SceneStates> {
        self.grass_states.get(scene_name)
    }

    /// Names of scenes with at least one recorded entry
    pub fn scene_names(&self) -> impl Iterator<Item = &str> {
        self.grass_states.keys().map(String::as_str)
    }

    /// Drop every entry and counter, firing the stats signal once
    pub fn clear(&mut self) {
        self.grass_states.clear();
        self.scene_stats.clear();
        self.global_stats = GrassStats::new();

        let stats = self.global_stats;
        self.stats_changed.emit(&stats);
    }

    /// Attach a listener fired after every applied write and on clear
    pub fn subscribe_stats_changed(
        &mut self,
        listener: impl FnMut(&GrassStats) + 'static,
    ) -> SubscriberId {
        self.stats_changed.subscribe(listener)
    }

    /// Detach a stats listener
    pub fn unsubscribe_stats_changed(&mut self, id: SubscriberId) -> bool {
        self.stats_changed.unsubscribe(id)
    }

    /// Serialize the whole register into a single `;`-joined string.
    ///
    /// Format: the version token, then 5 tokens per entry (4 identity
    /// tokens, then the decimal state value). Entry order follows map
    /// iteration and is unspecified.
    pub fn serialize(&self) -> String {
        let mut parts = vec![SERIALIZATION_VERSION.to_string()];

        for scene_states in self.grass_states.values() {
            for (key, state) in scene_states {
                parts.extend(key.serialize());
                parts.push(state.value().to_string());
            }
        }

        parts.join(";")
    }

    /// Merge serialized data into the register.
    ///
    /// Does not clear first; every entry is replayed through
    /// [`try_set`](Self::try_set), so importing blobs from multiple
    /// sources keeps the highest state per key. Empty input is a no-op.
    /// Structural validation happens before any entry is applied.
    pub fn deserialize(&mut self, serialized: &str) -> Result<()> {
        if serialized.is_empty() {
            return Ok(());
        }

        let parts: Vec<&str> = serialized.split(';').collect();

        if parts[0] != SERIALIZATION_VERSION {
            return Err(Error::UnsupportedVersion(parts[0].to_string()));
        }
        let body_len = parts.len() - 1;
        if body_len % ENTRY_TOKENS != 0 {
            return Err(Error::CorruptData(format!(
                "body holds {body_len} tokens, not a multiple of {ENTRY_TOKENS}"
            )));
        }

        for entry in parts[1..].chunks_exact(ENTRY_TOKENS) {
            let key = GrassKey::deserialize(&entry[..NUM_SERIALIZATION_TOKENS])?;
            let value: u8 = entry[NUM_SERIALIZATION_TOKENS].parse().map_err(|_| {
                Error::CorruptData(format!(
                    "invalid state token '{}'",
                    entry[NUM_SERIALIZATION_TOKENS]
                ))
            })?;
            let state = GrassState::from_value(value)
                .ok_or_else(|| Error::CorruptData(format!("unknown state value {value}")))?;

            self.try_set(&key, state, false);
        }

        Ok(())
    }

    /// Write the serialized blob to a file (sync)
    pub fn save_sync(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.serialize())?;
        Ok(())
    }

    /// Read a blob from a file and merge it into the register (sync)
    pub fn load_sync(&mut self, path: &Path) -> Result<()> {
        let blob = std::fs::read_to_string(path)?;
        self.deserialize(&blob)
    }
}

impl Default for GrassRegister {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GrassRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrassRegister")
            .field("scenes", &self.grass_states.len())
            .field("global_stats", &self.global_stats)
            .finish()
    }
}
