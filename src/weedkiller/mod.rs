//! Blacklist-driven grass removal on scene activation.
//!
//! By default the blacklist is the register itself: anything recorded
//! as `Cut` is destroyed when its scene activates. A downstream
//! feature can detach that data dependency through the
//! `DisconnectWeedKiller` capability and drive destruction from its own
//! map; turning the capability back off restores the shared register.

use std::collections::HashMap;

use crate::register::{GrassKey, GrassRegister, GrassState, SceneStates};
use crate::world::{KnownGrass, SceneHost};

/// Source of the scene → key → state map consulted for destruction
#[derive(Debug)]
pub enum Blacklist {
    /// Shared with the register: destroy whatever it records as cut
    Register,
    /// Independent map owned by a downstream feature
    Custom(HashMap<String, SceneStates>),
}

/// Destroys blacklisted grass when a scene becomes active
#[derive(Debug)]
pub struct WeedKiller {
    blacklist: Blacklist,
}

impl WeedKiller {
    /// Weedkiller connected to the shared register
    pub fn new() -> Self {
        Self {
            blacklist: Blacklist::Register,
        }
    }

    /// Current blacklist source
    pub fn blacklist(&self) -> &Blacklist {
        &self.blacklist
    }

    /// Swap in an empty independent blacklist.
    ///
    /// Downstream features fill it through
    /// [`custom_blacklist_mut`](Self::custom_blacklist_mut).
    pub fn disconnect(&mut self) {
        self.blacklist = Blacklist::Custom(HashMap::new());
    }

    /// Return to the default register-backed behaviour
    pub fn reconnect(&mut self) {
        self.blacklist = Blacklist::Register;
    }

    /// Mutable access to the independent blacklist, if disconnected
    pub fn custom_blacklist_mut(&mut self) -> Option<&mut HashMap<String, SceneStates>> {
        match &mut self.blacklist {
            Blacklist::Register => None,
            Blacklist::Custom(map) => Some(map),
        }
    }

    /// Destroy every known-grass object in the scene whose canonical
    /// key the active blacklist records as [`GrassState::Cut`].
    pub fn destroy_blacklisted_grass(
        &self,
        scene_name: &str,
        register: &GrassRegister,
        known_grass: &dyn KnownGrass,
        host: &mut dyn SceneHost,
    ) {
        let scene_blacklist = match &self.blacklist {
            Blacklist::Register => register.scene_states(scene_name),
            Blacklist::Custom(map) => map.get(scene_name),
        };
        // No entries for this scene: nothing to kill.
        let Some(scene_blacklist) = scene_blacklist else {
            return;
        };

        let mut doomed = Vec::new();
        host.for_each_object(&mut |object| {
            let key = GrassKey::from_object(object);
            if known_grass.contains(&key)
                && scene_blacklist.get(&key) == Some(&GrassState::Cut)
            {
                doomed.push(key);
            }
        });

        for key in doomed {
            log::debug!("destroying blacklisted grass {key}");
            host.destroy_object(&key);
        }
    }
}

impl Default for WeedKiller {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec2;
    use crate::world::{StaticObject, WorldObject};

    struct FakeScene {
        objects: Vec<StaticObject>,
        destroyed: Vec<GrassKey>,
    }

    impl FakeScene {
        fn new(objects: Vec<StaticObject>) -> Self {
            Self {
                objects,
                destroyed: Vec::new(),
            }
        }
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

    fn grass_key(name: &str) -> GrassKey {
        GrassKey::new("Town", name, Vec2::ZERO)
    }

    fn town_scene() -> FakeScene {
        FakeScene::new(vec![
            StaticObject::new("Town", "grass_cut", Vec2::ZERO),
            StaticObject::new("Town", "grass_standing", Vec2::ZERO),
            StaticObject::new("Town", "lamp_post", Vec2::ZERO),
        ])
    }

    fn is_grass(key: &GrassKey) -> bool {
        key.object_name.starts_with("grass")
    }

    #[test]
    fn test_destroys_cut_grass_from_register() {
        let mut register = GrassRegister::new();
        register.try_cut(&grass_key("grass_cut"));
        register.try_set(&grass_key("grass_standing"), GrassState::ShouldBeCut, false);
        // Non-grass recorded as cut must still survive the predicate.
        register.try_cut(&grass_key("lamp_post"));

        let weedkiller = WeedKiller::new();
        let mut scene = town_scene();
        weedkiller.destroy_blacklisted_grass("Town", &register, &is_grass, &mut scene);

        assert_eq!(scene.destroyed, vec![grass_key("grass_cut")]);
    }

    #[test]
    fn test_unknown_scene_is_noop() {
        let register = GrassRegister::new();
        let weedkiller = WeedKiller::new();
        let mut scene = town_scene();
        weedkiller.destroy_blacklisted_grass("Town", &register, &is_grass, &mut scene);
        assert!(scene.destroyed.is_empty());
    }

    #[test]
    fn test_disconnected_ignores_register() {
        let mut register = GrassRegister::new();
        register.try_cut(&grass_key("grass_cut"));

        let mut weedkiller = WeedKiller::new();
        weedkiller.disconnect();

        let mut scene = town_scene();
        weedkiller.destroy_blacklisted_grass("Town", &register, &is_grass, &mut scene);
        assert!(scene.destroyed.is_empty());
    }

    #[test]
    fn test_disconnected_uses_custom_map() {
        let register = GrassRegister::new();
        let mut weedkiller = WeedKiller::new();
        weedkiller.disconnect();
        weedkiller
            .custom_blacklist_mut()
            .expect("not disconnected")
            .entry("Town".to_string())
            .or_default()
            .insert(grass_key("grass_standing"), GrassState::Cut);

        let mut scene = town_scene();
        weedkiller.destroy_blacklisted_grass("Town", &register, &is_grass, &mut scene);
        assert_eq!(scene.destroyed, vec![grass_key("grass_standing")]);
    }

    #[test]
    fn test_reconnect_restores_register() {
        let mut register = GrassRegister::new();
        register.try_cut(&grass_key("grass_cut"));

        let mut weedkiller = WeedKiller::new();
        weedkiller.disconnect();
        weedkiller.reconnect();
        assert!(weedkiller.custom_blacklist_mut().is_none());

        let mut scene = town_scene();
        weedkiller.destroy_blacklisted_grass("Town", &register, &is_grass, &mut scene);
        assert_eq!(scene.destroyed, vec![grass_key("grass_cut")]);
    }
}
