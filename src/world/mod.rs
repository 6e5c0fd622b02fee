//! Host-world collaborator traits.
//!
//! The tracking core never touches the game engine directly. The host
//! wires these traits to its own object model: object identity
//! extraction, the "known grass" membership list, and scene
//! enumeration/destruction for the weedkiller.

use crate::core::types::Vec2;
use crate::register::key::GrassKey;

/// A world object as seen by the tracking core.
///
/// Implemented by the host for whatever its engine calls a game object.
pub trait WorldObject {
    /// Name of the scene the object lives in
    fn scene_name(&self) -> &str;

    /// Object name within the scene
    fn object_name(&self) -> &str;

    /// 2D world position (Z height discarded by the host if 3D)
    fn position(&self) -> Vec2;

    /// Whether the host already marked this object as fully cut.
    ///
    /// Objects reporting true are skipped by the deduplicator: their
    /// triggers are stale re-fires, not new cuts.
    fn is_already_marked_cut(&self) -> bool {
        false
    }
}

/// Membership predicate for the curated "known grass" list.
///
/// Decides whether an identity belongs to a recognized grass type. The
/// verified event tier forwards only keys that pass this predicate.
pub trait KnownGrass {
    fn contains(&self, key: &GrassKey) -> bool;
}

impl<F> KnownGrass for F
where
    F: Fn(&GrassKey) -> bool,
{
    fn contains(&self, key: &GrassKey) -> bool {
        self(key)
    }
}

/// Scene-level access for the weedkiller consumer
pub trait SceneHost {
    /// Visit every object currently alive in the scene
    fn for_each_object(&self, f: &mut dyn FnMut(&dyn WorldObject));

    /// Destroy the object with the given canonical identity
    fn destroy_object(&mut self, key: &GrassKey);
}

/// Plain-value [`WorldObject`] implementation.
///
/// Useful for synthetic hosts and tests; most hosts implement the trait
/// on their own engine types instead.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticObject {
    pub scene_name: String,
    pub object_name: String,
    pub position: Vec2,
    pub marked_cut: bool,
}

impl StaticObject {
    /// Create an unmarked object from identity fields
    pub fn new(
        scene_name: impl Into<String>,
        object_name: impl Into<String>,
        position: Vec2,
    ) -> Self {
        Self {
            scene_name: scene_name.into(),
            object_name: object_name.into(),
            position,
            marked_cut: false,
        }
    }
}

impl WorldObject for StaticObject {
    fn scene_name(&self) -> &str {
        &self.scene_name
    }

    fn object_name(&self) -> &str {
        &self.object_name
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn is_already_marked_cut(&self) -> bool {
        self.marked_cut
    }
}
