//! Canonical grass identity.
//!
//! A `GrassKey` identifies a world object by scene, name, and 2D
//! position rather than by engine instance. Two instances occupying the
//! same logical slot (after a respawn or scene reload) compare equal,
//! which is what lets cut-state survive across sessions.

use std::fmt;
use std::hash::{Hash, Hasher};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::core::error::Error;
use crate::core::types::{Result, Vec2};
use crate::world::WorldObject;

/// Number of tokens `serialize` returns and `deserialize` expects
pub const NUM_SERIALIZATION_TOKENS: usize = 4;

/// Structural identity of one grass object
///
/// Equality and hashing cover all three fields; position floats are
/// compared and hashed by bit pattern, so keys must never be built from
/// NaN positions.
#[derive(Debug, Clone)]
pub struct GrassKey {
    pub scene_name: String,
    pub object_name: String,
    pub position: Vec2,
}

impl GrassKey {
    /// Create a key from identity fields
    pub fn new(
        scene_name: impl Into<String>,
        object_name: impl Into<String>,
        position: Vec2,
    ) -> Self {
        Self {
            scene_name: scene_name.into(),
            object_name: object_name.into(),
            position,
        }
    }

    /// Derive the canonical key of a live world object
    pub fn from_object(object: &dyn WorldObject) -> Self {
        Self::new(object.scene_name(), object.object_name(), object.position())
    }

    /// Encode into the fixed 4-token form: scene, name, position x, y.
    ///
    /// Strings are base64 over their raw UTF-8 bytes; floats are base64
    /// over their big-endian bit pattern, so round-trips are bit-exact
    /// on every platform. The base64 alphabet never produces `;`, the
    /// save-blob delimiter.
    pub fn serialize(&self) -> [String; NUM_SERIALIZATION_TOKENS] {
        [
            STANDARD.encode(self.scene_name.as_bytes()),
            STANDARD.encode(self.object_name.as_bytes()),
            STANDARD.encode(self.position.x.to_be_bytes()),
            STANDARD.encode(self.position.y.to_be_bytes()),
        ]
    }

    /// Decode a key from its 4-token form.
    ///
    /// Fails with [`Error::MalformedKey`] when the token count is wrong
    /// and [`Error::CorruptData`] when a token does not decode.
    pub fn deserialize(tokens: &[&str]) -> Result<Self> {
        if tokens.len() != NUM_SERIALIZATION_TOKENS {
            return Err(Error::MalformedKey {
                expected: NUM_SERIALIZATION_TOKENS,
                got: tokens.len(),
            });
        }

        Ok(Self {
            scene_name: string_from_base64(tokens[0])?,
            object_name: string_from_base64(tokens[1])?,
            position: Vec2::new(f32_from_base64(tokens[2])?, f32_from_base64(tokens[3])?),
        })
    }

    /// Decode a key from a single `;`-joined token string
    pub fn from_serialized_str(serialized: &str) -> Result<Self> {
        let tokens: Vec<&str> = serialized.split(';').collect();
        Self::deserialize(&tokens)
    }
}

impl PartialEq for GrassKey {
    fn eq(&self, other: &Self) -> bool {
        self.scene_name == other.scene_name
            && self.object_name == other.object_name
            && self.position.x.to_bits() == other.position.x.to_bits()
            && self.position.y.to_bits() == other.position.y.to_bits()
    }
}

impl Eq for GrassKey {}

impl Hash for GrassKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.scene_name.hash(state);
        self.object_name.hash(state);
        self.position.x.to_bits().hash(state);
        self.position.y.to_bits().hash(state);
    }
}

impl fmt::Display for GrassKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} ({}, {})",
            self.scene_name, self.object_name, self.position.x, self.position.y
        )
    }
}

fn string_from_base64(token: &str) -> Result<String> {
    let bytes = STANDARD
        .decode(token)
        .map_err(|e| Error::CorruptData(format!("invalid base64 token: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| Error::CorruptData(format!("key token is not valid UTF-8: {e}")))
}

fn f32_from_base64(token: &str) -> Result<f32> {
    let bytes = STANDARD
        .decode(token)
        .map_err(|e| Error::CorruptData(format!("invalid base64 token: {e}")))?;
    let bytes: [u8; 4] = bytes
        .try_into()
        .map_err(|_| Error::CorruptData("position token is not 4 bytes".to_string()))?;
    Ok(f32::from_be_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> GrassKey {
        GrassKey::new("Town", "grass_17", Vec2::new(10.25, -3.5))
    }

    #[test]
    fn test_round_trip() {
        let tokens = key().serialize();
        let token_refs: Vec<&str> = tokens.iter().map(String::as_str).collect();
        let back = GrassKey::deserialize(&token_refs).expect("deserialize failed");
        assert_eq!(back, key());
    }

    #[test]
    fn test_round_trip_is_bit_exact() {
        // A position with no short decimal form must survive untouched.
        let original = GrassKey::new("s", "o", Vec2::new(0.1 + 0.2, f32::MIN_POSITIVE));
        let joined = original.serialize().join(";");
        let back = GrassKey::from_serialized_str(&joined).expect("deserialize failed");
        assert_eq!(back.position.x.to_bits(), original.position.x.to_bits());
        assert_eq!(back.position.y.to_bits(), original.position.y.to_bits());
    }

    #[test]
    fn test_wrong_token_count() {
        let err = GrassKey::deserialize(&["a", "b", "c"]).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedKey {
                expected: 4,
                got: 3
            }
        ));
    }

    #[test]
    fn test_bad_base64_token() {
        let err = GrassKey::deserialize(&["!!!", "!!!", "!!!", "!!!"]).unwrap_err();
        assert!(matches!(err, Error::CorruptData(_)));
    }

    #[test]
    fn test_tokens_never_contain_delimiter() {
        for token in key().serialize() {
            assert!(!token.contains(';'));
        }
    }

    #[test]
    fn test_equality_is_structural() {
        let a = key();
        let b = GrassKey::new("Town", "grass_17", Vec2::new(10.25, -3.5));
        let c = GrassKey::new("Town", "grass_17", Vec2::new(10.25, -3.0));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_from_object() {
        let object =
            crate::world::StaticObject::new("Field", "tall_grass", Vec2::new(1.0, 2.0));
        let key = GrassKey::from_object(&object);
        assert_eq!(key, GrassKey::new("Field", "tall_grass", Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn test_display() {
        assert_eq!(key().to_string(), "Town/grass_17 (10.25, -3.5)");
    }
}
