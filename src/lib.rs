//! Grasscore - cut-state tracking for destructible world grass
//!
//! Deduplicates noisy collision triggers into a reliable three-tier
//! cut-event cascade, records per-object cut state in a persistent
//! register, and lets independent feature modules toggle the costly
//! parts on and off through a reference-counted capability graph.

pub mod core;
pub mod world;
pub mod register;
pub mod events;
pub mod enable;
pub mod weedkiller;
pub mod runtime;

pub use enable::{CallerId, Capability};
pub use register::{GrassKey, GrassRegister, GrassState, GrassStats};
pub use runtime::{GrassCore, GrassCoreConfig};
