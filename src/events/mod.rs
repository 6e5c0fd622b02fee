//! Cut-event plumbing: subscriber lists, the three-tier cascade, and
//! the collision-hook deduplicator that feeds it.

pub mod signal;
pub mod dispatcher;
pub mod listener;

pub use signal::{Signal, SubscriberId};
pub use dispatcher::EventDispatcher;
pub use listener::{CutListener, DEFAULT_SUPPRESSION_WINDOW};
