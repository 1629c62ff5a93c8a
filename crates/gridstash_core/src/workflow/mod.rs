//! User-facing workflows expressed as explicit state machines.
//!
//! # Responsibility
//! - Hold in-progress edit state as immutable values with pure transitions.
//! - Leave persistence to `service`.

pub mod placement;
