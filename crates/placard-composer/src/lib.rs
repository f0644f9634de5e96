//! # placard-composer
//!
//! Keeps the composer's placeholder in step with its context.
//!
//! - **Events**: [`ComposerEvent`] models open, mode switch, category switch,
//!   and close as discrete values
//! - **Tracker**: [`ComposerTracker`] applies events, resolves once per
//!   change, and discards results for superseded contexts
//! - **Emitter**: [`PlaceholderEmitter`] broadcasts published updates to the
//!   render surface

#![deny(unsafe_code)]

pub mod emitter;
pub mod events;
pub mod tracker;

pub use emitter::{PlaceholderEmitter, PlaceholderUpdate};
pub use events::{ComposerEvent, Transition, apply_event};
pub use tracker::ComposerTracker;
