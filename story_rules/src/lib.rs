//! # Story Rules
//!
//! The "Story Bible" crate - the calendar, the shared story state, and the
//! NPC definitions that the agency scheduler operates on.
//! This crate holds data and pure rules only; it does not schedule anything.

pub mod calendar;
pub mod entities;
pub mod mechanics;
pub mod story_state;

pub use calendar::*;
pub use entities::*;
pub use mechanics::*;
pub use story_state::*;
