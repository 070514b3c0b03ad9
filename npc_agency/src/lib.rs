//! # NPC Agency
//!
//! The autonomous action scheduler. Each tick it decides what every
//! non-player character does on its own, fires narrative world triggers,
//! and advances long-running timed actions, all against a story state the
//! host owns.
//!
//! ## Core Components
//!
//! - **capabilities**: Role tables and action requirements
//! - **goals**: Goal eligibility, priority ordering and cooldowns
//! - **agency**: Per-NPC action selection and execution
//! - **triggers**: Beat, flag and time triggers with fired-once history
//! - **timed_actions**: Duration tracking and deferred effects
//! - **engine**: The per-tick entry point tying the above together
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: Single pass, host-ordered, no randomness
//! - **Fail Closed**: Missing data means "no action" or "does not fire", never a panic
//! - **Host-Owned State**: Story state is borrowed per call, never stored

pub mod agency;
pub mod capabilities;
pub mod config;
pub mod engine;
pub mod error;
pub mod goals;
pub mod store;
pub mod timed_actions;
pub mod triggers;

pub use agency::*;
pub use capabilities::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use goals::*;
pub use store::*;
pub use timed_actions::*;
pub use triggers::*;
