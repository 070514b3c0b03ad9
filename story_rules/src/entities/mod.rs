//! NPC definitions as supplied by the persona loader.

mod goal;
mod npc;
mod trigger;

pub use goal::*;
pub use npc::*;
pub use trigger::*;
