//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by object ID)
//! - No rendering or platform dependencies

pub mod session;
pub mod spawn;
pub mod state;
pub mod tap;
pub mod tick;
pub mod timers;

pub use session::Failure;
pub use spawn::{spawn_interval_ms, spawn_object};
pub use state::{
    Effect, EffectKind, FallingObject, GameEvent, GamePhase, GameState, ObjectKind, PlayArea,
    Wobble,
};
pub use tap::{TapOutcome, tap};
pub use tick::{TickInput, tick};
pub use timers::{Removal, RemovalQueue, RepeatingTask};
