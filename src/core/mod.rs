//! Core primitives.
//!
//! Clock, seeded randomness and geometry shared by every game mode.

pub mod clock;
pub mod rng;
pub mod vec3;
pub mod volume;

// Re-export core types
pub use clock::{GameTime, Tick, Timer};
pub use rng::DeterministicRng;
pub use vec3::{Quat, Transform, Vec3};
pub use volume::{Aabb, Cylinder};
