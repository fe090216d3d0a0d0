mod collision;
mod components;
mod integrator;
mod intent;
mod jump;
mod mob;
mod policy;
mod random;
mod systems;
mod tic;

pub use collision::{Axis, AxisMove, Resolver, SpawnError, check_spawn};
pub use components::{Body, Brain, Class, Spawn};
pub use integrator::{BodyEvent, Events, Integrator};
pub use intent::{BodyView, InputCmd, Intent, IntentSource, Patrol, PlayerInput, Replay, Wander};
pub use jump::{JumpPhase, JumpState};
pub use policy::{MovementPolicy, PhysicsScale, PolicyError};
pub use random::SeededRandom;
pub use systems::{TickEvents, player_input};
pub use tic::{SIM_FPS, TicRunner};
