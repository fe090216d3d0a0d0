use glam::IVec2;
use hecs::World;

use super::components::{Body, Brain, Class, Spawn};
use super::intent::{InputCmd, Intent, Patrol, PlayerInput, Wander};
use super::jump::JumpState;
use crate::defs::{ArchetypeInfo, BrainKind};

/// Spawn a body of archetype `info` with its origin at `pos`.
///
/// `seed` feeds scripted intent sources; bodies spawned with the same seed
/// behave identically.
pub fn spawn_body(
    world: &mut World,
    info: &'static ArchetypeInfo,
    pos: IVec2,
    unit: i32,
    seed: u32,
) -> hecs::Entity {
    let body = Body::new(pos, info.hitbox(unit));
    let brain = match info.brain {
        BrainKind::Player => Brain::new(PlayerInput::default()),
        BrainKind::Patrol { range_tiles } => Brain::new(Patrol::new(seed, range_tiles * unit)),
        BrainKind::Wander => Brain::new(Wander::new(seed)),
    };
    world.spawn((
        body,
        JumpState::default(),
        info.policy(unit),
        Spawn(pos),
        Class(info),
        InputCmd::default(),
        Intent::IDLE,
        brain,
    ))
}

/// Put a body back at its spawn point: motion, jump timers and brain state
/// cleared.
pub fn reset_body(world: &mut World, ent: hecs::Entity) -> bool {
    let Ok(mut q) = world.query_one::<(&mut Body, &mut JumpState, &Spawn, &mut Brain)>(ent) else {
        return false;
    };
    let Some((body, jump, spawn, brain)) = q.get() else {
        return false;
    };
    body.reset(spawn.0);
    jump.reset();
    brain.0.reset();
    true
}
