use hecs::{Entity, World};
use tracing::{debug, info, trace};

use super::components::{Body, Brain, Class, Spawn};
use super::integrator::{BodyEvent, Events, Integrator};
use super::intent::{InputCmd, Intent};
use super::jump::JumpState;
use super::mob::reset_body;
use super::policy::{MovementPolicy, PhysicsScale};
use crate::world::TileProvider;

/// Everything that happened to bodies during one tick.
pub type TickEvents = Vec<(Entity, Events)>;

/* ── Think: intent sources → Intent ─────────────────────────────── */
pub fn think(world: &mut World) {
    for (_, (body, spawn, cmd, brain, intent)) in
        world.query_mut::<(&Body, &Spawn, &InputCmd, &mut Brain, &mut Intent)>()
    {
        *intent = brain.0.produce_intent(&body.view(spawn.0, *cmd));
    }
}

/* ── Physics: one integrator step per body ──────────────────────── */
pub fn physics<G: TileProvider + ?Sized>(
    world: &mut World,
    grid: &G,
    scale: &PhysicsScale,
) -> TickEvents {
    let integ = Integrator::new(grid, scale);
    let mut out = TickEvents::new();
    for (ent, (body, jump, policy, intent)) in
        world.query_mut::<(&mut Body, &mut JumpState, &MovementPolicy, &Intent)>()
    {
        let events = integ.step_body(body, jump, policy, intent);
        if !events.is_empty() {
            out.push((ent, events));
        }
    }
    out
}

/* ── Side effects ───────────────────────────────────────────────── */

/// Log the interesting per-body events of a tick.
pub fn log_events(world: &World, events: &TickEvents) {
    for (ent, evs) in events {
        let id = world
            .get::<&Class>(*ent)
            .map(|c| c.0.id)
            .unwrap_or("?");
        for ev in evs {
            match ev {
                BodyEvent::Landed | BodyEvent::Jumped | BodyEvent::JumpCut => {
                    debug!(entity = ?ent, archetype = id, event = ?ev, "body event")
                }
                _ => trace!(entity = ?ent, archetype = id, event = ?ev, "body event"),
            }
        }
    }
}

/// Put back every body whose box has dropped more than one tile below the
/// bottom of the grid.  Returns the entities that were moved.
pub fn respawn_fallen<G: TileProvider + ?Sized>(
    world: &mut World,
    grid: &G,
    unit: i32,
) -> Vec<Entity> {
    let kill_y = (grid.height() + 1) * unit;
    let fallen: Vec<Entity> = world
        .query_mut::<&Body>()
        .into_iter()
        .filter(|(_, body)| body.aabb().top() > kill_y)
        .map(|(ent, _)| ent)
        .collect();

    for &ent in &fallen {
        if reset_body(world, ent) {
            info!(entity = ?ent, "fell out of the room, respawned");
        }
    }
    fallen
}

/// Store the front-end's key state on a body for the next think pass.
pub fn player_input(world: &mut World, player: Entity, cmd: InputCmd) {
    if let Ok(mut stored) = world.get::<&mut InputCmd>(player) {
        *stored = cmd;
    }
}
