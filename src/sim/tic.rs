use glam::IVec2;
use hecs::World;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use super::collision::{SpawnError, check_spawn};
use super::components::{Body, Brain, Class, Spawn};
use super::jump::JumpState;
use super::policy::{MovementPolicy, PhysicsScale};
use super::systems::{self, TickEvents};
use super::intent::{InputCmd, IntentSource};
use super::mob;
use crate::defs::ArchetypeInfo;
use crate::world::TileProvider;

pub const SIM_FPS: u32 = 60;
const TIC: Duration = Duration::from_micros(1_000_000 / SIM_FPS as u64);

/// Owns the ECS world and drives all per-tick systems.
pub struct TicRunner {
    world: World,
    scale: PhysicsScale,
    last: Instant,
    tics: u64,
    next_seed: u32,
}

impl Default for TicRunner {
    fn default() -> Self {
        Self::new(PhysicsScale::default())
    }
}

impl TicRunner {
    pub fn new(scale: PhysicsScale) -> Self {
        Self {
            world: World::new(),
            scale,
            last: Instant::now(),
            tics: 0,
            next_seed: 0x5EED_0001,
        }
    }

    #[inline]
    pub fn world(&self) -> &hecs::World {
        &self.world
    }

    #[inline]
    pub fn world_mut(&mut self) -> &mut hecs::World {
        &mut self.world
    }

    #[inline]
    pub fn scale(&self) -> PhysicsScale {
        self.scale
    }

    #[inline]
    pub fn unit(&self) -> i32 {
        self.scale.unit()
    }

    /// Tics run since construction.
    #[inline]
    pub fn tics(&self) -> u64 {
        self.tics
    }

    /// Switch to a new physics scale.  Positions and spawn points are
    /// rescaled, hitboxes re-derived from each body's archetype, every
    /// body's policy and intent source re-expressed in the new unit, and all
    /// motion cleared.
    pub fn rebind(&mut self, scale: PhysicsScale) {
        let old = self.scale.unit();
        let new = scale.unit();
        self.scale = scale;
        if old == new {
            return;
        }
        for (_, (body, jump, spawn, class, policy, brain)) in self.world.query_mut::<(
            &mut Body,
            &mut JumpState,
            &mut Spawn,
            &Class,
            &mut MovementPolicy,
            &mut Brain,
        )>() {
            let pos = body.pos * new / old;
            body.hitbox = class.0.hitbox(new);
            body.reset(pos);
            spawn.0 = spawn.0 * new / old;
            jump.reset();
            *policy = policy.rescaled(old, new);
            brain.0.rescale(old, new);
        }
        info!(from = old, to = new, "physics unit rebound");
    }

    /// Spawn without checking the placement.
    pub fn spawn(&mut self, info: &'static ArchetypeInfo, pos: IVec2) -> hecs::Entity {
        let seed = self.next_seed;
        self.next_seed = self.next_seed.wrapping_mul(747_796_405).wrapping_add(1);
        mob::spawn_body(&mut self.world, info, pos, self.scale.unit(), seed)
    }

    /// Spawn after checking that the body's box is clear of `grid`.
    pub fn try_spawn<G: TileProvider + ?Sized>(
        &mut self,
        grid: &G,
        info: &'static ArchetypeInfo,
        pos: IVec2,
    ) -> Result<hecs::Entity, SpawnError> {
        let unit = self.scale.unit();
        if let Err(e) = check_spawn(grid, &info.hitbox(unit), pos, unit) {
            warn!(archetype = info.id, %e, "rejected spawn");
            return Err(e);
        }
        Ok(self.spawn(info, pos))
    }

    /// Swap a body's tuning, e.g. for a power-up.  Takes effect next tick.
    pub fn set_policy(&mut self, ent: hecs::Entity, policy: MovementPolicy) -> bool {
        match self.world.get::<&mut MovementPolicy>(ent) {
            Ok(mut p) => {
                *p = policy;
                true
            }
            Err(_) => false,
        }
    }

    /// Rewire a body to a different intent source, e.g. a scripted
    /// [`Replay`](super::Replay).
    pub fn set_brain<S: IntentSource + 'static>(&mut self, ent: hecs::Entity, source: S) -> bool {
        self.world.insert_one(ent, Brain::new(source)).is_ok()
    }

    pub fn set_input(&mut self, ent: hecs::Entity, cmd: InputCmd) {
        systems::player_input(&mut self.world, ent, cmd);
    }

    pub fn respawn(&mut self, ent: hecs::Entity) -> bool {
        mob::reset_body(&mut self.world, ent)
    }

    pub fn body(&self, ent: hecs::Entity) -> Option<Body> {
        self.world.get::<&Body>(ent).ok().map(|b| *b)
    }

    /// Forget wall-clock time spent outside [`pump`](Self::pump), e.g. while
    /// paused, so the next pump does not replay it.
    pub fn resync(&mut self) {
        self.last = Instant::now();
    }

    /// Advance enough tics to synchronise simulation with real time.
    /// Returns the number of tics run.
    pub fn pump<G: TileProvider + ?Sized>(&mut self, grid: &G) -> u32 {
        let mut ran = 0;
        while self.last.elapsed() >= TIC {
            self.tick(grid);
            self.last += TIC;
            ran += 1;
        }
        ran
    }

    /// Run exactly one fixed-rate tic.
    pub fn tick<G: TileProvider + ?Sized>(&mut self, grid: &G) -> TickEvents {
        systems::think(&mut self.world);
        let events = systems::physics(&mut self.world, grid, &self.scale);

        systems::log_events(&self.world, &events);
        systems::respawn_fallen(&mut self.world, grid, self.scale.unit());

        self.tics += 1;
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::by_id;
    use crate::sim::{BodyEvent, Intent, InputCmd};
    use crate::world::{SolidityTable, TileGrid};

    const U: i32 = 16;

    fn room() -> TileGrid {
        let mut g = TileGrid::new(20, 10, SolidityTable::stock());
        g.fill(0, 9, 19, 9, 0);
        g.fill(0, 0, 0, 9, 1);
        g.fill(19, 0, 19, 9, 1);
        g
    }

    fn player() -> &'static ArchetypeInfo {
        by_id("player").unwrap()
    }

    #[test]
    fn spawned_player_falls_and_lands() {
        let g = room();
        let mut sim = TicRunner::default();
        let p = sim.spawn(player(), IVec2::new(5 * U, U));
        let mut landed = false;
        for _ in 0..120 {
            landed |= sim
                .tick(&g)
                .iter()
                .any(|(e, evs)| *e == p && evs.contains(&BodyEvent::Landed));
        }
        assert!(landed);
        let body = sim.body(p).unwrap();
        assert!(body.grounded);
        assert_eq!(body.aabb().bottom(), 9 * U - 1);
        assert_eq!(sim.tics(), 120);
    }

    #[test]
    fn input_drives_player() {
        let g = room();
        let mut sim = TicRunner::default();
        let p = sim.spawn(player(), IVec2::new(5 * U, 7 * U));
        for _ in 0..60 {
            sim.tick(&g);
        }
        let x0 = sim.body(p).unwrap().pos.x;
        sim.set_input(
            p,
            InputCmd {
                move_x: 1.0,
                ..Default::default()
            },
        );
        for _ in 0..10 {
            sim.tick(&g);
        }
        assert_eq!(
            sim.body(p).unwrap().pos.x - x0,
            10 * MovementPolicy::player().move_speed
        );
        let intent = *sim.world().get::<&Intent>(p).unwrap();
        assert_eq!(intent.move_x, 1.0);
    }

    #[test]
    fn replay_brain_drives_body() {
        let g = room();
        let mut sim = TicRunner::default();
        let p = sim.spawn(player(), IVec2::new(5 * U, 7 * U));
        for _ in 0..60 {
            sim.tick(&g);
        }
        let right = InputCmd {
            move_x: 1.0,
            ..Default::default()
        };
        assert!(sim.set_brain(p, crate::sim::Replay::new(vec![right; 5])));
        let x0 = sim.body(p).unwrap().pos.x;
        for _ in 0..5 {
            sim.tick(&g);
        }
        assert_eq!(sim.body(p).unwrap().pos.x - x0, 5 * MovementPolicy::player().move_speed);

        sim.world_mut().despawn(p).unwrap();
        assert!(!sim.set_brain(p, crate::sim::Replay::new(Vec::new())));
    }

    #[test]
    fn try_spawn_rejects_placement_in_wall() {
        let g = room();
        let mut sim = TicRunner::default();
        let err = sim.try_spawn(&g, player(), IVec2::new(0, 4 * U)).unwrap_err();
        assert!(matches!(err, SpawnError::InsideGeometry { .. }));
        assert_eq!(sim.world().len(), 0);
        assert!(sim.try_spawn(&g, player(), IVec2::new(4 * U, 4 * U)).is_ok());
    }

    #[test]
    fn set_policy_takes_effect_next_tick() {
        let g = room();
        let mut sim = TicRunner::default();
        let p = sim.spawn(player(), IVec2::new(5 * U, 7 * U));
        for _ in 0..60 {
            sim.tick(&g);
        }
        let boosted = MovementPolicy::player().with_speed_boost(2.0);
        assert!(sim.set_policy(p, boosted));
        sim.set_input(
            p,
            InputCmd {
                move_x: 1.0,
                ..Default::default()
            },
        );
        let x0 = sim.body(p).unwrap().pos.x;
        sim.tick(&g);
        assert_eq!(sim.body(p).unwrap().pos.x - x0, boosted.move_speed);
    }

    #[test]
    fn falling_out_of_the_room_respawns() {
        let mut g = room();
        g.fill(1, 9, 18, 9, crate::world::EMPTY);
        let mut sim = TicRunner::default();
        let spawn = IVec2::new(5 * U, U);
        let p = sim.spawn(player(), spawn);
        let mut deepest = 0;
        let mut respawned = false;
        for _ in 0..200 {
            sim.tick(&g);
            let y = sim.body(p).unwrap().pos.y;
            if y < deepest {
                respawned = true;
                break;
            }
            deepest = y;
        }
        assert!(respawned);
        let body = sim.body(p).unwrap();
        assert_eq!(body.pos, spawn);
        assert_eq!(body.vel, IVec2::ZERO);
        assert!(deepest > 10 * U);
    }

    #[test]
    fn explicit_respawn_resets_body() {
        let g = room();
        let mut sim = TicRunner::default();
        let spawn = IVec2::new(5 * U, U);
        let p = sim.spawn(player(), spawn);
        for _ in 0..30 {
            sim.tick(&g);
        }
        assert_ne!(sim.body(p).unwrap().pos, spawn);
        assert!(sim.respawn(p));
        assert_eq!(sim.body(p).unwrap().pos, spawn);
        assert!(!sim.body(p).unwrap().grounded);
    }

    #[test]
    fn rebind_rescales_bodies() {
        let mut sim = TicRunner::default();
        let p = sim.spawn(player(), IVec2::new(5 * U, 3 * U));
        sim.rebind(PhysicsScale::zoomed_in());
        assert_eq!(sim.unit(), 32);
        let body = sim.body(p).unwrap();
        assert_eq!(body.pos, IVec2::new(5 * 32, 3 * 32));
        assert_eq!(body.hitbox, player().hitbox(32));
        assert_eq!(*sim.world().get::<&Spawn>(p).unwrap(), Spawn(body.pos));
        assert_eq!(
            *sim.world().get::<&MovementPolicy>(p).unwrap(),
            MovementPolicy::zoomed_in()
        );
    }

    #[test]
    fn rebind_rescales_every_archetype() {
        let g = room();
        let mut sim = TicRunner::default();
        let slime = sim.spawn(by_id("slime").unwrap(), IVec2::new(8 * U, 8 * U));
        let wanderer = sim.spawn(by_id("wanderer").unwrap(), IVec2::new(12 * U, 8 * U));
        sim.rebind(PhysicsScale::zoomed_in());
        let unit = sim.unit();
        for (e, id) in [(slime, "slime"), (wanderer, "wanderer")] {
            let info = by_id(id).unwrap();
            let p = *sim.world().get::<&MovementPolicy>(e).unwrap();
            assert_eq!(p.move_speed, info.policy.move_speed * 2);
            assert_eq!(p.gravity, info.policy.gravity * 2);
            assert_eq!(p, info.policy(unit));
        }

        // back again, and freshly spawned bodies match rebound ones
        sim.rebind(PhysicsScale::default());
        let p = *sim.world().get::<&MovementPolicy>(slime).unwrap();
        assert_eq!(p, MovementPolicy::slime());
        sim.tick(&g);
    }

    #[test]
    fn spawning_at_zoom_scales_archetype_policy() {
        let mut sim = TicRunner::new(PhysicsScale::zoomed_in());
        let p = sim.spawn(player(), IVec2::new(5 * 32, 3 * 32));
        assert_eq!(
            *sim.world().get::<&MovementPolicy>(p).unwrap(),
            MovementPolicy::zoomed_in()
        );
    }

    #[test]
    fn enemies_patrol_without_leaving_the_room() {
        let g = room();
        let mut sim = TicRunner::default();
        let slime = sim.spawn(by_id("slime").unwrap(), IVec2::new(8 * U, 8 * U));
        let wanderer = sim.spawn(by_id("wanderer").unwrap(), IVec2::new(12 * U, 8 * U));
        let starts = [slime, wanderer].map(|e| sim.body(e).unwrap().pos.x);
        let mut moved = [false; 2];
        for _ in 0..2_000 {
            sim.tick(&g);
            for (i, e) in [slime, wanderer].into_iter().enumerate() {
                let b = sim.body(e).unwrap();
                assert!(b.aabb().left() >= U && b.aabb().right() < 19 * U);
                moved[i] |= b.pos.x != starts[i];
            }
        }
        assert_eq!(moved, [true, true]);
    }

    #[test]
    fn pump_runs_nothing_when_no_time_passed() {
        let g = room();
        let mut sim = TicRunner::default();
        sim.last = Instant::now() + Duration::from_secs(60);
        assert_eq!(sim.pump(&g), 0);
        sim.last = Instant::now() - TIC * 3;
        assert!(sim.pump(&g) >= 3);

        sim.last = Instant::now() - Duration::from_secs(10);
        sim.resync();
        assert!(sim.pump(&g) < 60);
    }
}
