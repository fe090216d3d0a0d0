//! Fixed-step body integrator.
//!
//! One call advances one body by exactly one tick:
//!
//! a. coyote refill from the previous grounded state
//! b. horizontal intent → `vx`
//! c. jump controller (may overwrite `vy`)
//! d. gravity, clamped to terminal speed
//! e. horizontal resolution
//! f. vertical resolution, grounded update, landing
//! g. friction, then the jump timers count down
//!
//! Bodies never see each other, so any iteration order over bodies is fine.

use smallvec::SmallVec;

use super::collision::{Axis, Resolver};
use super::components::Body;
use super::intent::Intent;
use super::jump::JumpState;
use super::policy::{MovementPolicy, PhysicsScale};
use crate::defs::flags::Contacts;
use crate::world::TileProvider;

/// Something noteworthy that happened to a body during its tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyEvent {
    Jumped,
    Landed,
    LeftGround,
    HitWall,
    HitCeiling,
    ApexReached,
    JumpCut,
}

pub type Events = SmallVec<[BodyEvent; 4]>;

/// Integrator bound to one grid and one physics scale for the duration of a
/// tick.
pub struct Integrator<'g, G: TileProvider + ?Sized> {
    grid: &'g G,
    resolver: Resolver,
}

impl<'g, G: TileProvider + ?Sized> Integrator<'g, G> {
    pub fn new(grid: &'g G, scale: &PhysicsScale) -> Self {
        Self {
            grid,
            resolver: Resolver::new(scale.unit()),
        }
    }

    #[inline]
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn step_body(
        &self,
        body: &mut Body,
        jump: &mut JumpState,
        policy: &MovementPolicy,
        intent: &Intent,
    ) -> Events {
        let mut events = Events::new();
        let started_grounded = body.grounded;

        /* ----- a. coyote ------------------------------------------------- */
        jump.refill_coyote(body.grounded, policy);

        /* ----- b. horizontal input --------------------------------------- */
        if intent.move_x != 0.0 {
            let control = if body.grounded {
                1.0
            } else {
                policy.air_control
            };
            body.vel.x = (intent.move_x * policy.move_speed as f32 * control).round() as i32;
        }

        /* ----- c. jump --------------------------------------------------- */
        jump.update(body, intent, policy, &mut events);

        /* ----- d. gravity ------------------------------------------------ */
        body.vel.y = (body.vel.y + policy.gravity).min(policy.max_fall_speed);

        body.contacts = Contacts::empty();

        /* ----- e. horizontal --------------------------------------------- */
        let vx = body.vel.x;
        let hx = self
            .resolver
            .move_axis(self.grid, &body.hitbox, &mut body.pos, Axis::X, vx);
        if hx.blocked {
            body.contacts |= if vx < 0 {
                Contacts::WALL_LEFT
            } else {
                Contacts::WALL_RIGHT
            };
            body.vel.x = 0;
            events.push(BodyEvent::HitWall);
        }

        /* ----- f. vertical ----------------------------------------------- */
        let airborne = !body.grounded;
        let vy = body.vel.y;
        let hy = self
            .resolver
            .move_axis(self.grid, &body.hitbox, &mut body.pos, Axis::Y, vy);
        if hy.blocked {
            if vy < 0 {
                body.contacts |= Contacts::CEILING;
                events.push(BodyEvent::HitCeiling);
            }
            body.vel.y = 0;
        }

        body.grounded = if hy.moved == 0 {
            self.resolver.probe_ground(self.grid, &body.hitbox, body.pos)
        } else {
            hy.blocked && vy > 0
        };
        if body.grounded {
            body.contacts |= Contacts::GROUND;
        }

        if airborne && body.grounded {
            events.push(BodyEvent::Landed);
            jump.on_landing(body, policy, &mut events);
        } else if started_grounded && !body.grounded && !jump.is_jumping {
            events.push(BodyEvent::LeftGround);
        }

        /* ----- g. friction ----------------------------------------------- */
        let friction = if body.grounded {
            policy.ground_friction
        } else {
            policy.air_friction
        };
        body.vel.x = if body.vel.x > 0 {
            (body.vel.x - friction).max(0)
        } else {
            (body.vel.x + friction).min(0)
        };

        jump.expire_timers(started_grounded || body.grounded, intent.jump_pressed);

        events
    }
}
