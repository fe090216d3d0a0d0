//! Jump controller: coyote time, input buffering and hold-release shaping.
//!
//! The controller runs inside the integrator, between horizontal input and
//! gravity.  It may overwrite `vy`; it never moves the body.

use tracing::debug;

use super::components::Body;
use super::integrator::{BodyEvent, Events};
use super::intent::Intent;
use super::policy::MovementPolicy;

/// Coarse state derived from [`JumpState`] and the body's grounded flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JumpPhase {
    Grounded,
    /// Rising in a jump that early release can still shorten.
    Ascending,
    Falling,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JumpState {
    /// Ticks of ledge grace left.
    pub coyote_timer: u16,
    /// Ticks a raised jump-intent stays pending.
    pub jump_buffer_timer: u16,
    pub is_jumping: bool,
    pub jump_held_frames: u32,
    /// `y` at the moment of take-off.
    pub takeoff_y: i32,
    /// Jump was released early; the cut applies once the minimum height is
    /// reached.
    pub cut_pending: bool,
}

impl JumpState {
    pub fn phase(&self, grounded: bool) -> JumpPhase {
        if grounded && !self.is_jumping {
            JumpPhase::Grounded
        } else if self.is_jumping {
            JumpPhase::Ascending
        } else {
            JumpPhase::Falling
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// A pending jump may fire now.
    #[inline]
    pub fn can_jump(&self, grounded: bool, vy: i32) -> bool {
        grounded || (self.coyote_timer > 0 && vy >= 0)
    }

    /// Integrator step (a): refill from the previous grounded state.
    pub fn refill_coyote(&mut self, grounded: bool, policy: &MovementPolicy) {
        if grounded && !self.is_jumping {
            self.coyote_timer = policy.coyote_time_frames;
        }
    }

    /// Count both timers down once their tick has been checked.  The tick
    /// that refilled a timer is tick 0 of its window, so `C` airborne ticks
    /// of coyote time and a press `B` ticks before landing are honoured.
    pub fn expire_timers(&mut self, started_grounded: bool, jump_pressed: bool) {
        if !started_grounded {
            self.coyote_timer = self.coyote_timer.saturating_sub(1);
        }
        if !jump_pressed {
            self.jump_buffer_timer = self.jump_buffer_timer.saturating_sub(1);
        }
    }

    /// Integrator step (c).
    pub fn update(
        &mut self,
        body: &mut Body,
        intent: &Intent,
        policy: &MovementPolicy,
        events: &mut Events,
    ) {
        /* ----- buffer ---------------------------------------------------- */
        if intent.jump_pressed {
            self.jump_buffer_timer = policy.jump_buffer_frames;
        }

        /* ----- take-off -------------------------------------------------- */
        if self.jump_buffer_timer > 0 && self.can_jump(body.grounded, body.vel.y) {
            let from_coyote = !body.grounded;
            self.launch(body, policy, events);
            body.grounded = false;
            debug!(y = body.pos.y, from_coyote, "jump");
        }

        /* ----- early release --------------------------------------------- */
        if policy.variable_jump_height
            && self.is_jumping
            && !intent.jump_held
            && body.vel.y < 0
        {
            self.cut_pending = true;
        }

        if self.cut_pending
            && self.is_jumping
            && body.vel.y < 0
            && self.takeoff_y - body.pos.y >= policy.min_jump_height()
        {
            body.vel.y = body.vel.y.max(policy.jump_cut_velocity());
            self.is_jumping = false;
            self.cut_pending = false;
            events.push(BodyEvent::JumpCut);
            debug!(vy = body.vel.y, "jump cut");
        }

        /* ----- apex ------------------------------------------------------ */
        if self.is_jumping && body.vel.y >= 0 {
            self.is_jumping = false;
            self.cut_pending = false;
            events.push(BodyEvent::ApexReached);
        }

        if self.is_jumping && intent.jump_held {
            self.jump_held_frames += 1;
        }

        /* ----- fast-fall ------------------------------------------------- */
        if intent.fast_fall && body.vel.y > 0 {
            let boosted = (body.vel.y as f32 * policy.fast_fall_multiplier) as i32;
            body.vel.y = body.vel.y.max(boosted);
        }
    }

    /// Airborne → grounded transition inside step (f).  Refills coyote time
    /// and fires a jump still waiting in the buffer.
    pub fn on_landing(&mut self, body: &mut Body, policy: &MovementPolicy, events: &mut Events) {
        self.coyote_timer = policy.coyote_time_frames;
        self.is_jumping = false;
        self.cut_pending = false;

        if self.jump_buffer_timer > 0 {
            self.launch(body, policy, events);
            debug!(y = body.pos.y, "buffered jump");
        }
    }

    fn launch(&mut self, body: &mut Body, policy: &MovementPolicy, events: &mut Events) {
        body.vel.y = -policy.jump_power;
        self.is_jumping = true;
        self.cut_pending = false;
        self.jump_held_frames = 0;
        self.jump_buffer_timer = 0;
        self.coyote_timer = 0;
        self.takeoff_y = body.pos.y;
        events.push(BodyEvent::Jumped);
    }
}
