//! Per-tick intent and the sources that produce it.
//!
//! The integrator never knows whether a body is player-driven.  Each body
//! carries a [`Brain`](super::Brain) wrapping an [`IntentSource`]; the think
//! system asks it for an [`Intent`] before physics runs.

use glam::IVec2;

use super::random::SeededRandom;
use crate::defs::flags::Contacts;

/// What a body wants to do this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Intent {
    /// Horizontal deflection in `[-1, 1]`.
    pub move_x: f32,
    /// Jump was raised this tick (edge).
    pub jump_pressed: bool,
    /// Jump is being held (level).  Releasing = `!jump_held`.
    pub jump_held: bool,
    pub fast_fall: bool,
}

impl Intent {
    pub const IDLE: Self = Self {
        move_x: 0.0,
        jump_pressed: false,
        jump_held: false,
        fast_fall: false,
    };

    pub fn walk(dir: i32) -> Self {
        Self {
            move_x: dir.signum() as f32,
            ..Self::IDLE
        }
    }
}

/// Raw key state sampled by the front-end once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputCmd {
    pub move_x: f32,
    pub jump: bool,
    pub down: bool,
}

/// Read-only snapshot of a body handed to its intent source.
#[derive(Clone, Copy, Debug, Default)]
pub struct BodyView {
    pub pos: IVec2,
    pub vel: IVec2,
    pub grounded: bool,
    pub contacts: Contacts,
    pub spawn: IVec2,
    pub input: InputCmd,
}

pub trait IntentSource: Send + Sync {
    fn produce_intent(&mut self, body: &BodyView) -> Intent;

    /// Called when the body is put back at its spawn point.
    fn reset(&mut self) {}

    /// The physics unit changed from `old` to `new`; distances the source
    /// keeps in units must follow.
    fn rescale(&mut self, _old: i32, _new: i32) {}
}

/* ------------------------------------------------------------------------ */
/* Player                                                                    */
/* ------------------------------------------------------------------------ */

/// Turns the body's [`InputCmd`] into an intent, deriving the jump edge.
#[derive(Debug, Default)]
pub struct PlayerInput {
    jump_was_down: bool,
}

impl IntentSource for PlayerInput {
    fn produce_intent(&mut self, body: &BodyView) -> Intent {
        let cmd = body.input;
        let pressed = cmd.jump && !self.jump_was_down;
        self.jump_was_down = cmd.jump;
        Intent {
            move_x: cmd.move_x.clamp(-1.0, 1.0),
            jump_pressed: pressed,
            jump_held: cmd.jump,
            fast_fall: cmd.down,
        }
    }

    fn reset(&mut self) {
        self.jump_was_down = false;
    }
}

/* ------------------------------------------------------------------------ */
/* Replay                                                                    */
/* ------------------------------------------------------------------------ */

/// Plays back a fixed list of key states, one per tick, then idles.
#[derive(Debug, Default)]
pub struct Replay {
    script: Vec<InputCmd>,
    cursor: usize,
    edge: PlayerInput,
}

impl Replay {
    pub fn new(script: Vec<InputCmd>) -> Self {
        Self {
            script,
            ..Default::default()
        }
    }

    pub fn finished(&self) -> bool {
        self.cursor >= self.script.len()
    }
}

impl IntentSource for Replay {
    fn produce_intent(&mut self, body: &BodyView) -> Intent {
        let cmd = self.script.get(self.cursor).copied().unwrap_or_default();
        self.cursor += 1;
        let view = BodyView { input: cmd, ..*body };
        self.edge.produce_intent(&view)
    }

    fn reset(&mut self) {
        self.cursor = 0;
        self.edge.reset();
    }
}

/* ------------------------------------------------------------------------ */
/* Patrol                                                                    */
/* ------------------------------------------------------------------------ */

const DIRECTIONS: [i32; 3] = [-1, 0, 1];

/// Slime behaviour: walks back and forth around its spawn point, changing
/// its mind on a random timer and turning at walls.
#[derive(Debug)]
pub struct Patrol {
    rng: SeededRandom,
    seed: u32,
    range: i32,
    dir: i32,
    timer: i32,
}

impl Patrol {
    /// `range` is the furthest the body strays from its spawn x, in units.
    pub fn new(seed: u32, range: i32) -> Self {
        let mut p = Self {
            rng: SeededRandom::new(seed),
            seed,
            range,
            dir: 0,
            timer: 0,
        };
        p.reset();
        p
    }

    pub fn direction(&self) -> i32 {
        self.dir
    }
}

impl IntentSource for Patrol {
    fn produce_intent(&mut self, body: &BodyView) -> Intent {
        self.timer -= 1;

        let from_spawn = body.pos.x - body.spawn.x;
        if from_spawn > self.range {
            self.dir = -1;
            self.timer = self.rng.range(60, 60);
        } else if from_spawn < -self.range {
            self.dir = 1;
            self.timer = self.rng.range(60, 60);
        } else if (self.dir < 0 && body.contacts.contains(Contacts::WALL_LEFT))
            || (self.dir > 0 && body.contacts.contains(Contacts::WALL_RIGHT))
        {
            self.dir = -self.dir;
        }

        if self.timer <= 0 {
            if self.rng.chance(0.7) {
                self.dir = self.rng.pick(&DIRECTIONS).unwrap_or(0);
            }
            self.timer = self.rng.range(60, 180);
        }

        Intent::walk(self.dir)
    }

    fn reset(&mut self) {
        self.rng = SeededRandom::new(self.seed);
        self.dir = if self.rng.chance(0.5) { -1 } else { 1 };
        self.timer = self.rng.range(60, 120);
    }

    fn rescale(&mut self, old: i32, new: i32) {
        self.range = (self.range as i64 * new as i64 / old.max(1) as i64) as i32;
    }
}

/* ------------------------------------------------------------------------ */
/* Wander                                                                    */
/* ------------------------------------------------------------------------ */

/// Erratic walker with no home range; often pauses.
#[derive(Debug)]
pub struct Wander {
    rng: SeededRandom,
    seed: u32,
    dir: i32,
    timer: i32,
    randomness: f32,
    pause_chance: f32,
}

impl Wander {
    pub fn new(seed: u32) -> Self {
        let mut w = Self {
            rng: SeededRandom::new(seed),
            seed,
            dir: 0,
            timer: 0,
            randomness: 0.0,
            pause_chance: 0.3,
        };
        w.reset();
        w
    }
}

impl IntentSource for Wander {
    fn produce_intent(&mut self, _body: &BodyView) -> Intent {
        self.timer -= 1;
        if self.timer <= 0 {
            if self.rng.chance(self.randomness) {
                self.dir = if self.rng.chance(self.pause_chance) {
                    0
                } else if self.rng.chance(0.5) {
                    -1
                } else {
                    1
                };
            }
            self.timer = self.rng.range(20, 80);
        }
        Intent::walk(self.dir)
    }

    fn reset(&mut self) {
        self.rng = SeededRandom::new(self.seed);
        self.dir = self.rng.pick(&DIRECTIONS).unwrap_or(0);
        self.timer = self.rng.range(30, 90);
        self.randomness = 0.8 + self.rng.next_f32() * 0.2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_with(cmd: InputCmd) -> BodyView {
        BodyView {
            input: cmd,
            ..Default::default()
        }
    }

    #[test]
    fn player_jump_is_edge_triggered() {
        let mut p = PlayerInput::default();
        let down = InputCmd {
            jump: true,
            ..Default::default()
        };
        let a = p.produce_intent(&view_with(down));
        let b = p.produce_intent(&view_with(down));
        let c = p.produce_intent(&view_with(InputCmd::default()));
        assert!(a.jump_pressed && a.jump_held);
        assert!(!b.jump_pressed && b.jump_held);
        assert!(!c.jump_pressed && !c.jump_held);
    }

    #[test]
    fn player_clamps_deflection_and_maps_down() {
        let mut p = PlayerInput::default();
        let i = p.produce_intent(&view_with(InputCmd {
            move_x: 3.0,
            jump: false,
            down: true,
        }));
        assert_eq!(i.move_x, 1.0);
        assert!(i.fast_fall);
    }

    #[test]
    fn replay_plays_script_then_idles() {
        let jump = InputCmd {
            jump: true,
            ..Default::default()
        };
        let mut r = Replay::new(vec![jump, jump, InputCmd::default()]);
        let v = BodyView::default();
        assert!(r.produce_intent(&v).jump_pressed);
        assert!(!r.produce_intent(&v).jump_pressed);
        assert!(!r.produce_intent(&v).jump_held);
        assert!(r.finished());
        assert_eq!(r.produce_intent(&v), Intent::IDLE);

        r.reset();
        assert!(!r.finished());
        assert!(r.produce_intent(&v).jump_pressed);
    }

    #[test]
    fn patrol_heads_home_when_out_of_range() {
        let mut p = Patrol::new(11, 100);
        let far_right = BodyView {
            pos: IVec2::new(500, 0),
            spawn: IVec2::new(0, 0),
            ..Default::default()
        };
        assert_eq!(p.produce_intent(&far_right).move_x, -1.0);
        let far_left = BodyView {
            pos: IVec2::new(-500, 0),
            ..far_right
        };
        assert_eq!(p.produce_intent(&far_left).move_x, 1.0);
    }

    #[test]
    fn patrol_range_follows_unit() {
        let mut p = Patrol::new(3, 12 * 16);
        p.rescale(16, 32);
        assert_eq!(p.range, 12 * 32);
        p.rescale(32, 16);
        assert_eq!(p.range, 12 * 16);
    }

    #[test]
    fn patrol_turns_at_walls() {
        let mut p = Patrol::new(5, 1_000);
        let dir = p.direction();
        assert_ne!(dir, 0);
        let contact = if dir > 0 {
            Contacts::WALL_RIGHT
        } else {
            Contacts::WALL_LEFT
        };
        let v = BodyView {
            contacts: contact,
            ..Default::default()
        };
        // Fresh timer is at least 60 ticks, so only the wall can flip it.
        assert_eq!(p.produce_intent(&v).move_x, -dir as f32);
    }

    #[test]
    fn scripted_sources_are_deterministic_per_seed() {
        let v = BodyView::default();
        let run = |seed| {
            let mut w = Wander::new(seed);
            (0..600)
                .map(|_| w.produce_intent(&v).move_x as i32)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));

        let mut w = Wander::new(42);
        let first: Vec<_> = (0..50).map(|_| w.produce_intent(&v)).collect();
        w.reset();
        let again: Vec<_> = (0..50).map(|_| w.produce_intent(&v)).collect();
        assert_eq!(first, again);
    }

    #[test]
    fn scripted_sources_never_jump() {
        let v = BodyView::default();
        let mut p = Patrol::new(1, 64);
        let mut w = Wander::new(1);
        for _ in 0..1_000 {
            assert!(!p.produce_intent(&v).jump_pressed);
            assert!(!w.produce_intent(&v).jump_held);
        }
    }
}
