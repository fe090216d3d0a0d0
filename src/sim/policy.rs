//! Movement tuning and physics scale.
//!
//! Every value a body's physics depends on lives in a [`MovementPolicy`]
//! bound to that body, and every unit conversion in a [`PhysicsScale`] bound
//! to the runner.  Nothing is read from global state, so switching a zoom
//! preset or granting a speed boost is an explicit re-bind between ticks.
//!
//! Velocities and accelerations are integer physics units per tick.

use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Grid unit derivation: one tile spans `tile_size * tile_scale` physics
/// units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsScale {
    /// Base tile size of the tile set, in pixels.
    pub tile_size: i32,
    /// Render zoom applied to tiles.
    pub tile_scale: f32,
}

impl Default for PhysicsScale {
    fn default() -> Self {
        Self {
            tile_size: 16,
            tile_scale: 1.0,
        }
    }
}

impl PhysicsScale {
    /// Close-up preset: double-size tiles.
    pub fn zoomed_in() -> Self {
        Self {
            tile_scale: 2.0,
            ..Default::default()
        }
    }

    /// Physics units per tile (never below 1).
    #[inline]
    pub fn unit(&self) -> i32 {
        ((self.tile_size as f32 * self.tile_scale) as i32).max(1)
    }
}

/// Per-archetype movement tuning.
///
/// All values are non-negative; see [`MovementPolicy::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementPolicy {
    // ========================================================================
    // Horizontal
    // ========================================================================
    /// Horizontal speed at full input deflection (units/tick).
    pub move_speed: i32,

    /// Fraction of `move_speed` available while airborne.
    pub air_control: f32,

    /// `vx` decay toward zero per grounded tick.
    pub ground_friction: i32,

    /// `vx` decay toward zero per airborne tick; 0 keeps momentum.
    pub air_friction: i32,

    // ========================================================================
    // Vertical
    // ========================================================================
    /// Added to `vy` every tick (units/tick²).
    pub gravity: i32,

    /// Terminal `vy`.
    pub max_fall_speed: i32,

    /// Take-off speed; a jump sets `vy = -jump_power`.
    pub jump_power: i32,

    /// Share of the full jump height an early release still reaches; also
    /// the share of `jump_power` the ascent is cut to.
    pub min_jump_height_fraction: f32,

    /// Factor applied to a falling `vy` while fast-fall is held.
    pub fast_fall_multiplier: f32,

    // ========================================================================
    // Jump feel (ticks)
    // ========================================================================
    /// Grace window for jumping after walking off a ledge.
    pub coyote_time_frames: u16,

    /// How long a jump press is remembered before landing.
    pub jump_buffer_frames: u16,

    /// Releasing jump early shortens the jump.
    pub variable_jump_height: bool,
}

impl Default for MovementPolicy {
    fn default() -> Self {
        Self::player()
    }
}

/// Errors raised while loading or validating a policy.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed policy: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("`{field}` must be non-negative (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("`{field}` must lie in [0, 1] (got {value})")]
    OutOfUnitRange { field: &'static str, value: f32 },

    #[error("fast_fall_multiplier must be >= 1 (got {0})")]
    FastFallBelowOne(f32),
}

impl MovementPolicy {
    /// Player-controlled body.
    pub const fn player() -> Self {
        Self {
            move_speed: 3,
            air_control: 0.8,
            ground_friction: 1,
            air_friction: 0,
            gravity: 1,
            max_fall_speed: 12,
            jump_power: 10,
            min_jump_height_fraction: 0.5,
            fast_fall_multiplier: 1.5,
            coyote_time_frames: 6,
            jump_buffer_frames: 6,
            variable_jump_height: true,
        }
    }

    /// Patrolling slime: half player speed, never jumps.
    pub const fn slime() -> Self {
        Self {
            move_speed: 1,
            air_control: 1.0,
            jump_power: 0,
            variable_jump_height: false,
            coyote_time_frames: 0,
            jump_buffer_frames: 0,
            ..Self::player()
        }
    }

    /// Erratic wanderer: three quarters of player speed, never jumps.
    pub const fn wanderer() -> Self {
        Self {
            move_speed: 2,
            ..Self::slime()
        }
    }

    /// Player tuning for the close-up [`PhysicsScale::zoomed_in`] preset.
    pub const fn zoomed_in() -> Self {
        Self {
            move_speed: 6,
            ground_friction: 2,
            gravity: 2,
            max_fall_speed: 24,
            jump_power: 20,
            ..Self::player()
        }
    }

    /// Parse a RON document; missing fields take player defaults.
    pub fn from_ron_str(src: &str) -> Result<Self, PolicyError> {
        let policy: Self = ron::from_str(src)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Load and validate a RON policy file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PolicyError> {
        let src = fs::read_to_string(path)?;
        Self::from_ron_str(&src)
    }

    /// Configuration-time sanity check.  The integrator assumes a validated
    /// policy and never re-checks per tick.
    pub fn validate(&self) -> Result<(), PolicyError> {
        let ints = [
            ("move_speed", self.move_speed),
            ("ground_friction", self.ground_friction),
            ("air_friction", self.air_friction),
            ("gravity", self.gravity),
            ("max_fall_speed", self.max_fall_speed),
            ("jump_power", self.jump_power),
        ];
        for (field, v) in ints {
            if v < 0 {
                return Err(PolicyError::Negative {
                    field,
                    value: v as f32,
                });
            }
        }
        if self.air_control < 0.0 {
            return Err(PolicyError::Negative {
                field: "air_control",
                value: self.air_control,
            });
        }
        if !(0.0..=1.0).contains(&self.min_jump_height_fraction) {
            return Err(PolicyError::OutOfUnitRange {
                field: "min_jump_height_fraction",
                value: self.min_jump_height_fraction,
            });
        }
        if self.fast_fall_multiplier < 1.0 {
            return Err(PolicyError::FastFallBelowOne(self.fast_fall_multiplier));
        }
        Ok(())
    }

    /// Same policy with `move_speed` scaled, e.g. for a speed power-up.
    pub fn with_speed_boost(mut self, factor: f32) -> Self {
        self.move_speed = (self.move_speed as f32 * factor).round() as i32;
        self
    }

    /// Same tuning expressed for a grid unit of `new` instead of `old`
    /// physics units: every distance-per-tick field scales by `new/old`,
    /// ratios and frame counts are unit-free.
    pub fn rescaled(mut self, old: i32, new: i32) -> Self {
        let old = old.max(1) as i64;
        let scale = |v: i32| (v as i64 * new as i64 / old) as i32;
        self.move_speed = scale(self.move_speed);
        self.ground_friction = scale(self.ground_friction);
        self.air_friction = scale(self.air_friction);
        self.gravity = scale(self.gravity);
        self.max_fall_speed = scale(self.max_fall_speed);
        self.jump_power = scale(self.jump_power);
        self
    }

    /// Apex height (units) of a jump held through its whole ascent.
    ///
    /// Gravity is applied in the same tick the impulse fires, so the rises
    /// are `P-g, P-2g, …` while positive.
    pub fn full_jump_height(&self) -> i32 {
        let p = self.jump_power as i64;
        let g = self.gravity as i64;
        if p <= 0 {
            return 0;
        }
        if g <= 0 {
            return i32::MAX;
        }
        let n = (p - 1) / g; // largest k with p - k*g > 0
        let h = n * p - g * n * (n + 1) / 2;
        h.min(i32::MAX as i64) as i32
    }

    /// Height an early-released jump is still guaranteed to reach.
    pub fn min_jump_height(&self) -> i32 {
        let full = self.full_jump_height();
        if full == i32::MAX {
            return full;
        }
        (full as f32 * self.min_jump_height_fraction).ceil() as i32
    }

    /// `vy` an early release is clamped to (negative = upward).
    #[inline]
    pub fn jump_cut_velocity(&self) -> i32 {
        -((self.jump_power as f32 * self.min_jump_height_fraction) as i32)
    }
}
