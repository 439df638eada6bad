//! Bar speed control under a fixed per-tick acceleration budget.
//!
//! The target speed for a displacement `d` is the speed from which constant
//! deceleration `a` stops the bar exactly on the aim point: `sqrt(2 a |d|)`.
//! Each tick the controller replays the host's own press response and then nudges
//! the speed one step of `a` toward that target.

use serde::{Deserialize, Serialize};

use crate::constants::{
    AIM_LEAD_BIAS, ANTICIPATION_DIVISOR, BARBED_HOOK_FACTOR, BASE_ACCELERATION,
    FASTER_ACCELERATION, NORMAL_HOOK_FACTOR, TRACK_LENGTH,
};
use crate::state::HookVariant;

/// Which way the press step pushes speed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressBias {
    /// Pressing adds `+step`, releasing `-step`.
    #[default]
    Raise,
    /// Pressing adds `-step`, releasing `+step`.
    Lower,
}

impl PressBias {
    pub fn apply(self, pressing: bool, step: f32) -> f32 {
        match (self, pressing) {
            (Self::Raise, true) | (Self::Lower, false) => step,
            (Self::Raise, false) | (Self::Lower, true) => -step,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedStrategy {
    /// Converge on a single target speed toward the anticipated aim point.
    #[default]
    Aim,
    /// Keep speed inside a window derived from half the displacement.
    Band,
}

/// Everything the speed controller reads for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeedRequest {
    pub bar_position: f32,
    pub bar_height: f32,
    pub bar_speed: f32,
    pub target_pos: f32,
    pub other_pos: f32,
    pub accel_budget: f32,
    pub press_step: f32,
    pub player_pressing: bool,
    pub track_length: f32,
    pub press_bias: PressBias,
    pub strategy: SpeedStrategy,
    pub overshoot_damping: bool,
}

impl SpeedRequest {
    pub fn new(
        bar_position: f32,
        bar_height: f32,
        bar_speed: f32,
        target_pos: f32,
        other_pos: f32,
        accel_budget: f32,
        player_pressing: bool,
    ) -> Self {
        Self {
            bar_position,
            bar_height,
            bar_speed,
            target_pos,
            other_pos,
            accel_budget,
            press_step: accel_budget,
            player_pressing,
            track_length: TRACK_LENGTH,
            press_bias: PressBias::Raise,
            strategy: SpeedStrategy::Aim,
            overshoot_damping: false,
        }
    }

    pub fn track_max(&self) -> f32 {
        track_max(self.track_length, self.bar_height)
    }

    pub fn aim(&self) -> f32 {
        aim_position(
            self.target_pos,
            self.other_pos,
            self.bar_height,
            self.track_max(),
        )
    }
}

/// Intermediate values of one speed computation, kept for reporting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeedOutcome {
    pub aim: f32,
    pub displacement: f32,
    pub target_speed: f32,
    pub new_speed: f32,
}

/// Highest top-edge position; a negative bar height counts as zero.
pub fn track_max(track_length: f32, bar_height: f32) -> f32 {
    (track_length - bar_height.max(0.0)).max(0.0)
}

pub fn hook_step(hook: HookVariant) -> f32 {
    match hook {
        HookVariant::Normal => BASE_ACCELERATION * NORMAL_HOOK_FACTOR,
        HookVariant::Barbed => BASE_ACCELERATION * BARBED_HOOK_FACTOR,
    }
}

pub fn accel_budget(hook: HookVariant, faster_speed: bool) -> f32 {
    if faster_speed {
        FASTER_ACCELERATION
    } else {
        hook_step(hook)
    }
}

/// Speed from which constant deceleration `accel` covers exactly `displacement`.
pub fn compute_target_speed(accel: f32, displacement: f32) -> f32 {
    if displacement > 0.0 {
        (2.0 * accel * displacement).sqrt()
    } else if displacement < 0.0 {
        -(2.0 * accel * -displacement).sqrt()
    } else {
        0.0
    }
}

pub fn anticipation_offset(target_pos: f32, other_pos: f32, bar_height: f32) -> f32 {
    let reach = bar_height.max(0.0);
    (other_pos - target_pos).clamp(-reach, reach) / ANTICIPATION_DIVISOR
}

/// Top-edge position that centres the bar on the target, led toward `other_pos`.
pub fn aim_position(target_pos: f32, other_pos: f32, bar_height: f32, track_max: f32) -> f32 {
    let offset = anticipation_offset(target_pos, other_pos, bar_height);
    let aim = target_pos + offset + AIM_LEAD_BIAS - 0.5 * bar_height;
    aim.clamp(0.0, track_max.max(0.0))
}

pub fn compute_speed(request: &SpeedRequest) -> f32 {
    compute_speed_detailed(request).new_speed
}

pub fn compute_speed_detailed(request: &SpeedRequest) -> SpeedOutcome {
    let track_max = request.track_max();
    let aim = request.aim();
    let displacement = aim - request.bar_position;
    let accel = request.accel_budget;

    let mut speed = request.bar_speed
        + request
            .press_bias
            .apply(request.player_pressing, request.press_step);

    let target_speed = match request.strategy {
        SpeedStrategy::Aim => {
            let target_speed = compute_target_speed(accel, displacement);
            if speed < target_speed {
                speed += accel;
            } else if speed > target_speed {
                speed -= accel;
            }
            if request.overshoot_damping {
                let next = request.bar_position + speed;
                if next < 0.0 || next > track_max {
                    speed *= 0.5;
                }
            }
            target_speed
        }
        SpeedStrategy::Band => {
            let (min_speed, max_speed) = band_limits(
                accel,
                displacement,
                request.bar_position,
                request.bar_height,
                track_max,
            );
            if speed < min_speed {
                speed += accel;
            } else if speed > max_speed {
                speed -= accel;
            }
            compute_target_speed(accel, displacement)
        }
    };

    SpeedOutcome {
        aim,
        displacement,
        target_speed,
        new_speed: speed,
    }
}

/// Speed window for the band strategy; both ends stop the bar inside the track.
pub fn band_limits(
    accel: f32,
    displacement: f32,
    bar_position: f32,
    bar_height: f32,
    track_max: f32,
) -> (f32, f32) {
    let half = 0.5 * bar_height;
    let quarter = 0.25 * bar_height;

    let upper = if displacement > -half {
        displacement / 2.0
    } else {
        displacement + quarter
    };
    let lower = if displacement < half {
        displacement / 2.0
    } else {
        displacement - quarter
    };

    let max_disp = upper.min(track_max - bar_position);
    let min_disp = lower.max(-bar_position);
    (
        compute_target_speed(accel, min_disp),
        compute_target_speed(accel, max_disp),
    )
}
