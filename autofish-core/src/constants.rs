//! Minigame and controller constants.
//!
//! Track geometry and progress rates mirror the host's bobber-bar minigame; the
//! controller gains are the empirically tuned values the autopilot ships with.

// Track
pub const TRACK_LENGTH: f32 = 568.0;
pub const FISH_TRACK_MAX: f32 = 532.0;
pub const UNSET_FISH_TARGET: f32 = -1.0;

// Controller aim
pub const AIM_LEAD_BIAS: f32 = 20.0;
pub const ANTICIPATION_DIVISOR: f32 = 4.0;

// Acceleration budget
pub const BASE_ACCELERATION: f32 = 0.25;
pub const NORMAL_HOOK_FACTOR: f32 = 0.6;
pub const BARBED_HOOK_FACTOR: f32 = 0.3;
pub const FASTER_ACCELERATION: f32 = 0.6;
pub const BARBED_HOOK_ITEM_ID: i32 = 691;

// Treasure diversion hysteresis
pub const DIVERT_ENTER_PROGRESS: f32 = 0.75;
pub const DIVERT_EXIT_PROGRESS: f32 = 0.15;

// Host progress rates (per tick)
pub const CATCH_START_PROGRESS: f32 = 0.3;
pub const CATCH_GAIN_PER_TICK: f32 = 0.002;
pub const CATCH_LOSS_PER_TICK: f32 = 0.003;
pub const TREASURE_GAIN_PER_TICK: f32 = 0.0135;
pub const TREASURE_LOSS_PER_TICK: f32 = 0.01;

// Host overlap window, relative to the bar's top edge
pub const OVERLAP_TOP_SLACK: f32 = 16.0;
pub const OVERLAP_BOTTOM_SLACK: f32 = 12.0;
pub const OVERLAP_BAR_OFFSET: f32 = 32.0;

// Host bar physics
pub const BOUNCE_FACTOR: f32 = 2.0 / 3.0;
pub const BARBED_BOUNCE_FACTOR: f32 = 0.1;

// Reference host session shape
pub const MIN_BAR_HEIGHT: i32 = 96;
pub const MAX_BAR_HEIGHT: i32 = 156;
pub const BAR_HEIGHT_STEP: i32 = 4;
pub const MIN_FISH_DIFFICULTY: i32 = 15;
pub const MAX_FISH_DIFFICULTY: i32 = 110;
pub const TREASURE_APPEAR_MIN_TICKS: i32 = 60;
pub const TREASURE_APPEAR_MAX_TICKS: i32 = 240;
pub const MAX_TICKS_DEFAULT: u32 = 36_000; // 10 min @ 60 ticks/s

// Press tape
pub const TAPE_MAGIC: u32 = 0x524F_4242; // "BBOR" in little-endian bytes
pub const TAPE_VERSION: u8 = 1;
pub const TAPE_HEADER_SIZE: usize = 16;
pub const TAPE_FOOTER_SIZE: usize = 12;
pub const TAPE_FLAG_BOSS: u8 = 0x01;
pub const TAPE_PRESS_BIT: u8 = 0x01;
