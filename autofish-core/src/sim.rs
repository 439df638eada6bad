//! Deterministic reference host for the bobber-bar minigame.
//!
//! The host owns all minigame state. Each tick it applies its own response to the
//! button, integrates and bounces the bar, moves the fish, and updates catch and
//! treasure progress. The controller only ever sees a [`MinigameState`] snapshot
//! and hands back `bar_speed`.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    BARBED_BOUNCE_FACTOR, BAR_HEIGHT_STEP, BOUNCE_FACTOR, CATCH_GAIN_PER_TICK,
    CATCH_LOSS_PER_TICK, CATCH_START_PROGRESS, FISH_TRACK_MAX, MAX_BAR_HEIGHT,
    MAX_FISH_DIFFICULTY, MIN_BAR_HEIGHT, MIN_FISH_DIFFICULTY, OVERLAP_BAR_OFFSET,
    OVERLAP_BOTTOM_SLACK, OVERLAP_TOP_SLACK, TRACK_LENGTH, TREASURE_APPEAR_MAX_TICKS,
    TREASURE_APPEAR_MIN_TICKS, TREASURE_GAIN_PER_TICK, TREASURE_LOSS_PER_TICK,
    UNSET_FISH_TARGET,
};
use crate::controller::{BobberController, TickReport};
use crate::input::{ActuationInput, Recorded};
use crate::rng::SeededRng;
use crate::speed::{hook_step, track_max};
use crate::state::{HookVariant, MinigameState};
use crate::config::AutoFishConfig;

const FISH_RNG_SALT: u32 = 0xB0BB_E400;
const BARBED_HOOK_CHANCE: f32 = 0.2;
const BOSS_FISH_CHANCE: f32 = 0.05;
const TREASURE_CHANCE: f32 = 0.35;
const SINK_DRIFT: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FishMotion {
    Mixed,
    Dart,
    Smooth,
    Sinker,
    Floater,
}

impl FishMotion {
    const ALL: [FishMotion; 5] = [
        FishMotion::Mixed,
        FishMotion::Dart,
        FishMotion::Smooth,
        FishMotion::Sinker,
        FishMotion::Floater,
    ];

    fn jump_rate(self) -> f32 {
        match self {
            Self::Smooth => 20.0,
            Self::Dart => 1.5,
            _ => 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    Running,
    Caught,
    Escaped,
}

impl SessionOutcome {
    pub fn code(self) -> u8 {
        match self {
            Self::Running => 0,
            Self::Caught => 1,
            Self::Escaped => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Running),
            1 => Some(Self::Caught),
            2 => Some(Self::Escaped),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Caught => "caught",
            Self::Escaped => "escaped",
        }
    }
}

impl fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed parameters of one minigame session.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSetup {
    pub seed: u32,
    pub bar_height: f32,
    pub hook_variant: HookVariant,
    pub difficulty: f32,
    pub motion: FishMotion,
    pub is_boss_fish: bool,
    pub fish_start: f32,
    pub treasure_appears_at: Option<u32>,
}

impl SessionSetup {
    pub fn from_seed(seed: u32) -> Self {
        let mut rng = SeededRng::new(seed);
        let height_steps = ((MAX_BAR_HEIGHT - MIN_BAR_HEIGHT) / BAR_HEIGHT_STEP + 1) as u32;
        let bar_height = (MIN_BAR_HEIGHT + rng.next_int(height_steps) as i32 * BAR_HEIGHT_STEP) as f32;
        let hook_variant = if rng.chance(BARBED_HOOK_CHANCE) {
            HookVariant::Barbed
        } else {
            HookVariant::Normal
        };
        let difficulty = rng.next_range(MIN_FISH_DIFFICULTY, MAX_FISH_DIFFICULTY + 1) as f32;
        let motion = FishMotion::ALL[rng.next_int(FishMotion::ALL.len() as u32) as usize];
        let is_boss_fish = rng.chance(BOSS_FISH_CHANCE);
        let treasure_appears_at = if rng.chance(TREASURE_CHANCE) {
            Some(rng.next_range(TREASURE_APPEAR_MIN_TICKS, TREASURE_APPEAR_MAX_TICKS + 1) as u32)
        } else {
            None
        };

        Self {
            seed,
            bar_height,
            hook_variant,
            difficulty,
            motion,
            is_boss_fish,
            fish_start: FISH_TRACK_MAX - 24.0,
            treasure_appears_at,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub seed: u32,
    pub ticks: u32,
    pub outcome: SessionOutcome,
    pub treasure_appeared: bool,
    pub treasure_caught: bool,
    pub final_distance: f32,
    pub perfect: bool,
    pub is_boss_fish: bool,
    pub rng_state: u32,
}

#[derive(Clone, Debug)]
pub struct BobberBarSim {
    setup: SessionSetup,
    rng: SeededRng,
    tick: u32,
    last_pressed: bool,
    bar_position: f32,
    bar_speed: f32,
    fish_position: f32,
    fish_speed: f32,
    fish_target: f32,
    distance: f32,
    treasure_present: bool,
    treasure_caught: bool,
    treasure_position: f32,
    treasure_level: f32,
    perfect: bool,
    outcome: SessionOutcome,
}

impl BobberBarSim {
    pub fn new(setup: SessionSetup) -> Self {
        let bar_height = setup.bar_height;
        Self {
            setup,
            rng: SeededRng::new(setup.seed ^ FISH_RNG_SALT),
            tick: 0,
            last_pressed: false,
            bar_position: track_max(TRACK_LENGTH, bar_height),
            bar_speed: 0.0,
            fish_position: setup.fish_start.clamp(0.0, FISH_TRACK_MAX),
            fish_speed: 0.0,
            fish_target: UNSET_FISH_TARGET,
            distance: CATCH_START_PROGRESS,
            treasure_present: false,
            treasure_caught: false,
            treasure_position: 0.0,
            treasure_level: 0.0,
            perfect: true,
            outcome: SessionOutcome::Running,
        }
    }

    pub fn setup(&self) -> &SessionSetup {
        &self.setup
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn outcome(&self) -> SessionOutcome {
        self.outcome
    }

    pub fn is_running(&self) -> bool {
        self.outcome == SessionOutcome::Running
    }

    pub fn snapshot(&self) -> MinigameState {
        MinigameState {
            bar_position: self.bar_position,
            bar_height: self.setup.bar_height,
            bar_speed: self.bar_speed,
            fish_position: self.fish_position,
            fish_target_position: self.fish_target,
            treasure_position: self.treasure_position,
            treasure_present: self.treasure_present,
            treasure_caught: self.treasure_caught,
            is_boss_fish: self.setup.is_boss_fish,
            distance_from_catching: self.distance,
            hook_variant: self.setup.hook_variant,
            player_pressing: self.last_pressed,
            track_length: TRACK_LENGTH,
        }
    }

    /// Copies the controller's single output back into the host.
    pub fn apply_output(&mut self, state: &MinigameState) {
        self.bar_speed = state.bar_speed;
    }

    pub fn step(&mut self, pressed: bool) {
        if !self.is_running() {
            return;
        }
        self.last_pressed = pressed;

        self.step_bar(pressed);
        self.step_fish();
        self.step_progress();
        self.step_treasure();

        self.tick += 1;

        if self.distance >= 1.0 {
            self.outcome = SessionOutcome::Caught;
        } else if self.distance <= 0.0 {
            self.outcome = SessionOutcome::Escaped;
        }
    }

    pub fn result(&self) -> SessionResult {
        SessionResult {
            seed: self.setup.seed,
            ticks: self.tick,
            outcome: self.outcome,
            treasure_appeared: self.treasure_present,
            treasure_caught: self.treasure_caught,
            final_distance: self.distance,
            perfect: self.perfect && self.outcome == SessionOutcome::Caught,
            is_boss_fish: self.setup.is_boss_fish,
            rng_state: self.rng.state(),
        }
    }

    fn step_bar(&mut self, pressed: bool) {
        let step = hook_step(self.setup.hook_variant);
        self.bar_speed += if pressed { -step } else { step };
        self.bar_position += self.bar_speed;

        let bounce = match self.setup.hook_variant {
            HookVariant::Normal => BOUNCE_FACTOR,
            HookVariant::Barbed => BOUNCE_FACTOR * BARBED_BOUNCE_FACTOR,
        };
        let max = track_max(TRACK_LENGTH, self.setup.bar_height);
        if self.bar_position > max {
            self.bar_position = max;
            self.bar_speed = -self.bar_speed * bounce;
        } else if self.bar_position < 0.0 {
            self.bar_position = 0.0;
            self.bar_speed = -self.bar_speed * bounce;
        }
    }

    fn step_fish(&mut self) {
        let difficulty = self.setup.difficulty;
        let motion = self.setup.motion;

        let jump_chance = difficulty * motion.jump_rate() / 4000.0;
        if self.rng.chance(jump_chance)
            && (motion != FishMotion::Smooth || self.fish_target == UNSET_FISH_TARGET)
        {
            let space_above = self.fish_position;
            let space_below = FISH_TRACK_MAX - self.fish_position;
            let percent = (difficulty + self.rng.next_range(10, 45) as f32).min(99.0) / 100.0;
            let jump = self.rng.next_f32_range(-space_above, space_below) * percent;
            self.fish_target = (self.fish_position + jump).clamp(0.0, FISH_TRACK_MAX);
        }

        if self.fish_target != UNSET_FISH_TARGET {
            let inertia = self.rng.next_range(10, 30) as f32 + (100.0 - difficulty.min(100.0));
            let pull = (self.fish_target - self.fish_position) / inertia;
            self.fish_speed += (pull - self.fish_speed) / 5.0;
        } else {
            self.fish_speed *= 0.9;
        }

        match motion {
            FishMotion::Sinker => self.fish_speed += SINK_DRIFT,
            FishMotion::Floater => self.fish_speed -= SINK_DRIFT,
            _ => {}
        }

        self.fish_position += self.fish_speed;
        if self.fish_position < 0.0 || self.fish_position > FISH_TRACK_MAX {
            self.fish_position = self.fish_position.clamp(0.0, FISH_TRACK_MAX);
            self.fish_speed = 0.0;
        }

        if self.fish_target != UNSET_FISH_TARGET
            && (self.fish_position - self.fish_target).abs() < 3.0
        {
            self.fish_target = UNSET_FISH_TARGET;
        }
    }

    fn step_progress(&mut self) {
        if self.overlaps(self.fish_position) {
            self.distance += CATCH_GAIN_PER_TICK;
        } else {
            self.distance -= CATCH_LOSS_PER_TICK;
            self.perfect = false;
        }
        self.distance = self.distance.clamp(0.0, 1.0);
    }

    fn step_treasure(&mut self) {
        if !self.treasure_present {
            if let Some(appear_at) = self.setup.treasure_appears_at {
                if self.tick >= appear_at {
                    self.spawn_treasure();
                }
            }
            return;
        }
        if self.treasure_caught {
            return;
        }

        if self.overlaps(self.treasure_position) {
            self.treasure_level += TREASURE_GAIN_PER_TICK;
        } else {
            self.treasure_level = (self.treasure_level - TREASURE_LOSS_PER_TICK).max(0.0);
        }
        if self.treasure_level >= 1.0 {
            self.treasure_caught = true;
        }
    }

    /// Chests spawn on the far side of the track from the bar.
    fn spawn_treasure(&mut self) {
        let bar = self.bar_position;
        self.treasure_position = if bar > 274.0 {
            self.rng.next_f32_range(8.0, (bar - 20.0).max(8.0))
        } else {
            let low = (bar + self.setup.bar_height).min(500.0);
            self.rng.next_f32_range(low, 500.0)
        };
        self.treasure_present = true;
    }

    fn overlaps(&self, position: f32) -> bool {
        let top = self.bar_position - OVERLAP_BAR_OFFSET;
        position + OVERLAP_BOTTOM_SLACK <= top + self.setup.bar_height
            && position - OVERLAP_TOP_SLACK >= top
    }
}

/// Runs one controlled session and returns its result plus the press sequence.
pub fn play_session<I, O>(
    setup: SessionSetup,
    controller: &mut BobberController,
    input: &mut I,
    max_ticks: u32,
    mut observe: O,
) -> (SessionResult, Vec<bool>)
where
    I: ActuationInput + ?Sized,
    O: FnMut(&MinigameState, &TickReport),
{
    let mut sim = BobberBarSim::new(setup);
    let mut presses = Vec::new();
    controller.close();

    while sim.is_running() && sim.tick() < max_ticks {
        let pressed = input.is_engaged(sim.tick(), &sim.snapshot());
        sim.step(pressed);
        presses.push(pressed);

        let mut state = sim.snapshot();
        let active = sim.is_running().then_some(&mut state);
        if let Some(report) = controller.on_tick(active) {
            sim.apply_output(&state);
            observe(&state, &report);
        }
    }

    controller.close();
    (sim.result(), presses)
}

/// Re-runs a recorded session against a fresh controller.
pub fn replay_session(seed: u32, presses: &[bool], config: AutoFishConfig) -> SessionResult {
    let mut controller = BobberController::new(config);
    let mut input = Recorded::new(presses);
    let (result, _) = play_session(
        SessionSetup::from_seed(seed),
        &mut controller,
        &mut input,
        presses.len() as u32,
        |_, _| {},
    );
    result
}
