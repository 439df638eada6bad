use crate::config::AutoFishConfig;
use crate::speed::{accel_budget, compute_speed_detailed, hook_step, SpeedRequest};
use crate::state::{ControllerState, MinigameState};
use crate::target::select_target;

/// What the controller decided on one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    pub target_pos: f32,
    pub other_pos: f32,
    pub aim: f32,
    pub target_speed: f32,
    pub accel_budget: f32,
    pub diverting: bool,
    pub diversion_changed: bool,
    pub previous_speed: f32,
    pub new_speed: f32,
}

/// Drives the bobber bar for one minigame session at a time.
#[derive(Clone, Debug)]
pub struct BobberController {
    config: AutoFishConfig,
    state: ControllerState,
}

impl BobberController {
    pub fn new(config: AutoFishConfig) -> Self {
        Self {
            config,
            state: ControllerState::default(),
        }
    }

    pub fn config(&self) -> &AutoFishConfig {
        &self.config
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Session teardown; the next session starts from a clean state.
    pub fn close(&mut self) {
        self.state = ControllerState::default();
    }

    /// Host entry point: `None` when no minigame is open this tick.
    pub fn on_tick(&mut self, minigame: Option<&mut MinigameState>) -> Option<TickReport> {
        match minigame {
            Some(state) => Some(self.tick(state)),
            None => {
                self.close();
                None
            }
        }
    }

    pub fn tick(&mut self, minigame: &mut MinigameState) -> TickReport {
        let (selection, next_state) =
            select_target(minigame, self.state, self.config.catch_treasure);
        let diversion_changed = next_state != self.state;
        self.state = next_state;

        let budget = accel_budget(minigame.hook_variant, self.config.faster_speed);
        let request = SpeedRequest {
            bar_position: minigame.bar_position,
            bar_height: minigame.bar_height,
            bar_speed: minigame.bar_speed,
            target_pos: selection.target_pos,
            other_pos: selection.other_pos,
            accel_budget: budget,
            press_step: hook_step(minigame.hook_variant),
            player_pressing: minigame.player_pressing,
            track_length: minigame.track_length,
            press_bias: self.config.press_bias,
            strategy: self.config.strategy,
            overshoot_damping: self.config.overshoot_damping,
        };
        let outcome = compute_speed_detailed(&request);

        let previous_speed = minigame.bar_speed;
        minigame.bar_speed = outcome.new_speed;

        TickReport {
            target_pos: selection.target_pos,
            other_pos: selection.other_pos,
            aim: outcome.aim,
            target_speed: outcome.target_speed,
            accel_budget: budget,
            diverting: selection.diverting,
            diversion_changed,
            previous_speed,
            new_speed: outcome.new_speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::HookVariant;

    fn treasure_minigame(progress: f32) -> MinigameState {
        MinigameState {
            bar_position: 100.0,
            bar_height: 96.0,
            fish_position: 300.0,
            treasure_position: 60.0,
            treasure_present: true,
            distance_from_catching: progress,
            ..MinigameState::default()
        }
    }

    #[test]
    fn tick_writes_only_bar_speed() {
        let mut controller = BobberController::new(AutoFishConfig::default());
        let before = treasure_minigame(0.4);
        let mut after = before;
        let report = controller.tick(&mut after);

        assert_eq!(after.bar_speed, report.new_speed);
        assert_eq!(
            MinigameState {
                bar_speed: before.bar_speed,
                ..after
            },
            before
        );
    }

    #[test]
    fn closing_the_minigame_resets_diversion() {
        let mut controller = BobberController::new(AutoFishConfig::default());
        let mut minigame = treasure_minigame(0.8);
        let report = controller.tick(&mut minigame);
        assert!(report.diverting);
        assert!(report.diversion_changed);
        assert!(controller.state().diverting_to_treasure);

        assert!(controller.on_tick(None).is_none());
        assert!(!controller.state().diverting_to_treasure);

        // Mid-range progress no longer holds a diversion after the reset.
        let mut minigame = treasure_minigame(0.5);
        let report = controller
            .on_tick(Some(&mut minigame))
            .expect("minigame is open");
        assert!(!report.diverting);
    }

    #[test]
    fn faster_speed_overrides_budget_but_not_press_step() {
        let config = AutoFishConfig {
            faster_speed: true,
            ..AutoFishConfig::default()
        };
        let mut controller = BobberController::new(config);
        let mut minigame = MinigameState {
            bar_position: 0.0,
            fish_position: 400.0,
            hook_variant: HookVariant::Barbed,
            ..MinigameState::default()
        };
        let report = controller.tick(&mut minigame);
        assert_eq!(report.accel_budget, 0.6);
        // -0.075 release step, then +0.6 toward the distant aim point.
        assert!((minigame.bar_speed - 0.525).abs() < 1e-4);
    }
}
