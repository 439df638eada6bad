//! Pursuit target selection with treasure-diversion hysteresis.
//!
//! Diversion starts once catch progress passes [`DIVERT_ENTER_PROGRESS`] and then
//! holds until progress falls to [`DIVERT_EXIT_PROGRESS`] or the chest is gone.

use crate::constants::{DIVERT_ENTER_PROGRESS, DIVERT_EXIT_PROGRESS};
use crate::state::{ControllerState, MinigameState};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetSelection {
    /// Position the bar should pursue this tick.
    pub target_pos: f32,
    /// Secondary point used for the anticipation offset.
    pub other_pos: f32,
    pub diverting: bool,
}

pub fn should_divert(state: &MinigameState, ctrl: ControllerState, catch_treasure: bool) -> bool {
    if !catch_treasure || !state.treasure_available() {
        return false;
    }
    let progress = state.distance_from_catching.clamp(0.0, 1.0);
    progress > DIVERT_ENTER_PROGRESS
        || (ctrl.diverting_to_treasure && progress > DIVERT_EXIT_PROGRESS)
}

pub fn select_target(
    state: &MinigameState,
    ctrl: ControllerState,
    catch_treasure: bool,
) -> (TargetSelection, ControllerState) {
    let diverting = should_divert(state, ctrl, catch_treasure);
    let next = ControllerState {
        diverting_to_treasure: diverting,
    };

    let selection = if diverting {
        TargetSelection {
            target_pos: state.treasure_position,
            other_pos: state.fish_position,
            diverting,
        }
    } else {
        TargetSelection {
            target_pos: state.fish_position,
            other_pos: state.resolved_fish_target(),
            diverting,
        }
    };

    (selection, next)
}
