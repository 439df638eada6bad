use serde::{Deserialize, Serialize};

use crate::constants::{BARBED_HOOK_ITEM_ID, TRACK_LENGTH, UNSET_FISH_TARGET};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookVariant {
    #[default]
    Normal,
    Barbed,
}

impl HookVariant {
    /// Maps the host's attached bobber item id onto the variant that changes physics.
    pub fn from_bobber_id(id: i32) -> Self {
        if id == BARBED_HOOK_ITEM_ID {
            Self::Barbed
        } else {
            Self::Normal
        }
    }
}

/// Per-tick snapshot of the host minigame. The controller only writes `bar_speed`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinigameState {
    pub bar_position: f32,
    pub bar_height: f32,
    pub bar_speed: f32,
    pub fish_position: f32,
    /// Next-tick fish target; `-1` when the fish has none.
    pub fish_target_position: f32,
    pub treasure_position: f32,
    pub treasure_present: bool,
    pub treasure_caught: bool,
    pub is_boss_fish: bool,
    pub distance_from_catching: f32,
    pub hook_variant: HookVariant,
    pub player_pressing: bool,
    pub track_length: f32,
}

impl Default for MinigameState {
    fn default() -> Self {
        Self {
            bar_position: 0.0,
            bar_height: 96.0,
            bar_speed: 0.0,
            fish_position: 0.0,
            fish_target_position: UNSET_FISH_TARGET,
            treasure_position: 0.0,
            treasure_present: false,
            treasure_caught: false,
            is_boss_fish: false,
            distance_from_catching: 0.3,
            hook_variant: HookVariant::Normal,
            player_pressing: false,
            track_length: TRACK_LENGTH,
        }
    }
}

impl MinigameState {
    pub fn track_max(&self) -> f32 {
        crate::speed::track_max(self.track_length, self.bar_height)
    }

    /// The fish's next-tick target, with the unset sentinel resolved to the fish itself.
    pub fn resolved_fish_target(&self) -> f32 {
        if self.fish_target_position == UNSET_FISH_TARGET {
            self.fish_position
        } else {
            self.fish_target_position
        }
    }

    pub fn treasure_available(&self) -> bool {
        self.treasure_present && !self.treasure_caught && !self.is_boss_fish
    }
}

/// Controller memory for one minigame session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerState {
    pub diverting_to_treasure: bool,
}
