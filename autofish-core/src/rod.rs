use serde::{Deserialize, Serialize};

use crate::config::AutoFishConfig;

/// Fishing-rod fields the pre-minigame assists touch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RodState {
    /// Milliseconds until a fish bites.
    pub time_until_bite: f32,
    pub is_nibbling: bool,
    pub is_reeling: bool,
    pub hit: bool,
    pub pulling_out_of_water: bool,
    pub fish_caught: bool,
    pub showing_treasure: bool,
    pub casting_power: f32,
}

impl RodState {
    /// A fish is on the line and nothing else has claimed the rod yet.
    pub fn ready_to_hook(&self) -> bool {
        self.is_nibbling
            && !self.is_reeling
            && !self.hit
            && !self.pulling_out_of_water
            && !self.fish_caught
            && !self.showing_treasure
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RodAssists {
    pub bite_hastened: bool,
    /// The host should perform the tool action this tick.
    pub hook_fish: bool,
    pub cast_maxed: bool,
}

pub fn apply_rod_assists(rod: &mut RodState, config: &AutoFishConfig) -> RodAssists {
    let mut applied = RodAssists::default();

    if config.fast_bite && rod.time_until_bite > 0.0 {
        rod.time_until_bite /= 2.0;
        applied.bite_hastened = true;
    }

    if config.auto_hit && rod.ready_to_hook() {
        applied.hook_fish = true;
    }

    if config.max_cast_power {
        rod.casting_power = 1.0;
        applied.cast_maxed = true;
    }

    applied
}
