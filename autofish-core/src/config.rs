use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::speed::{PressBias, SpeedStrategy};

/// Player-facing options. Missing keys fall back to the defaults below.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutoFishConfig {
    /// Cast at full power every time.
    pub max_cast_power: bool,
    /// Hook the fish as soon as it nibbles.
    pub auto_hit: bool,
    /// Halve the remaining wait before a bite, every tick.
    pub fast_bite: bool,
    /// Divert to the treasure chest once the catch is nearly secured.
    pub catch_treasure: bool,
    /// Steer with a fixed high acceleration regardless of hook.
    pub faster_speed: bool,
    pub press_bias: PressBias,
    pub strategy: SpeedStrategy,
    pub overshoot_damping: bool,
}

impl Default for AutoFishConfig {
    fn default() -> Self {
        Self {
            max_cast_power: true,
            auto_hit: true,
            fast_bite: false,
            catch_treasure: true,
            faster_speed: false,
            press_bias: PressBias::Raise,
            strategy: SpeedStrategy::Aim,
            overshoot_damping: false,
        }
    }
}

impl AutoFishConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.overshoot_damping && self.strategy == SpeedStrategy::Band {
            return Err(ConfigError::DampingWithBandStrategy);
        }
        Ok(())
    }
}
