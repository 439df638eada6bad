pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod input;
pub mod rng;
pub mod rod;
pub mod sim;
pub mod speed;
pub mod state;
pub mod tape;
pub mod target;
pub mod verify;

pub use config::AutoFishConfig;
pub use controller::{BobberController, TickReport};
pub use error::{ConfigError, TapeError};
pub use speed::{compute_speed, compute_target_speed, SpeedRequest};
pub use state::{ControllerState, HookVariant, MinigameState};
pub use target::{select_target, TargetSelection};
pub use verify::{verify_tape, ReplayJournal};
