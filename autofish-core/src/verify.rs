use serde::{Deserialize, Serialize};

use crate::config::AutoFishConfig;
use crate::error::TapeError;
use crate::sim::{replay_session, SessionOutcome, SessionResult};
use crate::tape::parse_tape;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplayJournal {
    pub seed: u32,
    pub tick_count: u32,
    pub outcome: SessionOutcome,
    pub treasure_caught: bool,
    pub final_distance: f32,
    pub press_ticks: u32,
    pub tape_checksum: u32,
}

/// Replays a press tape under `config` and checks the recorded footer.
pub fn verify_tape(
    bytes: &[u8],
    max_ticks: u32,
    config: AutoFishConfig,
) -> Result<ReplayJournal, TapeError> {
    verify_tape_with_replay(bytes, max_ticks, |seed, presses| {
        replay_session(seed, presses, config)
    })
}

fn verify_tape_with_replay<F>(
    bytes: &[u8],
    max_ticks: u32,
    replay_fn: F,
) -> Result<ReplayJournal, TapeError>
where
    F: FnOnce(u32, &[bool]) -> SessionResult,
{
    let tape = parse_tape(bytes, max_ticks)?;
    let presses = tape.press_flags();
    let replayed = replay_fn(tape.header.seed, &presses);

    if replayed.is_boss_fish != tape.header.is_boss_fish {
        return Err(TapeError::BossFlagMismatch {
            claimed: tape.header.is_boss_fish,
            computed: replayed.is_boss_fish,
        });
    }

    if replayed.ticks != tape.header.tick_count {
        return Err(TapeError::TickCountMismatch {
            claimed: tape.header.tick_count,
            computed: replayed.ticks,
        });
    }

    if replayed.outcome != tape.footer.outcome {
        return Err(TapeError::OutcomeMismatch {
            claimed: tape.footer.outcome,
            computed: replayed.outcome,
        });
    }

    if replayed.treasure_caught != tape.footer.treasure_caught {
        return Err(TapeError::TreasureMismatch {
            claimed: tape.footer.treasure_caught,
            computed: replayed.treasure_caught,
        });
    }

    if replayed.final_distance.to_bits() != tape.footer.final_distance.to_bits() {
        return Err(TapeError::DistanceMismatch {
            claimed: tape.footer.final_distance,
            computed: replayed.final_distance,
        });
    }

    Ok(ReplayJournal {
        seed: tape.header.seed,
        tick_count: tape.header.tick_count,
        outcome: replayed.outcome,
        treasure_caught: replayed.treasure_caught,
        final_distance: replayed.final_distance,
        press_ticks: presses.iter().filter(|p| **p).count() as u32,
        tape_checksum: tape.footer.checksum,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tape::serialize_tape;

    fn recorded(outcome: SessionOutcome) -> SessionResult {
        SessionResult {
            seed: 0x42,
            ticks: 2,
            outcome,
            treasure_appeared: false,
            treasure_caught: false,
            final_distance: 0.304,
            perfect: false,
            is_boss_fish: false,
            rng_state: 0,
        }
    }

    #[test]
    fn matching_replay_produces_journal() {
        let bytes = serialize_tape(&[true, false], &recorded(SessionOutcome::Running));
        let journal = verify_tape_with_replay(&bytes, 10, |seed, presses| {
            assert_eq!(seed, 0x42);
            assert_eq!(presses, [true, false]);
            recorded(SessionOutcome::Running)
        })
        .unwrap();
        assert_eq!(journal.tick_count, 2);
        assert_eq!(journal.press_ticks, 1);
    }

    #[test]
    fn outcome_mismatch_is_reported() {
        let bytes = serialize_tape(&[true, false], &recorded(SessionOutcome::Caught));
        let err = verify_tape_with_replay(&bytes, 10, |_, _| recorded(SessionOutcome::Running))
            .unwrap_err();
        assert_eq!(
            err,
            TapeError::OutcomeMismatch {
                claimed: SessionOutcome::Caught,
                computed: SessionOutcome::Running,
            }
        );
    }

    #[test]
    fn distance_mismatch_is_reported() {
        let bytes = serialize_tape(&[true, false], &recorded(SessionOutcome::Running));
        let err = verify_tape_with_replay(&bytes, 10, |_, _| SessionResult {
            final_distance: 0.5,
            ..recorded(SessionOutcome::Running)
        })
        .unwrap_err();
        assert!(matches!(err, TapeError::DistanceMismatch { .. }));
    }

    #[test]
    fn tick_count_mismatch_is_reported() {
        let bytes = serialize_tape(&[true, false], &recorded(SessionOutcome::Running));
        let err = verify_tape_with_replay(&bytes, 10, |_, _| SessionResult {
            ticks: 1,
            ..recorded(SessionOutcome::Running)
        })
        .unwrap_err();
        assert_eq!(
            err,
            TapeError::TickCountMismatch {
                claimed: 2,
                computed: 1
            }
        );
    }
}
